//! Entrez query terms for ClinVar and dbSNP lookups

use std::fmt;

/// Entrez query string (`field[qualifier]` tokens joined by boolean operators)
///
/// Terms are built by plain interpolation; nothing is validated or escaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Use a raw Entrez query verbatim
    pub fn new<S: Into<String>>(raw: S) -> Self {
        Self(raw.into())
    }

    /// All records for a gene symbol
    ///
    /// # Example
    ///
    /// ```
    /// use entrez_variants::SearchTerm;
    ///
    /// assert_eq!(SearchTerm::gene("GAA").as_str(), "GAA[gene]");
    /// ```
    pub fn gene(gene: &str) -> Self {
        Self(format!("{gene}[gene]"))
    }

    /// Named variants of a gene
    ///
    /// With no variant names this reduces to the quoted gene clause.
    ///
    /// # Example
    ///
    /// ```
    /// use entrez_variants::SearchTerm;
    ///
    /// let term = SearchTerm::gene_variants("CFTR", &["NM_000492.3:c.79G>T", "NM_000492.3:c.125C>T"]);
    /// assert_eq!(
    ///     term.as_str(),
    ///     r#""CFTR"[gene] AND ( "NM_000492.3:c.79G>T"[varname] OR "NM_000492.3:c.125C>T"[varname] )"#
    /// );
    /// ```
    pub fn gene_variants<S: AsRef<str>>(gene: &str, variant_names: &[S]) -> Self {
        let gene_clause = format!("\"{gene}\"[gene]");
        if variant_names.is_empty() {
            return Self(gene_clause);
        }

        let variants = variant_names
            .iter()
            .map(|name| format!("\"{}\"[varname]", name.as_ref()))
            .collect::<Vec<_>>()
            .join(" OR ");

        Self(format!("{gene_clause} AND ( {variants} )"))
    }

    /// Human (txid9606) dbSNP records within a chromosome position range
    ///
    /// # Example
    ///
    /// ```
    /// use entrez_variants::SearchTerm;
    ///
    /// let term = SearchTerm::position_range(1000, 2000, "7");
    /// assert_eq!(term.as_str(), r#"1000:2000[Base Position] AND "7" [CHR] AND txid9606"#);
    /// ```
    pub fn position_range(start: u64, stop: u64, chromosome: &str) -> Self {
        Self(format!(
            "{start}:{stop}[Base Position] AND \"{chromosome}\" [CHR] AND txid9606"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SearchTerm {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for SearchTerm {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
