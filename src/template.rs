//! URL templates with `<placeholder>` tokens
//!
//! E-utilities URLs are kept as fixed templates such as
//! `esearch.fcgi?db=<database>&term=<query>&usehistory=y`. Rendering replaces
//! each placeholder token with its bound value in one left-to-right pass over
//! the template, so the result never depends on the order in which bindings
//! were supplied and a substituted value is never scanned again.
//!
//! Values are inserted verbatim. No URL-encoding is applied; callers supply
//! already-safe tokens (reqwest still normalises characters that are illegal
//! in a URL when the request is built).

use std::fmt;

use tracing::debug;

/// Placeholder tokens understood by [`UrlTemplate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    Database,
    Query,
    WebEnv,
    QueryKey,
    RetType,
    RetMode,
    Additional,
}

impl Placeholder {
    pub const ALL: [Placeholder; 7] = [
        Placeholder::Database,
        Placeholder::Query,
        Placeholder::WebEnv,
        Placeholder::QueryKey,
        Placeholder::RetType,
        Placeholder::RetMode,
        Placeholder::Additional,
    ];

    /// The literal token as it appears in a template
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Database => "<database>",
            Placeholder::Query => "<query>",
            Placeholder::WebEnv => "<webenv>",
            Placeholder::QueryKey => "<querykey>",
            Placeholder::RetType => "<rettype>",
            Placeholder::RetMode => "<retmode>",
            Placeholder::Additional => "<additional>",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A URL (or URL path relative to the E-utilities base) with placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlTemplate(&'static str);

/// esearch returning XML, with the result set stored on the history server
pub const ESEARCH: UrlTemplate =
    UrlTemplate::new("esearch.fcgi?db=<database>&term=<query>&usehistory=y");

/// esearch returning the JSON schema (`esearchresult.webenv`, ...)
pub const ESEARCH_JSON: UrlTemplate =
    UrlTemplate::new("esearch.fcgi?db=<database>&term=<query>&retmode=json&usehistory=y");

/// efetch of a history-server result set
pub const EFETCH: UrlTemplate = UrlTemplate::new(
    "efetch.fcgi?db=<database>&retmode=<retmode>&rettype=<rettype>&<additional>&WebEnv=<webenv>&query_key=<querykey>&usehistory=y",
);

impl UrlTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Substitute every bound placeholder
    ///
    /// Unbound placeholders stay in the output untouched. If the same
    /// placeholder is bound twice the last binding wins.
    ///
    /// # Example
    ///
    /// ```
    /// use entrez_variants::template::{Placeholder, ESEARCH};
    ///
    /// let url = ESEARCH.render([
    ///     (Placeholder::Query, "GAA[gene]"),
    ///     (Placeholder::Database, "clinvar"),
    /// ]);
    /// assert_eq!(url, "esearch.fcgi?db=clinvar&term=GAA[gene]&usehistory=y");
    /// ```
    pub fn render<'a, I>(&self, bindings: I) -> String
    where
        I: IntoIterator<Item = (Placeholder, &'a str)>,
    {
        let mut values: [Option<&str>; Placeholder::ALL.len()] = [None; Placeholder::ALL.len()];
        for (placeholder, value) in bindings {
            values[placeholder.index()] = Some(value);
        }

        let mut out = String::with_capacity(self.0.len() + 64);
        let mut rest = self.0;

        while let Some(pos) = rest.find('<') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];

            let matched = Placeholder::ALL
                .iter()
                .copied()
                .find(|p| rest.starts_with(p.token()));

            match matched {
                Some(placeholder) => {
                    let token = placeholder.token();
                    match values[placeholder.index()] {
                        Some(value) => out.push_str(value),
                        None => out.push_str(token),
                    }
                    rest = &rest[token.len()..];
                }
                None => {
                    out.push('<');
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);

        let unresolved = self.unresolved_in(&values);
        if !unresolved.is_empty() {
            debug!(template = self.0, ?unresolved, "Template rendered with unbound placeholders");
        }

        out
    }

    /// Placeholders that occur in this template
    pub fn placeholders(&self) -> Vec<Placeholder> {
        Placeholder::ALL
            .iter()
            .copied()
            .filter(|p| self.0.contains(p.token()))
            .collect()
    }

    fn unresolved_in(&self, values: &[Option<&str>]) -> Vec<Placeholder> {
        self.placeholders()
            .into_iter()
            .filter(|p| values[p.index()].is_none())
            .collect()
    }
}
