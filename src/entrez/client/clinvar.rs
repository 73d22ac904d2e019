//! ClinVar and dbSNP lookups composed from search and fetch

use tracing::{info, instrument};

use crate::clinvar::{VariantRecord, parse_variant_records};
use crate::error::Result;
use crate::term::SearchTerm;

use super::EntrezClient;

const CLINVAR: &str = "clinvar";
const SNP: &str = "snp";

impl EntrezClient {
    /// Fetch the ClinVar VCV XML for every variant of a gene
    ///
    /// Searches `<gene>[gene]` in ClinVar, then fetches the result set with
    /// `rettype=vcv&retmode=xml&is_variationid`. The raw XML is returned and
    /// also kept as the current document.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use entrez_variants::EntrezClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let mut client = EntrezClient::new();
    ///     let xml = client.fetch_clinvar_summary_for_gene("GAA").await?;
    ///     for record in entrez_variants::clinvar::parse_variant_records(&xml)? {
    ///         println!("{record}");
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn fetch_clinvar_summary_for_gene(&mut self, gene: &str) -> Result<String> {
        let token = self.search(SearchTerm::gene(gene), CLINVAR).await?;
        self.fetch(&token, CLINVAR, "vcv", "xml", "is_variationid")
            .await?;
        Ok(self.current_body()?.to_string())
    }

    /// Look up the clinical significance of named variants of a gene
    ///
    /// Builds `"<gene>"[gene] AND ( "v1"[varname] OR ... )`, searches ClinVar,
    /// fetches the matches as VCV XML and flattens them into records in
    /// document order. When the search matches nothing no fetch is issued and
    /// the result is empty.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use entrez_variants::EntrezClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let mut client = EntrezClient::new();
    ///     let records = client
    ///         .fetch_significance_by_variants("CFTR", &["NM_000492.3:c.79G>T", "NM_000492.3:c.125C>T"])
    ///         .await?;
    ///     for record in &records {
    ///         println!("{record}");
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip_all, fields(gene = %gene, variants = variant_names.len()))]
    pub async fn fetch_significance_by_variants<S: AsRef<str>>(
        &mut self,
        gene: &str,
        variant_names: &[S],
    ) -> Result<Vec<VariantRecord>> {
        let term = SearchTerm::gene_variants(gene, variant_names);
        let search = self.search_for_ids(&term, CLINVAR).await?;

        if search.ids.is_empty() {
            info!("No ClinVar records matched, skipping fetch");
            return Ok(Vec::new());
        }

        self.fetch(&search.token, CLINVAR, "vcv", "xml", "is_variationid")
            .await?;
        let records = parse_variant_records(self.current_body()?)?;

        info!(
            matched = search.ids.len(),
            records = records.len(),
            "Significance lookup completed"
        );
        Ok(records)
    }

    /// Fetch dbSNP variation XML for a human chromosome position range
    ///
    /// Searches `<start>:<stop>[Base Position] AND "<chr>" [CHR] AND txid9606`
    /// in dbSNP, then fetches `rettype=variation&retmode=xml`.
    #[instrument(skip(self))]
    pub async fn fetch_snp_by_position(
        &mut self,
        start: u64,
        stop: u64,
        chromosome: &str,
    ) -> Result<String> {
        let term = SearchTerm::position_range(start, stop, chromosome);
        let token = self.search(&term, SNP).await?;
        self.fetch(&token, SNP, "variation", "xml", "").await?;
        Ok(self.current_body()?.to_string())
    }
}
