//! PubMed abstract retrieval

use tracing::instrument;

use crate::error::Result;

use super::EntrezClient;

impl EntrezClient {
    /// Fetch the plain-text abstract of a PubMed article
    ///
    /// Uses `efetch db=pubmed rettype=abstract retmode=text`; the text is
    /// returned as NCBI formats it (citation, authors, abstract, identifiers).
    #[instrument(skip(self))]
    pub async fn fetch_pubmed_abstract(&self, pmid: &str) -> Result<String> {
        let path = format!(
            "efetch.fcgi?db=pubmed&id={}&retmode=text&rettype=abstract",
            urlencoding::encode(pmid.trim())
        );
        let response = self.make_request(&path, self.config.fetch_timeout).await?;
        Ok(response.text().await?)
    }
}
