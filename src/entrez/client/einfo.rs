//! Database information (EInfo API)

use tracing::instrument;

use crate::error::Result;
use crate::template::{Placeholder, UrlTemplate};

use super::EntrezClient;

const EINFO_DB: UrlTemplate = UrlTemplate::new("einfo.fcgi?db=<database>");

impl EntrezClient {
    /// List the Entrez databases, as the raw EInfo XML
    #[instrument(skip(self))]
    pub async fn info(&self) -> Result<String> {
        let response = self
            .make_request("einfo.fcgi", self.config.fetch_timeout)
            .await?;
        Ok(response.text().await?)
    }

    /// Raw EInfo XML describing one database (fields, links, record count)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use entrez_variants::EntrezClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = EntrezClient::new();
    ///     let xml = client.database_info("clinvar").await?;
    ///     println!("{xml}");
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn database_info(&self, db: &str) -> Result<String> {
        let path = EINFO_DB.render([(Placeholder::Database, db)]);
        let response = self.make_request(&path, self.config.fetch_timeout).await?;
        Ok(response.text().await?)
    }
}
