mod clinvar;
mod einfo;
mod pubmed;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, instrument, warn};

use crate::clinvar::{VariantRecord, parse_variant_records};
use crate::config::ClientConfig;
use crate::entrez::models::{FetchResult, HistoryToken, SearchResult};
use crate::entrez::responses::{ESearchJson, parse_esearch_xml};
use crate::error::{EntrezError, Result};
use crate::rate_limit::RateLimiter;
use crate::template::{EFETCH, ESEARCH, ESEARCH_JSON, Placeholder, UrlTemplate};

/// Database searched when none is given
pub const DEFAULT_DATABASE: &str = "clinvar";

/// Client for the Entrez E-utilities History server workflow
///
/// A lookup is two round-trips: [`search`](EntrezClient::search) stores the
/// result set on the NCBI History server and returns a [`HistoryToken`];
/// [`fetch`](EntrezClient::fetch) retrieves that set as a raw document, kept
/// as the client's current document until the next fetch overwrites it.
///
/// `fetch` borrows the client mutably, so one instance never has two fetches
/// in flight. For concurrent lookups, clone the client: clones get their own
/// document slot and share the HTTP connection pool and rate limiter.
#[derive(Clone)]
pub struct EntrezClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ClientConfig,
    document: Option<FetchResult>,
}

impl EntrezClient {
    /// Create a new client with default configuration
    ///
    /// Uses default NCBI rate limiting (3 requests/second) and no API key.
    ///
    /// # Example
    ///
    /// ```
    /// use entrez_variants::EntrezClient;
    ///
    /// let client = EntrezClient::new();
    /// assert!(client.document().is_none());
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use entrez_variants::{ClientConfig, EntrezClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = EntrezClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .build()
            .expect("Failed to create HTTP client");

        Self::from_parts(client, config)
    }

    /// Create a new client around an existing reqwest client
    ///
    /// Timeouts configured on `client` apply in addition to the per-request
    /// search timeout.
    pub fn with_client(client: Client) -> Self {
        Self::from_parts(client, ClientConfig::new())
    }

    fn from_parts(client: Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.effective_base_url().to_string(),
            rate_limiter: config.create_rate_limiter(),
            config,
            document: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The document stored by the most recent successful fetch
    pub fn document(&self) -> Option<&FetchResult> {
        self.document.as_ref()
    }

    /// Remove and return the current document
    pub fn take_document(&mut self) -> Option<FetchResult> {
        self.document.take()
    }

    /// Run esearch and return the History server token
    ///
    /// # Errors
    ///
    /// * `EntrezError::Transport` - connection failure, DNS failure or the
    ///   search timeout (5 seconds by default) elapsed
    /// * `EntrezError::RemoteStatus` - the server answered with a status other than 200
    /// * `EntrezError::MalformedResponse` - `WebEnv` or `QueryKey` is absent
    ///
    /// # Example
    ///
    /// ```no_run
    /// use entrez_variants::{EntrezClient, SearchTerm};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = EntrezClient::new();
    ///     let token = client.search(SearchTerm::gene("GAA"), "clinvar").await?;
    ///     println!("WebEnv: {}, QueryKey: {}", token.web_env, token.query_key);
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip_all, fields(term = %term.as_ref(), db = %db))]
    pub async fn search<T: AsRef<str>>(&self, term: T, db: &str) -> Result<HistoryToken> {
        let result = self.search_xml(term.as_ref(), db).await?;
        Ok(result.token)
    }

    /// Run esearch and return the token together with the matching UIDs
    ///
    /// The UID list keeps server order and may be empty.
    #[instrument(skip_all, fields(term = %term.as_ref(), db = %db))]
    pub async fn search_for_ids<T: AsRef<str>>(&self, term: T, db: &str) -> Result<SearchResult> {
        let result = self.search_xml(term.as_ref(), db).await?;
        info!(
            ids = result.ids.len(),
            total_count = ?result.count,
            "Search for ids completed"
        );
        Ok(result)
    }

    /// Run esearch with `retmode=json`
    ///
    /// Reads `esearchresult.webenv` and `esearchresult.querykey`; failure
    /// modes match [`search`](EntrezClient::search).
    #[instrument(skip_all, fields(term = %term.as_ref(), db = %db))]
    pub async fn search_json<T: AsRef<str>>(&self, term: T, db: &str) -> Result<SearchResult> {
        let body = self.esearch(ESEARCH_JSON, term.as_ref(), db).await?;
        let parsed: ESearchJson = serde_json::from_str(&body)?;
        parsed.into_search_result()
    }

    async fn search_xml(&self, term: &str, db: &str) -> Result<SearchResult> {
        let body = self.esearch(ESEARCH, term, db).await?;
        parse_esearch_xml(&body)?.into_search_result()
    }

    async fn esearch(&self, template: UrlTemplate, term: &str, db: &str) -> Result<String> {
        let path = template.render([(Placeholder::Database, db), (Placeholder::Query, term)]);
        let response = self
            .make_request(&path, Some(self.config.search_timeout))
            .await?;
        Ok(response.text().await?)
    }

    /// Run efetch for a History server result set
    ///
    /// The body is stored as the current document (see
    /// [`document`](EntrezClient::document)) without being parsed; the HTTP
    /// status is returned. `additional` is inserted into the query string
    /// verbatim, e.g. `"is_variationid"`.
    ///
    /// The token must come from a search against the same `db`; this is not
    /// checked locally.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use entrez_variants::{EntrezClient, SearchTerm};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let mut client = EntrezClient::new();
    ///     let token = client.search(SearchTerm::gene("GAA"), "clinvar").await?;
    ///     let status = client.fetch(&token, "clinvar", "vcv", "xml", "is_variationid").await?;
    ///     println!("{} -> {} bytes", status, client.document().map_or(0, |d| d.body.len()));
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip_all, fields(db = %db, rettype = %ret_type, retmode = %ret_mode))]
    pub async fn fetch(
        &mut self,
        token: &HistoryToken,
        db: &str,
        ret_type: &str,
        ret_mode: &str,
        additional: &str,
    ) -> Result<u16> {
        let path = EFETCH.render([
            (Placeholder::WebEnv, token.web_env.as_str()),
            (Placeholder::QueryKey, token.query_key.as_str()),
            (Placeholder::Database, db),
            (Placeholder::RetType, ret_type),
            (Placeholder::RetMode, ret_mode),
            (Placeholder::Additional, additional),
        ]);

        let response = self.make_request(&path, self.config.fetch_timeout).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        info!(status, bytes = body.len(), "Fetch completed");
        self.document = Some(FetchResult { status, body });
        Ok(status)
    }

    /// Extract variant records from the current document
    ///
    /// The document is expected to be a ClinVar VCV fetch (`rettype=vcv`).
    pub fn variant_records(&self) -> Result<Vec<VariantRecord>> {
        parse_variant_records(self.current_body()?)
    }

    pub(crate) fn current_body(&self) -> Result<&str> {
        self.document
            .as_ref()
            .map(|d| d.body.as_str())
            .ok_or_else(|| EntrezError::MalformedResponse {
                message: "no document has been fetched".to_string(),
            })
    }

    /// Send a GET for `path` relative to the base URL.
    ///
    /// Appends the API parameters (api_key, email, tool), waits for the rate
    /// limiter and requires a 200 response. Never retries.
    pub(crate) async fn make_request(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let api_params = self.config.build_api_params();
        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            url.push_str(&param_strings.join("&"));
        }

        self.rate_limiter.acquire().await;
        debug!("Making API request to: {}", url);

        let mut request = self.client.get(&url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| {
            let err = EntrezError::from(err);
            warn!(error = %err, "Request failed before a response was received");
            err
        })?;

        if response.status() != StatusCode::OK {
            warn!("Request received with code: {}", response.status());
            return Err(EntrezError::RemoteStatus {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        debug!("Request received with code: {}", response.status());
        Ok(response)
    }
}

impl Default for EntrezClient {
    fn default() -> Self {
        Self::new()
    }
}
