//! # Entrez Variants
//!
//! An async client for NCBI Entrez E-utilities focused on gene-variant
//! annotations from ClinVar and dbSNP.
//!
//! Lookups follow the Entrez History server pattern:
//!
//! 1. **search** (`esearch.fcgi`) stores the result set on the server and
//!    returns a [`HistoryToken`] (`WebEnv` + `QueryKey`)
//! 2. **fetch** (`efetch.fcgi`) retrieves that result set as a raw document
//! 3. **extract** flattens a ClinVar VCV document into [`VariantRecord`]s
//!
//! Every step is a single request awaited in sequence. Nothing is retried;
//! see [`EntrezError::is_transient`] when building a retry loop on top.
//!
//! ## Quick Start
//!
//! ```no_run
//! use entrez_variants::EntrezClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = EntrezClient::new();
//!
//!     let records = client
//!         .fetch_significance_by_variants("CFTR", &["NM_000492.3:c.79G>T", "NM_000492.3:c.1505T>A"])
//!         .await?;
//!
//!     for record in &records {
//!         println!("{record}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Step by step
//!
//! ```no_run
//! use entrez_variants::{EntrezClient, SearchTerm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = EntrezClient::new();
//!
//!     let token = client.search(SearchTerm::gene("GAA"), "clinvar").await?;
//!     client.fetch(&token, "clinvar", "vcv", "xml", "is_variationid").await?;
//!
//!     for record in client.variant_records()? {
//!         println!("{:?}: {} interpretations", record.variation_id, record.interpretations.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod clinvar;
pub mod config;
pub mod entrez;
pub mod error;
pub mod rate_limit;
pub mod template;
pub mod term;

// Re-export main types for convenience
pub use clinvar::{ClinicalAssertion, InterpretationEntry, VariantRecord};
pub use config::ClientConfig;
pub use entrez::{DEFAULT_DATABASE, EntrezClient, FetchResult, HistoryToken, SearchResult};
pub use error::{EntrezError, Result, TransportKind};
pub use term::SearchTerm;
