//! Entrez E-utilities client built on the History server
//!
//! The client functionality is split across focused modules under [`client`]:
//! - `client/mod.rs` - Core client struct, constructors, search and fetch
//! - `client/clinvar` - ClinVar and dbSNP lookups composed from search and fetch
//! - `client/einfo` - Database information (EInfo API)
//! - `client/pubmed` - PubMed abstract retrieval

pub mod client;
pub mod models;
pub(crate) mod responses;

pub use client::{DEFAULT_DATABASE, EntrezClient};
pub use models::{FetchResult, HistoryToken, SearchResult};
