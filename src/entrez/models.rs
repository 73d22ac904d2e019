use serde::{Deserialize, Serialize};

/// History-server handle returned by esearch
///
/// Identifies a server-side result set. Both values are opaque and must be
/// passed back verbatim. A token is only meaningful for the database it was
/// created against, and it expires with the server session (typically after
/// an hour of inactivity); neither is checked locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryToken {
    pub web_env: String,
    pub query_key: String,
}

impl HistoryToken {
    pub fn new<W: Into<String>, Q: Into<String>>(web_env: W, query_key: Q) -> Self {
        Self {
            web_env: web_env.into(),
            query_key: query_key.into(),
        }
    }
}

/// Result of an esearch call that also reports matching UIDs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub token: HistoryToken,
    /// UIDs from `IdList`, in server order; capped by the server's default retmax
    pub ids: Vec<String>,
    /// Total number of matches reported by `Count`
    pub count: Option<usize>,
}

/// Raw efetch response body and its HTTP status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub status: u16,
    pub body: String,
}
