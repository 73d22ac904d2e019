//! esearch response schemas
//!
//! esearch answers in XML by default and in JSON with `retmode=json`. The two
//! layouts differ (XML `WebEnv`/`QueryKey` elements under the root versus the
//! JSON `esearchresult.webenv`/`esearchresult.querykey` keys) and are kept as
//! separate types.

use serde::{Deserialize, Serialize};

use crate::entrez::models::{HistoryToken, SearchResult};
use crate::error::{EntrezError, Result};

/// `<eSearchResult>` document; only the root's immediate children are read
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ESearchXml {
    #[serde(rename = "Count", default)]
    pub count: Option<String>,
    #[serde(rename = "QueryKey", default)]
    pub query_key: Option<String>,
    #[serde(rename = "WebEnv", default)]
    pub webenv: Option<String>,
    #[serde(rename = "IdList", default)]
    pub id_list: Option<IdList>,
    #[serde(rename = "ERROR", default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdList {
    #[serde(rename = "Id", default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESearchJson {
    pub esearchresult: ESearchJsonData,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESearchJsonData {
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub idlist: Vec<String>,
    #[serde(default)]
    pub webenv: Option<String>,
    #[serde(default, rename = "querykey")]
    pub query_key: Option<String>,
}

pub(crate) fn parse_esearch_xml(body: &str) -> Result<ESearchXml> {
    Ok(quick_xml::de::from_str(body)?)
}

impl ESearchXml {
    pub fn into_search_result(self) -> Result<SearchResult> {
        let token = require_token(self.webenv, self.query_key, self.error.as_deref())?;
        Ok(SearchResult {
            token,
            ids: self.id_list.map(|list| list.ids).unwrap_or_default(),
            count: self.count.and_then(|c| c.trim().parse().ok()),
        })
    }
}

impl ESearchJson {
    pub fn into_search_result(self) -> Result<SearchResult> {
        let data = self.esearchresult;
        let token = require_token(data.webenv, data.query_key, data.error.as_deref())?;
        Ok(SearchResult {
            token,
            ids: data.idlist,
            count: data.count.and_then(|c| c.trim().parse().ok()),
        })
    }
}

fn require_token(
    webenv: Option<String>,
    query_key: Option<String>,
    error: Option<&str>,
) -> Result<HistoryToken> {
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let webenv = present(webenv);
    let query_key = present(query_key);

    if let (Some(web_env), Some(query_key)) = (webenv.as_ref(), query_key.as_ref()) {
        return Ok(HistoryToken::new(web_env.trim(), query_key.trim()));
    }

    let field = if webenv.is_none() { "WebEnv" } else { "QueryKey" };
    match error {
        Some(message) => Err(EntrezError::MalformedResponse {
            message: format!("missing required field `{field}` (NCBI error: {message})"),
        }),
        None => Err(EntrezError::missing(field)),
    }
}
