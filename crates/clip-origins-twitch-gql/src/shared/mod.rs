use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

pub mod clip;
pub mod video;

/// Undifferentiated response body: `data` and `errors` can each be present,
/// absent, or null independently, so triage happens after deserializing.
#[derive(Debug, Deserialize)]
pub(crate) struct RawQueryResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Value>,
}
impl RawQueryResponse {
    /// Splits the body into typed data or a failure. A populated `errors`
    /// array wins even when `data` is also present, and a body with neither
    /// field is malformed.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        if let Some(errors) = self.errors
            && errors.as_array().is_none_or(|arr| !arr.is_empty())
        {
            return Err(Error::Protocol { errors });
        }

        let Some(data) = self.data else {
            return Err(Error::MissingData);
        };

        Ok(serde_json::from_value(data)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConnection<T> {
    pub edges: Vec<QueryEdge<T>>,
    pub page_info: QueryPageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEdge<T> {
    pub cursor: Option<String>,
    pub node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPageInfo {
    pub has_next_page: bool,
}
