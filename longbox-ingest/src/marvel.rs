//! Marvel API client
//!
//! Resolves rows to Marvel issue IDs and fetches issue metadata (onsale
//! date, cover picture, creators, characters) for the enrichment pass.
//! Every request is signed with the timestamp + private key + public
//! key digest the API requires. Failures here are per-row: the caller
//! logs them and moves on.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use md5::{Digest, Md5};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use longbox_common::model::IssueNumber;

/// Marvel API endpoint
const MARVEL_API_URL: &str = "https://gateway.marvel.com/v1/public";

/// Default timeout for Marvel API requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Date type carrying the publication date in issue responses
const ONSALE_DATE: &str = "onsaleDate";

/// Marvel timestamps look like `2009-06-17T00:00:00-0400`
const MARVEL_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Dates are written back in ISO calendar form
const ISSUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Per-row lookup failure. Never fatal to the enrichment pass.
#[derive(Debug, thiserror::Error)]
pub enum MarvelError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Marvel API error: {0}")]
    Api(String),

    #[error("Unexpected Marvel response: {0}")]
    Decode(String),
}

/// Metadata the enrichment pass writes back into a row. Creator and
/// character names come pre-joined with the workbook's `", "` separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueMetadata {
    pub date: String,
    pub pic: String,
    pub creators: String,
    pub characters: String,
}

pub struct MarvelClient {
    http_client: Client,
    public_key: String,
    private_key: String,
    base_url: String,
}

impl MarvelClient {
    pub fn new(public_key: String, private_key: String) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            public_key,
            private_key,
            base_url: MARVEL_API_URL.to_string(),
        }
    }

    /// Find the ID of the single issue matching collection + number
    /// within the year window. More or fewer than one match is an
    /// error.
    pub async fn find(
        &self,
        collection: &str,
        num: f64,
        start_year: i32,
        end_year: i32,
    ) -> Result<String, MarvelError> {
        debug!(collection, num, "querying Marvel comics search");
        let result = self
            .get(
                "comics",
                &[
                    ("title", collection.to_string()),
                    ("issueNumber", IssueNumber(num).to_string()),
                    (
                        "dateRange",
                        format!("{}-01-01,{}-12-31", start_year, end_year),
                    ),
                ],
            )
            .await?;
        Ok(result.id.to_string())
    }

    /// Fetch the metadata of a known issue ID.
    pub async fn find_by_id(&self, id: &str) -> Result<IssueMetadata, MarvelError> {
        debug!(id, "querying Marvel issue metadata");
        let result = self.get(&format!("comics/{}", id), &[]).await?;

        let onsale = result
            .dates
            .iter()
            .find(|d| d.kind == ONSALE_DATE)
            .map(|d| d.date.as_str())
            .unwrap_or_default();
        let date = reformat_onsale_date(onsale)?;
        let pic = result
            .thumbnail
            .map(|t| format!("{}.{}", t.path, t.extension))
            .unwrap_or_default();

        Ok(IssueMetadata {
            date,
            pic,
            creators: join_names(&result.creators.items),
            characters: join_names(&result.characters.items),
        })
    }

    async fn get(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<ApiResult, MarvelError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(params)
            .query(&self.auth_params())
            .send()
            .await
            .map_err(|e| MarvelError::Network(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarvelError::Api(format!("HTTP {}", status)));
        }

        let decoded: ApiResponse = response
            .json()
            .await
            .map_err(|e| MarvelError::Decode(e.to_string()))?;
        single_result(decoded)
    }

    fn auth_params(&self) -> [(&'static str, String); 3] {
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let hash = sign(&ts, &self.private_key, &self.public_key);
        [
            ("ts", ts),
            ("apikey", self.public_key.clone()),
            ("hash", hash),
        ]
    }
}

fn sign(ts: &str, private_key: &str, public_key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(ts.as_bytes());
    hasher.update(private_key.as_bytes());
    hasher.update(public_key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Strict response validation: exactly one result, with complete
/// creator and character lists.
fn single_result(response: ApiResponse) -> Result<ApiResult, MarvelError> {
    if response.code != 200 {
        return Err(MarvelError::Api(format!("HTTP {}", response.code)));
    }
    if response.data.total != 1 {
        return Err(MarvelError::Api(format!(
            "{} comics matched, expected exactly 1",
            response.data.total
        )));
    }
    let result = response
        .data
        .results
        .into_iter()
        .next()
        .ok_or_else(|| MarvelError::Decode("total is 1 but results are empty".to_string()))?;
    if result.creators.available != result.creators.returned {
        return Err(MarvelError::Decode(format!(
            "creator list truncated ({} of {})",
            result.creators.returned, result.creators.available
        )));
    }
    if result.characters.available != result.characters.returned {
        return Err(MarvelError::Decode(format!(
            "character list truncated ({} of {})",
            result.characters.returned, result.characters.available
        )));
    }
    Ok(result)
}

fn reformat_onsale_date(onsale: &str) -> Result<String, MarvelError> {
    let date = DateTime::parse_from_str(onsale, MARVEL_DATE_FORMAT)
        .map_err(|e| MarvelError::Decode(format!("bad onsale date '{}': {}", onsale, e)))?;
    Ok(date.format(ISSUE_DATE_FORMAT).to_string())
}

fn join_names(items: &[ApiItem]) -> String {
    items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Marvel API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse {
    code: i32,
    #[serde(default)]
    data: ApiData,
}

#[derive(Debug, Default, Deserialize)]
struct ApiData {
    #[serde(default)]
    total: i32,
    #[serde(default)]
    results: Vec<ApiResult>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    id: i64,
    #[serde(default)]
    dates: Vec<ApiDate>,
    thumbnail: Option<ApiThumbnail>,
    #[serde(default)]
    creators: ApiItemList,
    #[serde(default)]
    characters: ApiItemList,
}

#[derive(Debug, Deserialize)]
struct ApiDate {
    #[serde(rename = "type")]
    kind: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct ApiThumbnail {
    path: String,
    extension: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiItemList {
    #[serde(default)]
    available: i32,
    #[serde(default)]
    returned: i32,
    #[serde(default)]
    items: Vec<ApiItem>,
}

#[derive(Debug, Deserialize)]
struct ApiItem {
    name: String,
}
