use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::application::errors::IngestError;
use crate::domain::wallpapers::Market;

pub const DEFAULT_UPSTREAM_URL: &str = "https://www.bing.com";
const ARCHIVE_PATH: &str = "HPImageArchive.aspx";
const USER_AGENT: &str = "dailywall/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One entry of the upstream `images` array. Only the fields that are
/// stored are kept; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveImage {
    /// Host-relative path, e.g. `/th?id=OHR.Foo_1920x1080.jpg&rf=...`.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub copyright: String,
    #[serde(default, rename = "copyrightlink")]
    pub copyright_link: String,
    #[serde(default)]
    pub hsh: String,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    images: Vec<ArchiveImage>,
}

/// Client for the image-of-the-day archive endpoint.
#[derive(Clone)]
pub struct ImageArchiveClient {
    http: reqwest::Client,
    host: String,
    archive_url: Url,
}

impl ImageArchiveClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> anyhow::Result<Self> {
        let mut base =
            Url::parse(base_url).with_context(|| format!("invalid upstream URL: {base_url}"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let archive_url = base
            .join(ARCHIVE_PATH)
            .with_context(|| format!("invalid upstream URL: {base_url}"))?;
        let host = base.as_str().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            host,
            archive_url,
        })
    }

    /// The URL requested for one market: exactly one image, newest first.
    pub fn endpoint(&self, market: &Market) -> Url {
        let mut url = self.archive_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "js")
            .append_pair("idx", "0")
            .append_pair("n", "1")
            .append_pair("mkt", market.as_str());
        url
    }

    /// Prefix a host-relative image path with the upstream base, path included.
    pub fn absolute_image_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.host)
        } else {
            format!("{}/{path}", self.host)
        }
    }

    /// Fetch the most recent archive entry for `market`.
    #[tracing::instrument(skip_all, fields(market = %market))]
    pub async fn fetch_latest(&self, market: &Market) -> Result<ArchiveImage, IngestError> {
        let url = self.endpoint(market);
        debug!(%url, "requesting upstream image archive");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| IngestError::Transport(err.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(IngestError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| IngestError::Transport(format!("failed to read response body: {err}")))?;

        parse_latest(&body)
    }
}

/// Parse an archive response body and return its first entry.
pub fn parse_latest(body: &str) -> Result<ArchiveImage, IngestError> {
    let parsed: ArchiveResponse =
        serde_json::from_str(body).map_err(|err| IngestError::Parse(err.to_string()))?;

    parsed
        .images
        .into_iter()
        .next()
        .ok_or(IngestError::EmptyResponse)
}
