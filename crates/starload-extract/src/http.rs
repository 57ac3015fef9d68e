use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use starload_core::{redact_secret, Batch};
use tracing::{debug, warn};

use crate::digest::payload_digest;
use crate::error::ExtractError;
use crate::formats::{parse_csv_batch, parse_json_batch, parse_pdf_bytes, parse_pdf_file};

const API_KEY_HEADER: &str = "x-api-key";

/// Options for the HTTP side of extraction.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Sent as `x-api-key` with every request when set.
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Region used to turn `s3://` locations into https URLs.
    pub s3_region: Option<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout: Duration::from_secs(30),
            s3_region: None,
        }
    }
}

/// Reads the store API, JSON, CSV and PDF sources over https.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    api_key: Option<String>,
    s3_region: Option<String>,
}

impl fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSource")
            .field("api_key", &self.api_key.as_deref().map(redact_secret))
            .field("s3_region", &self.s3_region)
            .finish()
    }
}

impl HttpSource {
    pub fn new(api_key: Option<String>) -> Result<Self, ExtractError> {
        Self::with_options(HttpOptions {
            api_key,
            ..HttpOptions::default()
        })
    }

    pub fn with_options(opts: HttpOptions) -> Result<Self, ExtractError> {
        let client = Client::builder().timeout(opts.timeout).build()?;
        Ok(Self {
            client,
            api_key: opts.api_key,
            s3_region: opts.s3_region,
        })
    }

    /// Read the store count, then every store detail page.
    ///
    /// Detail pages answering with a non-200 status are skipped.
    pub async fn fetch_store_api(
        &self,
        count_url: &str,
        detail_url: &str,
    ) -> Result<Option<Batch>, ExtractError> {
        let Some(count) = self.get_json(count_url).await? else {
            return Ok(None);
        };
        let total = count
            .get("number_stores")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                ExtractError::UnexpectedPayload(format!("{count_url} has no number_stores"))
            })?;

        let base = detail_url.trim_end_matches('/');
        let mut records = Vec::new();
        let mut skipped = 0u64;
        for store in 0..total {
            match self.get_json(&format!("{base}/{store}")).await? {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        debug!(
            event = "store_pages_fetched",
            total,
            fetched = records.len(),
            skipped,
            "store pages fetched"
        );
        Ok(Some(Batch::from_json_records(&records)?))
    }

    pub async fn fetch_json(&self, url: &str) -> Result<Option<Batch>, ExtractError> {
        match self.get_json(url).await? {
            Some(value) => Ok(Some(parse_json_batch(&value)?)),
            None => Ok(None),
        }
    }

    pub async fn fetch_csv(&self, location: &str) -> Result<Option<Batch>, ExtractError> {
        let url = object_url(location, self.s3_region.as_deref())?;
        match self.get_bytes(&url).await? {
            Some(bytes) => Ok(Some(parse_csv_batch(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Read a PDF table of card details from a URL or a local path.
    pub async fn fetch_pdf(&self, location: &str) -> Result<Option<Batch>, ExtractError> {
        if is_http(location) {
            return match self.get_bytes(location).await? {
                Some(bytes) => Ok(Some(parse_pdf_bytes(&bytes)?)),
                None => Ok(None),
            };
        }
        if !std::path::Path::new(location).exists() {
            warn!(event = "source_missing", location, "pdf document not found");
            return Ok(None);
        }
        Ok(Some(parse_pdf_file(location)?))
    }

    async fn get_json(&self, url: &str) -> Result<Option<Value>, ExtractError> {
        match self.get_bytes(url).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Option<Vec<u8>>, ExtractError> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(
                event = "http_non_ok",
                url,
                status = status.as_u16(),
                "upstream did not answer 200"
            );
            return Ok(None);
        }

        let bytes = response.bytes().await?.to_vec();
        debug!(
            event = "http_fetched",
            url,
            bytes = bytes.len(),
            sha256 = %payload_digest(&bytes),
            "payload fetched"
        );
        Ok(Some(bytes))
    }
}

fn is_http(location: &str) -> bool {
    location.starts_with("https://") || location.starts_with("http://")
}

/// Resolve an object-storage location to an https URL.
///
/// `s3://bucket/key` becomes a virtual-hosted S3 URL (regional when `region`
/// is set); http(s) URLs are returned unchanged.
pub fn object_url(location: &str, region: Option<&str>) -> Result<String, ExtractError> {
    if is_http(location) {
        return Ok(location.to_string());
    }
    let Some(path) = location.strip_prefix("s3://") else {
        return Err(ExtractError::InvalidSource(format!(
            "unsupported object location '{location}'"
        )));
    };
    match path.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok(match region {
            Some(region) => format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
            None => format!("https://{bucket}.s3.amazonaws.com/{key}"),
        }),
        _ => Err(ExtractError::InvalidSource(format!(
            "object location '{location}' needs a bucket and a key"
        ))),
    }
}
