// src/fetch/mod.rs
//! One ingestion pipeline for every sheet-backed section: fetch the CSV,
//! parse it, hand the records to the section's normalizer.

use reqwest::{header::CACHE_CONTROL, Client, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::task;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::{
    config::Config,
    media::ImageLookup,
    sections::{self, SectionContent, SectionData, SectionKind},
    table::{self, Record},
};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} returned {status}")]
    Status { url: String, status: StatusCode },
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Outcome of loading one section. Nothing here ever escapes into another
/// section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "lowercase")]
pub enum SectionState<T> {
    Ready(T),
    /// Loaded, but nothing survived normalization.
    Empty,
    /// Fetch failed; holds the reason for logs.
    Failed(String),
}

impl<T> SectionState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            SectionState::Ready(t) => Some(t),
            _ => None,
        }
    }
}

/// Single GET of a published CSV, bypassing caches.
pub async fn fetch_csv(client: &Client, url: &Url) -> Result<String, FetchError> {
    debug!(%url, "fetching csv");
    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let resp = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-store")
        .send()
        .await
        .map_err(transport)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }
    resp.text().await.map_err(transport)
}

/// Fetch, parse and normalize one section.
#[instrument(level = "info", skip_all, fields(section = %kind, url = %url))]
pub async fn load_section<T, F>(
    client: &Client,
    kind: SectionKind,
    url: &Url,
    normalize: F,
) -> SectionState<T>
where
    T: SectionContent,
    F: FnOnce(&[Record]) -> T,
{
    let body = match fetch_csv(client, url).await {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "{} init failed", kind);
            return SectionState::Failed(e.to_string());
        }
    };

    let records = table::parse(&body);
    debug!(records = records.len(), bytes = body.len(), "parsed");

    let content = normalize(&records);
    if content.is_blank() {
        warn!(records = records.len(), "nothing to display");
        SectionState::Empty
    } else {
        info!(records = records.len(), "loaded");
        SectionState::Ready(content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedSection {
    pub kind: SectionKind,
    #[serde(flatten)]
    pub state: SectionState<SectionData>,
}

/// Every configured section, in config order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteContent {
    pub sections: Vec<LoadedSection>,
}

impl SiteContent {
    pub fn get(&self, kind: SectionKind) -> Option<&SectionState<SectionData>> {
        self.sections
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| &s.state)
    }
}

/// Load every configured section concurrently. Each section runs in its own
/// task, so one failure or panic only affects that section.
pub async fn load_all(
    client: &Client,
    config: &Config,
    lookup: Arc<dyn ImageLookup>,
) -> SiteContent {
    let mut handles = Vec::with_capacity(config.sections.len());

    for source in &config.sections {
        let client = client.clone();
        let lookup = Arc::clone(&lookup);
        let kind = source.kind;
        let url = source.url.clone();
        handles.push((
            kind,
            task::spawn(async move {
                load_section(&client, kind, &url, |records| {
                    sections::normalize(kind, records, lookup.as_ref())
                })
                .await
            }),
        ));
    }

    let mut content = SiteContent::default();
    for (kind, handle) in handles {
        let state = match handle.await {
            Ok(state) => state,
            Err(e) => {
                error!(section = %kind, error = %e, "section task aborted");
                SectionState::Failed(e.to_string())
            }
        };
        content.sections.push(LoadedSection { kind, state });
    }
    content
}
