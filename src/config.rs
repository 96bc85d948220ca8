// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{info, warn};
use url::Url;

use crate::sections::SectionKind;

/// Published spreadsheet the site reads from; each section is one tab.
const PUBLISHED_SHEET: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSWd5AZ1ITQ3onX3jRQmS0pD_T5hDwpDPluZPA6GSXu1zrvS1w4nhQ-64U1aBwIBMNuT0D5yLmB34UK/pub";

static DEFAULT_TABS: &[(SectionKind, &str)] = &[
    (SectionKind::Collab, "0"),
    (SectionKind::Notice, "723262761"),
    (SectionKind::Details, "1614622733"),
    (SectionKind::Options, "1760607814"),
    (SectionKind::Portfolio, "1262635118"),
    (SectionKind::Form, "868636933"),
    (SectionKind::Intro, "1348701818"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSource {
    pub kind: SectionKind,
    pub url: Url,
}

/// Which CSV export backs which section.
///
/// ```yaml
/// sections:
///   - kind: notice
///     url: https://example.com/notice.csv
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub sections: Vec<SectionSource>,
}

impl Default for Config {
    fn default() -> Self {
        let sections = DEFAULT_TABS
            .iter()
            .map(|&(kind, gid)| SectionSource {
                kind,
                url: published_tab(gid),
            })
            .collect();
        Self { sections }
    }
}

fn published_tab(gid: &str) -> Url {
    let mut url = Url::parse(PUBLISHED_SHEET).expect("built-in sheet URL should parse");
    url.query_pairs_mut()
        .append_pair("gid", gid)
        .append_pair("single", "true")
        .append_pair("output", "csv");
    url
}

impl Config {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(s).context("parsing section config")?;
        for kind in SectionKind::ALL {
            if config.sections.iter().filter(|s| s.kind == kind).count() > 1 {
                warn!(section = %kind, "section configured more than once");
            }
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// The file at `path` when given, otherwise the built-in sheet tabs.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let config = Self::load(p)?;
                info!(path = %p.display(), sections = config.sections.len(), "loaded config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn source(&self, kind: SectionKind) -> Option<&SectionSource> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Keep only the listed sections, preserving config order.
    pub fn only(mut self, kinds: &[SectionKind]) -> Self {
        if !kinds.is_empty() {
            self.sections.retain(|s| kinds.contains(&s.kind));
        }
        self
    }
}
