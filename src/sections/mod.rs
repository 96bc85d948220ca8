// src/sections/mod.rs
//! Per-section shaping of parsed sheet records into display models.

pub mod collab;
pub mod details;
pub mod form;
pub mod intro;
pub mod notice;
pub mod options;
pub mod portfolio;

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

use crate::{media::ImageLookup, table::Record};

pub use collab::CollabArtist;
pub use details::{DetailGroup, DetailImage};
pub use form::{FormState, OrderForm};
pub use intro::IntroSlide;
pub use notice::{NoticeGroup, NoticeItem};
pub use options::{OptionGroup, RigOption};
pub use portfolio::PortfolioVideo;

/// Fallback sort position for rows without a usable order.
pub const UNORDERED: f64 = 9999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Collab,
    Notice,
    Details,
    Options,
    Portfolio,
    Form,
    Intro,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Collab,
        SectionKind::Notice,
        SectionKind::Details,
        SectionKind::Options,
        SectionKind::Portfolio,
        SectionKind::Form,
        SectionKind::Intro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Collab => "collab",
            SectionKind::Notice => "notice",
            SectionKind::Details => "details",
            SectionKind::Options => "options",
            SectionKind::Portfolio => "portfolio",
            SectionKind::Form => "form",
            SectionKind::Intro => "intro",
        }
    }

    /// User-facing text when a section loaded but has nothing to show.
    pub fn empty_message(&self) -> &'static str {
        match self {
            SectionKind::Collab => "표시할 협업 작가가 없어요.",
            SectionKind::Notice => "표시할 공지사항이 없어요.",
            SectionKind::Details | SectionKind::Intro => "표시할 이미지가 없어요.",
            SectionKind::Options => "표시할 옵션이 없어요.",
            SectionKind::Portfolio => "표시할 작업물이 없어요.",
            SectionKind::Form => "표시할 신청 양식이 없어요.",
        }
    }

    /// User-facing text when the fetch failed.
    pub fn failure_message(&self) -> &'static str {
        match self {
            SectionKind::Intro => "슬라이드를 불러오지 못했어요.",
            _ => "데이터를 불러오지 못했어요.",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SectionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| format!("unknown section '{s}'"))
    }
}

/// Whether a normalized section has anything to display.
pub trait SectionContent {
    fn is_blank(&self) -> bool;
}

impl<T> SectionContent for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", content = "data", rename_all = "lowercase")]
pub enum SectionData {
    Collab(Vec<CollabArtist>),
    Notice(Vec<NoticeGroup>),
    Details(Vec<DetailGroup>),
    Options(Vec<OptionGroup>),
    Portfolio(Vec<PortfolioVideo>),
    Form(OrderForm),
    Intro(Vec<IntroSlide>),
}

impl SectionContent for SectionData {
    fn is_blank(&self) -> bool {
        match self {
            SectionData::Collab(v) => v.is_blank(),
            SectionData::Notice(v) => v.is_blank(),
            SectionData::Details(v) => v.is_blank(),
            SectionData::Options(v) => v.is_blank(),
            SectionData::Portfolio(v) => v.is_blank(),
            SectionData::Form(f) => f.is_blank(),
            SectionData::Intro(v) => v.is_blank(),
        }
    }
}

/// Dispatch to the normalizer for `kind`.
pub fn normalize(kind: SectionKind, records: &[Record], lookup: &dyn ImageLookup) -> SectionData {
    match kind {
        SectionKind::Collab => SectionData::Collab(collab::normalize(records, lookup)),
        SectionKind::Notice => SectionData::Notice(notice::normalize(records)),
        SectionKind::Details => SectionData::Details(details::normalize(records, lookup)),
        SectionKind::Options => SectionData::Options(options::normalize(records)),
        SectionKind::Portfolio => SectionData::Portfolio(portfolio::normalize(records, lookup)),
        SectionKind::Form => SectionData::Form(OrderForm::from_records(records)),
        SectionKind::Intro => SectionData::Intro(intro::normalize(records, lookup)),
    }
}

pub(crate) fn by_order(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Group by a key, keeping groups in first-appearance order.
pub(crate) fn group_in_order<T, K, F>(items: Vec<T>, key: F) -> Vec<(K, Vec<T>)>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{media::PassthroughLookup, table};

    #[test]
    fn group_in_order_keeps_first_appearance() {
        let groups = group_in_order(vec![("b", 1), ("a", 2), ("b", 3)], |(k, _)| *k);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "b");
        assert_eq!(groups[0].1, vec![("b", 1), ("b", 3)]);
        assert_eq!(groups[1].0, "a");
    }

    #[test]
    fn dispatch_reports_blank_sections() {
        let recs = table::parse("title,active\nA,x\n");
        let data = normalize(SectionKind::Collab, &recs, &PassthroughLookup);
        assert!(data.is_blank());

        let recs = table::parse("title,active\nA,O\n");
        let data = normalize(SectionKind::Collab, &recs, &PassthroughLookup);
        assert!(!data.is_blank());
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.as_str().parse::<SectionKind>(), Ok(kind));
        }
        assert_eq!(" Form ".parse::<SectionKind>(), Ok(SectionKind::Form));
        assert!("blog".parse::<SectionKind>().is_err());
    }

    #[test]
    fn section_data_serializes_tagged() {
        let data = SectionData::Intro(Vec::new());
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["section"], "intro");
        assert!(json["data"].as_array().unwrap().is_empty());
    }
}
