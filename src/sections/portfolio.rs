use serde::Serialize;

use super::{by_order, UNORDERED};
use crate::{
    media::ImageLookup,
    table::{is_active, to_num, Record},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioVideo {
    pub order: f64,
    pub title: String,
    pub desc: String,
    pub url: String,
    pub thumbs: Vec<String>,
}

pub fn normalize(records: &[Record], lookup: &dyn ImageLookup) -> Vec<PortfolioVideo> {
    let mut videos: Vec<PortfolioVideo> = records
        .iter()
        .filter(|r| is_active(r.pick(&["active"])))
        .filter_map(|r| {
            let url = r.text(&["URL", "url", "link"]);
            if url.is_empty() {
                return None;
            }
            Some(PortfolioVideo {
                order: to_num(r.pick(&["order"]), UNORDERED),
                title: r.text(&["title"]),
                desc: r.text(&["desc"]),
                thumbs: lookup.candidates(&url),
                url,
            })
        })
        .collect();

    videos.sort_by(|a, b| by_order(a.order, b.order));
    videos
}
