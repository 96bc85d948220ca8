use serde::Serialize;

use crate::{
    media::ImageLookup,
    table::{is_active, Record},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollabArtist {
    pub title: String,
    pub note: String,
    /// Empty when the artist page is not ready yet.
    pub link: String,
    pub thumbs: Vec<String>,
}

/// Active rows only, in sheet order.
pub fn normalize(records: &[Record], lookup: &dyn ImageLookup) -> Vec<CollabArtist> {
    records
        .iter()
        .filter(|r| is_active(r.pick(&["active"])))
        .map(|r| CollabArtist {
            title: r.text(&["title"]),
            note: r.text(&["note"]),
            link: r.text(&["link"]),
            thumbs: lookup.candidates(&r.text(&["thumb"])),
        })
        .collect()
}
