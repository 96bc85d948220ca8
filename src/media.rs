//! Image candidate lookup.
//!
//! Rewriting hosted-image or video links into loadable thumbnails belongs to
//! the presentation layer. Sections only need an ordered list of candidates
//! to try, so the rewriting sits behind a trait.

/// Given a raw link from a sheet, return zero or more URLs to try in order,
/// moving to the next one when a load fails.
pub trait ImageLookup: Send + Sync {
    fn candidates(&self, raw: &str) -> Vec<String>;
}

/// Uses the link as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughLookup;

impl ImageLookup for PassthroughLookup {
    fn candidates(&self, raw: &str) -> Vec<String> {
        let s = raw.trim();
        if s.is_empty() {
            Vec::new()
        } else {
            vec![s.to_string()]
        }
    }
}
