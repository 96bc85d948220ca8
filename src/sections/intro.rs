use serde::Serialize;

use super::{by_order, UNORDERED};
use crate::{
    media::ImageLookup,
    table::{to_num, Record},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntroSlide {
    pub order: f64,
    pub images: Vec<String>,
    pub alt: String,
}

/// Slides with a thumbnail, sorted by `order`. A zero, blank or
/// non-numeric order sorts last.
pub fn normalize(records: &[Record], lookup: &dyn ImageLookup) -> Vec<IntroSlide> {
    let mut slides: Vec<(f64, String)> = records
        .iter()
        .map(|r| {
            let order = match to_num(r.pick(&["order"]), UNORDERED) {
                n if n == 0.0 => UNORDERED,
                n => n,
            };
            (order, r.text(&["thumb"]))
        })
        .filter(|(_, thumb)| !thumb.is_empty())
        .collect();

    slides.sort_by(|a, b| by_order(a.0, b.0));
    slides
        .into_iter()
        .map(|(order, thumb)| IntroSlide {
            order,
            images: lookup.candidates(&thumb),
            alt: format!("Intro slide {}", order),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{media::PassthroughLookup, table};

    #[test]
    fn blank_order_sorts_last() {
        let recs = table::parse("order,thumb\n,https://z\n2,https://b\n1,https://a\n0,https://y\n3,\n");
        let slides = normalize(&recs, &PassthroughLookup);
        let alts: Vec<_> = slides.iter().map(|s| s.alt.as_str()).collect();
        assert_eq!(
            alts,
            vec!["Intro slide 1", "Intro slide 2", "Intro slide 9999", "Intro slide 9999"]
        );
        assert_eq!(slides[2].images, vec!["https://z".to_string()]);
    }
}
