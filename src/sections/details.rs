use serde::Serialize;

use super::{by_order, group_in_order, UNORDERED};
use crate::{
    media::ImageLookup,
    table::{to_num, Record},
};

const IMAGE_KEYS: &[&str] = &["image URL", "image_url", "image", "url"];
const GROUP_ORDER_KEYS: &[&str] = &["group order", "group_order", "groupOrder"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailImage {
    pub order: f64,
    pub subtitle: String,
    /// Load candidates, first one preferred.
    pub images: Vec<String>,
}

impl DetailImage {
    pub fn alt(&self, group: &str) -> String {
        if self.subtitle.is_empty() {
            group.to_string()
        } else {
            format!("{} - {}", group, self.subtitle)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailGroup {
    pub order: f64,
    pub name: String,
    pub items: Vec<DetailImage>,
}

/// Gallery groups sorted by group order then name; images by order.
pub fn normalize(records: &[Record], lookup: &dyn ImageLookup) -> Vec<DetailGroup> {
    let mut rows: Vec<(f64, String, DetailImage)> = records
        .iter()
        .filter_map(|r| {
            let name = r.text(&["group"]);
            let raw_url = r.text(IMAGE_KEYS);
            if name.is_empty() || raw_url.is_empty() {
                return None;
            }
            Some((
                to_num(r.pick(GROUP_ORDER_KEYS), UNORDERED),
                name,
                DetailImage {
                    order: to_num(r.pick(&["order"]), UNORDERED),
                    subtitle: r.text(&["subtitle", "subTitle"]),
                    images: lookup.candidates(&raw_url),
                },
            ))
        })
        .collect();

    rows.sort_by(|a, b| by_order(a.0, b.0).then_with(|| a.1.cmp(&b.1)));

    group_in_order(rows, |(order, name, _)| (order.to_bits(), name.clone()))
        .into_iter()
        .map(|((order_bits, name), members)| {
            let mut items: Vec<DetailImage> = members.into_iter().map(|(_, _, it)| it).collect();
            items.sort_by(|a, b| by_order(a.order, b.order));
            DetailGroup {
                order: f64::from_bits(order_bits),
                name,
                items,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{media::PassthroughLookup, table};

    #[test]
    fn sorts_groups_and_images() {
        let recs = table::parse(
            "Group,Group Order,order,subtitle,Image URL\n\
             눈,2,2,깜빡임,https://img/2\n\
             입,1,1,,https://img/1\n\
             눈,2,1,,https://img/3\n\
             귀,2,1,,https://img/4\n\
             코,1,1,,\n",
        );
        let groups = normalize(&recs, &PassthroughLookup);
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["입", "귀", "눈"]);

        let eyes = &groups[2];
        assert_eq!(eyes.order, 2.0);
        assert_eq!(eyes.items[0].images, vec!["https://img/3".to_string()]);
        assert_eq!(eyes.items[1].alt(&eyes.name), "눈 - 깜빡임");
        assert_eq!(eyes.items[0].alt(&eyes.name), "눈");
    }

    #[test]
    fn same_name_with_different_group_order_stays_apart() {
        let recs = table::parse("group,group_order,url\nA,1,u1\nA,3,u2\nB,2,u3\n");
        let groups = normalize(&recs, &PassthroughLookup);
        let keys: Vec<_> = groups.iter().map(|g| (g.name.as_str(), g.order)).collect();
        assert_eq!(keys, vec![("A", 1.0), ("B", 2.0), ("A", 3.0)]);
    }
}
