use serde::Serialize;

use super::{by_order, group_in_order, UNORDERED};
use crate::table::{to_num, Record};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoticeItem {
    pub order: f64,
    pub icon: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoticeGroup {
    pub name: String,
    pub items: Vec<NoticeItem>,
}

/// Rows need a group and a description. Groups keep sheet order, items are
/// sorted by `order` within each group.
pub fn normalize(records: &[Record]) -> Vec<NoticeGroup> {
    let rows: Vec<(String, NoticeItem)> = records
        .iter()
        .map(|r| {
            (
                r.text(&["group"]),
                NoticeItem {
                    order: to_num(r.pick(&["order"]), UNORDERED),
                    icon: r.text(&["icon"]),
                    desc: r.text(&["desc"]),
                },
            )
        })
        .filter(|(group, item)| !group.is_empty() && !item.desc.is_empty())
        .collect();

    group_in_order(rows, |(g, _)| g.clone())
        .into_iter()
        .map(|(name, members)| {
            let mut items: Vec<NoticeItem> = members.into_iter().map(|(_, it)| it).collect();
            items.sort_by(|a, b| by_order(a.order, b.order));
            NoticeGroup { name, items }
        })
        .collect()
}
