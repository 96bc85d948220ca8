use serde::Serialize;
use std::collections::HashSet;

use super::{by_order, group_in_order, UNORDERED};
use crate::table::{to_num, Record};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RigOption {
    pub order: f64,
    pub title: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionGroup {
    pub name: String,
    pub items: Vec<RigOption>,
}

/// Drops rows without a group or title and repeated (group, title)
/// pairs. Groups keep sheet order; items sort by `order`.
pub fn normalize(records: &[Record]) -> Vec<OptionGroup> {
    let mut seen = HashSet::new();
    let rows: Vec<(String, RigOption)> = records
        .iter()
        .map(|r| {
            (
                r.text(&["group"]),
                RigOption {
                    order: to_num(r.pick(&["order"]), UNORDERED),
                    title: r.text(&["title"]),
                    desc: r.text(&["desc"]),
                },
            )
        })
        .filter(|(group, opt)| !group.is_empty() && !opt.title.is_empty())
        .filter(|(group, opt)| seen.insert((group.clone(), opt.title.clone())))
        .collect();

    group_in_order(rows, |(g, _)| g.clone())
        .into_iter()
        .map(|(name, members)| {
            let mut items: Vec<RigOption> = members.into_iter().map(|(_, o)| o).collect();
            items.sort_by(|a, b| by_order(a.order, b.order));
            OptionGroup { name, items }
        })
        .collect()
}
