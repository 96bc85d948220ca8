// src/sections/form.rs
//! Order-request form: sheet rows become input blocks, and the user's
//! current input becomes pricing selections and the copy summary.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{by_order, SectionContent, UNORDERED};
use crate::{
    quote::{self, clamp_quantity, OrderSummary, PricingSelection, QuoteResult, UnitLine},
    table::{to_num, Record},
};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static NON_KEY_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_ㄱ-ㅎ가-힣]").expect("valid key regex"));

/// Group names the form logic keys on.
const COLLAB_GROUP: &str = "협업작가";
const ILLUSTRATOR_GROUPS: &[&str] = &["일러레", "일러스트레이터"];
const MERGED_GROUP: &str = "협업 / 일러레 정보";
const ILLUSTRATOR_INFO_KEY: &str = "일러레_정보";

/// Stable input name derived from a group or label.
pub fn form_key(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let underscored = WHITESPACE.replace_all(&lowered, "_");
    NON_KEY_CHARS.replace_all(&underscored, "").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Textarea,
    Radio,
    Checkbox,
    Number,
    /// Collaborating-artist choice merged with the illustrator fields.
    CollabIllustrator,
    Other,
}

impl InputKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "text" => InputKind::Text,
            "textarea" => InputKind::Textarea,
            "radio" => InputKind::Radio,
            "checkbox" => InputKind::Checkbox,
            "number" => InputKind::Number,
            _ => InputKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormRow {
    pub order: f64,
    pub group: String,
    pub kind: InputKind,
    pub label: String,
    pub placeholder: String,
    /// Price magnitude, or unit price for number rows.
    pub value: String,
    pub calc_type: String,
}

impl FormRow {
    /// Rows without a group are dropped. A missing type is inferred from
    /// the placeholder length; a missing label falls back to the group.
    pub fn from_record(r: &Record) -> Option<Self> {
        let group = r.text(&["group"]);
        if group.is_empty() {
            return None;
        }
        let placeholder = r.text(&["placeholder"]);
        let raw_type = r.text(&["type"]);
        let kind = if !raw_type.is_empty() {
            InputKind::parse(&raw_type)
        } else if placeholder.chars().count() >= 10 {
            InputKind::Textarea
        } else {
            InputKind::Text
        };
        let label = match r.text(&["label"]) {
            l if l.is_empty() => group.clone(),
            l => l,
        };
        Some(Self {
            order: to_num(r.pick(&["order"]), UNORDERED),
            group,
            kind,
            label,
            placeholder,
            value: r.text(&["value"]),
            calc_type: r.text(&["calc_type"]).to_lowercase(),
        })
    }

    fn selection(&self) -> PricingSelection {
        PricingSelection::from_raw(&self.calc_type, &self.value, self.label.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormBlock {
    pub order: f64,
    pub group: String,
    pub kind: InputKind,
    pub rows: Vec<FormRow>,
    /// Illustrator text fields of a merged collab block.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_rows: Vec<FormRow>,
}

impl FormBlock {
    pub fn key(&self) -> String {
        form_key(&self.group)
    }

    /// Name of the radio group the block's choices belong to.
    pub fn choice_name(&self) -> String {
        match self.kind {
            InputKind::CollabIllustrator => form_key(COLLAB_GROUP),
            _ => self.key(),
        }
    }

    /// Name of a text or number input for `row`.
    pub fn field_name(&self, row: &FormRow) -> String {
        format!("{}__{}", self.key(), form_key(&row.label))
    }

    pub fn illustrator_field_name(row: &FormRow) -> String {
        format!("{}__{}", form_key(ILLUSTRATOR_INFO_KEY), form_key(&row.label))
    }

    fn has_choices(&self) -> bool {
        matches!(self.kind, InputKind::Radio | InputKind::CollabIllustrator)
    }

    /// The row matching the chosen label, if this block takes a single choice.
    fn chosen_row<'a>(&'a self, state: &FormState) -> Option<&'a FormRow> {
        if !self.has_choices() {
            return None;
        }
        let chosen = state.choices.get(&self.choice_name())?;
        self.rows.iter().find(|r| &r.label == chosen)
    }

    fn checked_rows<'a>(&'a self, state: &'a FormState) -> impl Iterator<Item = &'a FormRow> + 'a {
        let checked = match self.kind {
            InputKind::Checkbox => state.checked.get(&self.key()),
            _ => None,
        };
        self.rows
            .iter()
            .filter(move |r| checked.is_some_and(|labels| labels.contains(&r.label)))
    }

    /// Current text of the block's single-line inputs, in order.
    fn text_values(&self, state: &FormState) -> Vec<String> {
        match self.kind {
            InputKind::Text => self
                .rows
                .iter()
                .map(|r| state.value(&self.field_name(r)))
                .collect(),
            InputKind::CollabIllustrator => self
                .extra_rows
                .iter()
                .map(|r| state.value(&Self::illustrator_field_name(r)))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn textarea_value(&self, state: &FormState) -> String {
        match self.kind {
            InputKind::Textarea => state.value(&self.key()),
            _ => String::new(),
        }
    }

    fn unit_lines(&self, state: &FormState) -> Vec<UnitLine> {
        match self.kind {
            InputKind::Number => self
                .rows
                .iter()
                .map(|r| UnitLine::from_raw(&r.value, &state.value(&self.field_name(r)), r.label.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// What the user has currently entered. Choices are keyed by radio group
/// name, checked labels by block key, free text and quantities by input
/// name (see [`FormBlock::field_name`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub choices: HashMap<String, String>,
    pub checked: HashMap<String, Vec<String>>,
    pub values: HashMap<String, String>,
}

impl FormState {
    pub fn choose(&mut self, name: impl Into<String>, label: impl Into<String>) {
        self.choices.insert(name.into(), label.into());
    }

    pub fn toggle(&mut self, block_key: impl Into<String>, label: impl Into<String>) {
        let label = label.into();
        let labels = self.checked.entry(block_key.into()).or_default();
        match labels.iter().position(|l| *l == label) {
            Some(i) => {
                labels.remove(i);
            }
            None => labels.push(label),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Clear every choice, checkbox and field.
    pub fn reset(&mut self) {
        self.choices.clear();
        self.checked.clear();
        self.values.clear();
    }

    fn value(&self, name: &str) -> String {
        self.values
            .get(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderForm {
    pub blocks: Vec<FormBlock>,
}

impl SectionContent for OrderForm {
    fn is_blank(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl OrderForm {
    /// Blocks are one per (order, group), sorted by order then group name,
    /// rows in sheet order. A collab-artist block directly followed by an
    /// illustrator block is merged into one.
    pub fn from_records(records: &[Record]) -> Self {
        let rows: Vec<FormRow> = records.iter().filter_map(FormRow::from_record).collect();

        let mut blocks: Vec<FormBlock> = Vec::new();
        for row in rows {
            match blocks
                .iter_mut()
                .find(|b| b.order == row.order && b.group == row.group)
            {
                Some(b) => b.rows.push(row),
                None => blocks.push(FormBlock {
                    order: row.order,
                    group: row.group.clone(),
                    kind: row.kind,
                    rows: vec![row],
                    extra_rows: Vec::new(),
                }),
            }
        }
        blocks.sort_by(|a, b| by_order(a.order, b.order).then_with(|| a.group.cmp(&b.group)));

        let mut merged = Vec::with_capacity(blocks.len());
        let mut iter = blocks.into_iter().peekable();
        while let Some(cur) = iter.next() {
            let next_is_illustrator = iter
                .peek()
                .is_some_and(|n| ILLUSTRATOR_GROUPS.iter().any(|g| n.group.contains(g)));
            if cur.group.contains(COLLAB_GROUP) && next_is_illustrator {
                if let Some(next) = iter.next() {
                    merged.push(FormBlock {
                        order: cur.order,
                        group: MERGED_GROUP.to_string(),
                        kind: InputKind::CollabIllustrator,
                        rows: cur.rows,
                        extra_rows: next.rows,
                    });
                    continue;
                }
            }
            merged.push(cur);
        }

        Self { blocks: merged }
    }

    /// First block whose group name contains `part`.
    pub fn block(&self, part: &str) -> Option<&FormBlock> {
        self.blocks.iter().find(|b| b.group.contains(part))
    }

    /// Selections in evaluation order: single choices first, then checked
    /// boxes, each in block order.
    pub fn selections(&self, state: &FormState) -> (Vec<PricingSelection>, Vec<UnitLine>) {
        let mut selections: Vec<PricingSelection> = self
            .blocks
            .iter()
            .filter_map(|b| b.chosen_row(state))
            .map(FormRow::selection)
            .collect();
        selections.extend(
            self.blocks
                .iter()
                .flat_map(|b| b.checked_rows(state))
                .map(FormRow::selection),
        );
        let units = self.blocks.iter().flat_map(|b| b.unit_lines(state)).collect();
        (selections, units)
    }

    pub fn quote(&self, state: &FormState) -> QuoteResult {
        let (selections, units) = self.selections(state);
        quote::compute(&selections, &units)
    }

    pub fn summary(&self, state: &FormState) -> OrderSummary {
        let first_text = |part: &str| {
            self.block(part)
                .and_then(|b| b.text_values(state).into_iter().next())
                .unwrap_or_default()
        };
        let chosen_label = |part: &str| {
            self.block(part)
                .and_then(|b| b.chosen_row(state))
                .map(|r| r.label.clone())
                .unwrap_or_default()
        };
        let textarea = |part: &str| {
            self.block(part)
                .map(|b| b.textarea_value(state))
                .unwrap_or_default()
        };

        let mut add_ons = Vec::new();
        if let Some(b) = self.block("개당 추가 옵션") {
            for line in b.unit_lines(state) {
                let qty = clamp_quantity(line.quantity);
                if qty > 0.0 && !line.label.is_empty() {
                    add_ons.push(format!("{} × {}", line.label, qty));
                }
            }
        }
        if let Some(b) = self.block("일반 추가 옵션") {
            add_ons.extend(
                b.checked_rows(state)
                    .map(|r| r.label.clone())
                    .filter(|l| !l.is_empty()),
            );
        }

        let (collab_artist, illustrator_info) = match self.block("협업") {
            Some(b) => {
                let name = match b.kind {
                    InputKind::Radio | InputKind::CollabIllustrator => state
                        .choices
                        .get(&form_key(COLLAB_GROUP))
                        .filter(|chosen| b.rows.iter().any(|r| &r.label == *chosen))
                        .cloned()
                        .unwrap_or_default(),
                    _ => String::new(),
                };
                let info = b
                    .text_values(state)
                    .into_iter()
                    .filter(|v| !v.is_empty())
                    .collect();
                (name, info)
            }
            None => (String::new(), Vec::new()),
        };

        OrderSummary {
            platform: first_text("방송 플랫폼"),
            nickname: first_text("방송 닉네임"),
            rig_option: chosen_label("리깅 옵션"),
            add_ons,
            expression: textarea("표정"),
            collab_artist,
            illustrator_info,
            portfolio_privacy: chosen_label("포트폴리오 비공개"),
            extra: textarea("추가 문의사항"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table;

    const SHEET: &str = "order,group,type,label,placeholder,value,calc_type\n\
        1,방송 플랫폼,text,플랫폼,예) 치지직,,\n\
        1,방송 닉네임,text,닉네임,,,\n\
        2,리깅 옵션,radio,하프 리깅,,100000,add\n\
        2,리깅 옵션,radio,풀 리깅,,200000,add\n\
        3,개당 추가 옵션,number,의상,,30000,\n\
        3,개당 추가 옵션,number,헤어,,20000,\n\
        4,일반 추가 옵션,checkbox,물리 강화,,50000,\n\
        4,일반 추가 옵션,checkbox,할인 쿠폰,,10000,discount\n\
        5,표정,,,표정 목록을 적어주세요 (최대 10개),,\n\
        6,협업작가,radio,모리,,20000,discount\n\
        6,협업작가,radio,없음,,0,add\n\
        7,일러레 정보,text,트위터,@handle,,\n\
        7,일러레 정보,text,닉네임,,,\n\
        8,포트폴리오 비공개,radio,공개,,1,mult\n\
        8,포트폴리오 비공개,radio,비공개,,1.3,mult\n\
        9,추가 문의사항,textarea,문의,,,\n\
        9,,text,orphan,,,\n";

    fn form() -> OrderForm {
        OrderForm::from_records(&table::parse(SHEET))
    }

    #[test]
    fn form_key_normalizes() {
        assert_eq!(form_key("  개당 추가 옵션 "), "개당_추가_옵션");
        assert_eq!(form_key("Group-Name (A)"), "groupname_a");
        assert_eq!(form_key("협업 / 일러레"), "협업__일러레");
    }

    #[test]
    fn builds_blocks_and_merges_collab() {
        let f = form();
        let groups: Vec<_> = f.blocks.iter().map(|b| b.group.as_str()).collect();
        assert_eq!(
            groups,
            vec![
                "방송 닉네임",
                "방송 플랫폼",
                "리깅 옵션",
                "개당 추가 옵션",
                "일반 추가 옵션",
                "표정",
                MERGED_GROUP,
                "포트폴리오 비공개",
                "추가 문의사항",
            ]
        );
        let expr = f.block("표정").unwrap();
        assert_eq!(expr.kind, InputKind::Textarea);
        assert_eq!(expr.rows[0].label, "표정");

        let collab = f.block("협업").unwrap();
        assert_eq!(collab.kind, InputKind::CollabIllustrator);
        assert_eq!(collab.rows.len(), 2);
        assert_eq!(collab.extra_rows.len(), 2);
    }

    #[test]
    fn empty_state_quotes_zero() {
        let q = form().quote(&FormState::default());
        assert_eq!(q.total, 0);
        assert_eq!(q.multiplier, 1.0);
    }

    #[test]
    fn quote_follows_state() {
        let f = form();
        let mut st = FormState::default();
        st.choose(f.block("리깅 옵션").unwrap().choice_name(), "풀 리깅");
        let units = f.block("개당 추가 옵션").unwrap();
        st.set(units.field_name(&units.rows[0]), "2");
        st.set(units.field_name(&units.rows[1]), "-5");
        let checks = f.block("일반 추가 옵션").unwrap().key();
        st.toggle(&checks, "물리 강화");
        st.toggle(&checks, "할인 쿠폰");
        st.choose(form_key(COLLAB_GROUP), "모리");
        st.choose(f.block("포트폴리오 비공개").unwrap().choice_name(), "비공개");

        let q = f.quote(&st);
        assert_eq!(q.add_total, 200000.0 + 60000.0 + 50000.0);
        assert_eq!(q.discount_total, 30000.0);
        assert_eq!(q.base, 280000.0);
        assert_eq!(q.multiplier, 1.3);
        assert_eq!(q.total, 364000);

        // unchecking drops the coupon again
        st.toggle(&checks, "할인 쿠폰");
        assert_eq!(f.quote(&st).discount_total, 20000.0);

        st.reset();
        assert_eq!(f.quote(&st).total, 0);
    }

    #[test]
    fn unknown_choice_is_ignored() {
        let f = form();
        let mut st = FormState::default();
        st.choose(f.block("리깅 옵션").unwrap().choice_name(), "없는 옵션");
        assert_eq!(f.quote(&st).total, 0);
    }

    #[test]
    fn summary_reflects_state() {
        let f = form();
        let mut st = FormState::default();
        let platform = f.block("방송 플랫폼").unwrap();
        st.set(platform.field_name(&platform.rows[0]), " 치지직 ");
        st.choose(f.block("리깅 옵션").unwrap().choice_name(), "하프 리깅");
        let units = f.block("개당 추가 옵션").unwrap();
        st.set(units.field_name(&units.rows[1]), "3");
        st.toggle(f.block("일반 추가 옵션").unwrap().key(), "물리 강화");
        st.set(f.block("표정").unwrap().key(), "웃음, 울음");
        st.choose(form_key(COLLAB_GROUP), "없음");
        let collab = f.block("협업").unwrap();
        st.set(FormBlock::illustrator_field_name(&collab.extra_rows[0]), "@illu");

        let s = f.summary(&st);
        assert_eq!(s.platform, "치지직");
        assert_eq!(s.nickname, "");
        assert_eq!(s.rig_option, "하프 리깅");
        assert_eq!(s.add_ons, vec!["헤어 × 3".to_string(), "물리 강화".to_string()]);
        assert_eq!(s.expression, "웃음, 울음");
        assert_eq!(s.collab_artist, "없음");
        assert_eq!(s.illustrator_info, vec!["@illu".to_string()]);
        assert_eq!(s.portfolio_privacy, "");

        let text = s.to_copy_text();
        assert!(text.contains("방송 닉네임: \n"));
        assert!(text.contains("일러스트레이터 정보: [없음] @illu"));
    }

    #[test]
    fn unmerged_collab_block_still_summarizes() {
        let recs = table::parse(
            "order,group,type,label,value,calc_type\n\
             1,협업작가,radio,모리,20000,discount\n",
        );
        let f = OrderForm::from_records(&recs);
        assert_eq!(f.blocks[0].kind, InputKind::Radio);
        let mut st = FormState::default();
        st.choose(form_key(COLLAB_GROUP), "모리");
        assert_eq!(f.summary(&st).collab_artist, "모리");
        assert_eq!(f.quote(&st).discount_total, 20000.0);
    }
}
