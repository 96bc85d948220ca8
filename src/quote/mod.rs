// src/quote/mod.rs
//! Price quote computation for the order-request form.
//!
//! Everything here is a pure function of the selections handed in; callers
//! rebuild the inputs from current form state and recompute on every edit.

pub mod money;
pub mod summary;

use serde::{Deserialize, Serialize};

use crate::table::to_num;

pub use money::format_money;
pub use summary::OrderSummary;

/// How a selection moves the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Add,
    Discount,
    Mult,
}

impl EffectKind {
    /// Sheet `calc_type` tag. Anything unrecognised (including blank) adds.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "discount" => EffectKind::Discount,
            "mult" => EffectKind::Mult,
            _ => EffectKind::Add,
        }
    }
}

/// A checked single- or multi-choice option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSelection {
    pub kind: EffectKind,
    pub magnitude: f64,
    pub label: String,
}

impl PricingSelection {
    pub fn new(kind: EffectKind, magnitude: f64, label: impl Into<String>) -> Self {
        Self {
            kind,
            magnitude,
            label: label.into(),
        }
    }

    /// Build from raw sheet cells. A magnitude that is not a number reads as 0.
    pub fn from_raw(tag: &str, value: &str, label: impl Into<String>) -> Self {
        Self::new(EffectKind::from_tag(tag), to_num(value, 0.0), label)
    }
}

/// A per-unit priced line with a user-entered quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitLine {
    pub unit_price: f64,
    pub quantity: f64,
    pub label: String,
}

impl UnitLine {
    pub fn new(unit_price: f64, quantity: f64, label: impl Into<String>) -> Self {
        Self {
            unit_price,
            quantity,
            label: label.into(),
        }
    }

    /// Non-numeric input is 0; negative quantities clamp to 0.
    pub fn from_raw(unit_price: &str, quantity: &str, label: impl Into<String>) -> Self {
        Self::new(
            to_num(unit_price, 0.0),
            clamp_quantity(to_num(quantity, 0.0)),
            label,
        )
    }
}

pub(crate) fn clamp_quantity(q: f64) -> f64 {
    if q.is_finite() {
        q.max(0.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteResult {
    pub add_total: f64,
    pub discount_total: f64,
    /// `max(0, add_total - discount_total)`
    pub base: f64,
    pub multiplier: f64,
    pub total: u64,
}

/// One row of the displayed breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteLine {
    pub key: &'static str,
    pub value: String,
}

impl QuoteResult {
    /// Display rows: running sum, discount (only when non-zero), subtotal,
    /// then the multiplier with its percentage (only when it is not 1).
    pub fn breakdown(&self) -> Vec<QuoteLine> {
        let mut lines = vec![QuoteLine {
            key: "기본/추가 합",
            value: format!("+ {}원", format_money(self.add_total)),
        }];
        if self.discount_total != 0.0 {
            lines.push(QuoteLine {
                key: "협업 할인",
                value: format!("- {}원", format_money(self.discount_total)),
            });
        }
        lines.push(QuoteLine {
            key: "소계",
            value: format!("{}원", format_money(self.base)),
        });
        if self.multiplier != 1.0 {
            let pct = ((self.multiplier - 1.0) * 100.0).round();
            lines.push(QuoteLine {
                key: "비공개 옵션",
                value: format!("× {} (+{}%)", self.multiplier, pct),
            });
        }
        lines
    }

    pub fn total_display(&self) -> String {
        format!("{}원", format_money(self.total as f64))
    }
}

/// Compute the quote.
///
/// Discounts and additions are summed independently; a `mult` selection
/// replaces the multiplier, so with several active the last one wins. A
/// zero or non-finite multiplier counts as 1. Unit lines add
/// `unit_price * quantity` for positive quantities only.
pub fn compute(selections: &[PricingSelection], units: &[UnitLine]) -> QuoteResult {
    let mut add_total = 0.0;
    let mut discount_total = 0.0;
    let mut multiplier = 1.0;

    for sel in selections {
        let v = if sel.magnitude.is_finite() {
            sel.magnitude
        } else {
            0.0
        };
        match sel.kind {
            EffectKind::Discount => discount_total += v,
            EffectKind::Mult => multiplier = if v == 0.0 { 1.0 } else { v },
            EffectKind::Add => add_total += v,
        }
    }

    for line in units {
        let qty = clamp_quantity(line.quantity);
        if qty > 0.0 && line.unit_price.is_finite() {
            add_total += line.unit_price * qty;
        }
    }

    let base = f64::max(0.0, add_total - discount_total);
    // a negative multiplier would flip the sign; the total never goes below 0
    let total = (base * multiplier).round().max(0.0) as u64;

    QuoteResult {
        add_total,
        discount_total,
        base,
        multiplier,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(kind: EffectKind, v: f64) -> PricingSelection {
        PricingSelection::new(kind, v, "")
    }

    #[test]
    fn discount_larger_than_additions_floors_at_zero() {
        let q = compute(
            &[sel(EffectKind::Add, 1000.0), sel(EffectKind::Discount, 5000.0)],
            &[],
        );
        assert_eq!(q.base, 0.0);
        assert_eq!(q.total, 0);
    }

    #[test]
    fn multiplier_applies_after_discount() {
        let q = compute(
            &[
                sel(EffectKind::Add, 10000.0),
                sel(EffectKind::Discount, 2000.0),
                sel(EffectKind::Mult, 1.5),
            ],
            &[],
        );
        assert_eq!(q.base, 8000.0);
        assert_eq!(q.total, 12000);
    }

    #[test]
    fn unit_lines_accumulate_into_add_total() {
        let q = compute(
            &[],
            &[UnitLine::new(500.0, 3.0, "a"), UnitLine::new(1000.0, 2.0, "b")],
        );
        assert_eq!(q.add_total, 3500.0);
        assert_eq!(q.total, 3500);
    }

    #[test]
    fn negative_and_garbage_quantities_count_as_zero() {
        let units = [
            UnitLine::from_raw("500", "-4", "neg"),
            UnitLine::from_raw("500", "lots", "garbage"),
            UnitLine::new(500.0, f64::NAN, "nan"),
            UnitLine::from_raw("700", " 2 ", "ok"),
        ];
        assert_eq!(units[0].quantity, 0.0);
        assert_eq!(compute(&[], &units).add_total, 1400.0);
    }

    #[test]
    fn last_multiplier_wins() {
        let q = compute(
            &[
                sel(EffectKind::Add, 1000.0),
                sel(EffectKind::Mult, 2.0),
                sel(EffectKind::Mult, 1.3),
            ],
            &[],
        );
        assert_eq!(q.multiplier, 1.3);
        assert_eq!(q.total, 1300);
    }

    #[test]
    fn bad_magnitudes_are_neutral() {
        let selections = [
            PricingSelection::from_raw("add", "n/a", "x"),
            PricingSelection::from_raw("discount", "", "y"),
            PricingSelection::from_raw("mult", "free", "z"),
            PricingSelection::from_raw("add", "2500", "w"),
        ];
        let q = compute(&selections, &[]);
        assert_eq!(q.add_total, 2500.0);
        assert_eq!(q.discount_total, 0.0);
        assert_eq!(q.multiplier, 1.0);
        assert_eq!(q.total, 2500);
    }

    #[test]
    fn unknown_tag_adds() {
        assert_eq!(EffectKind::from_tag(" DISCOUNT "), EffectKind::Discount);
        assert_eq!(EffectKind::from_tag("Mult"), EffectKind::Mult);
        assert_eq!(EffectKind::from_tag("bonus"), EffectKind::Add);
        assert_eq!(EffectKind::from_tag(""), EffectKind::Add);
    }

    #[test]
    fn compute_is_idempotent() {
        let selections = [sel(EffectKind::Add, 3333.0), sel(EffectKind::Mult, 1.15)];
        let units = [UnitLine::new(250.0, 3.0, "u")];
        assert_eq!(
            compute(&selections, &units),
            compute(&selections, &units)
        );
    }

    #[test]
    fn total_rounds_half_up() {
        let q = compute(&[sel(EffectKind::Add, 5.0), sel(EffectKind::Mult, 1.5)], &[]);
        assert_eq!(q.total, 8);
        let q = compute(&[sel(EffectKind::Add, 3.0), sel(EffectKind::Mult, 0.5)], &[]);
        assert_eq!(q.total, 2);
    }

    #[test]
    fn negative_multiplier_never_goes_below_zero() {
        let q = compute(&[sel(EffectKind::Add, 100.0), sel(EffectKind::Mult, -2.0)], &[]);
        assert_eq!(q.total, 0);
    }

    #[test]
    fn breakdown_hides_neutral_rows() {
        let plain = compute(&[sel(EffectKind::Add, 12000.0)], &[]);
        let keys: Vec<_> = plain.breakdown().iter().map(|l| l.key).collect();
        assert_eq!(keys, vec!["기본/추가 합", "소계"]);

        let full = compute(
            &[
                sel(EffectKind::Add, 10000.0),
                sel(EffectKind::Discount, 2000.0),
                sel(EffectKind::Mult, 1.5),
            ],
            &[],
        );
        let lines = full.breakdown();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].value, "- 2,000원");
        assert_eq!(lines[3].value, "× 1.5 (+50%)");
        assert_eq!(full.total_display(), "12,000원");
    }
}
