/// Lenient numeric coercion for spreadsheet cells.
///
/// An empty (or all-whitespace) cell is 0; anything that does not parse
/// to a finite number yields `fallback`.
pub fn to_num(raw: &str, fallback: f64) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => fallback,
    }
}

/// Truthy markers used by the `active` column.
pub fn is_active(raw: &str) -> bool {
    matches!(
        raw.trim().to_uppercase().as_str(),
        "O" | "TRUE" | "Y" | "1"
    )
}
