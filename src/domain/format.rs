//! Display formatting for board values.

/// Compact notation with a `K`, `M` or `B` suffix and one decimal.
#[must_use]
pub fn compact_number(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

#[must_use]
pub fn currency(value: f64) -> String {
    format!("${}", compact_number(value))
}

/// Price with precision scaled to its magnitude.
#[must_use]
pub fn price(value: f64) -> String {
    if value < 0.01 {
        format!("${value:.6}")
    } else if value < 1.0 {
        format!("${value:.4}")
    } else if value < 100.0 {
        format!("${value:.2}")
    } else {
        currency(value)
    }
}

/// Signed percentage with two decimals, e.g. `+4.20%`.
#[must_use]
pub fn percentage(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}
