//! Display formatting helpers (en-US, locale fixed)
//!
//! Pure functions, no state.

use chrono::NaiveDate;

/// Format an amount as USD: `$1,234.50`, `-$12.00`
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", amount);
    }
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

/// Format a number with thousands separators and at most three decimals
///
/// Trailing fractional zeros are dropped: `1234.5` → `1,234.5`, `7` → `7`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let is_zero = int_part == "0" && frac.is_empty();
    let sign = if n < 0.0 && !is_zero { "-" } else { "" };

    if frac.is_empty() {
        format!("{}{}", sign, group_thousands(int_part))
    } else {
        format!("{}{}.{}", sign, group_thousands(int_part), frac)
    }
}

/// Format a count with thousands separators
pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Percentage as sent by the backend, suffixed with `%`
pub fn format_percent(value: f64) -> String {
    format!("{}%", value)
}

/// `2024-01` / `2024-01-15` → `January 2024`
pub fn format_month_long(raw: &str) -> String {
    parse_month(raw)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `2024-01` / `2024-01-15` → `Jan 2024`
pub fn format_month_short(raw: &str) -> String {
    parse_month(raw)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_month(raw: &str) -> Option<NaiveDate> {
    let year_month = raw.trim().get(..7)?;
    NaiveDate::parse_from_str(&format!("{}-01", year_month), "%Y-%m-%d").ok()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
