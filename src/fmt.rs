/// Placeholder shown on screen for a missing value.
pub const DASH: &str = "\u{2014}";

fn group_thousands(int_part: &str) -> String {
    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));
    let with_commas = group_thousands(int_part);

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Whole riels with thousands separators: 27,622 Riels
pub fn riels(val: i64) -> String {
    let grouped = group_thousands(&val.unsigned_abs().to_string());
    if val < 0 {
        format!("-{grouped} Riels")
    } else {
        format!("{grouped} Riels")
    }
}

/// Trim trailing zeros from a measured quantity: 45.20 -> "45.2", 128.0 -> "128".
pub fn quantity(val: f64) -> String {
    let s = format!("{val:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub fn kwh(val: f64) -> String {
    format!("{} kWh", quantity(val))
}
