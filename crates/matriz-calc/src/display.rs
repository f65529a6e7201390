//! 數值顯示格式

use rust_decimal::{Decimal, RoundingStrategy};

/// 缺少值時的占位字元
pub const PLACEHOLDER: &str = "—";

/// 整數顯示為整數，其他顯示指定小數位數
pub fn format_quantity(value: Decimal, decimals: u32) -> String {
    if value.fract().is_zero() {
        value.trunc().normalize().to_string()
    } else {
        let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.*}", decimals as usize, rounded)
    }
}

/// 指標顯示，`None` 顯示占位字元
pub fn format_metric(value: Option<Decimal>, decimals: u32) -> String {
    match value {
        Some(v) => format_quantity(v, decimals),
        None => PLACEHOLDER.to_string(),
    }
}

/// 千分位格式，例如 `1234567.891` → `1,234,567.89`
pub fn format_thousands(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimals as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[rstest]
    #[case("115", 4, "115")]
    #[case("2.50", 4, "2.5000")]
    #[case("100.000", 4, "100")]
    #[case("4607.333333333", 4, "4607.3333")]
    #[case("0.00005", 4, "0.0001")]
    #[case("-1.5", 2, "-1.50")]
    fn test_format_quantity(#[case] value: &str, #[case] decimals: u32, #[case] expected: &str) {
        assert_eq!(format_quantity(dec(value), decimals), expected);
    }

    #[test]
    fn test_format_metric_placeholder() {
        assert_eq!(format_metric(None, 4), "—");
        assert_eq!(format_metric(Some(dec("8")), 4), "8");
    }

    #[rstest]
    #[case("0", 0, "0")]
    #[case("999", 0, "999")]
    #[case("1000", 0, "1,000")]
    #[case("23036.6666", 2, "23,036.67")]
    #[case("1234567.891", 2, "1,234,567.89")]
    #[case("-1234567", 0, "-1,234,567")]
    #[case("-0.001", 2, "0.00")]
    fn test_format_thousands(#[case] value: &str, #[case] decimals: u32, #[case] expected: &str) {
        assert_eq!(format_thousands(dec(value), decimals), expected);
    }
}
