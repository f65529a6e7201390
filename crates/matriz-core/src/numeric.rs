//! 數值輸入模型
//!
//! 計劃表單的欄位可能是數字、文字（含逗號小數點）或空值，
//! 在進入計算之前統一轉換為 `Decimal`。

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 原始數值欄位
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    /// 未提供（null / 缺欄位）
    #[default]
    Absent,
    /// 數字
    Number(f64),
    /// 文字（例如 "0,85"）
    Text(String),
}

impl NumericValue {
    /// 是否為未提供
    pub fn is_absent(&self) -> bool {
        matches!(self, NumericValue::Absent)
    }

    /// 轉換為 Decimal
    ///
    /// - 空值 / 空字串 → `None`
    /// - 數字 → 有限值才接受
    /// - 文字 → 第一個逗號換成小數點後解析；僅含空白視為 0
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            NumericValue::Absent => None,
            NumericValue::Number(n) => {
                if n.is_finite() {
                    Decimal::from_f64(*n)
                } else {
                    None
                }
            }
            NumericValue::Text(s) if s.is_empty() => None,
            NumericValue::Text(s) => parse_text(s),
        }
    }
}

fn parse_text(raw: &str) -> Option<Decimal> {
    let replaced = raw.replacen(',', ".", 1);
    let text = replaced.trim();

    if text.is_empty() {
        return Some(Decimal::ZERO);
    }

    // Decimal::from_str 接受底線分隔，表單輸入不接受
    if text.contains('_') {
        return None;
    }

    if text.contains(['e', 'E']) {
        return Decimal::from_scientific(text).ok();
    }

    Decimal::from_str(text).ok()
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue::Number(value)
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        NumericValue::Text(value.to_string())
    }
}

impl From<u32> for NumericValue {
    fn from(value: u32) -> Self {
        NumericValue::Text(value.to_string())
    }
}

impl From<Decimal> for NumericValue {
    fn from(value: Decimal) -> Self {
        NumericValue::Text(value.to_string())
    }
}

impl From<&str> for NumericValue {
    fn from(value: &str) -> Self {
        NumericValue::Text(value.to_string())
    }
}

impl From<String> for NumericValue {
    fn from(value: String) -> Self {
        NumericValue::Text(value)
    }
}

impl<T: Into<NumericValue>> From<Option<T>> for NumericValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
