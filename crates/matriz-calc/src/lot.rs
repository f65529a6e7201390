//! 生產批號（stack）

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use matriz_core::{MatrizError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SUFFIX_LEN: usize = 4;

/// 批號：`S{週:02}-{年}-{後綴}`，例如 `S46-2025-3FA9`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LotId {
    week: u32,
    year: i32,
    suffix: String,
}

impl LotId {
    /// 依日期的 ISO 週產生新批號，後綴取自隨機 UUID
    pub fn generate(date: NaiveDate) -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(SUFFIX_LEN)
            .collect::<String>()
            .to_uppercase();

        Self::from_parts(date, suffix)
    }

    /// 使用指定後綴（測試或重放用）
    pub fn with_suffix(date: NaiveDate, suffix: &str) -> Result<Self> {
        let suffix = suffix.to_uppercase();
        if !valid_suffix(&suffix) {
            return Err(MatrizError::InvalidLotId(suffix));
        }
        Ok(Self::from_parts(date, suffix))
    }

    fn from_parts(date: NaiveDate, suffix: String) -> Self {
        let iso = date.iso_week();
        Self {
            week: iso.week(),
            year: iso.year(),
            suffix,
        }
    }

    /// 解析批號字串
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || MatrizError::InvalidLotId(value.to_string());

        let rest = value.strip_prefix('S').ok_or_else(invalid)?;
        let mut parts = rest.splitn(3, '-');
        let (Some(week), Some(year), Some(suffix)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        if week.len() != 2 || year.len() != 4 || !valid_suffix(suffix) {
            return Err(invalid());
        }

        let week: u32 = week.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;

        // ISO 年最多 53 週
        if !(1..=53).contains(&week) {
            return Err(invalid());
        }

        Ok(Self {
            week,
            year,
            suffix: suffix.to_string(),
        })
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

fn valid_suffix(suffix: &str) -> bool {
    suffix.len() == SUFFIX_LEN
        && suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}

impl fmt::Display for LotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}-{}-{}", self.week, self.year, self.suffix)
    }
}

impl FromStr for LotId {
    type Err = MatrizError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LotId {
    type Error = MatrizError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LotId> for String {
    fn from(lot: LotId) -> Self {
        lot.to_string()
    }
}
