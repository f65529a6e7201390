//! 計劃配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MatrizError, Result};

/// 預設主箱標記
pub const DEFAULT_MASTER_CARTON_MARKER: &str = "caja master";

/// 預設糖標記
pub const DEFAULT_SUGAR_MARKER: &str = "azucar refinada especial importada";

/// 計劃參數配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// 主箱明細的名稱標記（數量等於投產包數）
    pub master_carton_marker: String,

    /// 糖明細的名稱標記（永遠以批數換算）
    pub sugar_marker: String,

    /// 非整數顯示的小數位數
    pub display_decimals: u32,

    /// 體積當量的箱單位數
    pub cu30l_divisor: Decimal,

    /// 庫存不足時是否產生警告
    pub warn_on_shortage: bool,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            master_carton_marker: DEFAULT_MASTER_CARTON_MARKER.to_string(),
            sugar_marker: DEFAULT_SUGAR_MARKER.to_string(),
            display_decimals: 4,
            cu30l_divisor: Decimal::from(30),
            warn_on_shortage: true,
        }
    }
}

impl PlanningConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 由 JSON 載入配置（缺少的欄位使用預設值）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置主箱標記
    pub fn with_master_carton_marker(mut self, marker: impl Into<String>) -> Self {
        self.master_carton_marker = marker.into();
        self
    }

    /// 建構器模式：設置糖標記
    pub fn with_sugar_marker(mut self, marker: impl Into<String>) -> Self {
        self.sugar_marker = marker.into();
        self
    }

    /// 建構器模式：設置顯示小數位數
    pub fn with_display_decimals(mut self, decimals: u32) -> Self {
        self.display_decimals = decimals;
        self
    }

    /// 建構器模式：設置體積當量的箱單位數
    pub fn with_cu30l_divisor(mut self, divisor: Decimal) -> Self {
        self.cu30l_divisor = divisor;
        self
    }

    /// 建構器模式：設置是否警告庫存不足
    pub fn with_warn_on_shortage(mut self, warn: bool) -> Self {
        self.warn_on_shortage = warn;
        self
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> Result<()> {
        if self.master_carton_marker.trim().is_empty() {
            return Err(MatrizError::Config("主箱標記不可為空".to_string()));
        }
        if self.sugar_marker.trim().is_empty() {
            return Err(MatrizError::Config("糖標記不可為空".to_string()));
        }
        if self.cu30l_divisor <= Decimal::ZERO {
            return Err(MatrizError::Config(format!(
                "體積當量箱單位數必須為正數: {}",
                self.cu30l_divisor
            )));
        }
        // Decimal 最多 28 位小數
        if self.display_decimals > 28 {
            return Err(MatrizError::Config(format!(
                "小數位數過大: {}",
                self.display_decimals
            )));
        }
        Ok(())
    }
}
