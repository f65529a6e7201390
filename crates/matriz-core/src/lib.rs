//! # Matriz Core
//!
//! 生產計劃核心資料模型與類型定義

pub mod config;
pub mod formula;
pub mod input;
pub mod inventory;
pub mod metrics;
pub mod numeric;
pub mod plan;
pub mod product;

// Re-export 主要類型
pub use config::PlanningConfig;
pub use formula::{FormulaKind, FormulaRow, FormulaSet};
pub use input::{NormalizedInput, ProductionInput};
pub use inventory::{StockItem, Warehouse};
pub use metrics::{ComputedMetrics, ProductionMode, ProductionResult};
pub use numeric::NumericValue;
pub use plan::{LedgerEntry, PlanSubmission, PlanningLedger, ScaledRow};
pub use product::{PlanQuantity, Product};

/// 生產計劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum MatrizError {
    #[error("找不到 SKU 的envasado配方: {0}")]
    FormulaNotFound(String),

    #[error("無效的生產數量: {0}")]
    InvalidQuantity(String),

    #[error("提交缺少 stack 識別碼")]
    MissingStack,

    #[error("沒有有效的項目可提交")]
    EmptySubmission,

    #[error("Stack 已存在: {0}")]
    DuplicateStack(String),

    #[error("無效的批號: {0}")]
    InvalidLotId(String),

    #[error("配置錯誤: {0}")]
    Config(String),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MatrizError>;
