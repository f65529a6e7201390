//! # Matriz Calculation Engine
//!
//! 生產指標計算、配方換算與庫存比對

pub mod display;
pub mod lot;
pub mod metrics;
pub mod netting;
pub mod planner;
pub mod scaling;

// Re-export 主要類型
pub use lot::LotId;
pub use metrics::{compute, MetricsCalculator};
pub use netting::{NetRequirement, NettingCalculator, ScaledLine};
pub use planner::ProductionPlanner;
pub use scaling::{scale, FormulaScaler, ScaleRequest, ScaleRule, ScaleWarning, ScaledQuantity};

use matriz_core::{FormulaKind, MatrizError, PlanQuantity, PlanSubmission, ProductionResult, Result};
use serde::Serialize;

/// 生產計劃結果
#[derive(Debug, Clone, Serialize)]
pub struct ProductionPlan {
    /// 包裝 SKU
    pub sku_envasado: u64,

    /// 產品描述
    pub descripcion: String,

    /// 計劃數量
    pub quantity: PlanQuantity,

    /// 生產指標
    pub result: ProductionResult,

    /// 糖漿配方換算結果
    pub jarabe: Vec<ScaledLine>,

    /// 包裝配方換算結果
    pub envasado: Vec<ScaledLine>,

    /// 淨需求（糖漿在前，包裝在後）
    pub requirements: Vec<NetRequirement>,

    /// 警告信息
    pub warnings: Vec<PlanWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl ProductionPlan {
    /// 添加警告
    pub fn add_warning(&mut self, warning: PlanWarning) {
        self.warnings.push(warning);
    }

    /// 是否有庫存不足的物料
    pub fn has_shortage(&self) -> bool {
        self.requirements.iter().any(|r| !r.is_covered())
    }

    /// 依類別取得換算結果
    pub fn lines(&self, kind: FormulaKind) -> &[ScaledLine] {
        match kind {
            FormulaKind::Jarabe => &self.jarabe,
            FormulaKind::Envasado => &self.envasado,
        }
    }

    /// 建立帳本提交
    ///
    /// 任一明細數量溢位時回傳 `MatrizError::InvalidQuantity`。
    pub fn submission(&self, stack: impl Into<String>) -> Result<PlanSubmission> {
        let mut submission = PlanSubmission::new(stack);
        for line in self.jarabe.iter().chain(self.envasado.iter()) {
            let row = line.to_scaled_row().ok_or_else(|| {
                MatrizError::InvalidQuantity(format!(
                    "物料 {} ({}) 數量溢位，無法提交",
                    line.row.articulo, line.row.descripcion
                ))
            })?;
            submission.push(line.kind, row);
        }
        Ok(submission)
    }

    /// 以新產生的批號建立提交
    pub fn submission_with_lot(&self, date: chrono::NaiveDate) -> Result<(LotId, PlanSubmission)> {
        let lot = LotId::generate(date);
        let submission = self.submission(lot.to_string())?;
        Ok((lot, submission))
    }
}

/// 計劃警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanWarning {
    /// SKU 或物料編號
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }

    pub fn error(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
