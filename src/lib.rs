//! # Matriz
//!
//! 飲料生產計劃引擎：生產指標、配方換算、庫存比對與計劃帳本

pub mod logging;

pub use matriz_cache::{CacheStats, DirtyTracker, MetricsCache};
pub use matriz_calc::{
    compute, display, scale, FormulaScaler, LotId, MetricsCalculator, NetRequirement,
    NettingCalculator, PlanWarning, ProductionPlan, ProductionPlanner, ScaleRequest, ScaleRule,
    ScaleWarning, ScaledLine, ScaledQuantity, WarningSeverity,
};
pub use matriz_core::*;

pub use rust_decimal::Decimal;
