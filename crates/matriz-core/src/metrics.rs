//! 計算結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::input::ProductionInput;

/// 計算模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionMode {
    /// 以批數為起點（有糖漿階段的產品）
    Batch,
    /// 以包數為起點（直接灌裝）
    Packages,
    /// 無法判定（批數與包數皆未提供）
    Undetermined,
}

/// 生產衍生指標
///
/// `None` 表示以目前輸入無法計算，絕不以 0 代替。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputedMetrics {
    #[serde(with = "rust_decimal::serde::float_option")]
    pub paquetes_x_pallets: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub ratio_bebida: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cant_azucar_batch: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub paquetes_lanzados: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub horas_produccion: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub dias_produccion: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub batch_minutos: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub paletas_produccion: Option<Decimal>,
    /// 以 30 單位箱換算的體積當量
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cu30l: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub litros_jarabe_real: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub kg_azucar_real: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub velocidad_pallet_hora: Option<Decimal>,
}

impl ComputedMetrics {
    /// 依固定順序列出所有指標（供呈現使用）
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<Decimal>)> {
        [
            ("paquetes_x_pallets", self.paquetes_x_pallets),
            ("ratio_bebida", self.ratio_bebida),
            ("cant_azucar_batch", self.cant_azucar_batch),
            ("paquetes_lanzados", self.paquetes_lanzados),
            ("horas_produccion", self.horas_produccion),
            ("dias_produccion", self.dias_produccion),
            ("batch_minutos", self.batch_minutos),
            ("paletas_produccion", self.paletas_produccion),
            ("cu30l", self.cu30l),
            ("litros_jarabe_real", self.litros_jarabe_real),
            ("kg_azucar_real", self.kg_azucar_real),
            ("velocidad_pallet_hora", self.velocidad_pallet_hora),
        ]
        .into_iter()
    }

    /// 可計算的指標數量
    pub fn computed_count(&self) -> usize {
        self.iter().filter(|(_, v)| v.is_some()).count()
    }
}

/// 單次計算結果：原始輸入 + 衍生指標
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionResult {
    pub inputs: ProductionInput,
    pub computed: ComputedMetrics,
    pub mode: ProductionMode,
}
