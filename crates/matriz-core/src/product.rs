//! 產品主檔模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::input::ProductionInput;

/// 計劃數量（批數或包數擇一）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "valor", rename_all = "snake_case")]
pub enum PlanQuantity {
    /// 批數
    Batches(Decimal),
    /// 包數
    Packages(Decimal),
}

impl PlanQuantity {
    /// 數值
    pub fn value(&self) -> Decimal {
        match self {
            PlanQuantity::Batches(v) | PlanQuantity::Packages(v) => *v,
        }
    }

    /// 是否為正數
    pub fn is_positive(&self) -> bool {
        self.value() > Decimal::ZERO
    }
}

/// 產品主檔
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 包裝 SKU
    pub sku_envasado: u64,

    /// 糖漿 SKU（直接灌裝產品沒有）
    #[serde(default)]
    pub sku_jarabe: Option<u64>,

    /// 描述（未填時由品牌/口味/容量/單位組成）
    #[serde(default)]
    pub sku_descripcion: Option<String>,

    /// 產線
    #[serde(default)]
    pub linea: Option<u32>,

    #[serde(default)]
    pub marca: Option<String>,

    #[serde(default)]
    pub sabor: Option<String>,

    #[serde(default)]
    pub formato: Option<Decimal>,

    #[serde(default)]
    pub litros_batch: Option<Decimal>,

    #[serde(default)]
    pub bebida_final: Option<Decimal>,

    #[serde(default)]
    pub factor_azucar: Option<Decimal>,

    /// 產線效率（主檔以百分比存放）
    #[serde(default)]
    pub ef_velocidad: Option<Decimal>,

    #[serde(default)]
    pub velocidad_bot: Option<Decimal>,

    #[serde(default)]
    pub unidad_paquete: Option<Decimal>,

    #[serde(default)]
    pub paquetes_nivel: Option<Decimal>,

    #[serde(default)]
    pub carton_nivel: Option<Decimal>,
}

impl Product {
    /// 創建新的產品主檔
    pub fn new(sku_envasado: u64) -> Self {
        Self {
            sku_envasado,
            ..Default::default()
        }
    }

    /// 產品描述
    pub fn describe(&self) -> String {
        if let Some(descripcion) = self.sku_descripcion.as_deref().filter(|d| !d.trim().is_empty())
        {
            return descripcion.to_string();
        }

        let mut parts: Vec<String> = Vec::new();
        if let Some(marca) = &self.marca {
            parts.push(marca.clone());
        }
        if let Some(sabor) = &self.sabor {
            parts.push(sabor.clone());
        }
        if let Some(formato) = self.formato {
            parts.push(format!("{}L", formato.normalize()));
        }
        if let Some(unidad) = self.unidad_paquete {
            parts.push(format!("x {}", unidad.normalize()));
        }

        if parts.is_empty() {
            self.sku_envasado.to_string()
        } else {
            parts.join(" ")
        }
    }

    /// 是否需要糖漿階段
    pub fn has_jarabe(&self) -> bool {
        self.sku_jarabe.is_some()
    }

    /// 轉換為生產輸入
    pub fn to_input(&self, quantity: PlanQuantity) -> ProductionInput {
        let mut input = ProductionInput::new()
            .with_formato(self.formato)
            .with_litros_batch(self.litros_batch)
            .with_bebida_final(self.bebida_final)
            .with_factor_azucar(self.factor_azucar)
            .with_unidad_paquete(self.unidad_paquete)
            .with_velocidad_bot(self.velocidad_bot)
            .with_efi_velocidad(self.ef_velocidad)
            .with_pallet(self.paquetes_nivel, self.carton_nivel)
            .with_skus(
                Some(self.sku_envasado.to_string()),
                self.sku_jarabe.map(|sku| sku.to_string()),
            );

        match quantity {
            PlanQuantity::Batches(n) => input = input.with_cantidad_batch(n),
            PlanQuantity::Packages(n) => input = input.with_cantidad_paquetes(n),
        }

        input
    }
}
