//! 生產輸入模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::NumericValue;

/// 單一產品配置的生產輸入（每次計算建立一筆）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductionInput {
    /// 每單位容量（公升）
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub formato: NumericValue,

    /// 每批糖漿公升數
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub litros_batch: NumericValue,

    /// 每批成品飲料公升數
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub bebida_final: NumericValue,

    /// 糖係數（kg / 公升成品）
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub factor_azucar: NumericValue,

    /// 計劃批數（與 cantidad_paquetes 擇一）
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub cantidad_batch: NumericValue,

    /// 直接計劃的包數
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub cantidad_paquetes: NumericValue,

    /// 每包單位數
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub unidad_paquete: NumericValue,

    /// 產線速度（單位/小時，100% 效率）
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub velocidad_bot: NumericValue,

    /// 產線效率（0-1 或 0-100）
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub efi_velocidad: NumericValue,

    /// 每層包數
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub paquetes_nivel: NumericValue,

    /// 每棧板層數
    #[serde(skip_serializing_if = "NumericValue::is_absent")]
    pub carton_nivel: NumericValue,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku_jarabe: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku_envasado: Option<String>,
}

impl ProductionInput {
    /// 創建空的生產輸入
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置容量
    pub fn with_formato(mut self, value: impl Into<NumericValue>) -> Self {
        self.formato = value.into();
        self
    }

    /// 建構器模式：設置每批糖漿公升數
    pub fn with_litros_batch(mut self, value: impl Into<NumericValue>) -> Self {
        self.litros_batch = value.into();
        self
    }

    /// 建構器模式：設置每批成品公升數
    pub fn with_bebida_final(mut self, value: impl Into<NumericValue>) -> Self {
        self.bebida_final = value.into();
        self
    }

    /// 建構器模式：設置糖係數
    pub fn with_factor_azucar(mut self, value: impl Into<NumericValue>) -> Self {
        self.factor_azucar = value.into();
        self
    }

    /// 建構器模式：設置批數
    pub fn with_cantidad_batch(mut self, value: impl Into<NumericValue>) -> Self {
        self.cantidad_batch = value.into();
        self
    }

    /// 建構器模式：設置包數
    pub fn with_cantidad_paquetes(mut self, value: impl Into<NumericValue>) -> Self {
        self.cantidad_paquetes = value.into();
        self
    }

    /// 建構器模式：設置每包單位數
    pub fn with_unidad_paquete(mut self, value: impl Into<NumericValue>) -> Self {
        self.unidad_paquete = value.into();
        self
    }

    /// 建構器模式：設置產線速度
    pub fn with_velocidad_bot(mut self, value: impl Into<NumericValue>) -> Self {
        self.velocidad_bot = value.into();
        self
    }

    /// 建構器模式：設置產線效率
    pub fn with_efi_velocidad(mut self, value: impl Into<NumericValue>) -> Self {
        self.efi_velocidad = value.into();
        self
    }

    /// 建構器模式：設置棧板幾何（每層包數、層數）
    pub fn with_pallet(
        mut self,
        paquetes_nivel: impl Into<NumericValue>,
        carton_nivel: impl Into<NumericValue>,
    ) -> Self {
        self.paquetes_nivel = paquetes_nivel.into();
        self.carton_nivel = carton_nivel.into();
        self
    }

    /// 建構器模式：設置 SKU
    pub fn with_skus(mut self, sku_envasado: Option<String>, sku_jarabe: Option<String>) -> Self {
        self.sku_envasado = sku_envasado;
        self.sku_jarabe = sku_jarabe;
        self
    }

    /// 將所有欄位轉換為數值（無法解析者為 None）
    pub fn normalize(&self) -> NormalizedInput {
        NormalizedInput {
            formato: self.formato.to_decimal(),
            litros_batch: self.litros_batch.to_decimal(),
            bebida_final: self.bebida_final.to_decimal(),
            factor_azucar: self.factor_azucar.to_decimal(),
            cantidad_batch: self.cantidad_batch.to_decimal(),
            cantidad_paquetes: self.cantidad_paquetes.to_decimal(),
            unidad_paquete: self.unidad_paquete.to_decimal(),
            velocidad_bot: self.velocidad_bot.to_decimal(),
            efi_velocidad: self.efi_velocidad.to_decimal(),
            paquetes_nivel: self.paquetes_nivel.to_decimal(),
            carton_nivel: self.carton_nivel.to_decimal(),
        }
    }
}

/// 已轉換的數值輸入
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedInput {
    pub formato: Option<Decimal>,
    pub litros_batch: Option<Decimal>,
    pub bebida_final: Option<Decimal>,
    pub factor_azucar: Option<Decimal>,
    pub cantidad_batch: Option<Decimal>,
    pub cantidad_paquetes: Option<Decimal>,
    pub unidad_paquete: Option<Decimal>,
    pub velocidad_bot: Option<Decimal>,
    pub efi_velocidad: Option<Decimal>,
    pub paquetes_nivel: Option<Decimal>,
    pub carton_nivel: Option<Decimal>,
}
