//! 需求與庫存比對

use std::collections::HashMap;

use matriz_core::{FormulaKind, FormulaRow, ScaledRow, Warehouse};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::scaling::ScaledQuantity;

/// 已換算的配方明細
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledLine {
    pub kind: FormulaKind,
    pub row: FormulaRow,
    pub scaled: ScaledQuantity,
}

impl ScaledLine {
    pub fn new(kind: FormulaKind, row: FormulaRow, scaled: ScaledQuantity) -> Self {
        Self { kind, row, scaled }
    }

    /// 轉為提交明細（溢位的明細沒有數量，回傳 `None`）
    pub fn to_scaled_row(&self) -> Option<ScaledRow> {
        self.scaled
            .value
            .map(|cantidad| ScaledRow::new(self.row.articulo, self.row.descripcion.clone(), cantidad))
    }
}

/// 淨需求計算結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetRequirement {
    pub kind: FormulaKind,
    pub articulo: u64,
    pub descripcion: String,
    /// 需求量
    pub required: Decimal,
    /// 扣除前面明細後的可用庫存
    pub available: Decimal,
    /// 可用 - 需求
    pub delta: Decimal,
    /// 不足量（delta 為負時）
    pub shortage: Decimal,
    /// 倉庫是否有此物料
    pub stock_found: bool,
}

impl NetRequirement {
    /// 庫存是否足夠
    pub fn is_covered(&self) -> bool {
        self.delta >= Decimal::ZERO
    }
}

/// 淨需求計算器
pub struct NettingCalculator;

impl NettingCalculator {
    /// 計算淨需求
    ///
    /// 同一物料出現在多筆明細時（例如同時在糖漿與包裝配方），
    /// 後面的明細只能使用前面明細扣除後的庫存。
    /// 數量溢位的明細不參與比對。
    pub fn calculate(lines: &[ScaledLine], stock: &Warehouse) -> Vec<NetRequirement> {
        let mut remaining: HashMap<u64, Decimal> = HashMap::new();
        let mut results = Vec::with_capacity(lines.len());

        for line in lines {
            let articulo = line.row.articulo;
            let Some(required) = line.scaled.value else {
                tracing::warn!("物料 {} 數量溢位，略過庫存比對", articulo);
                continue;
            };
            let stock_found = stock.get(articulo).is_some();

            let available = *remaining
                .entry(articulo)
                .or_insert_with(|| stock.available(articulo).unwrap_or(Decimal::ZERO));

            let delta = available - required;
            let shortage = if delta < Decimal::ZERO {
                -delta
            } else {
                Decimal::ZERO
            };

            if shortage > Decimal::ZERO {
                tracing::debug!("物料 {} 庫存不足: 需求 {}, 可用 {}", articulo, required, available);
            }

            results.push(NetRequirement {
                kind: line.kind,
                articulo,
                descripcion: line.row.descripcion.clone(),
                required,
                available,
                delta,
                shortage,
                stock_found,
            });

            remaining.insert(articulo, delta.max(Decimal::ZERO));
        }

        results
    }

    /// 依物料加總不足量
    pub fn total_shortage(requirements: &[NetRequirement]) -> HashMap<u64, Decimal> {
        let mut totals = HashMap::new();
        for req in requirements.iter().filter(|r| !r.is_covered()) {
            *totals.entry(req.articulo).or_insert(Decimal::ZERO) += req.shortage;
        }
        totals
    }
}
