//! 計劃帳本模型

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::formula::FormulaKind;
use crate::{MatrizError, Result};

/// 已換算的配方明細（提交用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledRow {
    pub articulo: u64,

    #[serde(default)]
    pub descripcion: Option<String>,

    #[serde(with = "rust_decimal::serde::float")]
    pub cantidad: Decimal,
}

impl ScaledRow {
    pub fn new(articulo: u64, descripcion: impl Into<String>, cantidad: Decimal) -> Self {
        Self {
            articulo,
            descripcion: Some(descripcion.into()),
            cantidad,
        }
    }
}

/// 計劃提交
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSubmission {
    /// 批號（同一次提交的識別碼）
    #[serde(default)]
    pub stack: Option<String>,

    #[serde(default)]
    pub jarabe: Vec<ScaledRow>,

    #[serde(default)]
    pub envasado: Vec<ScaledRow>,
}

impl PlanSubmission {
    /// 創建新的提交
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: Some(stack.into()),
            jarabe: Vec::new(),
            envasado: Vec::new(),
        }
    }

    /// 添加明細
    pub fn push(&mut self, kind: FormulaKind, row: ScaledRow) {
        match kind {
            FormulaKind::Jarabe => self.jarabe.push(row),
            FormulaKind::Envasado => self.envasado.push(row),
        }
    }

    /// 轉換為帳本記錄
    ///
    /// 跳過物料編號為 0 的明細，數量取整數，
    /// 同 stack + 物料 + 類別的明細合併加總。
    /// 數量或加總超出 `i64` 時回傳 `MatrizError::InvalidQuantity`。
    pub fn into_entries(self, now: DateTime<Utc>) -> Result<Vec<LedgerEntry>> {
        let stack = self
            .stack
            .filter(|s| !s.trim().is_empty())
            .ok_or(MatrizError::MissingStack)?;

        let mut entries: Vec<LedgerEntry> = Vec::new();
        let mut index: HashMap<(u64, FormulaKind), usize> = HashMap::new();

        let rows = self
            .jarabe
            .into_iter()
            .map(|r| (FormulaKind::Jarabe, r))
            .chain(self.envasado.into_iter().map(|r| (FormulaKind::Envasado, r)));

        for (kind, row) in rows {
            if row.articulo == 0 {
                continue;
            }
            let cantidad = row.cantidad.trunc().to_i64().ok_or_else(|| {
                MatrizError::InvalidQuantity(format!(
                    "物料 {} 數量超出範圍: {}",
                    row.articulo, row.cantidad
                ))
            })?;

            match index.get(&(row.articulo, kind)) {
                Some(&i) => {
                    let entry = &mut entries[i];
                    entry.cantidad = entry.cantidad.checked_add(cantidad).ok_or_else(|| {
                        MatrizError::InvalidQuantity(format!(
                            "物料 {} 合併數量超出範圍",
                            row.articulo
                        ))
                    })?;
                }
                None => {
                    index.insert((row.articulo, kind), entries.len());
                    entries.push(LedgerEntry {
                        categoria: kind,
                        articulo_id: row.articulo,
                        descripcion: row.descripcion,
                        cantidad,
                        stack: stack.clone(),
                        created_at: now,
                    });
                }
            }
        }

        if entries.is_empty() {
            return Err(MatrizError::EmptySubmission);
        }

        Ok(entries)
    }
}

/// 帳本記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub categoria: FormulaKind,
    pub articulo_id: u64,
    pub descripcion: Option<String>,
    pub cantidad: i64,
    pub stack: String,
    pub created_at: DateTime<Utc>,
}

/// 只增不改的計劃帳本
#[derive(Debug, Clone, Default)]
pub struct PlanningLedger {
    entries: Vec<LedgerEntry>,
}

impl PlanningLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 寫入一次提交，回傳寫入筆數
    pub fn append(&mut self, submission: PlanSubmission, now: DateTime<Utc>) -> Result<usize> {
        let entries = submission.into_entries(now)?;

        // into_entries 保證非空且同一 stack
        let stack = &entries[0].stack;
        if self.contains_stack(stack) {
            return Err(MatrizError::DuplicateStack(stack.clone()));
        }

        let inserted = entries.len();
        self.entries.extend(entries);
        Ok(inserted)
    }

    /// Stack 是否已存在
    pub fn contains_stack(&self, stack: &str) -> bool {
        self.entries.iter().any(|e| e.stack == stack)
    }

    /// 依 stack、類別、物料排序的全部記錄
    pub fn entries(&self) -> Vec<&LedgerEntry> {
        let mut sorted: Vec<&LedgerEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            a.stack
                .cmp(&b.stack)
                .then_with(|| a.categoria.categoria().cmp(b.categoria.categoria()))
                .then_with(|| a.articulo_id.cmp(&b.articulo_id))
        });
        sorted
    }

    /// 某個 stack 的記錄
    pub fn entries_for_stack<'a>(&'a self, stack: &'a str) -> impl Iterator<Item = &'a LedgerEntry> {
        self.entries.iter().filter(move |e| e.stack == stack)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
