//! 髒標記追蹤

use std::collections::BTreeSet;

/// 追蹤主檔已變更的 SKU
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty_skus: BTreeSet<u64>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記 SKU 為髒
    pub fn mark_dirty(&mut self, sku_envasado: u64) {
        self.dirty_skus.insert(sku_envasado);
    }

    /// 批次標記
    pub fn mark_all(&mut self, skus: impl IntoIterator<Item = u64>) {
        self.dirty_skus.extend(skus);
    }

    /// 檢查 SKU 是否為髒
    pub fn is_dirty(&self, sku_envasado: u64) -> bool {
        self.dirty_skus.contains(&sku_envasado)
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_skus.clear();
    }

    /// 取出所有髒 SKU（由小到大）並清除標記
    pub fn drain(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.dirty_skus).into_iter().collect()
    }

    /// 所有髒 SKU（由小到大）
    pub fn dirty_skus(&self) -> Vec<u64> {
        self.dirty_skus.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty_skus.is_empty()
    }
}
