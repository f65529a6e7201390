//! 生產指標記憶化

use std::collections::{HashMap, VecDeque};

use matriz_calc::MetricsCalculator;
use matriz_core::{PlanningConfig, ProductionInput, ProductionResult, Result};

use crate::dirty_tracking::DirtyTracker;

/// 預設容量
pub const DEFAULT_CAPACITY: usize = 1024;

/// 緩存統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// 命中率（尚未查詢時為 0）
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    sku_envasado: Option<String>,
    result: ProductionResult,
}

/// 生產指標緩存
///
/// 以輸入的 JSON 序列化為鍵，容量滿時淘汰最早寫入的項目。
#[derive(Debug)]
pub struct MetricsCache {
    config: PlanningConfig,
    capacity: usize,
    entries: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl MetricsCache {
    /// 創建新的緩存
    pub fn new(config: PlanningConfig) -> Self {
        Self::with_capacity(config, DEFAULT_CAPACITY)
    }

    /// 指定容量（至少 1）
    pub fn with_capacity(config: PlanningConfig, capacity: usize) -> Self {
        Self {
            config,
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// 取得緩存結果，沒有時計算並寫入
    pub fn get_or_compute(&mut self, input: &ProductionInput) -> Result<ProductionResult> {
        let key = serde_json::to_string(input)?;

        if let Some(entry) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!("指標緩存命中: SKU {:?}", entry.sku_envasado);
            return Ok(entry.result.clone());
        }

        self.misses += 1;
        let result = MetricsCalculator::compute_with_config(input, &self.config);

        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        self.order.push_back(key.clone());
        self.entries.insert(
            key,
            CacheEntry {
                sku_envasado: input.sku_envasado.clone(),
                result: result.clone(),
            },
        );

        Ok(result)
    }

    /// 是否已緩存
    pub fn contains(&self, input: &ProductionInput) -> bool {
        serde_json::to_string(input)
            .map(|key| self.entries.contains_key(&key))
            .unwrap_or(false)
    }

    /// 移除某個 SKU 的所有緩存，回傳移除筆數
    pub fn invalidate_sku(&mut self, sku_envasado: u64) -> usize {
        let sku = sku_envasado.to_string();
        let before = self.entries.len();

        self.entries
            .retain(|_, entry| entry.sku_envasado.as_deref() != Some(sku.as_str()));
        let entries = &self.entries;
        self.order.retain(|key| entries.contains_key(key));

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!("SKU {} 緩存失效 {} 筆", sku, removed);
        }
        removed
    }

    /// 依髒標記失效並清除標記，回傳移除筆數
    pub fn refresh(&mut self, tracker: &mut DirtyTracker) -> usize {
        let removed: usize = tracker
            .drain()
            .into_iter()
            .map(|sku| self.invalidate_sku(sku))
            .sum();

        tracing::info!("指標緩存刷新：移除 {} 筆，剩餘 {} 筆", removed, self.entries.len());
        removed
    }

    /// 清空緩存（保留統計）
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_oldest(&mut self) {
        if let Some(key) = self.order.pop_front() {
            self.entries.remove(&key);
            tracing::debug!("指標緩存已滿，淘汰最早項目");
        }
    }
}

impl Default for MetricsCache {
    fn default() -> Self {
        Self::new(PlanningConfig::default())
    }
}
