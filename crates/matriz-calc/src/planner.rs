//! 生產計劃主流程

use matriz_core::{
    FormulaKind, FormulaSet, MatrizError, PlanQuantity, PlanningConfig, Product, ProductionMode,
    ProductionResult, Result, Warehouse,
};

use crate::metrics::MetricsCalculator;
use crate::netting::{NetRequirement, NettingCalculator, ScaledLine};
use crate::scaling::{FormulaScaler, ScaleRequest, ScaleWarning};
use crate::{PlanWarning, ProductionPlan};

/// 生產計劃器
pub struct ProductionPlanner {
    config: PlanningConfig,
}

impl ProductionPlanner {
    /// 創建新的計劃器
    pub fn new(config: PlanningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// 計劃一個產品的生產
    ///
    /// 計算指標、換算兩份配方、比對庫存並收集警告。
    pub fn plan(
        &self,
        product: &Product,
        quantity: PlanQuantity,
        formulas: &FormulaSet,
        stock: &Warehouse,
    ) -> Result<ProductionPlan> {
        let sku = product.sku_envasado.to_string();

        tracing::info!(
            "開始生產計劃：SKU {}，數量 {:?}，糖漿明細 {} 筆，包裝明細 {} 筆",
            sku,
            quantity,
            formulas.jarabe.len(),
            formulas.envasado.len()
        );

        let start_time = std::time::Instant::now();

        if formulas.envasado.is_empty() {
            return Err(MatrizError::FormulaNotFound(sku));
        }
        if !quantity.is_positive() {
            return Err(MatrizError::InvalidQuantity(format!(
                "SKU {} 的數量必須為正數: {}",
                sku,
                quantity.value()
            )));
        }

        // Step 1: 生產指標
        let input = product.to_input(quantity);
        let result = MetricsCalculator::compute_with_config(&input, &self.config);
        tracing::debug!("計算模式: {:?}，可計算指標 {} 項", result.mode, result.computed.computed_count());

        let mut warnings = Vec::new();
        if result.mode == ProductionMode::Undetermined {
            warnings.push(PlanWarning::warning(
                sku.clone(),
                "無法判定計算模式，批數與包數皆未提供".to_string(),
            ));
        }

        // Step 2: 配方換算
        let (packages, batches) = match quantity {
            PlanQuantity::Batches(n) => (None, Some(n)),
            PlanQuantity::Packages(n) => (Some(n), None),
        };
        let jarabe = self.scale_rows(
            FormulaKind::Jarabe,
            formulas,
            &result,
            &ScaleRequest::jarabe(batches),
            &mut warnings,
        );
        let envasado = self.scale_rows(
            FormulaKind::Envasado,
            formulas,
            &result,
            &ScaleRequest::envasado(packages, batches),
            &mut warnings,
        );

        // Step 3: 庫存比對
        let lines: Vec<ScaledLine> = jarabe.iter().chain(envasado.iter()).cloned().collect();
        let requirements = NettingCalculator::calculate(&lines, stock);

        let mut plan = ProductionPlan {
            sku_envasado: product.sku_envasado,
            descripcion: product.describe(),
            quantity,
            result,
            jarabe,
            envasado,
            requirements,
            warnings,
            calculation_time_ms: None,
        };

        if self.config.warn_on_shortage {
            let shortages: Vec<PlanWarning> = plan
                .requirements
                .iter()
                .filter(|r| !r.is_covered())
                .map(shortage_warning)
                .collect();
            for warning in shortages {
                plan.add_warning(warning);
            }
        }

        plan.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!(
            "生產計劃完成：SKU {}，警告 {} 筆，耗時 {:?}ms",
            sku,
            plan.warnings.len(),
            plan.calculation_time_ms
        );

        Ok(plan)
    }

    /// 計算整張產品矩陣的指標
    pub fn compute_matrix(&self, items: &[(Product, PlanQuantity)]) -> Vec<ProductionResult> {
        let inputs: Vec<_> = items
            .iter()
            .map(|(product, quantity)| product.to_input(*quantity))
            .collect();
        MetricsCalculator::compute_many(&inputs, &self.config)
    }

    fn scale_rows(
        &self,
        kind: FormulaKind,
        formulas: &FormulaSet,
        result: &ProductionResult,
        request: &ScaleRequest,
        warnings: &mut Vec<PlanWarning>,
    ) -> Vec<ScaledLine> {
        formulas
            .rows(kind)
            .iter()
            .map(|row| {
                let scaled = FormulaScaler::scale(row, &result.computed, request, &self.config);
                for warning in &scaled.warnings {
                    warnings.push(scale_warning(row.articulo, warning));
                }
                ScaledLine::new(kind, row.clone(), scaled)
            })
            .collect()
    }
}

impl Default for ProductionPlanner {
    fn default() -> Self {
        Self::new(PlanningConfig::default())
    }
}

fn shortage_warning(req: &NetRequirement) -> PlanWarning {
    tracing::warn!(
        "物料 {} ({}) 庫存不足 {}",
        req.articulo,
        req.descripcion,
        req.shortage
    );
    let message = if req.stock_found {
        format!("庫存不足: 需求 {}, 可用 {}", req.required, req.available)
    } else {
        format!("倉庫無此物料，需求 {}", req.required)
    };
    PlanWarning::warning(req.articulo.to_string(), message)
}

fn scale_warning(articulo: u64, warning: &ScaleWarning) -> PlanWarning {
    let subject = articulo.to_string();
    match warning {
        ScaleWarning::MissingMetric(metric) => {
            tracing::warn!("物料 {} 缺少指標 {}，數量以 0 計", articulo, metric);
            PlanWarning::warning(subject, format!("缺少指標 {}，數量以 0 計", metric))
        }
        ScaleWarning::MultiplierDefaulted => {
            tracing::warn!("物料 {} 沒有包數可用，倍數以 1 計", articulo);
            PlanWarning::warning(subject, "沒有包數可用，倍數以 1 計".to_string())
        }
        ScaleWarning::DoubleCountedPackages => PlanWarning::info(
            subject,
            "包數同時作為倍數與基數".to_string(),
        ),
        ScaleWarning::Overflow => {
            tracing::warn!("物料 {} 數量溢位", articulo);
            PlanWarning::error(subject, "數量溢位，無法換算".to_string())
        }
    }
}
