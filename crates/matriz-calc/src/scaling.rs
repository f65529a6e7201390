//! 配方用量換算

use matriz_core::{ComputedMetrics, FormulaRow, PlanningConfig};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// 套用的換算規則（依優先順序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleRule {
    /// 主箱：數量等於投產包數
    MasterCarton,
    /// 糖：每批用量 × 批數
    Sugar,
    /// 糖漿配方：每批用量 × 批數
    PerBatch,
    /// 包裝配方：用量 × 倍數 × 基數
    PerPackage,
}

/// 換算時的靜默降級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleWarning {
    /// 所需指標無法計算，數量以 0 代替
    MissingMetric(&'static str),
    /// 倍數缺少包數資訊而退回 1
    MultiplierDefaulted,
    /// 倍數與基數都取自包數，包數被套用兩次（待確認）
    DoubleCountedPackages,
    /// 數量溢位
    Overflow,
}

/// 換算請求
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScaleRequest {
    /// 要求的包數
    pub packages_requested: Option<Decimal>,
    /// 要求的批數
    pub batches_requested: Option<Decimal>,
    /// 生產輸入的包數（包裝倍數使用）
    pub cantidad_paquetes: Option<Decimal>,
    /// 以批數換算（糖漿配方）
    pub scale_by_batch: bool,
}

impl ScaleRequest {
    /// 糖漿配方明細
    pub fn jarabe(batches_requested: Option<Decimal>) -> Self {
        Self {
            batches_requested,
            scale_by_batch: true,
            ..Default::default()
        }
    }

    /// 包裝配方明細（包數同時作為倍數來源）
    pub fn envasado(packages_requested: Option<Decimal>, batches_requested: Option<Decimal>) -> Self {
        Self {
            packages_requested,
            batches_requested,
            cantidad_paquetes: packages_requested,
            scale_by_batch: false,
        }
    }
}

/// 換算結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledQuantity {
    /// 換算數量，溢位時為 `None`
    #[serde(with = "rust_decimal::serde::float_option")]
    pub value: Option<Decimal>,
    pub rule: ScaleRule,
    pub warnings: Vec<ScaleWarning>,
}

impl ScaledQuantity {
    fn new(value: Decimal, rule: ScaleRule) -> Self {
        Self {
            value: Some(value),
            rule,
            warnings: Vec::new(),
        }
    }

    fn overflow(rule: ScaleRule) -> Self {
        Self {
            value: None,
            rule,
            warnings: vec![ScaleWarning::Overflow],
        }
    }

    fn warn(mut self, warning: ScaleWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// 是否溢位
    pub fn is_overflow(&self) -> bool {
        self.value.is_none()
    }
}

/// 配方換算器
pub struct FormulaScaler;

impl FormulaScaler {
    /// 換算單一配方明細
    pub fn scale(
        row: &FormulaRow,
        computed: &ComputedMetrics,
        request: &ScaleRequest,
        config: &PlanningConfig,
    ) -> ScaledQuantity {
        let batches = request.batches_requested.unwrap_or(Decimal::ONE);

        let scaled = if row.describes(&config.master_carton_marker) {
            match computed.paquetes_lanzados {
                Some(lanzados) => ScaledQuantity::new(round(lanzados), ScaleRule::MasterCarton),
                None => ScaledQuantity::new(Decimal::ZERO, ScaleRule::MasterCarton)
                    .warn(ScaleWarning::MissingMetric("paquetes_lanzados")),
            }
        } else if row.describes(&config.sugar_marker) {
            match computed.cant_azucar_batch {
                Some(azucar) => checked(azucar.checked_mul(batches), ScaleRule::Sugar),
                None => ScaledQuantity::new(Decimal::ZERO, ScaleRule::Sugar)
                    .warn(ScaleWarning::MissingMetric("cant_azucar_batch")),
            }
        } else if request.scale_by_batch {
            checked(row.cantidad.checked_mul(batches), ScaleRule::PerBatch)
        } else {
            Self::scale_per_package(row, computed, request)
        };

        tracing::debug!(
            articulo = row.articulo,
            rule = ?scaled.rule,
            value = ?scaled.value,
            "配方換算"
        );

        scaled
    }

    fn scale_per_package(
        row: &FormulaRow,
        computed: &ComputedMetrics,
        request: &ScaleRequest,
    ) -> ScaledQuantity {
        let lanzados = computed.paquetes_lanzados;

        let explicit = request.cantidad_paquetes.filter(|p| *p > Decimal::ZERO);
        let multiplier = explicit.or(lanzados).unwrap_or(Decimal::ONE);
        let base = request
            .packages_requested
            .or(lanzados)
            .unwrap_or(Decimal::ONE);

        let mut scaled = checked(
            row.cantidad
                .checked_mul(multiplier)
                .and_then(|v| v.checked_mul(base)),
            ScaleRule::PerPackage,
        );

        if explicit.is_none() && lanzados.is_none() {
            scaled = scaled.warn(ScaleWarning::MultiplierDefaulted);
        }

        let base_from_packages = request.packages_requested.is_some() || lanzados.is_some();
        let multiplier_from_packages = explicit.is_some() || lanzados.is_some();
        if base_from_packages && multiplier_from_packages {
            scaled = scaled.warn(ScaleWarning::DoubleCountedPackages);
        }

        scaled
    }
}

/// 以預設配置換算，只回傳數量（溢位時為 `None`）
pub fn scale(
    row: &FormulaRow,
    computed: &ComputedMetrics,
    packages_requested: Option<Decimal>,
    batches_requested: Option<Decimal>,
    scale_by_batch: bool,
) -> Option<Decimal> {
    let request = ScaleRequest {
        packages_requested,
        batches_requested,
        cantidad_paquetes: packages_requested,
        scale_by_batch,
    };
    FormulaScaler::scale(row, computed, &request, &PlanningConfig::default()).value
}

/// 四捨五入到整數（.5 遠離零）
pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn checked(value: Option<Decimal>, rule: ScaleRule) -> ScaledQuantity {
    match value {
        Some(v) => ScaledQuantity::new(round(v), rule),
        None => ScaledQuantity::overflow(rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn computed(lanzados: Option<&str>, azucar: Option<&str>) -> ComputedMetrics {
        ComputedMetrics {
            paquetes_lanzados: lanzados.map(dec),
            cant_azucar_batch: azucar.map(dec),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("CAJA MASTER X12", "1")]
    #[case("caja master x12", "250")]
    #[case("Caja Master Corrugada", "0.0004")]
    fn test_master_carton_scenario_d(#[case] descripcion: &str, #[case] cantidad: &str) {
        let row = FormulaRow::new(7100, descripcion, dec(cantidad));
        let m = computed(Some("2303.67"), Some("667.06"));

        assert_eq!(scale(&row, &m, None, Some(dec("10")), false), Some(dec("2304")));
        assert_eq!(scale(&row, &m, Some(dec("9")), None, true), Some(dec("2304")));
    }

    #[test]
    fn test_master_carton_beats_sugar() {
        let row = FormulaRow::new(
            7101,
            "Caja master azucar refinada especial importada",
            Decimal::ONE,
        );
        let m = computed(Some("2303.67"), Some("667.06"));
        let result = FormulaScaler::scale(
            &row,
            &m,
            &ScaleRequest::jarabe(Some(dec("10"))),
            &PlanningConfig::default(),
        );

        assert_eq!(result.rule, ScaleRule::MasterCarton);
        assert_eq!(result.value, Some(dec("2304")));
    }

    #[test]
    fn test_sugar_always_batch_scaled() {
        let row = FormulaRow::new(3001, "Azúcar Refinada Especial Importada", dec("0.5"));
        let m = computed(Some("2303.67"), Some("667.06"));

        // 包裝配方中的糖仍以批數換算
        assert_eq!(scale(&row, &m, Some(dec("500")), Some(dec("10")), false), Some(dec("6671")));
        assert_eq!(scale(&row, &m, None, None, false), Some(dec("667")));
    }

    #[test]
    fn test_sugar_without_metric() {
        let row = FormulaRow::new(3001, "AZUCAR REFINADA ESPECIAL IMPORTADA", dec("0.5"));
        let result = FormulaScaler::scale(
            &row,
            &computed(None, None),
            &ScaleRequest::jarabe(Some(dec("10"))),
            &PlanningConfig::default(),
        );

        assert_eq!(result.value, Some(Decimal::ZERO));
        assert_eq!(result.warnings, vec![ScaleWarning::MissingMetric("cant_azucar_batch")]);
    }

    #[rstest]
    #[case(Some("10"), "1250")]
    #[case(None, "125")]
    #[case(Some("2.5"), "313")]
    fn test_per_batch(#[case] batches: Option<&str>, #[case] expected: &str) {
        let row = FormulaRow::new(3002, "Acido citrico", dec("125"));
        let m = computed(Some("2303.67"), None);

        assert_eq!(scale(&row, &m, None, batches.map(dec), true), Some(dec(expected)));
    }

    #[test]
    fn test_per_package_literal_double_count() {
        let row = FormulaRow::new(4001, "Tapa plastica", dec("2"));
        let m = computed(Some("500"), None);

        let result = FormulaScaler::scale(
            &row,
            &m,
            &ScaleRequest::envasado(Some(dec("500")), None),
            &PlanningConfig::default(),
        );

        // 2 × 500 × 500
        assert_eq!(result.value, Some(dec("500000")));
        assert_eq!(result.rule, ScaleRule::PerPackage);
        assert_eq!(result.warnings, vec![ScaleWarning::DoubleCountedPackages]);
    }

    #[test]
    fn test_per_package_batch_run_uses_launched_packages() {
        let row = FormulaRow::new(4002, "Etiqueta", dec("0.001"));
        let m = computed(Some("2303.67"), None);

        let result = FormulaScaler::scale(
            &row,
            &m,
            &ScaleRequest::envasado(None, Some(dec("1"))),
            &PlanningConfig::default(),
        );

        // 0.001 × 2303.67 × 2303.67 = 5306.8955
        assert_eq!(result.value, Some(dec("5307")));
        assert!(result.warnings.contains(&ScaleWarning::DoubleCountedPackages));
    }

    #[test]
    fn test_per_package_without_metrics_defaults_to_one() {
        let row = FormulaRow::new(4003, "Film stretch", dec("3.4"));
        let result = FormulaScaler::scale(
            &row,
            &ComputedMetrics::default(),
            &ScaleRequest::envasado(None, None),
            &PlanningConfig::default(),
        );

        assert_eq!(result.value, Some(dec("3")));
        assert_eq!(result.warnings, vec![ScaleWarning::MultiplierDefaulted]);
    }

    #[test]
    fn test_non_positive_packages_fall_back_to_launched() {
        let row = FormulaRow::new(4004, "Preforma", dec("1"));
        let m = computed(Some("20"), None);
        let request = ScaleRequest {
            packages_requested: Some(dec("3")),
            cantidad_paquetes: Some(Decimal::ZERO),
            ..Default::default()
        };

        let result = FormulaScaler::scale(&row, &m, &request, &PlanningConfig::default());
        assert_eq!(result.value, Some(dec("60")));
    }

    #[test]
    fn test_custom_markers() {
        let config = PlanningConfig::default().with_master_carton_marker("master box");
        let row = FormulaRow::new(7200, "MASTER BOX 24", dec("1"));
        let m = computed(Some("99.5"), None);

        let result = FormulaScaler::scale(&row, &m, &ScaleRequest::default(), &config);
        assert_eq!(result.rule, ScaleRule::MasterCarton);
        assert_eq!(result.value, Some(dec("100")));
    }

    #[test]
    fn test_overflow() {
        let row = FormulaRow::new(4005, "Tapa", Decimal::MAX);
        let m = computed(Some("1000"), None);

        let result = FormulaScaler::scale(
            &row,
            &m,
            &ScaleRequest::envasado(Some(dec("1000")), None),
            &PlanningConfig::default(),
        );
        assert!(result.is_overflow());
        assert_eq!(result.value, None);
        assert!(result.warnings.contains(&ScaleWarning::Overflow));
    }

    #[test]
    fn test_overflow_returns_none_not_max() {
        let row = FormulaRow::new(4007, "Tapa", Decimal::ONE);
        let huge = dec("1000000000000000");
        let m = ComputedMetrics {
            paquetes_lanzados: Some(huge),
            ..Default::default()
        };

        // 1 × 1e15 × 1e15 超出 Decimal 範圍
        assert_eq!(scale(&row, &m, Some(huge), None, false), None);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round(dec("2.5")), dec("3"));
        assert_eq!(round(dec("2303.49")), dec("2303"));
        assert_eq!(round(dec("-2.5")), dec("-3"));
    }

    #[test]
    fn test_row_is_not_mutated() {
        let row = FormulaRow::new(4006, "Tapa", dec("2"));
        let before = row.clone();
        let _ = scale(&row, &computed(Some("10"), None), Some(dec("10")), None, false);
        assert_eq!(row, before);
    }
}
