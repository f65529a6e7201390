//! 集成測試

use chrono::{NaiveDate, TimeZone, Utc};
use matriz::*;
use rstest::rstest;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn assert_close(actual: Option<Decimal>, expected: &str, tolerance: &str) {
    let actual = actual.expect("指標應可計算");
    let diff = (actual - dec(expected)).abs();
    assert!(diff <= dec(tolerance), "實際 {} 預期 {}", actual, expected);
}

/// 0.4L x 15 的糖漿產品
fn kola_real() -> Product {
    Product {
        sku_envasado: 5001,
        sku_jarabe: Some(9001),
        marca: Some("Kola Real".into()),
        sabor: Some("Naranja".into()),
        linea: Some(3),
        formato: Some(dec("0.4")),
        litros_batch: Some(dec("2140")),
        bebida_final: Some(dec("13822")),
        factor_azucar: Some(dec("0.048265")),
        ef_velocidad: Some(dec("80")),
        velocidad_bot: Some(dec("52000")),
        unidad_paquete: Some(dec("15")),
        paquetes_nivel: Some(dec("25")),
        carton_nivel: Some(dec("8")),
        ..Product::new(5001)
    }
}

/// 直接灌裝的水（沒有糖漿）
fn agua() -> Product {
    Product {
        sku_envasado: 6001,
        sku_descripcion: Some("Agua Cielo 0.625L x 15".into()),
        formato: Some(dec("0.625")),
        ef_velocidad: Some(dec("0.8")),
        velocidad_bot: Some(dec("52000")),
        unidad_paquete: Some(dec("15")),
        paquetes_nivel: Some(dec("25")),
        carton_nivel: Some(dec("8")),
        ..Product::new(6001)
    }
}

fn formulas() -> FormulaSet {
    let json = r#"{
        "jarabe": [
            {"articulo": 101, "descripcion": "AZUCAR REFINADA ESPECIAL IMPORTADA", "cantidad": 1, "sku_jarabe": 9001},
            {"articulo": 102, "descripcion": "Benzoato de sodio", "cantidad": 0.35, "sku_jarabe": 9001},
            {"articulo": 300, "descripcion": "Agua tratada", "cantidad": 2000, "sku_jarabe": 9001}
        ],
        "envasado": [
            {"articulo": 200, "descripcion": "Caja Master 15u", "cantidad": 1},
            {"articulo": 201, "descripcion": "Etiqueta", "cantidad": 0.0001},
            {"articulo": 300, "descripcion": "Agua tratada", "cantidad": 0.001}
        ]
    }"#;
    let parsed: FormulaSet = serde_json::from_str(json).unwrap();
    FormulaSet::new(parsed.jarabe, parsed.envasado)
}

fn almacen() -> Warehouse {
    let mut warehouse = Warehouse::new("almacen20");
    warehouse.upsert_all([
        StockItem::new(101, "Azucar", dec("10000")).with_unit("KG"),
        StockItem::new(102, "Benzoato", dec("1")),
        StockItem::new(200, "Caja master", dec("50000")),
        StockItem::new(300, "Agua tratada", dec("25000")),
    ]);
    warehouse
}

#[test]
fn test_metrics_from_json_input() {
    // 介面送來的 JSON：數字、字串與逗號小數混用
    let json = r#"{
        "formato": "0,4",
        "litrosBatch": 2140,
        "bebidaFinal": "13822",
        "factorAzucar": 0.048265,
        "cantidadBatch": 1,
        "unidadPaquete": 15,
        "velocidadBot": 52000,
        "efiVelocidad": 80,
        "paquetesNivel": 25,
        "cartonNivel": 8,
        "skuEnvasado": "5001"
    }"#;
    let input: ProductionInput = serde_json::from_str(json).unwrap();
    let result = compute(&input);

    assert_eq!(result.mode, ProductionMode::Batch);
    assert_close(result.computed.paquetes_lanzados, "2303.6667", "0.0001");
    assert_close(result.computed.paletas_produccion, "11.5183", "0.0001");
    assert_close(result.computed.cant_azucar_batch, "667.1188", "0.0001");

    let value = serde_json::to_value(&result).unwrap();
    assert!(value["computed"]["paquetes_lanzados"].is_number());
    assert_eq!(value["mode"], "batch");
}

#[test]
fn test_plan_batch_end_to_end() {
    logging::init_test();

    let planner = ProductionPlanner::default();
    let plan = planner
        .plan(&kola_real(), PlanQuantity::Batches(dec("10")), &formulas(), &almacen())
        .unwrap();

    assert_eq!(plan.descripcion, "Kola Real Naranja 0.4L x 15");
    assert_close(plan.result.computed.paquetes_lanzados, "23036.6667", "0.0001");

    let sugar = &plan.jarabe[0];
    assert_eq!(sugar.scaled.rule, ScaleRule::Sugar);
    // 13822 × 0.048265 × 10 = 6671.1883
    assert_eq!(sugar.scaled.value, Some(dec("6671")));

    let benzoato = &plan.jarabe[1];
    assert_eq!(benzoato.scaled.rule, ScaleRule::PerBatch);
    assert_eq!(benzoato.scaled.value, Some(dec("4")));

    let caja = &plan.envasado[0];
    assert_eq!(caja.scaled.rule, ScaleRule::MasterCarton);
    assert_eq!(caja.scaled.value, Some(dec("23037")));

    // 糖漿與包裝共用的水依序扣庫存
    let agua: Vec<_> = plan.requirements.iter().filter(|r| r.articulo == 300).collect();
    assert_eq!(agua.len(), 2);
    assert_eq!(agua[0].required, dec("20000"));
    assert_eq!(agua[1].available, dec("5000"));

    let shortages: Vec<u64> = plan
        .requirements
        .iter()
        .filter(|r| !r.is_covered())
        .map(|r| r.articulo)
        .collect();
    assert!(shortages.contains(&102));
    assert!(shortages.contains(&201));
}

#[test]
fn test_plan_packages_without_jarabe() {
    let planner = ProductionPlanner::default();
    let formulas = FormulaSet::new(
        vec![],
        vec![FormulaRow::new(200, "Caja master 15u", Decimal::ONE)],
    );

    let plan = planner
        .plan(&agua(), PlanQuantity::Packages(dec("500")), &formulas, &almacen())
        .unwrap();

    assert_eq!(plan.result.mode, ProductionMode::Packages);
    assert_eq!(plan.descripcion, "Agua Cielo 0.625L x 15");
    assert!(plan.jarabe.is_empty());
    assert_eq!(plan.envasado[0].scaled.value, Some(dec("500")));
    assert_eq!(plan.result.computed.paletas_produccion, Some(dec("2.5")));
    assert_eq!(plan.result.computed.cu30l, Some(dec("156.25")));
    assert!(!plan.has_shortage());
}

#[rstest]
#[case(PlanQuantity::Batches(Decimal::ZERO))]
#[case(PlanQuantity::Packages(Decimal::NEGATIVE_ONE))]
fn test_plan_rejects_non_positive_quantity(#[case] quantity: PlanQuantity) {
    let planner = ProductionPlanner::default();
    let result = planner.plan(&kola_real(), quantity, &formulas(), &almacen());
    assert!(matches!(result, Err(MatrizError::InvalidQuantity(_))));
}

#[test]
fn test_plan_to_ledger() {
    let planner = ProductionPlanner::default();
    let plan = planner
        .plan(&kola_real(), PlanQuantity::Batches(dec("10")), &formulas(), &almacen())
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 11, 12).unwrap();
    let (lot, submission) = plan.submission_with_lot(date).unwrap();
    assert_eq!(lot.week(), 46);
    assert_eq!(lot.year(), 2025);

    let now = Utc.with_ymd_and_hms(2025, 11, 12, 8, 30, 0).unwrap();
    let mut ledger = PlanningLedger::new();
    let inserted = ledger.append(submission.clone(), now).unwrap();

    // 3 糖漿 + 3 包裝；水在兩個類別分開記錄
    assert_eq!(inserted, 6);
    assert!(ledger.contains_stack(&lot.to_string()));
    assert!(ledger
        .entries()
        .iter()
        .all(|e| e.stack == lot.to_string() && e.created_at == now));

    let duplicate = ledger.append(submission, now);
    assert!(matches!(duplicate, Err(MatrizError::DuplicateStack(_))));
    assert_eq!(ledger.len(), 6);
}

#[test]
fn test_submission_json_round_trip_into_ledger() {
    // 介面送出的提交格式
    let json = r#"{
        "stack": "S46-2025-9F3C",
        "jarabe": [{"articulo": 101, "descripcion": "Azucar", "cantidad": 6671.188}],
        "envasado": [
            {"articulo": 200, "cantidad": 23036.67},
            {"articulo": 200, "cantidad": 10.5},
            {"articulo": 0, "cantidad": 3}
        ]
    }"#;
    let submission: PlanSubmission = serde_json::from_str(json).unwrap();
    let entries = submission
        .into_entries(Utc.with_ymd_and_hms(2025, 11, 12, 0, 0, 0).unwrap())
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].cantidad, 6671);
    assert_eq!(entries[1].cantidad, 23046);
    assert!(LotId::parse(&entries[0].stack).is_ok());
}

#[test]
fn test_cache_matches_engine_and_refreshes() {
    let planner = ProductionPlanner::default();
    let mut cache = MetricsCache::new(planner.config().clone());
    let mut tracker = DirtyTracker::new();

    let input = kola_real().to_input(PlanQuantity::Batches(dec("10")));
    let first = cache.get_or_compute(&input).unwrap();
    let second = cache.get_or_compute(&input).unwrap();

    assert_eq!(first, compute(&input));
    assert_eq!(first, second);
    assert_eq!(cache.stats().hits, 1);

    tracker.mark_dirty(5001);
    assert_eq!(cache.refresh(&mut tracker), 1);
    assert!(cache.is_empty());
}

#[test]
fn test_compute_matrix_and_display() {
    let planner = ProductionPlanner::new(PlanningConfig::new().with_display_decimals(2));
    let results = planner.compute_matrix(&[
        (kola_real(), PlanQuantity::Batches(dec("10"))),
        (agua(), PlanQuantity::Packages(dec("500"))),
    ]);

    let decimals = planner.config().display_decimals;
    let lanzados = results[0].computed.paquetes_lanzados.unwrap();
    assert_eq!(display::format_thousands(lanzados, decimals), "23,036.67");
    assert_eq!(display::format_metric(results[1].computed.ratio_bebida, decimals), "—");
    assert_eq!(display::format_metric(results[1].computed.paletas_produccion, decimals), "2.50");
}
