//! # 糖漿飲料生產計劃範例
//!
//! 從產品主檔與配方出發：
//! - 計算 10 批的生產指標
//! - 換算糖漿與包裝配方
//! - 比對倉庫庫存
//! - 產生批號並寫入計劃帳本
//!
//! 執行：`RUST_LOG=debug cargo run --example plan_batch`

use std::str::FromStr;

use anyhow::Context;
use matriz::*;

fn main() -> anyhow::Result<()> {
    logging::init();

    println!("===== 生產計劃範例 =====\n");

    // 步驟 1: 產品主檔與配置
    let config = PlanningConfig::from_json(r#"{"display_decimals": 2}"#)?;
    let product = Product {
        sku_envasado: 5001,
        sku_jarabe: Some(9001),
        marca: Some("Kola Real".into()),
        sabor: Some("Naranja".into()),
        formato: Some(dec("0.4")?),
        litros_batch: Some(dec("2140")?),
        bebida_final: Some(dec("13822")?),
        factor_azucar: Some(dec("0.048265")?),
        ef_velocidad: Some(dec("80")?),
        velocidad_bot: Some(dec("52000")?),
        unidad_paquete: Some(dec("15")?),
        paquetes_nivel: Some(dec("25")?),
        carton_nivel: Some(dec("8")?),
        ..Product::new(5001)
    };
    println!("[1] 產品: {}", product.describe());

    // 步驟 2: 配方與庫存
    let formulas = FormulaSet::new(
        vec![
            FormulaRow::new(101, "Azucar refinada especial importada", Decimal::ONE).with_sku_jarabe(9001),
            FormulaRow::new(102, "Benzoato de sodio", dec("0.35")?).with_sku_jarabe(9001),
        ],
        vec![
            FormulaRow::new(200, "Caja master 15u", Decimal::ONE),
            FormulaRow::new(201, "Etiqueta Kola Real 400ml", dec("0.0001")?),
        ],
    );

    let mut almacen = Warehouse::new("almacen20");
    almacen.upsert_all([
        StockItem::new(101, "Azucar refinada", dec("5000")?).with_unit("KG"),
        StockItem::new(102, "Benzoato de sodio", dec("12")?).with_unit("KG"),
        StockItem::new(200, "Caja master", dec("30000")?).with_unit("UND"),
    ]);
    println!("[2] 配方: 糖漿 {} 筆, 包裝 {} 筆; 倉庫 {} 項\n", formulas.jarabe.len(), formulas.envasado.len(), almacen.len());

    // 步驟 3: 生產計劃
    let planner = ProductionPlanner::new(config);
    let plan = planner
        .plan(&product, PlanQuantity::Batches(Decimal::from(10)), &formulas, &almacen)
        .context("生產計劃失敗")?;

    let decimals = planner.config().display_decimals;
    println!("[3] 生產指標 ({:?} 模式)", plan.result.mode);
    for (name, value) in plan.result.computed.iter() {
        println!("    {:<24} {}", name, display::format_metric(value, decimals));
    }
    println!();

    println!("[4] 淨需求");
    for req in &plan.requirements {
        println!(
            "    {:>5} {:<36} 需求 {:>14}  可用 {:>10}  {}",
            req.articulo,
            req.descripcion,
            display::format_thousands(req.required, 0),
            display::format_thousands(req.available, 0),
            if req.is_covered() { "OK" } else { "不足" }
        );
    }
    println!();

    for warning in &plan.warnings {
        println!("    [{:?}] {}: {}", warning.severity, warning.subject, warning.message);
    }

    // 步驟 5: 寫入帳本
    let today = chrono::Utc::now();
    let (lot, submission) = plan.submission_with_lot(today.date_naive())?;
    let mut ledger = PlanningLedger::new();
    let inserted = ledger.append(submission, today)?;
    println!("\n[5] 批號 {} 寫入 {} 筆", lot, inserted);

    Ok(())
}

fn dec(value: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(value).with_context(|| format!("無效的數值: {}", value))
}
