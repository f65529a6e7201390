//! 生產指標計算

use matriz_core::{ComputedMetrics, PlanningConfig, ProductionInput, ProductionMode, ProductionResult};
use rayon::prelude::*;
use rust_decimal::Decimal;

/// 生產指標計算器
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// 以預設配置計算
    pub fn compute(input: &ProductionInput) -> ProductionResult {
        Self::compute_with_divisor(input, Decimal::from(30))
    }

    /// 以指定配置計算
    pub fn compute_with_config(input: &ProductionInput, config: &PlanningConfig) -> ProductionResult {
        Self::compute_with_divisor(input, config.cu30l_divisor)
    }

    /// 並行計算整張產品矩陣（保持輸入順序）
    pub fn compute_many(inputs: &[ProductionInput], config: &PlanningConfig) -> Vec<ProductionResult> {
        tracing::debug!("並行計算 {} 筆生產輸入", inputs.len());
        inputs
            .par_iter()
            .map(|input| Self::compute_with_config(input, config))
            .collect()
    }

    fn compute_with_divisor(input: &ProductionInput, cu30l_divisor: Decimal) -> ProductionResult {
        let n = input.normalize();

        let formato = n.formato.unwrap_or(Decimal::ZERO);
        let litros_batch = n.litros_batch.unwrap_or(Decimal::ZERO);
        let bebida_final = n.bebida_final.unwrap_or(Decimal::ZERO);
        let factor_azucar = n.factor_azucar.unwrap_or(Decimal::ZERO);
        let cantidad_batch = n.cantidad_batch.unwrap_or(Decimal::ZERO);
        let unidad_paquete = n.unidad_paquete.unwrap_or(Decimal::ZERO);
        let velocidad_bot = n.velocidad_bot.unwrap_or(Decimal::ZERO);
        let paquetes_nivel = n.paquetes_nivel.unwrap_or(Decimal::ZERO);
        let carton_nivel = n.carton_nivel.unwrap_or(Decimal::ZERO);
        let efi = normalize_efficiency(n.efi_velocidad.unwrap_or(Decimal::ZERO));

        let mut m = ComputedMetrics::default();

        // 棧板容量與模式無關
        if paquetes_nivel > Decimal::ZERO && carton_nivel > Decimal::ZERO {
            m.paquetes_x_pallets = paquetes_nivel.checked_mul(carton_nivel);
        }

        let mode = if cantidad_batch > Decimal::ZERO {
            ProductionMode::Batch
        } else if n.cantidad_paquetes.is_some() {
            ProductionMode::Packages
        } else {
            ProductionMode::Undetermined
        };
        tracing::debug!(?mode, "計算模式");

        match mode {
            ProductionMode::Batch => {
                if bebida_final > Decimal::ZERO {
                    m.ratio_bebida = div(litros_batch, bebida_final);
                    if n.factor_azucar.is_some() {
                        m.cant_azucar_batch = bebida_final.checked_mul(factor_azucar);
                    }
                }

                if formato > Decimal::ZERO && unidad_paquete > Decimal::ZERO {
                    m.paquetes_lanzados = cantidad_batch
                        .checked_mul(bebida_final)
                        .and_then(|v| div(v, formato))
                        .and_then(|v| div(v, unidad_paquete));
                }

                if velocidad_bot > Decimal::ZERO && efi > Decimal::ZERO && formato > Decimal::ZERO {
                    m.horas_produccion = velocidad_bot
                        .checked_mul(efi)
                        .and_then(|v| v.checked_mul(formato))
                        .and_then(|rate| div(bebida_final, rate))
                        .and_then(|v| v.checked_mul(cantidad_batch));
                }

                if let Some(horas) = m.horas_produccion {
                    m.batch_minutos = div(horas, cantidad_batch).and_then(|v| v.checked_mul(Decimal::from(60)));
                    m.dias_produccion = div(horas, Decimal::from(24));
                }

                if litros_batch > Decimal::ZERO {
                    m.litros_jarabe_real = cantidad_batch.checked_mul(litros_batch);
                }

                if factor_azucar > Decimal::ZERO {
                    m.kg_azucar_real = m
                        .cant_azucar_batch
                        .and_then(|azucar| cantidad_batch.checked_mul(azucar));
                }
            }
            ProductionMode::Packages => {
                // 包數為零或負數仍照常帶入
                let paquetes = n.cantidad_paquetes.unwrap_or(Decimal::ZERO);
                m.paquetes_lanzados = Some(paquetes);

                if velocidad_bot > Decimal::ZERO && unidad_paquete > Decimal::ZERO && efi > Decimal::ZERO {
                    m.horas_produccion = div(paquetes, velocidad_bot)
                        .and_then(|v| v.checked_mul(unidad_paquete))
                        .and_then(|v| div(v, efi));
                    m.dias_produccion = m.horas_produccion.and_then(|h| div(h, Decimal::from(24)));
                }
            }
            ProductionMode::Undetermined => {}
        }

        // 兩種模式共用
        if let (Some(lanzados), Some(x_pallets)) = (m.paquetes_lanzados, m.paquetes_x_pallets) {
            m.paletas_produccion = div(lanzados, x_pallets);
        }

        if formato > Decimal::ZERO && unidad_paquete > Decimal::ZERO {
            m.cu30l = m.paquetes_lanzados.and_then(|lanzados| {
                lanzados
                    .checked_mul(formato)
                    .and_then(|v| v.checked_mul(unidad_paquete))
                    .and_then(|v| div(v, cu30l_divisor))
            });
        }

        if velocidad_bot > Decimal::ZERO && unidad_paquete > Decimal::ZERO {
            m.velocidad_pallet_hora = m.paquetes_x_pallets.and_then(|x_pallets| {
                div(velocidad_bot, unidad_paquete).and_then(|v| div(v, x_pallets))
            });
        }

        ProductionResult {
            inputs: input.clone(),
            computed: m,
            mode,
        }
    }
}

/// 計算生產指標
pub fn compute(input: &ProductionInput) -> ProductionResult {
    MetricsCalculator::compute(input)
}

/// 效率大於 1 時視為百分比（85 → 0.85）
pub fn normalize_efficiency(efi: Decimal) -> Decimal {
    if efi > Decimal::ONE {
        efi / Decimal::ONE_HUNDRED
    } else {
        efi
    }
}

/// 除數必須為正數
fn div(dividend: Decimal, divisor: Decimal) -> Option<Decimal> {
    if divisor > Decimal::ZERO {
        dividend.checked_div(divisor)
    } else {
        None
    }
}
