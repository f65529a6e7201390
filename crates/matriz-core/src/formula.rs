//! 配方（BOM）模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 配方類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormulaKind {
    /// 糖漿配方（每批用量）
    Jarabe,
    /// 包裝配方（每包用量）
    Envasado,
}

impl FormulaKind {
    /// 計劃帳本中的類別名稱
    pub fn categoria(&self) -> &'static str {
        match self {
            FormulaKind::Jarabe => "jarabe",
            FormulaKind::Envasado => "envasado",
        }
    }
}

/// 配方明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaRow {
    /// 物料編號
    pub articulo: u64,

    /// 物料名稱（規則比對使用）
    pub descripcion: String,

    /// 單位用量
    #[serde(with = "rust_decimal::serde::float")]
    pub cantidad: Decimal,

    /// 糖漿 SKU（僅糖漿配方）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_jarabe: Option<u64>,
}

impl FormulaRow {
    /// 創建新的配方明細
    pub fn new(articulo: u64, descripcion: impl Into<String>, cantidad: Decimal) -> Self {
        Self {
            articulo,
            descripcion: descripcion.into(),
            cantidad,
            sku_jarabe: None,
        }
    }

    /// 建構器模式：設置糖漿 SKU
    pub fn with_sku_jarabe(mut self, sku_jarabe: u64) -> Self {
        self.sku_jarabe = Some(sku_jarabe);
        self
    }

    /// 名稱是否包含指定標記（不分大小寫、不分重音）
    pub fn describes(&self, marker: &str) -> bool {
        fold(&self.descripcion).contains(&fold(marker))
    }
}

/// 轉小寫並去除西班牙文重音
fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

/// 某個 SKU 的完整配方（配方查詢服務的回應）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaSet {
    #[serde(default)]
    pub jarabe: Vec<FormulaRow>,

    #[serde(default)]
    pub envasado: Vec<FormulaRow>,

    /// 同時出現在糖漿與包裝配方的物料（取糖漿側的明細）
    #[serde(default)]
    pub matching_rows: Vec<FormulaRow>,
}

impl FormulaSet {
    /// 創建配方，並推導重複物料
    pub fn new(jarabe: Vec<FormulaRow>, envasado: Vec<FormulaRow>) -> Self {
        let matching_rows = jarabe
            .iter()
            .filter(|row| envasado.iter().any(|e| e.articulo == row.articulo))
            .cloned()
            .collect();

        Self {
            jarabe,
            envasado,
            matching_rows,
        }
    }

    /// 查詢與重複物料對應的包裝明細
    pub fn envasado_match(&self, articulo: u64) -> Option<&FormulaRow> {
        self.envasado.iter().find(|row| row.articulo == articulo)
    }

    /// 是否有糖漿配方
    pub fn has_jarabe(&self) -> bool {
        !self.jarabe.is_empty()
    }

    /// 依類別取得明細
    pub fn rows(&self, kind: FormulaKind) -> &[FormulaRow] {
        match kind {
            FormulaKind::Jarabe => &self.jarabe,
            FormulaKind::Envasado => &self.envasado,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(articulo: u64, descripcion: &str) -> FormulaRow {
        FormulaRow::new(articulo, descripcion, Decimal::ONE)
    }

    #[test]
    fn test_describes_ignores_case_and_accents() {
        let sugar = row(10, "AZÚCAR REFINADA ESPECIAL IMPORTADA");
        assert!(sugar.describes("azucar refinada especial importada"));

        let carton = row(11, "Caja Master x12");
        assert!(carton.describes("caja master"));
        assert!(!carton.describes("azucar"));
    }

    #[test]
    fn test_matching_rows() {
        let jarabe = vec![row(1, "Agua tratada"), row(2, "Azucar"), row(3, "Acido citrico")];
        let envasado = vec![row(2, "Azucar (envasado)"), row(4, "Tapa"), row(3, "Acido")];

        let formulas = FormulaSet::new(jarabe, envasado);

        let ids: Vec<_> = formulas.matching_rows.iter().map(|r| r.articulo).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(
            formulas.envasado_match(2).map(|r| r.descripcion.as_str()),
            Some("Azucar (envasado)")
        );
        assert!(formulas.envasado_match(1).is_none());
    }

    #[test]
    fn test_deserialize_lookup_response() {
        let formulas: FormulaSet = serde_json::from_str(
            r#"{
                "envasado": [{"articulo": 7001, "descripcion": "Preforma", "cantidad": 15}],
                "matchingRows": []
            }"#,
        )
        .unwrap();

        assert!(!formulas.has_jarabe());
        assert_eq!(formulas.rows(FormulaKind::Envasado).len(), 1);
        assert_eq!(formulas.envasado[0].cantidad, Decimal::from(15));
    }
}
