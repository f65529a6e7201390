//! 庫存（almacén）模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 倉庫物料餘額
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    /// 物料編號
    pub articulo: u64,

    pub descripcion: String,

    /// 單位
    #[serde(default)]
    pub u_m: String,

    /// 內容量
    #[serde(default)]
    pub contenido: Decimal,

    /// 期初餘額
    #[serde(default)]
    pub saldo_inicial: Decimal,

    /// 入庫
    #[serde(default)]
    pub ingresos: Decimal,

    /// 出庫
    #[serde(default)]
    pub salidas: Decimal,

    /// 期末餘額（庫存檔提供時為準）
    #[serde(default)]
    pub saldo_final: Option<Decimal>,

    /// 物料線別
    #[serde(default)]
    pub lin_art: u32,

    #[serde(default)]
    pub nombre_linea: String,
}

impl StockItem {
    /// 創建新的庫存記錄
    pub fn new(articulo: u64, descripcion: impl Into<String>, saldo_final: Decimal) -> Self {
        Self {
            articulo,
            descripcion: descripcion.into(),
            u_m: String::new(),
            contenido: Decimal::ZERO,
            saldo_inicial: Decimal::ZERO,
            ingresos: Decimal::ZERO,
            salidas: Decimal::ZERO,
            saldo_final: Some(saldo_final),
            lin_art: 0,
            nombre_linea: String::new(),
        }
    }

    /// 建構器模式：設置期初/入庫/出庫，期末餘額改由計算得出
    pub fn with_movements(mut self, saldo_inicial: Decimal, ingresos: Decimal, salidas: Decimal) -> Self {
        self.saldo_inicial = saldo_inicial;
        self.ingresos = ingresos;
        self.salidas = salidas;
        self.saldo_final = None;
        self
    }

    /// 建構器模式：設置單位
    pub fn with_unit(mut self, u_m: impl Into<String>) -> Self {
        self.u_m = u_m.into();
        self
    }

    /// 建構器模式：設置物料線別
    pub fn with_line(mut self, lin_art: u32, nombre_linea: impl Into<String>) -> Self {
        self.lin_art = lin_art;
        self.nombre_linea = nombre_linea.into();
        self
    }

    /// 由異動計算的餘額
    pub fn computed_balance(&self) -> Decimal {
        self.saldo_inicial + self.ingresos - self.salidas
    }

    /// 可用餘額
    pub fn balance(&self) -> Decimal {
        self.saldo_final.unwrap_or_else(|| self.computed_balance())
    }

    /// 庫存檔的期末餘額與異動是否一致
    pub fn is_consistent(&self) -> bool {
        match self.saldo_final {
            Some(saldo_final) => saldo_final == self.computed_balance(),
            None => true,
        }
    }
}

/// 倉庫（例如 almacen05、almacen20）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Warehouse {
    /// 倉庫ID
    pub warehouse_id: String,

    /// 物料餘額（每個物料編號最多一筆）
    pub items: Vec<StockItem>,
}

impl Warehouse {
    /// 創建新的倉庫
    pub fn new(warehouse_id: impl Into<String>) -> Self {
        Self {
            warehouse_id: warehouse_id.into(),
            items: Vec::new(),
        }
    }

    /// 新增或取代同物料編號的記錄
    pub fn upsert(&mut self, item: StockItem) {
        match self.items.iter_mut().find(|i| i.articulo == item.articulo) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// 批次匯入
    pub fn upsert_all(&mut self, items: impl IntoIterator<Item = StockItem>) {
        for item in items {
            self.upsert(item);
        }
    }

    /// 查詢物料
    pub fn get(&self, articulo: u64) -> Option<&StockItem> {
        self.items.iter().find(|i| i.articulo == articulo)
    }

    /// 物料可用餘額（無記錄時為 None）
    pub fn available(&self, articulo: u64) -> Option<Decimal> {
        self.get(articulo).map(StockItem::balance)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance() {
        let item = StockItem::new(6797, "Preforma 400ml", Decimal::from(1200));
        assert_eq!(item.balance(), Decimal::from(1200));

        let moved = StockItem::new(6798, "Tapa", Decimal::ZERO).with_movements(
            Decimal::from(100),
            Decimal::from(50),
            Decimal::from(30),
        );
        assert_eq!(moved.balance(), Decimal::from(120));
        assert!(moved.is_consistent());
    }

    #[test]
    fn test_inconsistent_feed() {
        let mut item = StockItem::new(1, "Etiqueta", Decimal::from(10));
        item.saldo_inicial = Decimal::from(5);
        assert!(!item.is_consistent());
        // 庫存檔的期末餘額為準
        assert_eq!(item.balance(), Decimal::from(10));
    }

    #[test]
    fn test_upsert_replaces_by_articulo() {
        let mut warehouse = Warehouse::new("almacen20");
        warehouse.upsert(StockItem::new(1, "Tapa", Decimal::from(10)));
        warehouse.upsert(StockItem::new(2, "Etiqueta", Decimal::from(5)));
        warehouse.upsert(StockItem::new(1, "Tapa roja", Decimal::from(99)));

        assert_eq!(warehouse.len(), 2);
        assert_eq!(warehouse.available(1), Some(Decimal::from(99)));
        assert_eq!(warehouse.get(1).unwrap().descripcion, "Tapa roja");
        assert_eq!(warehouse.available(3), None);
    }
}
