use crate::utils::error::{BasketError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TOTAL_LINE_NAME: &str = "Total";

/// 購買清單中的一項商品，建立後不可變
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawItem")]
pub struct Item {
    name: String,
    price: f64,
}

/// 反序列化時先讀入未驗證的欄位，再經 `Item::new` 驗證
#[derive(Deserialize)]
struct RawItem {
    name: String,
    price: f64,
}

impl TryFrom<RawItem> for Item {
    type Error = BasketError;

    fn try_from(raw: RawItem) -> Result<Self> {
        Item::new(raw.name, raw.price)
    }
}

impl Item {
    pub fn new(name: impl Into<String>, price: f64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BasketError::InvalidItem {
                name,
                reason: "name cannot be empty".to_string(),
            });
        }
        if !price.is_finite() {
            return Err(BasketError::InvalidItem {
                name,
                reason: format!("price must be a finite number, got {}", price),
            });
        }
        if price < 0.0 {
            return Err(BasketError::InvalidItem {
                name,
                reason: format!("price cannot be negative, got {}", price),
            });
        }
        Ok(Self { name, price })
    }

    /// 報表最後一行的合計項目
    pub fn total(price: f64) -> Self {
        Self {
            name: TOTAL_LINE_NAME.to_string(),
            price,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// 結算後的最終報表: 已收入的商品（依收入順序）加上一行合計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    lines: Vec<Item>,
    limit: f64,
    settled_at: DateTime<Utc>,
}

impl Report {
    pub fn new(admitted: Vec<Item>, total: f64, limit: f64) -> Self {
        let mut lines = admitted;
        lines.push(Item::total(total));
        Self {
            lines,
            limit,
            settled_at: Utc::now(),
        }
    }

    /// All lines including the trailing Total entry.
    pub fn lines(&self) -> &[Item] {
        &self.lines
    }

    pub fn items(&self) -> &[Item] {
        &self.lines[..self.lines.len() - 1]
    }

    pub fn total(&self) -> f64 {
        self.lines[self.lines.len() - 1].price()
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn settled_at(&self) -> DateTime<Utc> {
        self.settled_at
    }
}
