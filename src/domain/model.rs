use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ProductId = u64;

/// Display data as served by the product catalog.
///
/// Fields the cart does not know about are kept verbatim in `extra` so the
/// stored line carries the full catalog payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

/// Keys owned by the cart line itself; catalog values under these names are dropped.
const RESERVED_LINE_KEYS: &[&str] = &["amount"];

impl CartLine {
    pub fn new(mut product: Product) -> Self {
        for key in RESERVED_LINE_KEYS {
            product.extra.remove(*key);
        }
        Self { product, amount: 1 }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }

    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.amount)
    }
}

/// 購物車：依加入順序排列，每個商品最多一行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Amount currently in the cart, 0 when the product has no line.
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map(|line| line.amount).unwrap_or(0)
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.amount)).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub(crate) fn get_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id() == product_id)
    }

    /// Appends a line for a product not yet in the cart.
    ///
    /// Uniqueness by id is only asserted in debug builds; callers check
    /// `contains` (or `get_mut`) first.
    pub(crate) fn push(&mut self, line: CartLine) {
        debug_assert!(!self.contains(line.id()));
        self.lines.push(line);
    }

    pub(crate) fn remove(&mut self, product_id: ProductId) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| line.id() == product_id)?;
        Some(self.lines.remove(index))
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(alias = "productId")]
    pub id: ProductId,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountUpdate {
    pub product_id: ProductId,
    pub amount: i64,
}

impl AmountUpdate {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Non-positive update amounts are dropped without touching the cart.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddProduct,
    RemoveProduct,
    UpdateAmount,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::AddProduct => write!(f, "add product"),
            Operation::RemoveProduct => write!(f, "remove product"),
            Operation::UpdateAmount => write!(f, "update amount"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// Conditions reported to the user; tests match on these, never on text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    AddOutOfStock,
    UpdateOutOfStock,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::AddOutOfStock | Notice::UpdateOutOfStock => {
                "Requested quantity is out of stock"
            }
            Notice::AddFailed => "Failed to add product",
            Notice::RemoveFailed => "Failed to remove product",
            Notice::UpdateFailed => "Failed to update product quantity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub notice: Notice,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn error(notice: Notice) -> Self {
        Self {
            severity: Severity::Error,
            notice,
            message: notice.message().to_string(),
            raised_at: Utc::now(),
        }
    }
}
