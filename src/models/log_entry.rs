//! Activity log models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of action recorded in the activity log
///
/// Open enumeration: kinds the console does not know are kept verbatim in
/// [`ActionKind::Other`] so new server-side actions still load and display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    CreateProduct,
    UpdateProduct,
    IncreaseStock,
    DecreaseStock,
    DeleteProduct,
    Other(String),
}

impl ActionKind {
    /// Every kind the console has a label for, in menu order
    pub const KNOWN: [ActionKind; 5] = [
        ActionKind::CreateProduct,
        ActionKind::UpdateProduct,
        ActionKind::IncreaseStock,
        ActionKind::DecreaseStock,
        ActionKind::DeleteProduct,
    ];

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::CreateProduct => "create_product",
            ActionKind::UpdateProduct => "update_product",
            ActionKind::IncreaseStock => "increase_stock",
            ActionKind::DecreaseStock => "decrease_stock",
            ActionKind::DeleteProduct => "delete_product",
            ActionKind::Other(raw) => raw,
        }
    }

    /// Display label, falling back to the raw kind for unknown actions
    pub fn label(&self) -> &str {
        match self {
            ActionKind::CreateProduct => "Ürün Ekleme",
            ActionKind::UpdateProduct => "Ürün Güncelleme",
            ActionKind::IncreaseStock => "Stok Artırma",
            ActionKind::DecreaseStock => "Stok Azaltma",
            ActionKind::DeleteProduct => "Ürün Silme",
            ActionKind::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ActionKind::Other(_))
    }
}

impl From<String> for ActionKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "create_product" => ActionKind::CreateProduct,
            "update_product" => ActionKind::UpdateProduct,
            "increase_stock" => ActionKind::IncreaseStock,
            "decrease_stock" => ActionKind::DecreaseStock,
            "delete_product" => ActionKind::DeleteProduct,
            _ => ActionKind::Other(raw),
        }
    }
}

impl From<&str> for ActionKind {
    fn from(raw: &str) -> Self {
        ActionKind::from(raw.to_string())
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One activity log entry as returned by `GET /logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    /// Actor reference, resolved through the user directory
    pub user_id: i64,
    pub action: ActionKind,
    /// Target entity name, e.g. "product"
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(with = "crate::models::timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Entity id as shown in tables and searched by free text
    pub fn entity_id_text(&self) -> String {
        self.entity_id.map(|id| id.to_string()).unwrap_or_default()
    }
}
