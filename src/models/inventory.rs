//! Inventory and mission models.

use serde::{Deserialize, Serialize};

/// Expiry assigned to stock added without one.
pub const DEFAULT_EXPIRY: &str = "2025-01-01";

/// A medicine held in the hospital store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: u64,
    pub name: String,
    pub stock: u32,
    pub expiry: String,
}

impl InventoryItem {
    /// Apply a signed stock change, clamping at zero.
    pub fn adjust(&mut self, amount: i64) {
        let next = i64::from(self.stock).saturating_add(amount);
        self.stock = next.clamp(0, i64::from(u32::MAX)) as u32;
    }
}

/// Request body for adding a new inventory item.
#[derive(Debug, Clone, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub expiry: Option<String>,
}

/// Request body for changing an item's stock.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustStockRequest {
    pub amount: i64,
}

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// The mission flying a dispatched request to its PHC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    /// Id of the dispatched request
    pub id: String,
    pub phc: String,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub launched_at: String,
}
