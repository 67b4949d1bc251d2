//! Per-user shopping carts.
//!
//! A cart only ever holds items from one merchant. Carts are kept per user id
//! with `guest` standing in for an anonymous session, and are persisted as
//! JSON in `cart.json` under the storefront root.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorefrontError};
use crate::types::{Product, storefront_root};

pub const GUEST_USER: &str = "guest";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub merchant_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartItem {
    /// A cart line for `quantity` of `product`, at its discounted price.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.p_name.clone(),
            price: product.effective_price(),
            quantity,
            merchant_id: product.m_id.unwrap_or_default(),
            image: product.p_image.clone(),
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub last_updated: u64,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    1
}

impl Default for Cart {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            last_updated: 0,
            version: default_version(),
        }
    }
}

impl Cart {
    pub fn merchant_id(&self) -> Option<u64> {
        self.items.first().map(|item| item.merchant_id)
    }

    /// Add an item. An item from another merchant empties the cart first;
    /// an item already present has its quantity increased, capped at `u32::MAX`.
    ///
    /// Returns true if the cart was emptied to make room.
    pub fn add_item(&mut self, item: CartItem) -> bool {
        let replaced = self
            .merchant_id()
            .is_some_and(|merchant| merchant != item.merchant_id);
        if replaced {
            self.items.clear();
        }

        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => self.items.push(item),
        }
        self.touch();
        replaced
    }

    /// Remove one unit; the line goes away when it reaches zero.
    pub fn decrease_quantity(&mut self, id: u64) -> Result<()> {
        let index = self.position(id)?;
        if self.items[index].quantity > 1 {
            self.items[index].quantity -= 1;
        } else {
            self.items.remove(index);
        }
        self.touch();
        Ok(())
    }

    /// Set an item's quantity. Zero removes it.
    pub fn update_quantity(&mut self, id: u64, quantity: u32) -> Result<()> {
        let index = self.position(id)?;
        if quantity == 0 {
            self.items.remove(index);
        } else {
            self.items[index].quantity = quantity;
        }
        self.touch();
        Ok(())
    }

    pub fn remove_item(&mut self, id: u64) -> Result<CartItem> {
        let index = self.position(id)?;
        let item = self.items.remove(index);
        self.touch();
        Ok(item)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.quantity))
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StorefrontError::CartItemNotFound(id))
    }

    fn touch(&mut self) {
        self.last_updated = now_millis();
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// All carts, keyed by user id, plus the active user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartBook {
    #[serde(default)]
    pub carts: BTreeMap<String, Cart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user: Option<String>,
}

impl CartBook {
    pub fn path() -> PathBuf {
        storefront_root().join("cart.json")
    }

    /// Load carts from disk, or start empty if none were saved.
    pub fn load() -> Result<Self> {
        let path = Self::path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|e| {
            StorefrontError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read cart at {}: {}", path.display(), e),
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).map_err(|e| {
            StorefrontError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write cart at {}: {}", path.display(), e),
            ))
        })?;
        Ok(())
    }

    pub fn user_id(&self) -> &str {
        self.current_user.as_deref().unwrap_or(GUEST_USER)
    }

    /// The active user's cart, if one exists.
    pub fn current(&self) -> Option<&Cart> {
        self.carts.get(self.user_id())
    }

    /// The active user's cart, created on first use.
    pub fn current_mut(&mut self) -> &mut Cart {
        let user = self.user_id().to_string();
        self.carts.entry(user).or_default()
    }

    /// Switch to `user_id`. Leaving the guest session merges the guest cart
    /// into the user's cart.
    pub fn login(&mut self, user_id: &str) {
        if self.user_id() == GUEST_USER && user_id != GUEST_USER {
            self.merge(GUEST_USER, user_id);
        }
        self.current_user = Some(user_id.to_string());
    }

    pub fn logout(&mut self) {
        self.current_user = None;
    }

    /// Move `source`'s items into `target` and drop `source`.
    ///
    /// Items from the same merchant are combined; a cart from another
    /// merchant replaces the target's items.
    pub fn merge(&mut self, source: &str, target: &str) {
        let Some(source_cart) = self.carts.remove(source) else {
            return;
        };
        let target_cart = self.carts.entry(target.to_string()).or_default();
        if source_cart.is_empty() {
            return;
        }

        if target_cart.merchant_id() == source_cart.merchant_id() || target_cart.is_empty() {
            for item in source_cart.items {
                target_cart.add_item(item);
            }
        } else {
            target_cart.items = source_cart.items;
        }
        target_cart.touch();
    }
}
