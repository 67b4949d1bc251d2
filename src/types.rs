use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::StorefrontError;

pub const STOREFRONT_DIR: &str = ".storefront";

/// Root directory for local state (config and cart).
///
/// `STOREFRONT_ROOT` overrides the default of `.storefront` in the working directory.
pub fn storefront_root() -> PathBuf {
    std::env::var_os("STOREFRONT_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(STOREFRONT_DIR))
}

/// Display languages supported by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Cn,
    Mm,
    Th,
}

pub const VALID_LOCALES: &[&str] = &["en", "cn", "mm", "th"];

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Cn => write!(f, "cn"),
            Locale::Mm => write!(f, "mm"),
            Locale::Th => write!(f, "th"),
        }
    }
}

impl FromStr for Locale {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "cn" => Ok(Locale::Cn),
            "mm" => Ok(Locale::Mm),
            "th" => Ok(Locale::Th),
            _ => Err(StorefrontError::InvalidLocale(s.to_string())),
        }
    }
}

/// Descriptions keyed by locale, as the API returns them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default, rename = "en_description")]
    pub en: Option<String>,
    #[serde(default, rename = "cn_description")]
    pub cn: Option<String>,
    #[serde(default, rename = "mm_description")]
    pub mm: Option<String>,
    #[serde(default, rename = "th_description")]
    pub th: Option<String>,
}

impl LocalizedText {
    /// Text for `locale`, falling back to English when missing or empty.
    pub fn get(&self, locale: Locale) -> &str {
        let localized = match locale {
            Locale::En => None,
            Locale::Cn => self.cn.as_deref(),
            Locale::Mm => self.mm.as_deref(),
            Locale::Th => self.th.as_deref(),
        };
        localized
            .filter(|s| !s.is_empty())
            .or(self.en.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: u64,
    #[serde(default)]
    pub link: String,
}

/// A product as listed by the product, trending, new-arrival and deal endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub m_id: Option<u64>,
    #[serde(default)]
    pub m_name: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub c_id: Option<u64>,
    #[serde(default)]
    pub c_name: Option<String>,
    #[serde(default, alias = "name")]
    pub p_name: String,
    #[serde(default, alias = "price")]
    pub p_price: f64,
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub p_stock: Option<i64>,
    #[serde(default, alias = "image")]
    pub p_image: Option<String>,
    #[serde(default)]
    pub product_image: Vec<ProductImage>,
    #[serde(flatten)]
    pub descriptions: LocalizedText,
}

impl Product {
    pub fn description(&self, locale: Locale) -> &str {
        self.descriptions.get(locale)
    }

    /// Price after a percentage discount, if any.
    pub fn effective_price(&self) -> f64 {
        match (self.discount_type.as_deref(), self.discount_percent) {
            (Some("percentage"), Some(percent)) if percent > 0.0 => {
                self.p_price * (100.0 - percent.min(100.0)) / 100.0
            }
            _ => self.p_price,
        }
    }
}

/// Order status codes as used by the API (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Cancelled,
    Rejected,
    Completed,
}

impl OrderStatus {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(OrderStatus::Pending),
            2 => Some(OrderStatus::Confirmed),
            3 => Some(OrderStatus::Shipped),
            4 => Some(OrderStatus::Cancelled),
            5 => Some(OrderStatus::Rejected),
            6 => Some(OrderStatus::Completed),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            OrderStatus::Pending => 1,
            OrderStatus::Confirmed => 2,
            OrderStatus::Shipped => 3,
            OrderStatus::Cancelled => 4,
            OrderStatus::Rejected => 5,
            OrderStatus::Completed => 6,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::Shipped => write!(f, "shipped"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
            OrderStatus::Rejected => write!(f, "rejected"),
            OrderStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u32>() {
            return OrderStatus::from_code(code)
                .ok_or_else(|| StorefrontError::InvalidStatus(s.to_string()));
        }
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "rejected" => Ok(OrderStatus::Rejected),
            "completed" => Ok(OrderStatus::Completed),
            _ => Err(StorefrontError::InvalidStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// One line of an order, as seen by the merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: u64,
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub order_no: String,
    #[serde(default)]
    pub voucher_no: String,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub status: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub driver: Option<Driver>,
}

impl OrderItem {
    pub fn order_status(&self) -> Option<OrderStatus> {
        OrderStatus::from_code(self.status)
    }
}

/// A customer order with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    #[serde(default)]
    pub order_no: String,
    #[serde(default)]
    pub voucher_no: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: u32,
    #[serde(default)]
    pub grand_total: String,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}

impl Order {
    pub fn order_status(&self) -> Option<OrderStatus> {
        OrderStatus::from_code(self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub descriptions: LocalizedText,
}

impl Promotion {
    pub fn description(&self, locale: Locale) -> &str {
        self.descriptions.get(locale)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}
