//! Product records and their classification enums.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Error returned when a category or product type string is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

/// Shopper segment a product is merchandised under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    Kids,
}

impl Category {
    /// All categories in navigation order.
    pub const ALL: [Self; 3] = [Self::Men, Self::Women, Self::Kids];

    /// Lowercase slug used in URLs and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Kids => "kids",
        }
    }

    /// Heading shown on category pages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Kids => "Kids",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "kids" => Ok(Self::Kids),
            other => Err(UnknownVariant {
                kind: "category",
                value: other.to_owned(),
            }),
        }
    }
}

/// Kind of merchandise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Footwear,
    Clothing,
    Bag,
    Accessory,
}

impl ProductType {
    /// All product types in filter-sidebar order.
    pub const ALL: [Self; 4] = [Self::Footwear, Self::Clothing, Self::Bag, Self::Accessory];

    /// Lowercase slug used in URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Footwear => "footwear",
            Self::Clothing => "clothing",
            Self::Bag => "bag",
            Self::Accessory => "accessory",
        }
    }

    /// Whether products of this type are sold in sizes.
    ///
    /// Bags and accessories are one-size, so size filters skip them.
    #[must_use]
    pub const fn is_sized(self) -> bool {
        matches!(self, Self::Footwear | Self::Clothing)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "footwear" => Ok(Self::Footwear),
            "clothing" => Ok(Self::Clothing),
            "bag" => Ok(Self::Bag),
            "accessory" => Ok(Self::Accessory),
            other => Err(UnknownVariant {
                kind: "product type",
                value: other.to_owned(),
            }),
        }
    }
}

/// A catalog product.
///
/// Field names serialize in camelCase to match the stored client snapshots
/// (`isNew`, `isFeatured`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub rating: f32,
    pub category: Category,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive membership test against the product's colors.
    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.offered_color(color).is_some()
    }

    /// Case-insensitive membership test against the product's sizes.
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.offered_size(size).is_some()
    }

    /// The catalog spelling of `color`, if this product comes in it.
    #[must_use]
    pub fn offered_color(&self, color: &str) -> Option<&str> {
        find_ignore_case(&self.colors, color)
    }

    /// The catalog spelling of `size`, if this product comes in it.
    #[must_use]
    pub fn offered_size(&self, size: &str) -> Option<&str> {
        find_ignore_case(&self.sizes, size)
    }
}

fn find_ignore_case<'a>(options: &'a [String], wanted: &str) -> Option<&'a str> {
    let wanted = wanted.trim();
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(wanted))
        .map(String::as_str)
}
