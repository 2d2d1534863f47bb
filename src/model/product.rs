//! Products sold by marketplace sellers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::{Listing, Record};

use super::{Amount, Entity, EntityKind, Timestamps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: Amount,
    pub stock: u32,
    pub seller: String,
    pub status: ProductStatus,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    Available,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    Discontinued,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::OutOfStock => "Out of Stock",
            Self::Discontinued => "Discontinued",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Record for Product {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "category" => Some(&self.category),
            "seller" => Some(&self.seller),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Listing for Product {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "seller", "category"];
    const FACET_FIELDS: &'static [&'static str] = &["category", "status"];
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
