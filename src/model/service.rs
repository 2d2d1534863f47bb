//! Service-provider listings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::{Listing, Record};

use super::{Amount, Entity, EntityKind, Timestamps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceListing {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub base_price: Amount,
    pub provider: String,
    pub provider_category: String,
    /// Average customer rating out of 5.
    pub rating: f32,
    pub status: ServiceStatus,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceStatus {
    Active,
    Inactive,
    Pending,
}

impl ServiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Pending => "Pending",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Record for ServiceListing {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "category" => Some(&self.category),
            "description" => Some(&self.description),
            "provider" => Some(&self.provider),
            "provider_category" => Some(&self.provider_category),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Listing for ServiceListing {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "description", "provider"];
    const FACET_FIELDS: &'static [&'static str] = &["category", "provider_category", "status"];
}

impl Entity for ServiceListing {
    const KIND: EntityKind = EntityKind::Service;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
