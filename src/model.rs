//! Core data model for the console.
//!
//! Every collection the console lists is an [`Entity`]: a record with an
//! opaque id, a status, and creation/update timestamps. Workflow entities
//! (appointments, orders, drones, payments) additionally carry a status
//! machine, see [`crate::lifecycle`].

mod admin_log;
mod appointment;
mod drone;
mod money;
mod order;
mod payment;
mod product;
mod service;

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::query::Listing;

pub use admin_log::AdminLog;
pub use appointment::{Appointment, AppointmentStatus};
pub use drone::{BatteryHealth, Drone, DroneStatus};
pub use money::Amount;
pub use order::{Order, OrderStatus};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use product::{Product, ProductStatus};
pub use service::{ServiceListing, ServiceStatus};

/// The collections the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Appointment,
    Service,
    Product,
    Order,
    Drone,
    Payment,
}

impl EntityKind {
    /// Stable identifier used as the storage discriminator and audit action prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Service => "service",
            Self::Product => "product",
            Self::Order => "order",
            Self::Drone => "drone",
            Self::Payment => "payment",
        }
    }

    /// Plural noun for list summaries ("Showing 1 to 5 of 10 orders").
    pub fn plural(self) -> &'static str {
        match self {
            Self::Appointment => "appointments",
            Self::Service => "services",
            Self::Product => "products",
            Self::Order => "orders",
            Self::Drone => "drones",
            Self::Payment => "payments",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation and last-update instants shared by every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Timestamps {
    /// Timestamps for a record created at `at`.
    pub fn new(at: Timestamp) -> Self {
        Self {
            created_at: at,
            updated_at: at,
        }
    }

    /// Refreshes `updated_at`, guaranteeing it strictly advances.
    ///
    /// The update instant doubles as the record version for optimistic
    /// writes, so two writes must never share one.
    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at
                .checked_add(SignedDuration::from_nanos(1))
                .unwrap_or(now)
        };
    }
}

/// A record stored in one of the console's collections.
pub trait Entity: Listing + Clone + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    /// Attributes whose values must be unique across the collection.
    const UNIQUE_KEYS: &'static [&'static str] = &[];

    fn id(&self) -> &str;

    fn timestamps(&self) -> &Timestamps;
}
