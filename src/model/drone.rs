//! Delivery drones.
//!
//! Drones never retire: the status machine cycles between `Active`,
//! `Inactive`, `Maintenance` and `Delivering` indefinitely, with `Active`
//! as the hub every other state returns through.

use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::lifecycle::{Status, Workflow};
use crate::query::{Listing, Record};

use super::{Entity, EntityKind, Timestamps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    pub id: String,
    pub name: String,
    pub model: String,
    /// Manufacturer serial, unique across the fleet.
    pub serial_number: String,
    pub battery_health: BatteryHealth,
    /// Maximum payload in kilograms.
    pub load_capacity: f64,
    pub last_maintenance: Option<Date>,
    pub registered_on: Date,
    pub status: DroneStatus,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Battery health as a percentage, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BatteryHealth(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("battery health must be between 0 and 100, got {0}")]
pub struct BatteryHealthOutOfRange(pub u8);

impl BatteryHealth {
    pub const FULL: Self = Self(100);

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for BatteryHealth {
    type Error = BatteryHealthOutOfRange;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        if percent > 100 {
            return Err(BatteryHealthOutOfRange(percent));
        }
        Ok(Self(percent))
    }
}

impl From<BatteryHealth> for u8 {
    fn from(health: BatteryHealth) -> Self {
        health.0
    }
}

impl fmt::Display for BatteryHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroneStatus {
    Active,
    Inactive,
    Maintenance,
    Delivering,
}

impl Status for DroneStatus {
    const ALL: &'static [Self] = &[
        Self::Active,
        Self::Inactive,
        Self::Maintenance,
        Self::Delivering,
    ];

    const TRANSITIONS: &'static [(Self, Self)] = &[
        (Self::Active, Self::Inactive),
        (Self::Inactive, Self::Active),
        (Self::Active, Self::Maintenance),
        (Self::Maintenance, Self::Active),
        (Self::Active, Self::Delivering),
        (Self::Delivering, Self::Active),
    ];

    const TERMINAL: &'static [Self] = &[];

    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Maintenance => "Maintenance",
            Self::Delivering => "Delivering",
        }
    }
}

impl fmt::Display for DroneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Record for Drone {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "model" => Some(&self.model),
            "serial_number" => Some(&self.serial_number),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Listing for Drone {
    const SEARCH_FIELDS: &'static [&'static str] = &["serial_number"];
    const FACET_FIELDS: &'static [&'static str] = &["model", "status"];
}

impl Entity for Drone {
    const KIND: EntityKind = EntityKind::Drone;
    const UNIQUE_KEYS: &'static [&'static str] = &["serial_number"];

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Workflow for Drone {
    type Status = DroneStatus;

    fn status(&self) -> DroneStatus {
        self.status
    }

    fn set_status(&mut self, status: DroneStatus) {
        self.status = status;
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}
