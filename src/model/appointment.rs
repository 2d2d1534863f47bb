//! Appointments: a customer booking a provider's service.

use std::fmt;

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::lifecycle::{Status, Workflow};
use crate::query::{Listing, Record};

use super::{Amount, Entity, EntityKind, Timestamps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub customer_name: String,
    pub service_name: String,
    pub provider: String,
    pub scheduled_at: DateTime,
    pub amount: Amount,
    pub status: AppointmentStatus,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl Status for AppointmentStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    const TRANSITIONS: &'static [(Self, Self)] = &[
        (Self::Pending, Self::Confirmed),
        (Self::Confirmed, Self::Completed),
        (Self::Pending, Self::Cancelled),
        (Self::Confirmed, Self::Cancelled),
    ];

    const TERMINAL: &'static [Self] = &[Self::Completed, Self::Cancelled];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Record for Appointment {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "customer_name" => Some(&self.customer_name),
            "service_name" => Some(&self.service_name),
            "provider" => Some(&self.provider),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Listing for Appointment {
    const SEARCH_FIELDS: &'static [&'static str] = &["customer_name", "service_name", "provider"];
    const FACET_FIELDS: &'static [&'static str] = &["status"];
}

impl Entity for Appointment {
    const KIND: EntityKind = EntityKind::Appointment;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Workflow for Appointment {
    type Status = AppointmentStatus;

    fn status(&self) -> AppointmentStatus {
        self.status
    }

    fn set_status(&mut self, status: AppointmentStatus) {
        self.status = status;
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}
