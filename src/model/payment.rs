//! Payments.
//!
//! Field names follow the persisted payment contract: `user_id`, `amount`,
//! `method`, `reference_number`, `status`, `created_at`, `updated_at`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lifecycle::{Status, Workflow};
use crate::query::{Listing, Record};

use super::{Amount, Entity, EntityKind, Timestamps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub amount: Amount,
    pub method: PaymentMethod,
    /// Unique across all payments for the lifetime of the record.
    pub reference_number: String,
    pub status: PaymentStatus,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    GCash,
    Cod,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GCash => "GCash",
            Self::Cod => "Cod",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl Status for PaymentStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::Paid, Self::Failed];

    const TRANSITIONS: &'static [(Self, Self)] =
        &[(Self::Pending, Self::Paid), (Self::Pending, Self::Failed)];

    const TERMINAL: &'static [Self] = &[Self::Paid, Self::Failed];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Record for Payment {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "user_id" => Some(&self.user_id),
            "method" => Some(self.method.as_str()),
            "reference_number" => Some(&self.reference_number),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Listing for Payment {
    const SEARCH_FIELDS: &'static [&'static str] = &["reference_number", "user_id"];
    const FACET_FIELDS: &'static [&'static str] = &["method", "status"];
}

impl Entity for Payment {
    const KIND: EntityKind = EntityKind::Payment;
    const UNIQUE_KEYS: &'static [&'static str] = &["reference_number"];

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Workflow for Payment {
    type Status = PaymentStatus;

    fn status(&self) -> PaymentStatus {
        self.status
    }

    fn set_status(&mut self, status: PaymentStatus) {
        self.status = status;
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}
