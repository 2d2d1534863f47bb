//! Marketplace orders, from checkout to doorstep.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lifecycle::{Status, Workflow};
use crate::query::{Listing, Record};

use super::{Amount, Entity, EntityKind, Timestamps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Human-facing order number, e.g. `ORD-2024-001`.
    pub id: String,
    pub buyer_id: String,
    pub buyer_name: String,
    pub seller_id: String,
    pub seller_name: String,
    pub total_amount: Amount,
    pub delivery_address: String,
    /// References [`super::Payment::id`].
    pub payment_id: String,
    pub status: OrderStatus,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    ForDelivery,
    Delivered,
    Cancelled,
}

impl Status for OrderStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Processing,
        Self::ForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    const TRANSITIONS: &'static [(Self, Self)] = &[
        (Self::Pending, Self::Processing),
        (Self::Processing, Self::ForDelivery),
        (Self::ForDelivery, Self::Delivered),
        (Self::Pending, Self::Cancelled),
        (Self::Processing, Self::Cancelled),
        (Self::ForDelivery, Self::Cancelled),
    ];

    const TERMINAL: &'static [Self] = &[Self::Delivered, Self::Cancelled];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::ForDelivery => "for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Record for Order {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "buyer_id" => Some(&self.buyer_id),
            "buyer_name" => Some(&self.buyer_name),
            "seller_id" => Some(&self.seller_id),
            "seller_name" => Some(&self.seller_name),
            "delivery_address" => Some(&self.delivery_address),
            "payment_id" => Some(&self.payment_id),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Listing for Order {
    const SEARCH_FIELDS: &'static [&'static str] =
        &["id", "buyer_name", "seller_name", "delivery_address"];
    const FACET_FIELDS: &'static [&'static str] = &["status"];
}

impl Entity for Order {
    const KIND: EntityKind = EntityKind::Order;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Workflow for Order {
    type Status = OrderStatus;

    fn status(&self) -> OrderStatus {
        self.status
    }

    fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}
