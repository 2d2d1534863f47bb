//! The console service: list, transition, and create against the store.
//!
//! This is where the pure pieces meet persistence. List queries read a
//! snapshot and run the query engine over it. Status changes are computed
//! by the status machines, written with a version check, and only then
//! reported to the audit recorder.

use std::sync::atomic::{AtomicBool, Ordering};

use jiff::Timestamp;
use jiff::civil::Date;
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::{AuditDraft, AuditError, AuditRecorder};
use crate::lifecycle::{self, TransitionError, Transitioned, Workflow};
use crate::model::{
    AdminLog, Amount, Appointment, BatteryHealth, Drone, DroneStatus, Entity, Order, Payment,
    PaymentMethod, PaymentStatus, Product, ServiceListing, Timestamps,
};
use crate::query::{self, ListQueryEngine, QueryParams, QueryResult};
use crate::source::{MemorySource, RecordSource};
use crate::storage::{Storage, StorageError};

/// Errors from console operations.
///
/// Every variant means nothing was changed.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{kind} {id}: cancelled before the change was written")]
    Cancelled {
        kind: crate::model::EntityKind,
        id: String,
    },

    #[error("fixture data unreadable: {0}")]
    Fixtures(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ConsoleError>;

/// A record that was created, with the outcome of its audit entry.
#[derive(Debug)]
pub struct Created<R> {
    pub record: R,
    pub audit: core::result::Result<AdminLog, AuditError>,
}

/// Input for [`Console::create_payment`].
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: String,
    pub amount: Amount,
    pub method: PaymentMethod,
    /// Generated when absent.
    pub reference_number: Option<String>,
}

/// Input for [`Console::register_drone`].
#[derive(Debug, Clone)]
pub struct NewDrone {
    pub name: String,
    pub model: String,
    pub serial_number: String,
    pub load_capacity: f64,
    pub battery_health: BatteryHealth,
}

/// How many records `seed` inserted per collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub appointments: usize,
    pub services: usize,
    pub products: usize,
    pub orders: usize,
    pub drones: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.appointments + self.services + self.products + self.orders + self.drones
    }
}

/// Console operations performed on behalf of one admin.
pub struct Console<'a> {
    storage: &'a Storage,
    recorder: &'a dyn AuditRecorder,
    admin_id: String,
}

impl<'a> Console<'a> {
    /// A console that records audit entries into the same store.
    pub fn new(storage: &'a Storage, admin_id: impl Into<String>) -> Self {
        Self::with_recorder(storage, storage, admin_id)
    }

    pub fn with_recorder(
        storage: &'a Storage,
        recorder: &'a dyn AuditRecorder,
        admin_id: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            recorder,
            admin_id: admin_id.into(),
        }
    }

    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }

    // ── Queries ──

    /// Runs a list query over a fresh snapshot of `R`'s collection.
    pub fn list<R: Entity>(&self, params: &QueryParams) -> Result<QueryResult<R>> {
        let collection: Vec<R> = self.storage.fetch_collection()?;
        Ok(ListQueryEngine::for_listing::<R>()
            .query(&collection, params)
            .cloned())
    }

    /// Distinct values currently present for one of `R`'s facets.
    pub fn facet_options<R: Entity>(&self, name: &str) -> Result<Vec<String>> {
        let collection: Vec<R> = self.storage.fetch_collection()?;
        Ok(query::facet_options(&collection, name))
    }

    /// Runs a list query over the admin log.
    pub fn admin_log(&self, params: &QueryParams) -> Result<QueryResult<AdminLog>> {
        let entries = self.storage.load_admin_logs()?;
        Ok(ListQueryEngine::for_listing::<AdminLog>()
            .query(&entries, params)
            .cloned())
    }

    // ── Transitions ──

    /// Moves record `id` to `target`.
    pub fn transition<R: Workflow>(&self, id: &str, target: R::Status) -> Result<Transitioned<R>> {
        self.transition_unless(id, target, &AtomicBool::new(false))
    }

    /// Moves record `id` to `target` unless `cancel` is set before the write.
    ///
    /// The write succeeds only if nobody else changed the record since it
    /// was read, so concurrent admins cannot both act on the same state.
    /// After the write, `cancel` is ignored and the audit entry is attempted.
    pub fn transition_unless<R: Workflow>(
        &self,
        id: &str,
        target: R::Status,
        cancel: &AtomicBool,
    ) -> Result<Transitioned<R>> {
        let current: R = self.storage.fetch(id)?;
        let version = current.timestamps().updated_at;

        let outcome = lifecycle::transition(
            &current,
            target,
            Timestamp::now(),
            self.recorder,
            &self.admin_id,
            |updated: &R| {
                if cancel.load(Ordering::Acquire) {
                    return Err(ConsoleError::Cancelled {
                        kind: R::KIND,
                        id: id.to_string(),
                    });
                }
                self.storage.replace(updated, version)?;
                Ok(())
            },
        )?;

        info!(
            kind = %R::KIND,
            id,
            from = %outcome.from,
            to = %target,
            admin = %self.admin_id,
            "status changed"
        );
        if let Err(e) = &outcome.audit {
            warn!(
                kind = %R::KIND,
                id,
                error = %e,
                "status changed but audit entry was not written"
            );
        }
        Ok(outcome)
    }

    // ── Creation ──

    /// Records a new pending payment.
    ///
    /// Fails with [`StorageError::DuplicateKey`] before anything is written
    /// if the reference number is already taken.
    pub fn create_payment(&self, new: NewPayment) -> Result<Created<Payment>> {
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id,
            amount: new.amount,
            method: new.method,
            reference_number: new.reference_number.unwrap_or_else(generate_reference),
            status: PaymentStatus::Pending,
            timestamps: Timestamps::new(Timestamp::now()),
        };
        self.storage.insert(&payment)?;

        info!(id = %payment.id, reference = %payment.reference_number, "payment created");
        let audit = self.audit(
            AuditDraft::new(&self.admin_id, "payment.created").details(format!(
                "{} {} via {}",
                payment.reference_number, payment.amount, payment.method
            )),
        );
        Ok(Created {
            record: payment,
            audit,
        })
    }

    /// Adds a drone to the fleet as `Active`.
    ///
    /// Fails with [`StorageError::DuplicateKey`] if the serial is taken.
    pub fn register_drone(&self, new: NewDrone) -> Result<Created<Drone>> {
        let now = Timestamp::now();
        let drone = Drone {
            id: format!("DRN-{}", short_id()),
            name: new.name,
            model: new.model,
            serial_number: new.serial_number,
            battery_health: new.battery_health,
            load_capacity: new.load_capacity,
            last_maintenance: None,
            registered_on: today(now),
            status: DroneStatus::Active,
            timestamps: Timestamps::new(now),
        };
        self.storage.insert(&drone)?;

        info!(id = %drone.id, serial = %drone.serial_number, "drone registered");
        let audit = self.audit(
            AuditDraft::new(&self.admin_id, "drone.registered")
                .details(format!("{} ({})", drone.serial_number, drone.model)),
        );
        Ok(Created {
            record: drone,
            audit,
        })
    }

    /// Loads every collection in `source` whose table is still empty.
    pub fn seed(&self, source: &MemorySource) -> Result<SeedReport> {
        let report = SeedReport {
            appointments: self.seed_collection::<Appointment>(source)?,
            services: self.seed_collection::<ServiceListing>(source)?,
            products: self.seed_collection::<Product>(source)?,
            orders: self.seed_collection::<Order>(source)?,
            drones: self.seed_collection::<Drone>(source)?,
        };
        if report.total() > 0 {
            info!(total = report.total(), "seeded fixture data");
            self.audit(
                AuditDraft::new(&self.admin_id, "fixtures.seeded")
                    .details(format!("{} records", report.total())),
            )
            .ok();
        }
        Ok(report)
    }

    fn seed_collection<R: Entity>(&self, source: &MemorySource) -> Result<usize> {
        if self.storage.count::<R>()? > 0 {
            return Ok(0);
        }
        let records: Vec<R> = source.fetch_collection()?;
        self.storage.insert_all(&records)?;
        Ok(records.len())
    }

    fn audit(&self, draft: AuditDraft) -> core::result::Result<AdminLog, AuditError> {
        let result = self.recorder.append(draft);
        if let Err(e) = &result {
            warn!(error = %e, "audit entry was not written");
        }
        result
    }
}

/// A fresh payment reference: `PAY-` and twelve uppercase hex digits.
fn generate_reference() -> String {
    format!("PAY-{}", short_id())
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_uppercase()
}

fn today(now: Timestamp) -> Date {
    now.to_zoned(jiff::tz::TimeZone::UTC).date()
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::fixtures;
    use crate::lifecycle::Status;
    use crate::model::*;

    struct BrokenRecorder;

    impl AuditRecorder for BrokenRecorder {
        fn append(&self, _draft: AuditDraft) -> core::result::Result<AdminLog, AuditError> {
            Err(AuditError::WriteFailed("sink offline".into()))
        }
    }

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("opsdesk")).unwrap();
        (dir, storage)
    }

    fn seeded() -> (TempDir, Storage) {
        let (dir, storage) = test_storage();
        Console::new(&storage, "admin-01")
            .seed(&fixtures::source().unwrap())
            .unwrap();
        (dir, storage)
    }

    fn status_changes(storage: &Storage) -> Vec<AdminLog> {
        storage
            .load_admin_logs()
            .unwrap()
            .into_iter()
            .filter(|e| e.action.ends_with(".status_changed"))
            .collect()
    }

    fn new_payment(reference: Option<&str>) -> NewPayment {
        NewPayment {
            user_id: "USR-001".into(),
            amount: Amount::from_pesos(2500),
            method: PaymentMethod::GCash,
            reference_number: reference.map(String::from),
        }
    }

    #[test]
    fn seed_fills_empty_store_once() {
        let (_dir, storage) = test_storage();
        let console = Console::new(&storage, "admin-01");
        let source = fixtures::source().unwrap();

        let first = console.seed(&source).unwrap();
        let second = console.seed(&source).unwrap();

        assert_eq!(first.appointments, 10);
        assert_eq!(first.drones, 8);
        assert_eq!(first.total(), 48);
        assert_eq!(second, SeedReport::default());
    }

    #[test]
    fn list_searches_stored_snapshot() {
        let (_dir, storage) = seeded();
        let console = Console::new(&storage, "admin-01");

        let result: QueryResult<Appointment> =
            console.list(&QueryParams::default().search("Smith")).unwrap();

        assert_eq!(result.total_matches, 2);
        assert!(
            result
                .page
                .items
                .iter()
                .all(|a| a.customer_name == "John Smith")
        );
    }

    #[test]
    fn pending_order_to_processing_is_persisted_and_audited() {
        let (_dir, storage) = seeded();
        let console = Console::new(&storage, "admin-01");
        let before: Order = storage.fetch("ORD-2024-004").unwrap();

        let done = console
            .transition::<Order>("ORD-2024-004", OrderStatus::Processing)
            .unwrap();

        assert!(done.audit_confirmed());
        assert!(done.record.timestamps.updated_at > before.timestamps.updated_at);
        let stored: Order = storage.fetch("ORD-2024-004").unwrap();
        assert_eq!(stored, done.record);

        let changes = status_changes(&storage);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].action, "order.status_changed");
        assert_eq!(changes[0].details.as_deref(), Some("pending -> processing"));
        assert_eq!(changes[0].admin_id, "admin-01");
    }

    #[test]
    fn illegal_transition_changes_nothing() {
        let (_dir, storage) = seeded();
        let console = Console::new(&storage, "admin-01");
        let before: Drone = storage.fetch("DRN-003").unwrap();
        assert_eq!(before.status, DroneStatus::Maintenance);

        let err = console
            .transition::<Drone>("DRN-003", DroneStatus::Delivering)
            .unwrap_err();

        assert!(matches!(
            err,
            ConsoleError::Transition(TransitionError::InvalidTransition { .. })
        ));
        assert_eq!(storage.fetch::<Drone>("DRN-003").unwrap(), before);
        assert!(status_changes(&storage).is_empty());
    }

    #[test]
    fn terminal_record_is_left_alone() {
        let (_dir, storage) = seeded();
        let console = Console::new(&storage, "admin-01");

        let err = console
            .transition::<Appointment>("APT-004", AppointmentStatus::Cancelled)
            .unwrap_err();

        assert!(matches!(
            err,
            ConsoleError::Transition(TransitionError::TerminalStateViolation { .. })
        ));
    }

    #[test]
    fn second_admin_sees_first_admins_change() {
        let (_dir, storage) = seeded();
        let alice = Console::new(&storage, "alice");
        let bob = Console::new(&storage, "bob");

        alice
            .transition::<Appointment>("APT-003", AppointmentStatus::Confirmed)
            .unwrap();
        let err = bob
            .transition::<Appointment>("APT-003", AppointmentStatus::Confirmed)
            .unwrap_err();

        assert!(matches!(
            err,
            ConsoleError::Transition(TransitionError::InvalidTransition { .. })
        ));
        assert_eq!(status_changes(&storage).len(), 1);
    }

    #[test]
    fn cancelled_transition_writes_nothing() {
        let (_dir, storage) = seeded();
        let console = Console::new(&storage, "admin-01");

        let err = console
            .transition_unless::<Order>(
                "ORD-2024-004",
                OrderStatus::Processing,
                &AtomicBool::new(true),
            )
            .unwrap_err();

        assert!(matches!(err, ConsoleError::Cancelled { .. }));
        let stored: Order = storage.fetch("ORD-2024-004").unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert!(status_changes(&storage).is_empty());
    }

    #[test]
    fn audit_failure_keeps_transition() {
        let (_dir, storage) = seeded();
        let console = Console::with_recorder(&storage, &BrokenRecorder, "admin-01");

        let done = console
            .transition::<Drone>("DRN-002", DroneStatus::Delivering)
            .unwrap();

        assert!(!done.audit_confirmed());
        let stored: Drone = storage.fetch("DRN-002").unwrap();
        assert_eq!(stored.status, DroneStatus::Delivering);
    }

    #[test]
    fn drone_cycles_without_end() {
        let (_dir, storage) = seeded();
        let console = Console::new(&storage, "admin-01");

        for target in [
            DroneStatus::Delivering,
            DroneStatus::Active,
            DroneStatus::Maintenance,
            DroneStatus::Active,
            DroneStatus::Inactive,
            DroneStatus::Active,
        ] {
            console.transition::<Drone>("DRN-002", target).unwrap();
        }
        let stored: Drone = storage.fetch("DRN-002").unwrap();
        assert_eq!(stored.status, DroneStatus::Active);
        assert!(!stored.status.is_terminal());
    }

    #[test]
    fn unknown_record_is_not_found() {
        let (_dir, storage) = seeded();
        let console = Console::new(&storage, "admin-01");

        let err = console
            .transition::<Payment>("missing", PaymentStatus::Paid)
            .unwrap_err();

        assert!(matches!(
            err,
            ConsoleError::Storage(StorageError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn duplicate_payment_reference_rejected() {
        let (_dir, storage) = test_storage();
        let console = Console::new(&storage, "admin-01");

        let first = console.create_payment(new_payment(Some("PAY-777"))).unwrap();
        let err = console
            .create_payment(new_payment(Some("PAY-777")))
            .unwrap_err();

        assert!(matches!(
            err,
            ConsoleError::Storage(StorageError::DuplicateKey { .. })
        ));
        let stored: Payment = storage.fetch(&first.record.id).unwrap();
        assert_eq!(stored.status, PaymentStatus::Pending);
        assert_eq!(storage.count::<Payment>().unwrap(), 1);
        assert_eq!(storage.load_admin_logs().unwrap().len(), 1);
    }

    #[test]
    fn generated_references_are_well_formed() {
        let (_dir, storage) = test_storage();
        let console = Console::new(&storage, "admin-01");

        let a = console.create_payment(new_payment(None)).unwrap().record;
        let b = console.create_payment(new_payment(None)).unwrap().record;

        assert!(a.reference_number.starts_with("PAY-"));
        assert_eq!(a.reference_number.len(), 16);
        assert_ne!(a.reference_number, b.reference_number);
    }

    #[test]
    fn payment_settles_once() {
        let (_dir, storage) = test_storage();
        let console = Console::new(&storage, "admin-01");
        let id = console.create_payment(new_payment(None)).unwrap().record.id;

        console
            .transition::<Payment>(&id, PaymentStatus::Paid)
            .unwrap();
        let err = console
            .transition::<Payment>(&id, PaymentStatus::Failed)
            .unwrap_err();

        assert!(matches!(
            err,
            ConsoleError::Transition(TransitionError::TerminalStateViolation { .. })
        ));
    }

    #[test]
    fn register_drone_enforces_unique_serial() {
        let (_dir, storage) = seeded();
        let console = Console::new(&storage, "admin-01");
        let new = NewDrone {
            name: "Night Owl".into(),
            model: "DC-700".into(),
            serial_number: "SN-009".into(),
            load_capacity: 4.0,
            battery_health: BatteryHealth::FULL,
        };

        let created = console.register_drone(new.clone()).unwrap();
        assert_eq!(created.record.status, DroneStatus::Active);
        assert!(created.audit.is_ok());

        let err = console.register_drone(new).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::Storage(StorageError::DuplicateKey { .. })
        ));
        assert_eq!(storage.count::<Drone>().unwrap(), 9);
    }

    #[test]
    fn admin_log_is_searchable() {
        let (_dir, storage) = seeded();
        let console = Console::new(&storage, "admin-01");
        console
            .transition::<Order>("ORD-2024-003", OrderStatus::ForDelivery)
            .unwrap();

        let result = console
            .admin_log(&QueryParams::default().search("status_changed"))
            .unwrap();

        assert_eq!(result.total_matches, 1);
        assert_eq!(
            result.page.items[0].details.as_deref(),
            Some("processing -> for_delivery")
        );
    }
}
