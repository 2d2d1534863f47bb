//! Status machines for workflow entities.
//!
//! Each workflow entity's status enum implements [`Status`], declaring its
//! legal `(from, to)` pairs and its terminal states. A transition is valid
//! only if its pair is listed; nothing leaves a terminal state.
//!
//! [`apply`] is the pure half: it validates and returns the updated record
//! without touching storage. [`transition`] additionally reports the
//! change to an [`AuditRecorder`] after the new record exists.

use std::fmt;

use jiff::Timestamp;

use crate::audit::{AuditDraft, AuditError, AuditRecorder};
use crate::model::{AdminLog, Entity, EntityKind};

/// Errors from validating a status transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("{entity} cannot move from {from} to {to}")]
    InvalidTransition {
        entity: EntityKind,
        from: &'static str,
        to: &'static str,
    },

    #[error("{entity} is {status}, which is final")]
    TerminalStateViolation {
        entity: EntityKind,
        status: &'static str,
    },

    #[error("unknown {entity} status '{status}'")]
    UnknownStatus { entity: EntityKind, status: String },
}

pub type Result<T> = core::result::Result<T, TransitionError>;

/// A closed status enum with its transition table.
pub trait Status: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    const ALL: &'static [Self];

    /// Every legal `(from, to)` pair.
    const TRANSITIONS: &'static [(Self, Self)];

    /// States with no way out.
    const TERMINAL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }

    fn can_transition_to(self, target: Self) -> bool {
        Self::TRANSITIONS.contains(&(self, target))
    }

    /// Statuses reachable from `self` in one step.
    fn successors(self) -> impl Iterator<Item = Self> {
        Self::TRANSITIONS
            .iter()
            .filter(move |(from, _)| *from == self)
            .map(|(_, to)| *to)
    }

    /// Parses the persisted/displayed form, e.g. `for_delivery` or `Pending`.
    fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }
}

/// An entity governed by a status machine.
pub trait Workflow: Entity {
    type Status: Status;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    fn timestamps_mut(&mut self) -> &mut crate::model::Timestamps;
}

/// Parses a status name for entity `R`.
pub fn parse_status<R: Workflow>(s: &str) -> Result<R::Status> {
    R::Status::parse(s).ok_or_else(|| TransitionError::UnknownStatus {
        entity: R::KIND,
        status: s.to_string(),
    })
}

/// Checks that `from -> to` is allowed for entity `R`.
pub fn validate<R: Workflow>(from: R::Status, to: R::Status) -> Result<()> {
    if from.is_terminal() {
        return Err(TransitionError::TerminalStateViolation {
            entity: R::KIND,
            status: from.as_str(),
        });
    }
    if !from.can_transition_to(to) {
        return Err(TransitionError::InvalidTransition {
            entity: R::KIND,
            from: from.as_str(),
            to: to.as_str(),
        });
    }
    Ok(())
}

/// Returns `record` moved to `target`, with `updated_at` refreshed to `now`.
///
/// The input record is left untouched on every path.
pub fn apply<R: Workflow>(record: &R, target: R::Status, now: Timestamp) -> Result<R> {
    validate::<R>(record.status(), target)?;
    let mut updated = record.clone();
    updated.set_status(target);
    updated.timestamps_mut().touch(now);
    Ok(updated)
}

/// The audit entry describing a status change: `<kind>.status_changed`
/// with details `<old> -> <new>`.
pub fn status_changed<S: Status>(kind: EntityKind, admin_id: &str, from: S, to: S) -> AuditDraft {
    AuditDraft::new(admin_id, format!("{kind}.status_changed")).details(format!("{from} -> {to}"))
}

/// A transition that has been applied.
///
/// `audit` reports whether the audit entry was written; a failure there
/// does not undo the transition.
#[derive(Debug)]
pub struct Transitioned<R: Workflow> {
    pub record: R,
    pub from: R::Status,
    pub audit: core::result::Result<AdminLog, AuditError>,
}

impl<R: Workflow> Transitioned<R> {
    pub fn audit_confirmed(&self) -> bool {
        self.audit.is_ok()
    }
}

/// Applies a transition, commits it, then reports it to `recorder`.
///
/// `commit` persists the updated record (or does nothing for an in-memory
/// snapshot). An error from `commit` aborts the transition before any audit
/// entry is written. Once `commit` succeeds the transition is applied; an
/// audit failure is returned inside the outcome rather than as an error.
pub fn transition<R, E>(
    record: &R,
    target: R::Status,
    now: Timestamp,
    recorder: &dyn AuditRecorder,
    admin_id: &str,
    commit: impl FnOnce(&R) -> core::result::Result<(), E>,
) -> core::result::Result<Transitioned<R>, E>
where
    R: Workflow,
    E: From<TransitionError>,
{
    let updated = apply(record, target, now)?;
    commit(&updated)?;
    let from = record.status();
    let audit = recorder.append(status_changed(R::KIND, admin_id, from, target));
    Ok(Transitioned {
        record: updated,
        from,
        audit,
    })
}
