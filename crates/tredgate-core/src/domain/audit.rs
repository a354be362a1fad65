//! Audit entry domain entities
//!
//! This module defines the audit types recording what happened to which loan
//! and when. The status fields an entry carries depend on its action, so the
//! action and its status payload are modeled together as [`AuditEvent`]:
//!
//! | action           | previousStatus | newStatus |
//! |------------------|----------------|-----------|
//! | `loan_created`   | -              | yes       |
//! | `status_changed` | yes            | yes       |
//! | `auto_decided`   | yes            | yes       |
//!
//! On the wire the event is flattened into the entry, giving records such as
//! `{"id": .., "timestamp": .., "loanId": .., "action": "status_changed",
//! "previousStatus": "pending", "newStatus": "approved"}`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::loan::LoanStatus;
use super::newtypes::{AuditEntryId, LoanId};

/// Kinds of actions that can be recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A loan application was created
    LoanCreated,
    /// A loan's status was set explicitly
    StatusChanged,
    /// A loan's status was set by the decision rule
    AutoDecided,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::LoanCreated => "loan_created",
            AuditAction::StatusChanged => "status_changed",
            AuditAction::AutoDecided => "auto_decided",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "loan_created" => Ok(AuditAction::LoanCreated),
            "status_changed" => Ok(AuditAction::StatusChanged),
            "auto_decided" => Ok(AuditAction::AutoDecided),
            other => Err(DomainError::InvalidAction(other.to_string())),
        }
    }
}

/// An audited event together with the statuses it involves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A loan was created in `new_status` (always pending)
    LoanCreated {
        #[serde(rename = "newStatus")]
        new_status: LoanStatus,
    },
    /// A status was set explicitly
    StatusChanged {
        #[serde(rename = "previousStatus")]
        previous_status: LoanStatus,
        #[serde(rename = "newStatus")]
        new_status: LoanStatus,
    },
    /// A status was set by the decision rule
    AutoDecided {
        #[serde(rename = "previousStatus")]
        previous_status: LoanStatus,
        #[serde(rename = "newStatus")]
        new_status: LoanStatus,
    },
}

impl AuditEvent {
    /// Returns the action kind of this event
    pub fn action(&self) -> AuditAction {
        match self {
            AuditEvent::LoanCreated { .. } => AuditAction::LoanCreated,
            AuditEvent::StatusChanged { .. } => AuditAction::StatusChanged,
            AuditEvent::AutoDecided { .. } => AuditAction::AutoDecided,
        }
    }

    /// Status before the event, if the event carries one
    pub fn previous_status(&self) -> Option<LoanStatus> {
        match self {
            AuditEvent::LoanCreated { .. } => None,
            AuditEvent::StatusChanged {
                previous_status, ..
            }
            | AuditEvent::AutoDecided {
                previous_status, ..
            } => Some(*previous_status),
        }
    }

    /// Status after the event
    pub fn new_status(&self) -> LoanStatus {
        match self {
            AuditEvent::LoanCreated { new_status }
            | AuditEvent::StatusChanged { new_status, .. }
            | AuditEvent::AutoDecided { new_status, .. } => *new_status,
        }
    }
}

/// Input for a new audit entry; the log assigns `id` and `timestamp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub loan_id: LoanId,
    pub event: AuditEvent,
    pub details: Option<String>,
}

impl NewAuditEntry {
    pub fn new(loan_id: LoanId, event: AuditEvent) -> Self {
        Self {
            loan_id,
            event,
            details: None,
        }
    }

    /// Loan created in the pending state
    pub fn loan_created(loan_id: LoanId) -> Self {
        Self::new(
            loan_id,
            AuditEvent::LoanCreated {
                new_status: LoanStatus::Pending,
            },
        )
    }

    /// Explicit status change
    pub fn status_changed(loan_id: LoanId, previous_status: LoanStatus, new_status: LoanStatus) -> Self {
        Self::new(
            loan_id,
            AuditEvent::StatusChanged {
                previous_status,
                new_status,
            },
        )
    }

    /// Status change made by the decision rule
    pub fn auto_decided(loan_id: LoanId, previous_status: LoanStatus, new_status: LoanStatus) -> Self {
        Self::new(
            loan_id,
            AuditEvent::AutoDecided {
                previous_status,
                new_status,
            },
        )
    }

    /// Attaches a free-text description
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// An audit log entry recording one loan operation
///
/// Entries are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    id: AuditEntryId,
    timestamp: DateTime<Utc>,
    loan_id: LoanId,
    #[serde(flatten)]
    event: AuditEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AuditEntry {
    /// Creates an entry from its input, assigning a fresh ID and the current time
    ///
    /// # Example
    ///
    /// ```
    /// use tredgate_core::domain::audit::{AuditAction, AuditEntry, NewAuditEntry};
    /// use tredgate_core::domain::{LoanId, LoanStatus};
    ///
    /// let entry = AuditEntry::new(NewAuditEntry::loan_created(LoanId::new()));
    /// assert_eq!(entry.action(), AuditAction::LoanCreated);
    /// assert_eq!(entry.new_status(), LoanStatus::Pending);
    /// assert!(entry.previous_status().is_none());
    /// ```
    pub fn new(input: NewAuditEntry) -> Self {
        Self {
            id: AuditEntryId::new(),
            timestamp: Utc::now(),
            loan_id: input.loan_id,
            event: input.event,
            details: input.details,
        }
    }

    pub fn id(&self) -> &AuditEntryId {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the ID of the loan this entry refers to
    pub fn loan_id(&self) -> &LoanId {
        &self.loan_id
    }

    pub fn event(&self) -> &AuditEvent {
        &self.event
    }

    pub fn action(&self) -> AuditAction {
        self.event.action()
    }

    pub fn previous_status(&self) -> Option<LoanStatus> {
        self.event.previous_status()
    }

    pub fn new_status(&self) -> LoanStatus {
        self.event.new_status()
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}
