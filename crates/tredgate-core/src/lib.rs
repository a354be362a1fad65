//! Tredgate Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `LoanApplication`, `AuditEntry`, `LoanSummary`
//! - **Business rules** - `DecisionRule` (auto-approval thresholds) and the
//!   monthly payment formula
//! - **Port definitions** - `IKeyValueStore`, the persistence substrate both
//!   stores are built on
//! - **Persistence helpers** - `JsonCollection`, whole-collection JSON
//!   read/write over a single key
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates (`tredgate-storage`)
//! implement. The stores (`tredgate-audit`, `tredgate-loans`) orchestrate
//! domain entities through those ports.

pub mod config;
pub mod domain;
pub mod persistence;
pub mod ports;
