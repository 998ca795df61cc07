//! # pcm-core: Foundational Types for Prosecution Case Matching
//!
//! This crate defines the primitives shared by every other crate in the
//! workspace: identifiers for prosecution cases and defendants, the UTC-only
//! `Timestamp`, the two canonical layouts of the Police National Computer
//! identifier, and the case/defendant records that matching reads from.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `ProsecutionCaseId`, `DefendantId`
//!    and `MasterDefendantId` are distinct types. A defendant id cannot be
//!    passed where a case id is expected.
//!
//! 2. **One PNC format model.** `PncFormat` is the only place that knows the
//!    SPI-standard and CJS-standard shapes. Everything that converts between
//!    them goes through `pnc.rs`.
//!
//! 3. **UTC-only timestamps.** `Timestamp` rejects offsets other than `Z`,
//!    including when deserialized from records, and always renders `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pcm-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod case;
pub mod error;
pub mod identity;
pub mod pnc;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use case::{Address, CaseIdentifier, Defendant, PersonDetails, ProsecutionCase};
pub use error::PcmError;
pub use identity::{DefendantId, MasterDefendantId, ProsecutionCaseId};
pub use pnc::PncFormat;
pub use temporal::{format_iso_date, Timestamp, ISO_DATE_FORMAT};
