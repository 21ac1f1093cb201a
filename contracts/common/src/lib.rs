//! asaswap Common Library
//!
//! Shared types, constants, and utilities for the asaswap pool programs.
//!
//! ## Execution Model
//!
//! asaswap programs run inside a deterministic ledger VM and judge
//! **atomic transaction groups**:
//! - **Groups, not calls**: every program sees the whole ordered group and
//!   checks the role of each position
//! - **Verdicts, not side effects**: a program approves or rejects; a rejection
//!   by any program rejects the whole group
//! - **Staged writes**: persisted state changes are collected during
//!   validation and committed only when every program approves
//!
//! ## Modules
//!
//! - **Fixed-Point Divider** (`math`): exact `floor(m1 * m2 / d)` over 64-bit
//!   operands using only 64-bit primitives
//! - **Group Model** (`types`, `group`): operations, transaction groups and
//!   the position a program is invoked at
//! - **Persisted State** (`state`): typed global key-value store
//! - **Ledger** (`ledger`): explicit validate-then-commit boundary for groups
//! - **Wire Codec** (`wire`, `std` only): CBOR encoding of host invocations
//! - **Events** (`events`): structured, indexable execution log
//!
//! This crate is `no_std` compatible when built without the `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collections for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, vec::Vec};

pub mod constants;
pub mod errors;
pub mod types;
pub mod group;
pub mod math;
pub mod events;
pub mod validation;
pub mod state;
pub mod ledger;
#[cfg(feature = "std")]
pub mod wire;

#[cfg(test)]
mod integration_tests;

// Re-exports for convenience
pub use errors::*;
pub use types::*;
pub use group::*;
pub use math::*;
pub use events::*;
pub use state::*;
pub use ledger::*;
