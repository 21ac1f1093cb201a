//! Program Events for asaswap
//!
//! Events are emitted while a group is validated and can be indexed
//! off-chain. Events of a rejected group are discarded; only the
//! rejection itself is recorded.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use crate::group::GroupId;
use crate::types::{Address, AppId};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Computation Engine Events (0x01 - 0x1F)
    GuardInstalled = 0x01,
    OptedIn = 0x02,
    RatioComputed = 0x03,

    // Escrow Events (0x20 - 0x3F)
    EscrowReleased = 0x20,

    // Ledger Events (0x40 - 0x5F)
    GroupCommitted = 0x40,
    GroupRejected = 0x41,
}

/// Main event enum containing all possible program events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum AsaswapEvent {
    // ============ Computation Engine Events ============

    /// Emitted when the engine is created and its guard stored
    GuardInstalled { guard_app_id: AppId },

    /// Emitted when an account opts into the engine
    OptedIn { account: Address, app_id: AppId },

    /// Emitted when a ratio is computed and published
    RatioComputed {
        /// Computation mode discriminant
        mode: u8,
        /// Result slot (1 or 2)
        slot: u8,
        multiplier1: u64,
        multiplier2: u64,
        divisor: u64,
        result: u64,
    },

    // ============ Escrow Events ============

    /// Emitted when the escrow approves a custodial release
    EscrowReleased {
        /// Escrow account
        escrow: Address,
        /// Approved shape discriminant
        shape: u8,
        controller_app_id: AppId,
    },

    // ============ Ledger Events ============

    /// Emitted when every program approved and writes were applied
    GroupCommitted {
        group_id: GroupId,
        size: u8,
        writes: u32,
    },

    /// Emitted when a program rejected the group
    GroupRejected {
        group_id: GroupId,
        /// Error code of the first failing check
        code: Vec<u8>,
    },
}

impl AsaswapEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::GuardInstalled { .. } => EventType::GuardInstalled,
            Self::OptedIn { .. } => EventType::OptedIn,
            Self::RatioComputed { .. } => EventType::RatioComputed,
            Self::EscrowReleased { .. } => EventType::EscrowReleased,
            Self::GroupCommitted { .. } => EventType::GroupCommitted,
            Self::GroupRejected { .. } => EventType::GroupRejected,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting multiple events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<AsaswapEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: AsaswapEvent) {
        self.events.push(event);
    }

    /// Move every event of `other` into this log
    pub fn append(&mut self, other: EventLog) {
        self.events.extend(other.events);
    }

    /// Get all events
    pub fn events(&self) -> &[AsaswapEvent] {
        &self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&AsaswapEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
