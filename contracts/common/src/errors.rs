//! Error Types for asaswap Programs
//!
//! Every failed check maps to one typed error. The ledger only ever sees
//! approve/reject, but the typed error is kept for logging and tests.

use crate::types::{AppId, TxnType};

/// Result type alias for asaswap operations
pub type AsaswapResult<T> = Result<T, AsaswapError>;

/// Main error enum for all asaswap program errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsaswapError {
    // ============ Group Shape Errors ============
    /// Group size outside the ledger limits
    InvalidGroupSize { size: usize },

    /// No approved shape exists for a group of this size
    UnsupportedGroupShape { size: usize },

    /// Referenced group position does not exist
    IndexOutOfRange { index: usize, size: usize },

    /// Operation at a position has the wrong type
    WrongOperationType {
        index: usize,
        expected: TxnType,
        actual: TxnType,
    },

    // ============ Custody Errors ============
    /// Operation would close its account to another address
    CloseRemainderSet { index: usize },

    /// Operation would rekey its account
    RekeySet { index: usize },

    /// Transfer amount must be positive
    ZeroAmount { index: usize },

    /// Transfer amount must be zero
    NonZeroAmount { index: usize, amount: u64 },

    /// Withdrawal moves nothing out of the escrow
    NothingWithdrawn,

    /// Fee payment sender differs from the application caller
    SenderMismatch { index: usize },

    /// Fee payment does not cover the custodial fees
    InsufficientFeeCoverage { paid: u64, required: u64 },

    // ============ Application Call Errors ============
    /// Call targets the wrong application
    WrongApplication {
        index: usize,
        expected: AppId,
        actual: AppId,
    },

    /// Operation tag in argument 0 does not match
    WrongTag { index: usize, expected: &'static [u8] },

    /// Application argument is missing
    MissingArgument { index: usize, arg: usize },

    /// Integer argument is wider than 8 bytes
    InvalidInteger { len: usize },

    // ============ Computation Engine Errors ============
    /// Caller at position 0 is not the stored guard
    GuardMismatch { expected: AppId, actual: AppId },

    /// Guard id was never stored
    GuardNotInstalled,

    /// Result destination is not one of the two result slots
    InvalidResultSlot,

    /// Unknown computation mode tag
    UnknownMode,

    /// Computation call names no foreign application
    MissingForeignApp,

    /// Persisted value is missing or has the wrong type
    StateNotFound { key: &'static [u8] },

    /// Application has no state on the ledger
    UnknownApplication { app_id: AppId },

    /// Application id already holds state
    AppAlreadyInstalled { app_id: AppId },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Division by zero
    DivisionByZero,

    // ============ Host Errors ============
    /// Invocation bytes could not be decoded
    MalformedInvocation,
}

impl AsaswapError {
    /// Returns a human-readable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidGroupSize { .. } => "E001_INVALID_GROUP_SIZE",
            Self::UnsupportedGroupShape { .. } => "E002_UNSUPPORTED_SHAPE",
            Self::IndexOutOfRange { .. } => "E003_INDEX_OUT_OF_RANGE",
            Self::WrongOperationType { .. } => "E004_WRONG_TXN_TYPE",
            Self::CloseRemainderSet { .. } => "E010_CLOSE_REMAINDER_SET",
            Self::RekeySet { .. } => "E011_REKEY_SET",
            Self::ZeroAmount { .. } => "E012_ZERO_AMOUNT",
            Self::NonZeroAmount { .. } => "E013_NON_ZERO_AMOUNT",
            Self::NothingWithdrawn => "E014_NOTHING_WITHDRAWN",
            Self::SenderMismatch { .. } => "E015_SENDER_MISMATCH",
            Self::InsufficientFeeCoverage { .. } => "E016_FEE_NOT_COVERED",
            Self::WrongApplication { .. } => "E020_WRONG_APPLICATION",
            Self::WrongTag { .. } => "E021_WRONG_TAG",
            Self::MissingArgument { .. } => "E022_MISSING_ARGUMENT",
            Self::InvalidInteger { .. } => "E023_INVALID_INTEGER",
            Self::GuardMismatch { .. } => "E030_GUARD_MISMATCH",
            Self::GuardNotInstalled => "E031_GUARD_NOT_INSTALLED",
            Self::InvalidResultSlot => "E032_INVALID_RESULT_SLOT",
            Self::UnknownMode => "E033_UNKNOWN_MODE",
            Self::MissingForeignApp => "E034_MISSING_FOREIGN_APP",
            Self::StateNotFound { .. } => "E035_STATE_NOT_FOUND",
            Self::UnknownApplication { .. } => "E036_UNKNOWN_APPLICATION",
            Self::AppAlreadyInstalled { .. } => "E037_APP_ALREADY_INSTALLED",
            Self::Overflow => "E080_OVERFLOW",
            Self::DivisionByZero => "E082_DIV_ZERO",
            Self::MalformedInvocation => "E090_MALFORMED_INVOCATION",
        }
    }

    /// Returns true for arithmetic faults
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Overflow | Self::DivisionByZero)
    }
}
