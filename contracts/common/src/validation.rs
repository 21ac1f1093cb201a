//! Validation Helpers for asaswap Programs
//!
//! Reusable checks over group positions. Each helper names the position it
//! inspects so a rejection points at the offending operation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use asaswap_common::validation::{check, require_no_redirect};
//!
//! check!(group.len() == 2, AsaswapError::UnsupportedGroupShape { size: group.len() });
//! require_no_redirect(group.get(1)?, 1)?;
//! ```

use crate::{
    errors::{AsaswapError, AsaswapResult},
    math::safe_add,
    types::{AppId, ApplicationCall, Operation, TxnType, ZERO_ADDRESS},
};

// ============ Validation Macro ============

/// Check a condition and return an error if it fails.
///
/// # Examples
///
/// ```rust,ignore
/// check!(amount > 0, AsaswapError::ZeroAmount { index: 1 });
/// ```
#[macro_export]
macro_rules! check {
    ($condition:expr, $error:expr) => {
        if !($condition) {
            return Err($error);
        }
    };
}

pub use check;

// ============ Custody Checks ============

/// Require that an operation neither closes nor rekeys its account.
///
/// A non-zero target on either field would hand funds or signing
/// authority to an account outside the approved flow.
pub fn require_no_redirect(op: &Operation, index: usize) -> AsaswapResult<()> {
    check!(
        op.close_remainder_to() == ZERO_ADDRESS,
        AsaswapError::CloseRemainderSet { index }
    );
    check!(op.rekey_to == ZERO_ADDRESS, AsaswapError::RekeySet { index });
    Ok(())
}

/// Require an operation of the given type.
pub fn require_txn_type(op: &Operation, index: usize, expected: TxnType) -> AsaswapResult<()> {
    let actual = op.txn_type();
    check!(
        actual == expected,
        AsaswapError::WrongOperationType { index, expected, actual }
    );
    Ok(())
}

/// Require an operation of one of the given types.
pub fn require_txn_type_in(
    op: &Operation,
    index: usize,
    allowed: &[TxnType],
) -> AsaswapResult<()> {
    let actual = op.txn_type();
    if allowed.contains(&actual) {
        return Ok(());
    }
    Err(AsaswapError::WrongOperationType {
        index,
        expected: allowed.first().copied().unwrap_or(actual),
        actual,
    })
}

/// Require a call to `app_id` whose argument 0 equals `tag`.
pub fn require_app_call<'a>(
    op: &'a Operation,
    index: usize,
    app_id: AppId,
    tag: &'static [u8],
) -> AsaswapResult<&'a ApplicationCall> {
    require_txn_type(op, index, TxnType::ApplicationCall)?;
    let call = op.as_app_call().ok_or(AsaswapError::WrongOperationType {
        index,
        expected: TxnType::ApplicationCall,
        actual: op.txn_type(),
    })?;

    check!(
        call.application_id == app_id,
        AsaswapError::WrongApplication {
            index,
            expected: app_id,
            actual: call.application_id,
        }
    );
    check!(
        op.arg(index, 0)? == tag,
        AsaswapError::WrongTag { index, expected: tag }
    );
    Ok(call)
}

/// Require a strictly positive transfer amount.
pub fn require_positive(amount: u64, index: usize) -> AsaswapResult<()> {
    check!(amount > 0, AsaswapError::ZeroAmount { index });
    Ok(())
}

/// Require two operations signed by the same account.
pub fn require_same_sender(op: &Operation, reference: &Operation, index: usize) -> AsaswapResult<()> {
    check!(op.sender == reference.sender, AsaswapError::SenderMismatch { index });
    Ok(())
}

/// Require `paid` to cover the sum of `fees`.
///
/// A fee sum that overflows 64 bits can never be covered and is rejected.
pub fn require_fee_coverage(paid: u64, fees: &[u64]) -> AsaswapResult<()> {
    let required = fees.iter().try_fold(0u64, |acc, &fee| safe_add(acc, fee))?;
    check!(
        paid >= required,
        AsaswapError::InsufficientFeeCoverage { paid, required }
    );
    Ok(())
}

// ============ Tests ============
