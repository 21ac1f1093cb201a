//! Host Adapter for the Pool Computation Engine
//!
//! The host passes a CBOR encoded `HostCall` and read access to the ledger
//! as it stood before the group. The engine answers with a verdict; on
//! approval the host stages the returned writes with the rest of the group.

use asaswap_common::{
    errors::AsaswapResult,
    group::HostCall,
    ledger::{GroupProgram, Ledger},
    state::StateWrite,
    events::EventLog,
    wire,
};

use crate::MulDivEngine;

/// Validates one engine invocation.
///
/// # Returns
/// `true` if the invocation is approved, `false` otherwise
pub fn app_contract(ledger: &Ledger, invocation: &[u8]) -> bool {
    evaluate_invocation(ledger, invocation).is_ok()
}

/// Decode and evaluate an invocation, returning the writes to stage
pub fn evaluate_invocation(ledger: &Ledger, invocation: &[u8]) -> AsaswapResult<Vec<StateWrite>> {
    let call: HostCall = wire::decode_call(invocation)?;
    let mut events = EventLog::new();
    MulDivEngine.evaluate(&call.group, call.index, ledger, &mut events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asaswap_common::{
        constants::keys,
        errors::AsaswapError,
        group::TransactionGroup,
        math::itob,
        types::Operation,
    };

    #[test]
    fn test_create_invocation() {
        let group = TransactionGroup::new(vec![Operation::app_call(
            [2u8; 32],
            0,
            vec![itob(10).to_vec()],
            1_000,
        )])
        .unwrap();
        let bytes = wire::encode_call(&HostCall::new(group, 0).unwrap()).unwrap();
        let ledger = Ledger::new();

        assert!(app_contract(&ledger, &bytes));
        assert_eq!(
            evaluate_invocation(&ledger, &bytes).unwrap(),
            vec![StateWrite::uint(keys::GUARD_APP_ID, 10)]
        );
    }

    #[test]
    fn test_malformed_invocation() {
        let ledger = Ledger::new();
        assert!(!app_contract(&ledger, &[0x00]));
        assert_eq!(
            evaluate_invocation(&ledger, b""),
            Err(AsaswapError::MalformedInvocation)
        );
    }
}
