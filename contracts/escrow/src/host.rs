//! Host Adapter for the Escrow Validator
//!
//! Bridges the host's byte-level invocation to the validation core. The host
//! runs the escrow program for a custodial transfer and passes the CBOR
//! encoded `HostCall`: the full group plus the position of that transfer.
//!
//! ```text
//! host bytes -> decode_call -> EscrowContext -> validate -> bool
//! ```
//!
//! Any decoding or validation failure yields `false`; the host then rejects
//! the whole group.

use asaswap_common::{errors::AsaswapResult, group::HostCall, wire};

use crate::{validate, EscrowConfig, EscrowContext, EscrowShape};

/// Validates one escrow invocation.
///
/// # Arguments
/// * `config` - Configuration the escrow was deployed with
/// * `invocation` - CBOR encoded `HostCall`
///
/// # Returns
/// `true` if the group is an approved release, `false` otherwise
pub fn app_contract(config: &EscrowConfig, invocation: &[u8]) -> bool {
    validate_invocation(config, invocation).is_ok()
}

/// Decode and validate an invocation, keeping the typed outcome
pub fn validate_invocation(config: &EscrowConfig, invocation: &[u8]) -> AsaswapResult<EscrowShape> {
    let call: HostCall = wire::decode_call(invocation)?;
    let escrow = call.current()?.sender;
    let mut ctx = EscrowContext::new(config, &call.group, escrow);
    validate(&mut ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asaswap_common::{
        errors::AsaswapError,
        group::TransactionGroup,
        types::{Address, Operation},
    };

    const USER: Address = [2u8; 32];

    fn opt_in_call(controller: u64) -> Vec<u8> {
        let escrow = EscrowConfig::default().program_address();
        let group = TransactionGroup::new(vec![
            Operation::app_call(USER, controller, vec![b"E".to_vec()], 1_000),
            Operation::asset_transfer(escrow, escrow, 7, 0, 1_000),
        ])
        .unwrap();
        wire::encode_call(&HostCall::new(group, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_app_contract_verdicts() {
        let config = EscrowConfig::default();
        assert!(app_contract(&config, &opt_in_call(123)));
        assert!(!app_contract(&config, &opt_in_call(124)));
    }

    #[test]
    fn test_malformed_invocation_rejected() {
        let config = EscrowConfig::default();
        assert!(!app_contract(&config, b"not cbor"));
        assert_eq!(
            validate_invocation(&config, &[]),
            Err(AsaswapError::MalformedInvocation)
        );
    }
}
