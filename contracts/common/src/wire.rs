//! Wire Codec
//!
//! CBOR encoding of groups and host invocations, the byte form in which a
//! host hands a group to a program adapter. Decoded values are re-checked
//! against the ledger limits, since deserialization bypasses constructors.

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    errors::{AsaswapError, AsaswapResult},
    group::{HostCall, TransactionGroup},
    Vec,
};

fn to_cbor<T: Serialize>(value: &T) -> AsaswapResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|_| AsaswapError::MalformedInvocation)?;
    Ok(buf)
}

fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> AsaswapResult<T> {
    ciborium::from_reader(bytes).map_err(|_| AsaswapError::MalformedInvocation)
}

/// Encode a group
pub fn encode_group(group: &TransactionGroup) -> AsaswapResult<Vec<u8>> {
    to_cbor(group)
}

/// Decode a group and enforce the size limits
pub fn decode_group(bytes: &[u8]) -> AsaswapResult<TransactionGroup> {
    let group: TransactionGroup = from_cbor(bytes)?;
    group.check_size()?;
    Ok(group)
}

/// Encode a host invocation
pub fn encode_call(call: &HostCall) -> AsaswapResult<Vec<u8>> {
    to_cbor(call)
}

/// Decode a host invocation, checking its group and position
pub fn decode_call(bytes: &[u8]) -> AsaswapResult<HostCall> {
    let call: HostCall = from_cbor(bytes)?;
    call.group.check_size()?;
    call.current()?;
    Ok(call)
}
