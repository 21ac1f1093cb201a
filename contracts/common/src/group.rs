//! Transaction Groups
//!
//! An ordered, fixed-index bundle of operations that the ledger commits
//! atomically. Position matters: each index has an expected role.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_256};

use crate::{
    constants::group::{MAX_GROUP_SIZE, MIN_GROUP_SIZE},
    errors::{AsaswapError, AsaswapResult},
    types::Operation,
    Vec,
};

/// Domain prefix for group identifiers
const GROUP_ID_DOMAIN: &[u8] = b"TG";

/// Identifier committing to every operation of a group
pub type GroupId = [u8; 32];

/// An atomic transaction group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TransactionGroup {
    operations: Vec<Operation>,
}

impl TransactionGroup {
    /// Create a group, enforcing the ledger size limits
    pub fn new(operations: Vec<Operation>) -> AsaswapResult<Self> {
        let group = Self { operations };
        group.check_size()?;
        Ok(group)
    }

    /// Enforce the ledger size limits (used again after decoding)
    pub fn check_size(&self) -> AsaswapResult<()> {
        let size = self.operations.len();
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) {
            return Err(AsaswapError::InvalidGroupSize { size });
        }
        Ok(())
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Always false for a validated group
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operation at `index`
    pub fn get(&self, index: usize) -> AsaswapResult<&Operation> {
        self.operations.get(index).ok_or(AsaswapError::IndexOutOfRange {
            index,
            size: self.operations.len(),
        })
    }

    /// All operations in order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Deterministic group identifier
    pub fn group_id(&self) -> GroupId {
        let mut hasher = Sha512_256::new();
        hasher.update(GROUP_ID_DOMAIN);
        for op in &self.operations {
            // Serializing into a Vec cannot fail
            hasher.update(borsh::to_vec(op).unwrap_or_default());
        }
        let mut id = [0u8; 32];
        id.copy_from_slice(&hasher.finalize());
        id
    }
}

/// A program invocation: the group and the position being validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct HostCall {
    /// Group being judged
    pub group: TransactionGroup,
    /// Position of the operation that invoked the program
    pub index: usize,
}

impl HostCall {
    /// Create an invocation, checking the position exists
    pub fn new(group: TransactionGroup, index: usize) -> AsaswapResult<Self> {
        group.get(index)?;
        Ok(Self { group, index })
    }

    /// The invoking operation
    pub fn current(&self) -> AsaswapResult<&Operation> {
        self.group.get(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pay(amount: u64) -> Operation {
        Operation::payment([1u8; 32], [2u8; 32], amount, 1_000)
    }

    #[test]
    fn test_group_size_limits() {
        assert_eq!(
            TransactionGroup::new(Vec::new()),
            Err(AsaswapError::InvalidGroupSize { size: 0 })
        );
        assert!(TransactionGroup::new(vec![pay(1); 16]).is_ok());
        assert_eq!(
            TransactionGroup::new(vec![pay(1); 17]),
            Err(AsaswapError::InvalidGroupSize { size: 17 })
        );
    }

    #[test]
    fn test_get_out_of_range() {
        let group = TransactionGroup::new(vec![pay(1), pay(2)]).unwrap();
        assert_eq!(group.get(1).unwrap().amount(), 2);
        assert_eq!(
            group.get(2),
            Err(AsaswapError::IndexOutOfRange { index: 2, size: 2 })
        );
    }

    #[test]
    fn test_group_id_commits_to_contents() {
        let a = TransactionGroup::new(vec![pay(1), pay(2)]).unwrap();
        let b = TransactionGroup::new(vec![pay(1), pay(2)]).unwrap();
        let c = TransactionGroup::new(vec![pay(2), pay(1)]).unwrap();

        assert_eq!(a.group_id(), b.group_id());
        assert_ne!(a.group_id(), c.group_id());
    }

    #[test]
    fn test_host_call_checks_index() {
        let group = TransactionGroup::new(vec![pay(1)]).unwrap();
        assert!(HostCall::new(group.clone(), 0).is_ok());
        assert!(HostCall::new(group, 1).is_err());
    }
}
