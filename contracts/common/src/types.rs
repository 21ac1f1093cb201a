//! Core Types for asaswap Programs
//!
//! Ledger operations as seen by a validating program. Field accessors follow
//! ledger semantics: reading a field that does not exist on an operation's
//! type yields the zero value instead of failing.

use crate::errors::{AsaswapError, AsaswapResult};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Type alias for account addresses (32-byte public key)
pub type Address = [u8; 32];

/// Type alias for application identifiers
pub type AppId = u64;

/// Type alias for asset identifiers
pub type AssetId = u64;

/// The zero address; an unset close/rekey target
pub const ZERO_ADDRESS: Address = [0u8; 32];

// ============ Operation Types ============

/// Operation type as reported by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum TxnType {
    Payment = 1,
    AssetTransfer = 4,
    ApplicationCall = 6,
}

/// What an application call does besides running the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum OnCompletion {
    #[default]
    NoOp = 0,
    OptIn = 1,
    CloseOut = 2,
    ClearState = 3,
    UpdateApplication = 4,
    DeleteApplication = 5,
}

/// Application call fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ApplicationCall {
    /// Called application (0 = create a new application)
    pub application_id: AppId,
    /// Completion action
    pub on_completion: OnCompletion,
    /// Ordered byte-string arguments; argument 0 is the operation tag
    pub args: Vec<Vec<u8>>,
    /// Foreign applications whose state the call may read
    pub foreign_apps: Vec<AppId>,
}

/// Asset transfer fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AssetTransfer {
    /// Transferred asset
    pub asset_id: AssetId,
    /// Amount in asset base units
    pub asset_amount: u64,
    /// Receiving account
    pub receiver: Address,
    /// Account that receives the remaining holding on close
    pub close_remainder_to: Address,
}

/// Native currency payment fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Payment {
    /// Amount in native base units
    pub amount: u64,
    /// Receiving account
    pub receiver: Address,
    /// Account that receives the remaining balance on close
    pub close_remainder_to: Address,
}

/// Type-specific part of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum OperationKind {
    ApplicationCall(ApplicationCall),
    AssetTransfer(AssetTransfer),
    Payment(Payment),
}

/// One ledger operation inside a transaction group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Operation {
    /// Signing account
    pub sender: Address,
    /// Network fee paid by the sender
    pub fee: u64,
    /// New authorized signer for the sender account (zero = unchanged)
    pub rekey_to: Address,
    /// Type-specific fields
    pub kind: OperationKind,
}

impl Operation {
    /// Create a payment
    pub fn payment(sender: Address, receiver: Address, amount: u64, fee: u64) -> Self {
        Self {
            sender,
            fee,
            rekey_to: ZERO_ADDRESS,
            kind: OperationKind::Payment(Payment {
                amount,
                receiver,
                close_remainder_to: ZERO_ADDRESS,
            }),
        }
    }

    /// Create an asset transfer
    pub fn asset_transfer(
        sender: Address,
        receiver: Address,
        asset_id: AssetId,
        asset_amount: u64,
        fee: u64,
    ) -> Self {
        Self {
            sender,
            fee,
            rekey_to: ZERO_ADDRESS,
            kind: OperationKind::AssetTransfer(AssetTransfer {
                asset_id,
                asset_amount,
                receiver,
                close_remainder_to: ZERO_ADDRESS,
            }),
        }
    }

    /// Create a NoOp application call
    pub fn app_call(sender: Address, application_id: AppId, args: Vec<Vec<u8>>, fee: u64) -> Self {
        Self {
            sender,
            fee,
            rekey_to: ZERO_ADDRESS,
            kind: OperationKind::ApplicationCall(ApplicationCall {
                application_id,
                on_completion: OnCompletion::NoOp,
                args,
                foreign_apps: Vec::new(),
            }),
        }
    }

    /// Set the rekey target
    pub fn with_rekey_to(mut self, rekey_to: Address) -> Self {
        self.rekey_to = rekey_to;
        self
    }

    /// Set the close target (no effect on application calls)
    pub fn with_close_remainder_to(mut self, close_to: Address) -> Self {
        match &mut self.kind {
            OperationKind::AssetTransfer(axfer) => axfer.close_remainder_to = close_to,
            OperationKind::Payment(pay) => pay.close_remainder_to = close_to,
            OperationKind::ApplicationCall(_) => {}
        }
        self
    }

    /// Set the completion action (no effect on transfers)
    pub fn with_on_completion(mut self, on_completion: OnCompletion) -> Self {
        if let OperationKind::ApplicationCall(call) = &mut self.kind {
            call.on_completion = on_completion;
        }
        self
    }

    /// Set the foreign application list (no effect on transfers)
    pub fn with_foreign_apps(mut self, foreign_apps: Vec<AppId>) -> Self {
        if let OperationKind::ApplicationCall(call) = &mut self.kind {
            call.foreign_apps = foreign_apps;
        }
        self
    }

    /// Ledger type of this operation
    pub fn txn_type(&self) -> TxnType {
        match self.kind {
            OperationKind::ApplicationCall(_) => TxnType::ApplicationCall,
            OperationKind::AssetTransfer(_) => TxnType::AssetTransfer,
            OperationKind::Payment(_) => TxnType::Payment,
        }
    }

    /// Payment amount (0 for other types)
    pub fn amount(&self) -> u64 {
        match &self.kind {
            OperationKind::Payment(pay) => pay.amount,
            _ => 0,
        }
    }

    /// Asset amount (0 for other types)
    pub fn asset_amount(&self) -> u64 {
        match &self.kind {
            OperationKind::AssetTransfer(axfer) => axfer.asset_amount,
            _ => 0,
        }
    }

    /// Close target (zero for application calls)
    pub fn close_remainder_to(&self) -> Address {
        match &self.kind {
            OperationKind::AssetTransfer(axfer) => axfer.close_remainder_to,
            OperationKind::Payment(pay) => pay.close_remainder_to,
            OperationKind::ApplicationCall(_) => ZERO_ADDRESS,
        }
    }

    /// Application call fields, if this is an application call
    pub fn as_app_call(&self) -> Option<&ApplicationCall> {
        match &self.kind {
            OperationKind::ApplicationCall(call) => Some(call),
            _ => None,
        }
    }

    /// Called application id (0 for other types)
    pub fn application_id(&self) -> AppId {
        self.as_app_call().map(|call| call.application_id).unwrap_or(0)
    }

    /// Application argument `arg` of the operation at group position `index`
    pub fn arg(&self, index: usize, arg: usize) -> AsaswapResult<&[u8]> {
        self.as_app_call()
            .and_then(|call| call.args.get(arg))
            .map(|bytes| bytes.as_slice())
            .ok_or(AsaswapError::MissingArgument { index, arg })
    }
}
