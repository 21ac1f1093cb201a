//! Escrow Authorization Validator
//!
//! Stateless gate over the escrow account that custodies pool assets.
//! It approves a release only when the whole group matches one of three
//! known shapes, selected by group size:
//!
//! ```text
//! AssetOptIn (2):        [controller "E", escrow asset transfer of 0]
//! WithdrawLiquidity (3): [controller "X", escrow asset transfer, fee payment]
//! Withdraw (4):          [controller "W", escrow asset transfer,
//!                         escrow payment or asset transfer, fee payment]
//! ```
//!
//! Every custodial transfer must leave `close_remainder_to` and `rekey_to`
//! unset, and the caller pays the escrow's network fees separately.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_256};

pub mod host;

use asaswap_common::{
    check,
    constants::{deployments, escrow::{DEFAULT_CONTROLLER_APP_ID, PROGRAM_DOMAIN}, group, tags},
    errors::{AsaswapError, AsaswapResult},
    events::{AsaswapEvent, EventLog},
    group::TransactionGroup,
    ledger::{GroupProgram, Ledger},
    state::StateWrite,
    types::{Address, AppId, TxnType},
    validation::{
        require_app_call, require_fee_coverage, require_no_redirect, require_positive,
        require_same_sender, require_txn_type, require_txn_type_in,
    },
};

// ============ Configuration ============

/// Escrow parameters, fixed when the escrow program is deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EscrowConfig {
    /// Controlling pool application every release must call
    pub controller_app_id: AppId,
}

impl EscrowConfig {
    pub fn new(controller_app_id: AppId) -> Self {
        Self { controller_app_id }
    }

    /// Configuration for a known pair deployment
    pub fn for_pair(name: &str) -> Option<Self> {
        deployments::find(name).map(|pair| Self::new(pair.application_id))
    }

    /// Deterministic custodial account of this configuration
    pub fn program_address(&self) -> Address {
        let mut hasher = Sha512_256::new();
        hasher.update(PROGRAM_DOMAIN);
        hasher.update(borsh::to_vec(self).unwrap_or_default());
        let mut address = [0u8; 32];
        address.copy_from_slice(&hasher.finalize());
        address
    }
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONTROLLER_APP_ID)
    }
}

// ============ Group Shapes ============

/// Approved release shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EscrowShape {
    AssetOptIn = 0,
    WithdrawLiquidity = 1,
    Withdraw = 2,
}

impl EscrowShape {
    /// Select the shape for a group size
    pub fn classify(size: usize) -> AsaswapResult<Self> {
        match size {
            group::ASSET_OPT_IN_SIZE => Ok(Self::AssetOptIn),
            group::WITHDRAW_LIQUIDITY_SIZE => Ok(Self::WithdrawLiquidity),
            group::WITHDRAW_SIZE => Ok(Self::Withdraw),
            _ => Err(AsaswapError::UnsupportedGroupShape { size }),
        }
    }

    /// Tag the controller call must carry
    pub fn tag(&self) -> &'static [u8] {
        match self {
            Self::AssetOptIn => tags::ASSET_OPT_IN,
            Self::WithdrawLiquidity => tags::WITHDRAW_LIQUIDITY,
            Self::Withdraw => tags::WITHDRAW,
        }
    }
}

// ============ Validation Context ============

/// Context for validating one escrow release
pub struct EscrowContext<'a> {
    /// Deployed configuration
    pub config: &'a EscrowConfig,
    /// Group being judged
    pub group: &'a TransactionGroup,
    /// Escrow account that signed the invoking transfer
    pub escrow: Address,
    /// Event log
    pub events: EventLog,
}

impl<'a> EscrowContext<'a> {
    pub fn new(config: &'a EscrowConfig, group: &'a TransactionGroup, escrow: Address) -> Self {
        Self {
            config,
            group,
            escrow,
            events: EventLog::new(),
        }
    }
}

// ============ Validation Functions ============

/// Main validation entry point
pub fn validate(ctx: &mut EscrowContext<'_>) -> AsaswapResult<EscrowShape> {
    let shape = EscrowShape::classify(ctx.group.len())?;

    match shape {
        EscrowShape::AssetOptIn => validate_asset_opt_in(ctx)?,
        EscrowShape::WithdrawLiquidity => validate_withdraw_liquidity(ctx)?,
        EscrowShape::Withdraw => validate_withdraw(ctx)?,
    }

    ctx.events.emit(AsaswapEvent::EscrowReleased {
        escrow: ctx.escrow,
        shape: shape as u8,
        controller_app_id: ctx.config.controller_app_id,
    });
    Ok(shape)
}

/// Escrow opts into an asset by sending itself nothing
fn validate_asset_opt_in(ctx: &EscrowContext<'_>) -> AsaswapResult<()> {
    let optin = ctx.group.get(1)?;
    require_txn_type(optin, 1, TxnType::AssetTransfer)?;
    check!(
        optin.asset_amount() == 0,
        AsaswapError::NonZeroAmount { index: 1, amount: optin.asset_amount() }
    );
    require_no_redirect(optin, 1)?;

    require_app_call(
        ctx.group.get(group::CONTROLLER_INDEX)?,
        group::CONTROLLER_INDEX,
        ctx.config.controller_app_id,
        tags::ASSET_OPT_IN,
    )?;
    Ok(())
}

/// User withdraws one or two holdings from the escrow
fn validate_withdraw(ctx: &EscrowContext<'_>) -> AsaswapResult<()> {
    let controller = ctx.group.get(group::CONTROLLER_INDEX)?;
    let first = ctx.group.get(1)?;
    let second = ctx.group.get(2)?;
    let fee_payment = ctx.group.get(3)?;

    require_no_redirect(first, 1)?;
    require_no_redirect(second, 2)?;

    require_app_call(
        controller,
        group::CONTROLLER_INDEX,
        ctx.config.controller_app_id,
        tags::WITHDRAW,
    )?;
    require_txn_type(first, 1, TxnType::AssetTransfer)?;
    require_txn_type_in(second, 2, &[TxnType::Payment, TxnType::AssetTransfer])?;

    check!(
        first.asset_amount() > 0 || second.amount() > 0 || second.asset_amount() > 0,
        AsaswapError::NothingWithdrawn
    );

    require_txn_type(fee_payment, 3, TxnType::Payment)?;
    require_same_sender(fee_payment, controller, 3)?;
    require_fee_coverage(fee_payment.amount(), &[first.fee, second.fee])?;
    Ok(())
}

/// User withdraws liquidity tokens from the escrow
fn validate_withdraw_liquidity(ctx: &EscrowContext<'_>) -> AsaswapResult<()> {
    let controller = ctx.group.get(group::CONTROLLER_INDEX)?;
    let transfer = ctx.group.get(1)?;
    let fee_payment = ctx.group.get(2)?;

    require_no_redirect(transfer, 1)?;

    require_app_call(
        controller,
        group::CONTROLLER_INDEX,
        ctx.config.controller_app_id,
        tags::WITHDRAW_LIQUIDITY,
    )?;
    require_txn_type(transfer, 1, TxnType::AssetTransfer)?;
    require_positive(transfer.asset_amount(), 1)?;

    require_txn_type(fee_payment, 2, TxnType::Payment)?;
    require_same_sender(fee_payment, controller, 2)?;
    require_fee_coverage(fee_payment.amount(), &[transfer.fee])?;
    Ok(())
}

// ============ Ledger Program ============

/// The escrow as a program attached to its custodial transfers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscrowProgram {
    pub config: EscrowConfig,
}

impl EscrowProgram {
    pub fn new(config: EscrowConfig) -> Self {
        Self { config }
    }
}

impl GroupProgram for EscrowProgram {
    fn evaluate(
        &self,
        group: &TransactionGroup,
        index: usize,
        _ledger: &Ledger,
        events: &mut EventLog,
    ) -> AsaswapResult<Vec<StateWrite>> {
        let escrow = group.get(index)?.sender;
        let mut ctx = EscrowContext::new(&self.config, group, escrow);
        validate(&mut ctx)?;
        events.append(ctx.events);
        Ok(Vec::new())
    }
}

// ============ Tests ============
