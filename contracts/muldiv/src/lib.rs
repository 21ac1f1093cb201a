//! Pool Computation Engine
//!
//! Computes the exact ratios an AMM pool needs and publishes the result in
//! one of two result slots for the controlling application to read.
//!
//! ## Lifecycle
//!
//! ```text
//! create (application id 0, args [guard]):  store guard, approve
//! opt-in:                                   approve, no writes
//! compute (args [mode, slot]):              guard check, m1 * m2 / d,
//!                                           write result slot
//! ```
//!
//! Computation is gated by the guard: the first operation of the group must
//! be a call to the stored guard application. Passing that check yields a
//! [`GuardToken`], the only way to reach [`compute`].
//!
//! ## Modes
//!
//! | Tag  | Mode                     | m1 | m2 | d  |
//! |------|--------------------------|----|----|----|
//! | `L`  | AddLiquidity             | a  | LT | A  |
//! | `SA` | SwapPrimaryToSecondary   | a  | B  | A  |
//! | `SB` | SwapSecondaryToPrimary   | b  | A  | B  |
//! | `a`  | RemoveLiquidityPrimary   | lt | A  | LT |
//! | `b`  | RemoveLiquiditySecondary | lt | B  | LT |

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

pub mod host;


use asaswap_common::{
    check,
    constants::{group::CONTROLLER_INDEX, keys, tags},
    errors::{AsaswapError, AsaswapResult},
    events::{AsaswapEvent, EventLog},
    group::TransactionGroup,
    ledger::{GroupProgram, Ledger},
    math::{btoi, mul_div},
    state::{GlobalState, StateWrite},
    types::{AppId, ApplicationCall, OnCompletion, Operation, TxnType},
    validation::require_txn_type,
};

// ============ Modes and Slots ============

/// Ratio computations offered by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum CalculationMode {
    /// Liquidity tokens minted for a primary deposit
    AddLiquidity = 0,
    /// Secondary tokens out for primary tokens in
    SwapPrimaryToSecondary = 1,
    /// Primary tokens out for secondary tokens in
    SwapSecondaryToPrimary = 2,
    /// Primary tokens returned for burned liquidity tokens
    RemoveLiquidityPrimary = 3,
    /// Secondary tokens returned for burned liquidity tokens
    RemoveLiquiditySecondary = 4,
}

impl CalculationMode {
    pub const ALL: [Self; 5] = [
        Self::AddLiquidity,
        Self::SwapPrimaryToSecondary,
        Self::SwapSecondaryToPrimary,
        Self::RemoveLiquidityPrimary,
        Self::RemoveLiquiditySecondary,
    ];

    /// Parse the mode tag of argument 0
    pub fn from_tag(tag: &[u8]) -> AsaswapResult<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.tag() == tag)
            .ok_or(AsaswapError::UnknownMode)
    }

    pub fn tag(&self) -> &'static [u8] {
        match self {
            Self::AddLiquidity => tags::ADD_LIQUIDITY,
            Self::SwapPrimaryToSecondary => tags::SWAP_PRIMARY_TO_SECONDARY,
            Self::SwapSecondaryToPrimary => tags::SWAP_SECONDARY_TO_PRIMARY,
            Self::RemoveLiquidityPrimary => tags::REMOVE_LIQUIDITY_PRIMARY,
            Self::RemoveLiquiditySecondary => tags::REMOVE_LIQUIDITY_SECONDARY,
        }
    }
}

/// One of the two keys results may be published under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum ResultSlot {
    Slot1,
    Slot2,
}

impl ResultSlot {
    /// Parse the slot selector of argument 1; any other key is rejected
    pub fn from_arg(arg: &[u8]) -> AsaswapResult<Self> {
        match arg {
            a if a == keys::RESULT_SLOT_1 => Ok(Self::Slot1),
            a if a == keys::RESULT_SLOT_2 => Ok(Self::Slot2),
            _ => Err(AsaswapError::InvalidResultSlot),
        }
    }

    /// Persisted key of the slot
    pub fn key(&self) -> &'static [u8] {
        match self {
            Self::Slot1 => keys::RESULT_SLOT_1,
            Self::Slot2 => keys::RESULT_SLOT_2,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Self::Slot1 => 1,
            Self::Slot2 => 2,
        }
    }

    /// Last result published in this slot
    pub fn read(&self, state: &GlobalState) -> Option<u64> {
        state.get_uint(self.key())
    }
}

// ============ State ============

/// Pool figures held by the controlling application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PoolState {
    /// Liquidity token supply (LT)
    pub total_liquidity: u64,
    /// Primary asset balance (A)
    pub primary_balance: u64,
    /// Secondary asset balance (B)
    pub secondary_balance: u64,
}

impl PoolState {
    /// Read the pool figures from a global state
    pub fn from_global(state: &GlobalState) -> AsaswapResult<Self> {
        Ok(Self {
            total_liquidity: read_uint(state, keys::TOTAL_LIQUIDITY)?,
            primary_balance: read_uint(state, keys::PRIMARY_BALANCE)?,
            secondary_balance: read_uint(state, keys::SECONDARY_BALANCE)?,
        })
    }

    /// Read the pool figures of the first foreign application of `call`
    pub fn load(ledger: &Ledger, call: &ApplicationCall) -> AsaswapResult<Self> {
        let app_id = *call.foreign_apps.first().ok_or(AsaswapError::MissingForeignApp)?;
        let state = ledger
            .global_state(app_id)
            .ok_or(AsaswapError::UnknownApplication { app_id })?;
        Self::from_global(state)
    }
}

/// Engine-owned persisted state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineState {
    /// Only application allowed to drive computations
    pub guard_app_id: AppId,
}

impl EngineState {
    pub fn from_global(state: &GlobalState) -> AsaswapResult<Self> {
        let guard_app_id = state
            .get_uint(keys::GUARD_APP_ID)
            .ok_or(AsaswapError::GuardNotInstalled)?;
        Ok(Self { guard_app_id })
    }

    /// Read the state of engine instance `app_id`
    pub fn load(ledger: &Ledger, app_id: AppId) -> AsaswapResult<Self> {
        let state = ledger
            .global_state(app_id)
            .ok_or(AsaswapError::UnknownApplication { app_id })?;
        Self::from_global(state)
    }
}

fn read_uint(state: &GlobalState, key: &'static [u8]) -> AsaswapResult<u64> {
    state.get_uint(key).ok_or(AsaswapError::StateNotFound { key })
}

// ============ Guard Capability ============

/// Proof that the current group is driven by the stored guard
#[derive(Debug, PartialEq, Eq)]
pub struct GuardToken {
    guard_app_id: AppId,
}

impl GuardToken {
    /// Issue a token if position 0 of `group` calls the stored guard
    pub fn authorize(engine: &EngineState, group: &TransactionGroup) -> AsaswapResult<Self> {
        let caller = group.get(CONTROLLER_INDEX)?;
        require_txn_type(caller, CONTROLLER_INDEX, TxnType::ApplicationCall)?;
        check!(
            caller.application_id() == engine.guard_app_id,
            AsaswapError::GuardMismatch {
                expected: engine.guard_app_id,
                actual: caller.application_id(),
            }
        );
        Ok(Self { guard_app_id: engine.guard_app_id })
    }

    pub fn guard_app_id(&self) -> AppId {
        self.guard_app_id
    }
}

// ============ Computation ============

/// Inputs of one `m1 * m2 / d` computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    pub multiplier1: u64,
    pub multiplier2: u64,
    pub divisor: u64,
}

impl Operands {
    /// Pick the operands of `mode` from the group and pool figures
    pub fn select(mode: CalculationMode, group: &TransactionGroup, pool: &PoolState) -> AsaswapResult<Self> {
        let (multiplier1, multiplier2, divisor) = match mode {
            CalculationMode::AddLiquidity => (
                group.get(2)?.asset_amount(),
                pool.total_liquidity,
                pool.primary_balance,
            ),
            CalculationMode::SwapPrimaryToSecondary => (
                group.get(1)?.asset_amount(),
                pool.secondary_balance,
                pool.primary_balance,
            ),
            CalculationMode::SwapSecondaryToPrimary => (
                group.get(1)?.asset_amount(),
                pool.primary_balance,
                pool.secondary_balance,
            ),
            CalculationMode::RemoveLiquidityPrimary => (
                burned_liquidity(group)?,
                pool.primary_balance,
                pool.total_liquidity,
            ),
            CalculationMode::RemoveLiquiditySecondary => (
                burned_liquidity(group)?,
                pool.secondary_balance,
                pool.total_liquidity,
            ),
        };
        Ok(Self { multiplier1, multiplier2, divisor })
    }
}

/// Liquidity token amount passed as argument 1 of the call at position 2
fn burned_liquidity(group: &TransactionGroup) -> AsaswapResult<u64> {
    btoi(group.get(2)?.arg(2, 1)?)
}

/// Exact `floor(m1 * m2 / d)`, reachable only with a guard token
pub fn compute(_guard: &GuardToken, operands: &Operands) -> AsaswapResult<u64> {
    mul_div(operands.multiplier1, operands.multiplier2, operands.divisor)
}

// ============ Actions ============

/// What an engine invocation asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAction {
    /// Create the engine and store its guard
    Create { guard_app_id: AppId },
    /// Opt an account into the engine
    OptIn,
    /// Compute a ratio into a result slot
    Compute { mode: CalculationMode, slot: ResultSlot },
}

impl EngineAction {
    /// Classify the engine call at position `index`
    pub fn parse(op: &Operation, index: usize) -> AsaswapResult<Self> {
        let call = op.as_app_call().ok_or(AsaswapError::WrongOperationType {
            index,
            expected: TxnType::ApplicationCall,
            actual: op.txn_type(),
        })?;

        if call.application_id == 0 {
            let guard_app_id = btoi(op.arg(index, 0)?)?;
            return Ok(Self::Create { guard_app_id });
        }
        if call.on_completion == OnCompletion::OptIn {
            return Ok(Self::OptIn);
        }

        let mode = CalculationMode::from_tag(op.arg(index, 0)?)?;
        let slot = ResultSlot::from_arg(op.arg(index, 1)?)?;
        Ok(Self::Compute { mode, slot })
    }
}

// ============ Validation Context ============

/// Context for one engine invocation
pub struct MulDivContext<'a> {
    /// Group being judged
    pub group: &'a TransactionGroup,
    /// Position of the engine call
    pub index: usize,
    /// Ledger state before the group
    pub ledger: &'a Ledger,
    /// Event log
    pub events: EventLog,
}

impl<'a> MulDivContext<'a> {
    pub fn new(group: &'a TransactionGroup, index: usize, ledger: &'a Ledger) -> Self {
        Self {
            group,
            index,
            ledger,
            events: EventLog::new(),
        }
    }

    fn current(&self) -> AsaswapResult<&'a Operation> {
        self.group.get(self.index)
    }
}

// ============ Validation Functions ============

/// Main validation entry point; returns the writes to stage on approval
pub fn validate(ctx: &mut MulDivContext<'_>, action: &EngineAction) -> AsaswapResult<Vec<StateWrite>> {
    match action {
        EngineAction::Create { guard_app_id } => validate_create(ctx, *guard_app_id),
        EngineAction::OptIn => validate_opt_in(ctx),
        EngineAction::Compute { mode, slot } => validate_compute(ctx, *mode, *slot),
    }
}

fn validate_create(ctx: &mut MulDivContext<'_>, guard_app_id: AppId) -> AsaswapResult<Vec<StateWrite>> {
    ctx.events.emit(AsaswapEvent::GuardInstalled { guard_app_id });
    Ok(vec![StateWrite::uint(keys::GUARD_APP_ID, guard_app_id)])
}

fn validate_opt_in(ctx: &mut MulDivContext<'_>) -> AsaswapResult<Vec<StateWrite>> {
    let op = ctx.current()?;
    ctx.events.emit(AsaswapEvent::OptedIn {
        account: op.sender,
        app_id: op.application_id(),
    });
    Ok(Vec::new())
}

fn validate_compute(
    ctx: &mut MulDivContext<'_>,
    mode: CalculationMode,
    slot: ResultSlot,
) -> AsaswapResult<Vec<StateWrite>> {
    let op = ctx.current()?;
    let call = op.as_app_call().ok_or(AsaswapError::WrongOperationType {
        index: ctx.index,
        expected: TxnType::ApplicationCall,
        actual: op.txn_type(),
    })?;

    // 1. Guard must drive the group
    let engine = EngineState::load(ctx.ledger, call.application_id)?;
    let token = GuardToken::authorize(&engine, ctx.group)?;

    // 2. Pool figures must all be present
    let pool = PoolState::load(ctx.ledger, call)?;

    // 3. Compute
    let operands = Operands::select(mode, ctx.group, &pool)?;
    let result = compute(&token, &operands)?;

    ctx.events.emit(AsaswapEvent::RatioComputed {
        mode: mode as u8,
        slot: slot.number(),
        multiplier1: operands.multiplier1,
        multiplier2: operands.multiplier2,
        divisor: operands.divisor,
        result,
    });
    Ok(vec![StateWrite::uint(slot.key(), result)])
}

// ============ Ledger Program ============

/// The engine as a program attached to its own application calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MulDivEngine;

impl GroupProgram for MulDivEngine {
    fn evaluate(
        &self,
        group: &TransactionGroup,
        index: usize,
        ledger: &Ledger,
        events: &mut EventLog,
    ) -> AsaswapResult<Vec<StateWrite>> {
        let action = EngineAction::parse(group.get(index)?, index)?;
        let mut ctx = MulDivContext::new(group, index, ledger);
        let writes = validate(&mut ctx, &action)?;
        events.append(ctx.events);
        Ok(writes)
    }
}

// ============ Tests ============
