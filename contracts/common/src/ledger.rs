//! Atomic Group Ledger
//!
//! Explicit validate-then-commit boundary for transaction groups:
//!
//! ```text
//! execute_group(group, bindings):
//!   stage:  every bound program evaluates its position against the
//!           pre-group ledger and returns staged writes
//!   commit: only if every program approved, apply all writes
//!   reject: otherwise the ledger is left untouched
//! ```
//!
//! Programs are bound to group positions. A program bound to an application
//! call writes to that application's state; a call with application id 0
//! creates a new application when its program stages writes.

use crate::{
    constants::ledger::FIRST_APP_ID,
    errors::{AsaswapError, AsaswapResult},
    events::{AsaswapEvent, EventLog},
    group::{GroupId, TransactionGroup},
    math::safe_add,
    state::{GlobalState, StateWrite},
    types::{AppId, TxnType},
    BTreeMap, Vec,
};

// ============ Program Interface ============

/// A program that judges one position of a group
pub trait GroupProgram {
    /// Approve (returning staged writes) or reject the operation at `index`
    fn evaluate(
        &self,
        group: &TransactionGroup,
        index: usize,
        ledger: &Ledger,
        events: &mut EventLog,
    ) -> AsaswapResult<Vec<StateWrite>>;
}

/// A program attached to a group position
#[derive(Clone, Copy)]
pub struct ProgramBinding<'a> {
    pub index: usize,
    pub program: &'a dyn GroupProgram,
}

impl<'a> ProgramBinding<'a> {
    pub fn new(index: usize, program: &'a dyn GroupProgram) -> Self {
        Self { index, program }
    }
}

/// Outcome of a committed group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReceipt {
    pub group_id: GroupId,
    /// Applications created by the group, in position order
    pub created_apps: Vec<AppId>,
    /// Number of applied writes
    pub writes: usize,
}

/// Writes staged for one application
struct StagedWrites {
    app_id: AppId,
    created: bool,
    writes: Vec<StateWrite>,
}

// ============ Ledger ============

/// Global state of every application, changed only by whole groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    apps: BTreeMap<AppId, GlobalState>,
    next_app_id: AppId,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            apps: BTreeMap::new(),
            next_app_id: FIRST_APP_ID,
        }
    }

    /// Install an application with a known id and state
    ///
    /// Used for applications whose logic lives outside this workspace,
    /// such as the controlling pool application. An installed application's
    /// state only changes through committed groups afterwards.
    ///
    /// # Errors
    /// - `AppAlreadyInstalled` if `app_id` already holds state
    pub fn install_app(&mut self, app_id: AppId, state: GlobalState) -> AsaswapResult<()> {
        if self.apps.contains_key(&app_id) {
            return Err(AsaswapError::AppAlreadyInstalled { app_id });
        }
        self.apps.insert(app_id, state);
        if app_id >= self.next_app_id {
            self.next_app_id = app_id.saturating_add(1);
        }
        Ok(())
    }

    /// Global state of an application
    pub fn global_state(&self, app_id: AppId) -> Option<&GlobalState> {
        self.apps.get(&app_id)
    }

    /// Id the next created application will receive
    pub fn next_app_id(&self) -> AppId {
        self.next_app_id
    }

    /// Validate a group with its bound programs and commit it atomically
    ///
    /// On rejection no state changes and only a `GroupRejected` event is
    /// recorded; events emitted by programs during staging are dropped.
    pub fn execute_group(
        &mut self,
        group: &TransactionGroup,
        bindings: &[ProgramBinding<'_>],
        events: &mut EventLog,
    ) -> AsaswapResult<GroupReceipt> {
        let group_id = group.group_id();
        let mut staged_events = EventLog::new();

        let staged = match self.stage(group, bindings, &mut staged_events) {
            Ok(staged) => staged,
            Err(err) => {
                events.emit(AsaswapEvent::GroupRejected {
                    group_id,
                    code: err.code().as_bytes().to_vec(),
                });
                return Err(err);
            }
        };

        let receipt = self.commit(group_id, staged);
        events.append(staged_events);
        events.emit(AsaswapEvent::GroupCommitted {
            group_id,
            size: group.len() as u8,
            writes: receipt.writes as u32,
        });
        Ok(receipt)
    }

    /// Run every bound program against the current ledger
    fn stage(
        &self,
        group: &TransactionGroup,
        bindings: &[ProgramBinding<'_>],
        events: &mut EventLog,
    ) -> AsaswapResult<(AppId, Vec<StagedWrites>)> {
        group.check_size()?;

        let mut next_app_id = self.next_app_id;
        let mut staged = Vec::new();

        for binding in bindings {
            let op = group.get(binding.index)?;
            let writes = binding.program.evaluate(group, binding.index, self, events)?;

            let Some(call) = op.as_app_call() else {
                // Transfers carry no state; a program bound to one may only approve
                if !writes.is_empty() {
                    return Err(AsaswapError::WrongOperationType {
                        index: binding.index,
                        expected: TxnType::ApplicationCall,
                        actual: op.txn_type(),
                    });
                }
                continue;
            };

            let (app_id, created) = if call.application_id == 0 {
                // Only a program that stores something creates an application
                if writes.is_empty() {
                    continue;
                }
                let app_id = next_app_id;
                next_app_id = safe_add(next_app_id, 1)?;
                (app_id, true)
            } else {
                if !self.apps.contains_key(&call.application_id) {
                    return Err(AsaswapError::UnknownApplication {
                        app_id: call.application_id,
                    });
                }
                (call.application_id, false)
            };

            staged.push(StagedWrites { app_id, created, writes });
        }

        Ok((next_app_id, staged))
    }

    /// Apply staged writes; cannot fail
    fn commit(&mut self, group_id: GroupId, (next_app_id, staged): (AppId, Vec<StagedWrites>)) -> GroupReceipt {
        let mut created_apps = Vec::new();
        let mut writes = 0;

        for entry in staged {
            if entry.created {
                created_apps.push(entry.app_id);
            }
            let state = self.apps.entry(entry.app_id).or_default();
            state.apply(&entry.writes);
            writes += entry.writes.len();
        }
        self.next_app_id = next_app_id;

        GroupReceipt {
            group_id,
            created_apps,
            writes,
        }
    }
}
