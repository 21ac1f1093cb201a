//! Integration Tests
//!
//! End-to-end tests of the group ledger with small in-test programs.
//! These exercise the commit boundary the pool programs rely on.

#[cfg(test)]
mod tests {
    use crate::*;
    use crate::constants::keys;
    use crate::validation::check;

    const USER: Address = [2u8; 32];
    const POOL_APP: AppId = 10;

    /// Publishes `floor(arg1 * A / B)` of its own state into slot "1"
    struct Ratio;

    impl GroupProgram for Ratio {
        fn evaluate(
            &self,
            group: &TransactionGroup,
            index: usize,
            ledger: &Ledger,
            events: &mut EventLog,
        ) -> AsaswapResult<Vec<StateWrite>> {
            let op = group.get(index)?;
            let state = ledger
                .global_state(op.application_id())
                .ok_or(AsaswapError::UnknownApplication { app_id: op.application_id() })?;
            let a = state
                .get_uint(keys::PRIMARY_BALANCE)
                .ok_or(AsaswapError::StateNotFound { key: keys::PRIMARY_BALANCE })?;
            let b = state
                .get_uint(keys::SECONDARY_BALANCE)
                .ok_or(AsaswapError::StateNotFound { key: keys::SECONDARY_BALANCE })?;
            let amount = btoi(op.arg(index, 1)?)?;

            let result = mul_div(amount, a, b)?;
            events.emit(AsaswapEvent::RatioComputed {
                mode: 0,
                slot: 1,
                multiplier1: amount,
                multiplier2: a,
                divisor: b,
                result,
            });
            Ok(vec![StateWrite::uint(keys::RESULT_SLOT_1, result)])
        }
    }

    /// Approves only payments of at least `min`
    struct MinPayment {
        min: u64,
    }

    impl GroupProgram for MinPayment {
        fn evaluate(
            &self,
            group: &TransactionGroup,
            index: usize,
            _ledger: &Ledger,
            _events: &mut EventLog,
        ) -> AsaswapResult<Vec<StateWrite>> {
            let paid = group.get(index)?.amount();
            check!(paid >= self.min, AsaswapError::ZeroAmount { index });
            Ok(Vec::new())
        }
    }

    fn pool_ledger(a: u64, b: u64) -> Ledger {
        let mut state = GlobalState::new();
        state.put(keys::PRIMARY_BALANCE, StateValue::Uint(a));
        state.put(keys::SECONDARY_BALANCE, StateValue::Uint(b));

        let mut ledger = Ledger::new();
        ledger.install_app(POOL_APP, state).unwrap();
        ledger
    }

    fn ratio_call(amount: u64) -> Operation {
        Operation::app_call(USER, POOL_APP, vec![b"r".to_vec(), itob(amount).to_vec()], 1_000)
    }

    fn payment(amount: u64) -> Operation {
        Operation::payment(USER, [3u8; 32], amount, 1_000)
    }

    // ============ Commit ============

    #[test]
    fn test_approved_group_commits_writes_and_events() {
        let mut ledger = pool_ledger(2_000_000, 1_000_000);
        let mut events = EventLog::new();
        let group = TransactionGroup::new(vec![ratio_call(500), payment(10)]).unwrap();

        let receipt = ledger
            .execute_group(
                &group,
                &[ProgramBinding::new(0, &Ratio), ProgramBinding::new(1, &MinPayment { min: 10 })],
                &mut events,
            )
            .unwrap();

        assert_eq!(receipt.writes, 1);
        assert_eq!(receipt.group_id, group.group_id());
        assert!(receipt.created_apps.is_empty());
        assert_eq!(
            ledger.global_state(POOL_APP).unwrap().get_uint(keys::RESULT_SLOT_1),
            Some(1_000)
        );

        assert_eq!(events.filter_by_type(EventType::RatioComputed).len(), 1);
        assert_eq!(events.filter_by_type(EventType::GroupCommitted).len(), 1);
    }

    // ============ Atomicity ============

    #[test]
    fn test_late_rejection_leaves_ledger_unchanged() {
        let mut ledger = pool_ledger(2_000_000, 1_000_000);
        let before = ledger.clone();
        let mut events = EventLog::new();
        let group = TransactionGroup::new(vec![ratio_call(500), payment(9)]).unwrap();

        let result = ledger.execute_group(
            &group,
            &[ProgramBinding::new(0, &Ratio), ProgramBinding::new(1, &MinPayment { min: 10 })],
            &mut events,
        );

        assert_eq!(result, Err(AsaswapError::ZeroAmount { index: 1 }));
        assert_eq!(ledger, before);

        // Staged computation event discarded, only the rejection recorded
        assert_eq!(events.len(), 1);
        match &events.events()[0] {
            AsaswapEvent::GroupRejected { group_id, code } => {
                assert_eq!(*group_id, group.group_id());
                assert_eq!(code.as_slice(), b"E012_ZERO_AMOUNT");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_arithmetic_fault_rejects_group() {
        let mut ledger = pool_ledger(2_000_000, 0);
        let before = ledger.clone();
        let mut events = EventLog::new();
        let group = TransactionGroup::new(vec![ratio_call(500)]).unwrap();

        let err = ledger
            .execute_group(&group, &[ProgramBinding::new(0, &Ratio)], &mut events)
            .unwrap_err();

        assert!(err.is_arithmetic());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_writes_from_transfer_position_rejected() {
        struct Writer;
        impl GroupProgram for Writer {
            fn evaluate(
                &self,
                _group: &TransactionGroup,
                _index: usize,
                _ledger: &Ledger,
                _events: &mut EventLog,
            ) -> AsaswapResult<Vec<StateWrite>> {
                Ok(vec![StateWrite::uint(b"x", 1)])
            }
        }

        let mut ledger = Ledger::new();
        let mut events = EventLog::new();
        let group = TransactionGroup::new(vec![payment(1)]).unwrap();

        assert!(matches!(
            ledger.execute_group(&group, &[ProgramBinding::new(0, &Writer)], &mut events),
            Err(AsaswapError::WrongOperationType { index: 0, .. })
        ));
    }

    #[test]
    fn test_binding_outside_group_rejected() {
        let mut ledger = pool_ledger(1, 1);
        let mut events = EventLog::new();
        let group = TransactionGroup::new(vec![ratio_call(1)]).unwrap();

        assert_eq!(
            ledger.execute_group(&group, &[ProgramBinding::new(3, &Ratio)], &mut events),
            Err(AsaswapError::IndexOutOfRange { index: 3, size: 1 })
        );
    }

    // ============ Wire + Ledger ============

    #[cfg(feature = "std")]
    #[test]
    fn test_decoded_group_executes_identically() {
        let group = TransactionGroup::new(vec![ratio_call(250)]).unwrap();
        let decoded = crate::wire::decode_group(&crate::wire::encode_group(&group).unwrap()).unwrap();
        assert_eq!(decoded.group_id(), group.group_id());

        let mut ledger = pool_ledger(4, 2);
        let mut events = EventLog::new();
        ledger
            .execute_group(&decoded, &[ProgramBinding::new(0, &Ratio)], &mut events)
            .unwrap();

        assert_eq!(
            ledger.global_state(POOL_APP).unwrap().get_uint(keys::RESULT_SLOT_1),
            Some(500)
        );
    }
}
