//! Property-based tests for the transition engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::{DateTime, TimeZone, Utc};
use fsmkit::core::{GuardContext, Meta, Predicate};
use fsmkit::{ErrorKind, Event, Machine, MachineError, ReasonCode, State, Transition};
use proptest::prelude::*;

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap()
}

prop_compose! {
    fn valid_ident()(s in "[A-Za-z0-9_.:-]{1,64}") -> String {
        s
    }
}

prop_compose! {
    fn padding()(s in "[ \t\n]{0,4}") -> String {
        s
    }
}

prop_compose! {
    fn meta_entries()(entries in prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,6}", 0..8)) -> Vec<(String, String)> {
        entries.into_iter().collect()
    }
}

fn machine() -> Machine {
    let mut m = Machine::must_new("transfer-intent");
    m.must_register(Transition::new("PENDING", "SUBMIT", "SUBMITTED"));
    m
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in "\\PC{0,80}") {
        let once = State::new(raw.clone()).normalize();
        prop_assert_eq!(once.normalize(), once.clone());

        let once = Event::new(raw).normalize();
        prop_assert_eq!(once.normalize(), once.clone());
    }

    #[test]
    fn padding_does_not_change_validity(id in valid_ident(), left in padding(), right in padding()) {
        let padded = State::new(format!("{left}{id}{right}"));
        prop_assert!(padded.is_valid());
        prop_assert_eq!(padded.normalize(), State::new(id));
    }

    #[test]
    fn duplicate_key_rejected_regardless_of_target(
        from in valid_ident(),
        on in valid_ident(),
        to1 in valid_ident(),
        to2 in valid_ident(),
    ) {
        let mut m: Machine = Machine::must_new("orders");
        m.register(Transition::new(from.as_str(), on.as_str(), to1.as_str())).unwrap();

        let err = m.register(Transition::new(from.as_str(), on.as_str(), to2.as_str())).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::DuplicateTransition);
        prop_assert!(
            matches!(err, MachineError::DuplicateTransition { .. }),
            "duplicate registration should be rejected"
        );
    }

    #[test]
    fn trimmed_and_untrimmed_inputs_agree(
        from in prop_oneof![Just("PENDING".to_string()), valid_ident()],
        on in prop_oneof![Just("SUBMIT".to_string()), valid_ident()],
        l1 in padding(), r1 in padding(), l2 in padding(), r2 in padding(),
    ) {
        let m = machine();
        let plain = m.next("tx-1", from.as_str(), on.as_str(), at(), None, &());
        let padded = m.next(
            "tx-1",
            format!("{l1}{from}{r1}"),
            format!("{l2}{on}{r2}"),
            at(),
            None,
            &(),
        );

        prop_assert_eq!(plain.next_state(), padded.next_state());
        prop_assert_eq!(&plain.log, &padded.log);
        prop_assert_eq!(plain.error().map(|e| e.kind()), padded.error().map(|e| e.kind()));
    }

    #[test]
    fn guard_block_always_empties_next_state(threshold in 0u32..100, input in 0u32..100) {
        let mut m: Machine<u32> = Machine::must_new("transfer-intent");
        m.must_register(Transition::new("PENDING", "SUBMIT", "SUBMITTED").guarded(Predicate::new(
            "below_threshold",
            move |ctx: &GuardContext<'_, u32>| *ctx.input >= threshold,
        )));

        let eval = m.next("tx-1", "PENDING", "SUBMIT", at(), None, &input);
        if input >= threshold {
            prop_assert!(eval.is_allowed());
            prop_assert_eq!(eval.log.reason(), ReasonCode::Ok);
        } else {
            prop_assert!(eval.next_state().is_none());
            prop_assert!(!eval.log.allowed());
            prop_assert_eq!(eval.log.reason(), ReasonCode::GuardBlocked);
        }
    }

    #[test]
    fn canonical_string_ignores_meta_order(entries in meta_entries()) {
        let m = machine();

        let forward: Meta = entries.iter().cloned().collect();
        let mut reversed = Meta::new();
        for (k, v) in entries.iter().rev() {
            reversed.insert(k.clone(), v.clone());
        }

        let a = m.next("tx-1", "PENDING", "SUBMIT", at(), Some(&forward), &());
        let b = m.next("tx-1", "PENDING", "SUBMIT", at(), Some(&reversed), &());
        prop_assert_eq!(a.log.canonical_string(), b.log.canonical_string());
        prop_assert_eq!(a.log.canonical_meta_pairs().len(), entries.len());
    }

    #[test]
    fn log_meta_survives_caller_mutation(entries in meta_entries(), key in "[a-z]{1,6}") {
        let m = machine();
        let mut meta: Meta = entries.iter().cloned().collect();
        let eval = m.next("tx-1", "PENDING", "SUBMIT", at(), Some(&meta), &());
        let before = eval.log.canonical_string();

        meta.insert(key, "mutated".to_string());
        meta.clear();

        prop_assert_eq!(eval.log.canonical_string(), before);
        prop_assert_eq!(eval.log.meta().len(), entries.len());
    }

    #[test]
    fn every_evaluation_produces_a_log(from in "\\PC{0,10}", on in "\\PC{0,10}") {
        let m = machine();
        let eval = m.next("tx-1", from.as_str(), on.as_str(), at(), None, &());

        prop_assert_eq!(eval.log.machine_id(), "tx-1");
        prop_assert_eq!(eval.log.at(), at());
        prop_assert_eq!(eval.log.allowed(), eval.is_allowed());
        if !eval.is_allowed() {
            prop_assert!(eval.next_state().is_none());
        }
    }
}
