//! Idempotent Transfer
//!
//! This example demonstrates retry-safe transitions for a transfer intent.
//!
//! Key concepts:
//! - Programmatic transition registration
//! - Idempotency keys derived from the caller's request
//! - Replaying the recorded outcome on retry without re-evaluating guards
//! - Canonical transition logs for audit
//!
//! Run with: cargo run --example idempotent_transfer

use chrono::{Duration, Utc};
use fsmkit::core::Meta;
use fsmkit::idempotency::{InMemoryStore, KeyFn, KeyRequest};
use fsmkit::{IdempotentMachine, Machine, Transition};

fn main() {
    println!("=== Idempotent Transfer Example ===\n");

    let mut machine: Machine = Machine::must_new("transfer-intent");
    machine.must_register(Transition::new("PENDING", "SUBMIT", "SUBMITTED").named("submit"));

    let im = IdempotentMachine::builder()
        .machine(machine)
        .store(InMemoryStore::new())
        .key_fn(KeyFn::new(|req: &KeyRequest<'_, ()>| {
            Ok(format!("{}:event:123", req.machine_id))
        }))
        .must_build();

    let now = Utc::now();

    let mut meta = Meta::new();
    meta.insert("source".to_string(), "api".to_string());
    let first = im.apply("tx-1", "PENDING", "SUBMIT", now, Some(&meta), &());

    println!("FIRST:");
    report(&first);

    // Retry with the same idempotency key
    meta.insert("source".to_string(), "retry".to_string());
    let retry = im.apply(
        "tx-1",
        "PENDING",
        "SUBMIT",
        now + Duration::minutes(1),
        Some(&meta),
        &(),
    );

    println!("RETRY:");
    report(&retry);

    if let Ok(eval) = retry {
        println!("Deterministic log:");
        println!("{}", eval.log.canonical_string());
    }

    println!("\n=== Example Complete ===");
}

fn report(result: &Result<fsmkit::Evaluation, fsmkit::ApplyError>) {
    match result {
        Ok(eval) => {
            println!("Next: {:?}", eval.next_state().map(|s| s.as_str()));
            println!("Allowed: {}", eval.log.allowed());
            println!("Error: {:?}", eval.error().map(|e| e.to_string()));
        }
        Err(err) => println!("Apply failed: {err}"),
    }
    println!();
}
