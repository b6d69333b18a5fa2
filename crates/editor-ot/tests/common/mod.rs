#![allow(dead_code)]

pub mod scenarios;

use std::sync::Once;

use editor_ot::{Change, ChangeSet};

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn change_set(changes: Vec<Change>) -> ChangeSet {
    ChangeSet::new(changes).expect("valid change set")
}
