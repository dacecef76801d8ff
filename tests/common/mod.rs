#![allow(dead_code)]

pub use slurmdag_test_utils::builders;
pub use slurmdag_test_utils::fake_scheduler;
pub use slurmdag_test_utils::{init_tracing, with_timeout};
