#![allow(dead_code)]
#![allow(unused_imports)]

pub use goci_test_utils::builders;
pub use goci_test_utils::fake_launcher::{Behaviour, FakeLauncher};
pub use goci_test_utils::{init_tracing, with_timeout};
