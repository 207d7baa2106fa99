#![allow(dead_code)]

pub mod synthetic_image;

/// Route `log` output through the test harness when `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
