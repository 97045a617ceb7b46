//! Shared fixtures for the integration tests.

use tensor_ir::prelude::*;

pub fn setup_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An extern vertex with outputs `[10]` and `[20]`, both float32.
#[allow(dead_code)]
pub fn two_output_op(name: &str) -> Operation {
    extern_op(
        name,
        "test.split",
        vec![],
        vec![
            ExternOutput::new("lo", [10], DType::F32),
            ExternOutput::new("hi", [20], DType::F32),
        ],
    )
}
