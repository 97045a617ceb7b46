//! Error type shared by every fallible constructor in the crate.

/// Contract violations detected while building tensors, operations or
/// element-access expressions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    /// `Operation::output(i)` (or a signature query) with `i >= num_outputs()`.
    #[error("operation '{op}' has {num_outputs} output(s); index {index} is out of range")]
    OutputIndexOutOfRange {
        op: String,
        index: usize,
        num_outputs: usize,
    },

    /// A tensor was indexed with a coordinate count different from its rank.
    #[error("tensor '{tensor}' has rank {rank} but was indexed with {given} coordinate(s)")]
    IndexArityMismatch {
        tensor: String,
        rank: usize,
        given: usize,
    },

    /// `Tensor::make` received a shape or dtype that disagrees with the
    /// producing operation's declared output.
    #[error("tensor '{tensor}' does not match output {value_index} of '{op}': {detail}")]
    OutputSignatureMismatch {
        tensor: String,
        op: String,
        value_index: usize,
        detail: String,
    },

    /// A tensor without a producing operation must use output slot 0.
    #[error("tensor '{tensor}' has no producing operation but value_index {value_index}")]
    DetachedValueIndex { tensor: String, value_index: usize },

    #[error("invalid dtype '{0}'")]
    InvalidDType(String),

    #[error("invalid value '{value}' for {key}")]
    InvalidConfig { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, IrError>;
