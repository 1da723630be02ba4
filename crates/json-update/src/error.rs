use thiserror::Error;

/// Validation failures raised while dispatching an update command.
///
/// Messages name the failing operation and which side (view or update)
/// was the wrong shape. Nothing is partially applied: validation for an
/// operation happens before its mutation, and all mutations land on
/// discarded copies anyway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("update is not an object")]
    CommandNotObject,
    #[error("view is not an array in {0}")]
    ViewNotArray(&'static str),
    #[error("update is not an array in {0}")]
    OperandNotArray(&'static str),
    #[error("view is not an object in {0}")]
    ViewNotObject(&'static str),
    #[error("update is not an object in merge")]
    MergeOperandNotObject,
    #[error("update is not a function in apply")]
    OperandNotFunction,
    #[error("update operand is not a value in {0}")]
    OperandNotValue(&'static str),
    #[error("update element is not an array")]
    SpliceTupleNotArray,
    #[error("splice argument is not an integer")]
    SpliceArgNotInteger,
    #[error("unset key is not a string")]
    UnsetKeyNotString,
    #[error("non-numeric key in array update: {0:?}")]
    NonNumericArrayKey(String),
    #[error("view not an array or object")]
    ViewNotUpdatable,
    #[error("$apply is not representable in a JSON update")]
    ApplyNotJson,
}
