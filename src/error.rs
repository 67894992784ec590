/// Definitions of errors that can occur while encoding, allocating or printing values.
use thiserror::Error;

use crate::value::Tag;

#[derive(Error, miette::Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("integer {0} does not fit in 61 bits")]
    #[diagnostic(
        code(tagval::encode::integer),
        help("immediate integers range from -2^60 to 2^60 - 1")
    )]
    IntegerOutOfRange(i64),

    #[error("character {0:?} is not a single byte")]
    #[diagnostic(code(tagval::encode::character))]
    CharacterOutOfRange(char),

    #[error("expected {expected} but got {found}")]
    #[diagnostic(code(tagval::type_mismatch))]
    TypeMismatch { expected: &'static str, found: &'static str },

    #[error("value {0:#x} is not a heap reference")]
    #[diagnostic(code(tagval::heap::not_heap))]
    NotHeap(u64),

    #[error("heap reference {0:#x} does not point to a live object")]
    #[diagnostic(code(tagval::heap::dangling))]
    DanglingReference(u64),

    #[error("heap is full, capacity is {capacity} objects")]
    #[diagnostic(code(tagval::heap::exhausted), help("raise the heap capacity"))]
    HeapExhausted { capacity: usize },

    #[error("the system allocator refused to grow the heap")]
    #[diagnostic(code(tagval::heap::alloc))]
    AllocationFailed,

    #[error("string pointer is null")]
    #[diagnostic(code(tagval::ffi::null))]
    NullPointer,

    #[error("string is not valid utf-8 after byte {valid_up_to}")]
    #[diagnostic(
        code(tagval::ffi::utf8),
        help("strings and symbol names are stored as utf-8 text")
    )]
    InvalidUtf8 { valid_up_to: usize },

    #[error("invalid value {0:#x}")]
    #[diagnostic(code(tagval::invalid))]
    InvalidValue(u64),

    #[error("cycle detected through pair {0:#x}")]
    #[diagnostic(code(tagval::print::cycle))]
    CycleDetected(u64),

    #[error("pair nesting exceeds the depth limit of {0}")]
    #[diagnostic(code(tagval::print::depth), help("raise --max-depth"))]
    DepthExceeded(usize),

    #[error("the output sink refused to take more text")]
    #[diagnostic(code(tagval::print::sink))]
    Format,

    #[error("internal error: {0}")]
    #[diagnostic(code(tagval::internal))]
    Internal(&'static str),
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::AllocationFailed
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(_: std::fmt::Error) -> Self {
        Error::Format
    }
}

impl Error {
    pub(crate) fn mismatch(expected: Tag, found: Tag) -> Self {
        Error::TypeMismatch {
            expected: expected.name(),
            found: found.name(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
