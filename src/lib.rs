//! Value representation for the soft lisp backend.
//!
//! Scalars live directly inside a tagged machine word ([value::Value]),
//! everything else is a [value::HeapObject] owned by a [value::Heap]. The
//! [value::Printer] turns either kind into the canonical text that tests and
//! tooling compare against, and [internal] exposes the same operations to
//! generated code through the C ABI.

pub mod allocator;
pub mod cli;
pub mod error;
pub mod internal;
pub mod repl;
pub mod value;

pub use error::{Error, Result};
pub use value::{FatPtr, Heap, HeapObject, Model, PrintOptions, Printer, Tag, Value};
