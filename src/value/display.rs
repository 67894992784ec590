//! Textual form of values. This is the format every test fixture and every
//! tool that reads runtime output agrees on:
//!
//! ```text
//! null  42  -7  #t  #f  #\a  1.500000  "hi"  'sym'  (1 . (2 . null))
//! ```
//!
//! Pairs are always printed in dotted notation, lists get no sugar.

use std::fmt::{Display, Write};

use fxhash::FxBuildHasher;

use super::*;
use crate::allocator::{Allocator, Arena};
use crate::error::Error;

const BADVAL: &str = "<badval>";

/// Pairs that enclose the value being printed. Shared between siblings, so
/// pushing a pair costs a persistent insert instead of a copy.
pub(super) type Ancestors = im::HashSet<HeapRef, FxBuildHasher>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// Maximum pair nesting, unbounded when `None`.
    pub max_depth: Option<usize>,
    /// Backslash-escape `"` and `\` inside strings.
    pub escape_strings: bool,
}

enum Work {
    Value(Value, Ancestors),
    Text(&'static str),
}

/// Walks a value with an explicit stack, so a long list does not grow the
/// call stack and a cyclic one is reported instead of looping forever.
pub struct Printer<'a, A: Allocator = Arena> {
    heap: &'a Heap<A>,
    options: PrintOptions,
}

impl<'a, A: Allocator> Printer<'a, A> {
    pub fn new(heap: &'a Heap<A>) -> Self {
        Self::with_options(heap, PrintOptions::default())
    }

    pub fn with_options(heap: &'a Heap<A>, options: PrintOptions) -> Self {
        Self { heap, options }
    }

    pub fn print(&self, value: Value) -> Result<String> {
        let mut out = String::new();
        self.write(value, &mut out)?;
        Ok(out)
    }

    /// Writes the value to `out`. On error, whatever was written before the
    /// failure stays in `out`.
    pub fn write<W: Write>(&self, value: Value, out: &mut W) -> Result<()> {
        let mut stack = vec![Work::Value(value, Ancestors::default())];

        while let Some(work) = stack.pop() {
            match work {
                Work::Text(text) => out.write_str(text)?,
                Work::Value(value, ancestors) => {
                    self.write_one(value, ancestors, &mut stack, out)?
                }
            }
        }

        Ok(())
    }

    fn write_one<W: Write>(
        &self,
        value: Value,
        ancestors: Ancestors,
        stack: &mut Vec<Work>,
        out: &mut W,
    ) -> Result<()> {
        let ptr = match value.unpack() {
            FatPtr::Ref(ptr) => ptr,
            fat => return Ok(write!(out, "{fat}")?),
        };

        let Some(object) = self.heap.allocator().get(ptr) else {
            return Ok(out.write_str(BADVAL)?);
        };

        match object {
            HeapObject::Double(f) => write_double(*f, out)?,
            HeapObject::Str(text) => {
                out.write_char('"')?;
                if self.options.escape_strings {
                    write_escaped(text, out)?;
                } else {
                    out.write_str(text)?;
                }
                out.write_char('"')?;
            }
            HeapObject::Symbol(name) => write!(out, "'{name}'")?,
            HeapObject::Pair(pair) => {
                if ancestors.contains(&ptr) {
                    tracing::debug!(slot = ptr.index(), "refusing to print a cyclic pair");
                    return Err(Error::CycleDetected(value.to_bits()));
                }

                if let Some(max_depth) = self.options.max_depth {
                    if ancestors.len() >= max_depth {
                        tracing::debug!(max_depth, "pair nesting too deep to print");
                        return Err(Error::DepthExceeded(max_depth));
                    }
                }

                let inner = ancestors.update(ptr);

                out.write_char('(')?;
                stack.push(Work::Text(")"));
                stack.push(Work::Value(pair.cdr, inner.clone()));
                stack.push(Work::Text(" . "));
                stack.push(Work::Value(pair.car, inner));
            }
        }

        Ok(())
    }
}

/// Same output as C's `%f`: six fractional digits, `inf` and `nan` spelled
/// in lowercase.
fn write_double<W: Write>(f: f64, out: &mut W) -> std::fmt::Result {
    match f {
        f if f.is_nan() && f.is_sign_negative() => out.write_str("-nan"),
        f if f.is_nan() => out.write_str("nan"),
        f if f == f64::INFINITY => out.write_str("inf"),
        f if f == f64::NEG_INFINITY => out.write_str("-inf"),
        f => write!(out, "{f:.6}"),
    }
}

fn write_escaped<W: Write>(text: &str, out: &mut W) -> std::fmt::Result {
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.write_char('\\')?;
        }
        out.write_char(c)?;
    }
    Ok(())
}

/// Immediates print on their own. A heap reference only shows its slot here,
/// use a [Printer] to see what it points to.
impl Display for FatPtr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FatPtr::Int(n) => write!(f, "{n}"),
            FatPtr::Char(c) => write!(f, "#\\{}", *c as char),
            FatPtr::Bool(true) => write!(f, "#t"),
            FatPtr::Bool(false) => write!(f, "#f"),
            FatPtr::Nil => write!(f, "null"),
            FatPtr::Ref(ptr) => write!(f, "#<heap {}>", ptr.index()),
            FatPtr::Invalid(_) => write!(f, "{BADVAL}"),
        }
    }
}

impl<A: Allocator> Heap<A> {
    pub fn printer(&self, options: PrintOptions) -> Printer<'_, A> {
        Printer::with_options(self, options)
    }

    /// Prints with the default options.
    pub fn print(&self, value: Value) -> Result<String> {
        Printer::new(self).print(value)
    }
}
