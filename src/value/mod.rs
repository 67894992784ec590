//! This module describes the values that generated code manipulates.
//! [Value] uses a pointer tagging scheme: every word is 8 byte aligned on
//! a 64 bit architecture, so the low three bits are free to say what the
//! rest of the word holds.
//!
//! | low bits | meaning                                          |
//! |----------|--------------------------------------------------|
//! | `001`    | 61 bit signed integer in the upper bits          |
//! | `010`    | `#f`                                             |
//! | `110`    | `#t`                                             |
//! | `011`    | single byte character in bits 3..11              |
//! | `000`    | reference to a [HeapObject] slot                 |
//! | `100`    | `null` (only the exact word `0x14`)              |
//! | other    | invalid                                          |

use std::fmt::Debug;

pub use self::display::{PrintOptions, Printer};
pub use self::heap::{Heap, HeapConfig, HeapObject, Kind, Pair};
pub use self::model::Model;
pub use self::pointer::{FatPtr, HeapRef, Nil};

use self::tagged::Tagged;
use crate::error::Result;

pub mod display;
pub mod heap;
pub mod model;
pub mod pointer;

mod tagged;

pub const TAG_MASK: u64 = 0b111;
pub const MASK: u64 = !TAG_MASK;

pub const HEAP: u64 = 0b000;
pub const INT: u64 = 0b001;
pub const FALSE: u64 = 0b010;
pub const CHAR: u64 = 0b011;
pub const NIL: u64 = 0b100;
pub const TRUE: u64 = 0b110;

/// The null sentinel. Its discriminant is `100`, which no heap reference
/// can carry.
pub const NULL: u64 = 0x14;

/// Returned by the C primitives when an operation fails.
pub const POISON: u64 = 0b111;

pub const INT_MIN: i64 = -(1 << 60);
pub const INT_MAX: i64 = (1 << 60) - 1;

/// A pointer tagged value. Each of the categories that it can assume is
/// described in [Tag].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Value(pub(crate) u64);

/// The category of a [Value], read from its discriminant bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Integer,
    Boolean,
    Character,
    Null,
    HeapReference,
    Invalid,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Integer => "integer",
            Tag::Boolean => "boolean",
            Tag::Character => "character",
            Tag::Null => "null",
            Tag::HeapReference => "heap reference",
            Tag::Invalid => "invalid value",
        }
    }
}

impl Value {
    pub const TRUE: Value = Value(TRUE);
    pub const FALSE: Value = Value(FALSE);
    pub const NULL: Value = Value(NULL);
    pub const POISON: Value = Value(POISON);

    /// Reinterprets a raw machine word. Nothing is checked: the result may
    /// well classify as [Tag::Invalid].
    pub const fn from_bits(bits: u64) -> Value {
        Value(bits)
    }

    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Classifies the word by its bits alone. Heap references are not
    /// checked against any heap, see [Heap::classify] for that.
    pub fn tag(self) -> Tag {
        match self.0 & TAG_MASK {
            INT => Tag::Integer,
            FALSE if self.0 == FALSE => Tag::Boolean,
            TRUE if self.0 == TRUE => Tag::Boolean,
            CHAR if self.0 >> 11 == 0 => Tag::Character,
            HEAP => Tag::HeapReference,
            NIL if self.0 == NULL => Tag::Null,
            _ => Tag::Invalid,
        }
    }

    /// Encodes an immediate integer, failing outside of `INT_MIN..=INT_MAX`.
    pub fn int(value: i64) -> Result<Value> {
        value.tag()
    }

    pub fn char(value: u8) -> Value {
        Value(value.pack())
    }

    pub fn bool(value: bool) -> Value {
        Value(value.pack())
    }

    pub fn as_int(self) -> Result<i64> {
        i64::untag(self)
    }

    pub fn as_char(self) -> Result<u8> {
        u8::untag(self)
    }

    pub fn as_bool(self) -> Result<bool> {
        bool::untag(self)
    }

    pub fn as_heap_ref(self) -> Result<HeapRef> {
        HeapRef::untag(self)
    }

    #[inline]
    pub fn is_int(self) -> bool {
        self.tag() == Tag::Integer
    }

    #[inline]
    pub fn is_bool(self) -> bool {
        self.tag() == Tag::Boolean
    }

    #[inline]
    pub fn is_char(self) -> bool {
        self.tag() == Tag::Character
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == NULL
    }

    #[inline]
    pub fn is_heap(self) -> bool {
        self.tag() == Tag::HeapReference
    }
}

impl TryFrom<i64> for Value {
    type Error = crate::error::Error;

    fn try_from(value: i64) -> Result<Self> {
        Value::int(value)
    }
}

impl TryFrom<char> for Value {
    type Error = crate::error::Error;

    fn try_from(value: char) -> Result<Self> {
        u8::try_from(value)
            .map(Value::char)
            .map_err(|_| crate::error::Error::CharacterOutOfRange(value))
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::char(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::bool(value)
    }
}

impl From<Nil> for Value {
    fn from(_: Nil) -> Self {
        Value::NULL
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.unpack())
    }
}
