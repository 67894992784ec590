use super::tagged::Tagged;
use super::*;

/// Index of a slot inside of a [Heap]. Encoded in the upper 61 bits of a
/// word whose discriminant is `000`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct HeapRef(pub(crate) u64);

/// Null value.
#[derive(Clone, PartialEq, Eq, Copy, Debug)]
pub struct Nil;

/// "Fat" tagged pointer (that uses 16 bytes) that is easier to work with in
/// the rust side. Every word maps to exactly one variant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FatPtr {
    Int(i64),
    Char(u8),
    Bool(bool),
    Nil,
    Ref(HeapRef),
    Invalid(u64),
}

impl HeapRef {
    /// Fails when the index does not fit in the 61 bits left by the tag.
    pub fn new(index: usize) -> Result<HeapRef> {
        let ptr = HeapRef(index as u64);
        ptr.check()?;
        Ok(ptr)
    }

    pub fn index(self) -> u64 {
        self.0
    }
}

impl From<HeapRef> for Value {
    fn from(ptr: HeapRef) -> Self {
        Value(ptr.pack())
    }
}

impl FatPtr {
    pub fn tag(&self) -> Tag {
        match self {
            FatPtr::Int(_) => Tag::Integer,
            FatPtr::Char(_) => Tag::Character,
            FatPtr::Bool(_) => Tag::Boolean,
            FatPtr::Nil => Tag::Null,
            FatPtr::Ref(_) => Tag::HeapReference,
            FatPtr::Invalid(_) => Tag::Invalid,
        }
    }
}

impl From<Value> for FatPtr {
    fn from(value: Value) -> Self {
        match value.tag() {
            Tag::Integer => FatPtr::Int(i64::unpack(value.0)),
            Tag::Character => FatPtr::Char(u8::unpack(value.0)),
            Tag::Boolean => FatPtr::Bool(bool::unpack(value.0)),
            Tag::Null => FatPtr::Nil,
            Tag::HeapReference => FatPtr::Ref(HeapRef::unpack(value.0)),
            Tag::Invalid => FatPtr::Invalid(value.0),
        }
    }
}

impl Value {
    pub fn unpack(self) -> FatPtr {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_immediates() {
        assert_eq!(Value::int(-42).unwrap().unpack(), FatPtr::Int(-42));
        assert_eq!(Value::char(b'z').unpack(), FatPtr::Char(b'z'));
        assert_eq!(Value::TRUE.unpack(), FatPtr::Bool(true));
        assert_eq!(Value::FALSE.unpack(), FatPtr::Bool(false));
        assert_eq!(Value::NULL.unpack(), FatPtr::Nil);
    }

    #[test]
    fn test_unpack_ref() {
        let value: Value = HeapRef(3).into();

        assert_eq!(value.unpack(), FatPtr::Ref(HeapRef(3)));
        assert_eq!(value.unpack().tag(), Tag::HeapReference);
    }

    #[test]
    fn test_unpack_invalid_keeps_word() {
        assert_eq!(Value::POISON.unpack(), FatPtr::Invalid(POISON));
        assert_eq!(Value::from_bits(0x1c).unpack(), FatPtr::Invalid(0x1c));
    }

    #[test]
    fn test_debug_uses_fat_view() {
        assert_eq!(format!("{:?}", Value::int(7).unwrap()), "Int(7)");
        assert_eq!(format!("{:?}", Value::NULL), "Nil");
    }
}
