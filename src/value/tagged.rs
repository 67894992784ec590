//! The bit level codec. Nothing outside of [crate::value] should look at the
//! raw bits of a word, everything goes through [Tagged].

use super::*;
use crate::error::Error;

pub(crate) trait Tagged
where
    Self: Sized + Copy,
{
    const TAG: Tag;

    /// Packs a payload that is known to be representable.
    fn pack(self) -> u64;

    /// Unpacks a word that is known to carry [Self::TAG].
    fn unpack(word: u64) -> Self;

    fn check(self) -> Result<()> {
        Ok(())
    }

    fn tag(self) -> Result<Value> {
        self.check()?;
        Ok(Value(self.pack()))
    }

    fn untag(value: Value) -> Result<Self> {
        match value.tag() {
            found if found == Self::TAG => Ok(Self::unpack(value.0)),
            found => Err(Error::mismatch(Self::TAG, found)),
        }
    }
}

impl Tagged for i64 {
    const TAG: Tag = Tag::Integer;

    fn pack(self) -> u64 {
        ((self << 3) as u64) | INT
    }

    fn unpack(word: u64) -> Self {
        (word as i64) >> 3
    }

    fn check(self) -> Result<()> {
        if (INT_MIN..=INT_MAX).contains(&self) {
            Ok(())
        } else {
            Err(Error::IntegerOutOfRange(self))
        }
    }
}

impl Tagged for u8 {
    const TAG: Tag = Tag::Character;

    fn pack(self) -> u64 {
        ((self as u64) << 3) | CHAR
    }

    fn unpack(word: u64) -> Self {
        (word >> 3) as u8
    }
}

impl Tagged for bool {
    const TAG: Tag = Tag::Boolean;

    fn pack(self) -> u64 {
        if self {
            TRUE
        } else {
            FALSE
        }
    }

    fn unpack(word: u64) -> Self {
        word == TRUE
    }
}

impl Tagged for Nil {
    const TAG: Tag = Tag::Null;

    fn pack(self) -> u64 {
        NULL
    }

    fn unpack(_: u64) -> Self {
        Nil
    }
}

impl Tagged for HeapRef {
    const TAG: Tag = Tag::HeapReference;

    fn pack(self) -> u64 {
        self.0 << 3
    }

    fn unpack(word: u64) -> Self {
        HeapRef(word >> 3)
    }

    fn check(self) -> Result<()> {
        if self.0 >> 61 == 0 {
            Ok(())
        } else {
            Err(Error::HeapExhausted {
                capacity: usize::try_from(1u64 << 61).unwrap_or(usize::MAX),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_int() {
        let tagged = 42i64.tag().unwrap();

        assert_eq!(tagged.0, (42 << 3) | INT);
        assert_eq!(i64::untag(tagged).unwrap(), 42);
    }

    #[test]
    fn test_negative_int() {
        let tagged = (-1i64).tag().unwrap();

        assert_eq!(tagged.0 & TAG_MASK, INT);
        assert_eq!(i64::untag(tagged).unwrap(), -1);
    }

    #[test]
    fn test_int_bounds() {
        for n in [0, 1, -1, INT_MAX, INT_MIN] {
            assert_eq!(i64::untag(n.tag().unwrap()).unwrap(), n);
        }

        assert_eq!(
            (INT_MAX + 1).tag(),
            Err(Error::IntegerOutOfRange(INT_MAX + 1))
        );
        assert_eq!(
            (INT_MIN - 1).tag(),
            Err(Error::IntegerOutOfRange(INT_MIN - 1))
        );
        assert!(i64::MAX.tag().is_err());
        assert!(i64::MIN.tag().is_err());
    }

    #[test]
    fn test_char() {
        let tagged = b'a'.tag().unwrap();

        assert_eq!(tagged.0, ((b'a' as u64) << 3) | CHAR);
        assert_eq!(u8::untag(tagged).unwrap(), b'a');
    }

    #[test]
    fn test_bool() {
        assert_eq!(true.tag().unwrap(), Value::TRUE);
        assert_eq!(false.tag().unwrap(), Value::FALSE);
        assert!(bool::untag(Value::TRUE).unwrap());
        assert!(!bool::untag(Value::FALSE).unwrap());
    }

    #[test]
    fn test_nil() {
        let tagged = Nil.tag().unwrap();

        assert_eq!(tagged.0, NULL);
        assert_eq!(Nil::untag(tagged).unwrap(), Nil);
    }

    #[test]
    fn test_heap_ref() {
        let tagged = HeapRef(7).tag().unwrap();

        assert_eq!(tagged.0 & TAG_MASK, HEAP);
        assert_eq!(HeapRef::untag(tagged).unwrap(), HeapRef(7));
        assert!(HeapRef(1 << 61).tag().is_err());
    }

    #[test]
    fn test_untag_mismatch() {
        assert!(u8::untag(Value::NULL).is_err());
        assert!(Nil::untag(Value::FALSE).is_err());
        assert!(HeapRef::untag(Value::POISON).is_err());
    }

    proptest! {
        #[test]
        fn prop_int_roundtrip(i in INT_MIN..=INT_MAX) {
            let v = i.tag().unwrap();
            prop_assert_eq!(v.tag(), Tag::Integer);
            prop_assert_eq!(i64::untag(v).unwrap(), i);
        }

        #[test]
        fn prop_int_out_of_range_fails(i in proptest::num::i64::ANY) {
            prop_assume!(!(INT_MIN..=INT_MAX).contains(&i));
            prop_assert_eq!(i.tag(), Err(Error::IntegerOutOfRange(i)));
        }

        #[test]
        fn prop_char_roundtrip(c in proptest::num::u8::ANY) {
            let v = c.tag().unwrap();
            prop_assert_eq!(v.tag(), Tag::Character);
            prop_assert_eq!(u8::untag(v).unwrap(), c);
        }

        #[test]
        fn prop_classify_is_total(bits in proptest::num::u64::ANY) {
            let tag = Value::from_bits(bits).tag();
            match bits & TAG_MASK {
                INT => {
                    prop_assert_eq!(tag, Tag::Integer);
                }
                HEAP => {
                    prop_assert_eq!(tag, Tag::HeapReference);
                }
                0b101 | 0b111 => {
                    prop_assert_eq!(tag, Tag::Invalid);
                }
                _ => {}
            }
        }
    }
}
