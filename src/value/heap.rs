//! Boxed values. Everything that does not fit in a word lives in a
//! [HeapObject] owned by the [Heap], and is referred to by a [Value] whose
//! discriminant is `000`.

use super::*;
use crate::allocator::{Allocator, Arena};
use crate::error::Error;

/// A boxed value. The variant is fixed at construction, so there is no way
/// to read the payload of a different one.
#[derive(Debug, Clone, PartialEq)]
pub enum HeapObject {
    Double(f64),
    Str(Box<str>),
    Pair(Pair),
    Symbol(Box<str>),
}

/// Struct that represents a `cons cell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub car: Value,
    pub cdr: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Double,
    String,
    Pair,
    Symbol,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Double => "double",
            Kind::String => "string",
            Kind::Pair => "pair",
            Kind::Symbol => "symbol",
        }
    }
}

impl HeapObject {
    pub fn kind(&self) -> Kind {
        match self {
            HeapObject::Double(_) => Kind::Double,
            HeapObject::Str(_) => Kind::String,
            HeapObject::Pair(_) => Kind::Pair,
            HeapObject::Symbol(_) => Kind::Symbol,
        }
    }
}

impl Pair {
    pub fn new(car: Value, cdr: Value) -> Pair {
        Pair { car, cdr }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapConfig {
    /// Maximum number of live objects, unbounded when `None`.
    pub capacity: Option<usize>,
}

/// The owner of every boxed value. Objects are never mutated after they are
/// built and are only dropped together with the heap.
#[derive(Debug, Default)]
pub struct Heap<A: Allocator = Arena> {
    allocator: A,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &HeapConfig) -> Self {
        Self::with_allocator(Arena::new(config.capacity))
    }
}

impl<A: Allocator> Heap<A> {
    pub fn with_allocator(allocator: A) -> Self {
        Self { allocator }
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub fn len(&self) -> usize {
        self.allocator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocator.is_empty()
    }

    fn alloc(&mut self, object: HeapObject) -> Result<Value> {
        let kind = object.kind();

        let ptr = self.allocator.alloc(object).map_err(|err| {
            tracing::debug!(kind = kind.name(), %err, "allocation failed");
            err
        })?;

        tracing::trace!(kind = kind.name(), slot = ptr.index(), "allocated");
        Ok(ptr.into())
    }

    pub fn make_double(&mut self, value: f64) -> Result<Value> {
        self.alloc(HeapObject::Double(value))
    }

    /// Copies `text` into the heap, the caller keeps its buffer.
    pub fn make_string(&mut self, text: &str) -> Result<Value> {
        self.alloc(HeapObject::Str(copy_str(text)?))
    }

    /// Both handles are stored as they are. Nothing stops `car` or `cdr`
    /// from leading back to the new pair later on, the printer checks that.
    pub fn make_pair(&mut self, car: Value, cdr: Value) -> Result<Value> {
        self.alloc(HeapObject::Pair(Pair::new(car, cdr)))
    }

    /// Symbols are not interned: two calls with the same name give two
    /// different objects.
    pub fn make_symbol(&mut self, name: &str) -> Result<Value> {
        self.alloc(HeapObject::Symbol(copy_str(name)?))
    }

    /// Builds a `null` terminated chain of pairs.
    pub fn make_list(&mut self, items: &[Value]) -> Result<Value> {
        items
            .iter()
            .rev()
            .try_fold(Value::NULL, |tail, head| self.make_pair(*head, tail))
    }

    /// Like [Value::tag], but references to slots this heap never handed out
    /// are [Tag::Invalid].
    pub fn classify(&self, value: Value) -> Tag {
        match value.unpack() {
            FatPtr::Ref(ptr) if self.allocator.get(ptr).is_none() => Tag::Invalid,
            fat => fat.tag(),
        }
    }

    pub fn get(&self, value: Value) -> Result<&HeapObject> {
        match value.unpack() {
            FatPtr::Ref(ptr) => self
                .allocator
                .get(ptr)
                .ok_or(Error::DanglingReference(value.0)),
            _ => Err(Error::NotHeap(value.0)),
        }
    }

    pub fn double(&self, value: Value) -> Result<f64> {
        match self.get(value)? {
            HeapObject::Double(f) => Ok(*f),
            other => Err(kind_mismatch(Kind::Double, other)),
        }
    }

    pub fn string(&self, value: Value) -> Result<&str> {
        match self.get(value)? {
            HeapObject::Str(text) => Ok(text),
            other => Err(kind_mismatch(Kind::String, other)),
        }
    }

    pub fn pair(&self, value: Value) -> Result<Pair> {
        match self.get(value)? {
            HeapObject::Pair(pair) => Ok(*pair),
            other => Err(kind_mismatch(Kind::Pair, other)),
        }
    }

    pub fn symbol(&self, value: Value) -> Result<&str> {
        match self.get(value)? {
            HeapObject::Symbol(name) => Ok(name),
            other => Err(kind_mismatch(Kind::Symbol, other)),
        }
    }
}

/// Copies a payload, reporting allocation failure instead of aborting.
fn copy_str(text: &str) -> Result<Box<str>> {
    let mut copy = String::new();
    copy.try_reserve_exact(text.len())?;
    copy.push_str(text);
    Ok(copy.into_boxed_str())
}

fn kind_mismatch(expected: Kind, found: &HeapObject) -> Error {
    Error::TypeMismatch {
        expected: expected.name(),
        found: found.kind().name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double() {
        let mut heap = Heap::new();
        let value = heap.make_double(2.5).unwrap();

        assert!(value.is_heap());
        assert_eq!(heap.classify(value), Tag::HeapReference);
        assert_eq!(heap.double(value).unwrap(), 2.5);
    }

    #[test]
    fn test_string_is_copied() {
        let mut heap = Heap::new();
        let mut buffer = String::from("hi");

        let value = heap.make_string(&buffer).unwrap();
        buffer.push_str(" there");

        assert_eq!(heap.string(value).unwrap(), "hi");
    }

    #[test]
    fn test_copy_str() {
        let copy = copy_str("héllo").unwrap();

        assert_eq!(&*copy, "héllo");
        assert_eq!(copy.len(), "héllo".len());
    }

    #[test]
    fn test_failed_reservation_is_typed() {
        let refused = String::new().try_reserve_exact(usize::MAX).unwrap_err();

        assert_eq!(Error::from(refused), Error::AllocationFailed);
    }

    #[test]
    fn test_pair_keeps_handles() {
        let mut heap = Heap::new();
        let inner = heap.make_symbol("x").unwrap();
        let one = Value::int(1).unwrap();

        let pair = heap.make_pair(one, inner).unwrap();

        assert_eq!(heap.pair(pair).unwrap(), Pair::new(one, inner));
    }

    #[test]
    fn test_symbols_are_not_interned() {
        let mut heap = Heap::new();
        let a = heap.make_symbol("x").unwrap();
        let b = heap.make_symbol("x").unwrap();

        assert_ne!(a, b);
        assert_eq!(heap.symbol(a).unwrap(), heap.symbol(b).unwrap());
    }

    #[test]
    fn test_wrong_kind() {
        let mut heap = Heap::new();
        let value = heap.make_string("s").unwrap();

        assert_eq!(
            heap.pair(value),
            Err(Error::TypeMismatch {
                expected: "pair",
                found: "string"
            })
        );
        assert!(heap.symbol(value).is_err());
        assert!(heap.double(value).is_err());
    }

    #[test]
    fn test_not_heap() {
        let heap = Heap::new();

        assert_eq!(heap.get(Value::NULL), Err(Error::NotHeap(NULL)));
        assert_eq!(heap.classify(Value::NULL), Tag::Null);
        assert_eq!(heap.classify(Value::TRUE), Tag::Boolean);
    }

    #[test]
    fn test_dangling_reference_is_invalid() {
        let heap = Heap::new();
        let dangling = Value::from_bits(8 << 3);

        assert_eq!(dangling.tag(), Tag::HeapReference);
        assert_eq!(heap.classify(dangling), Tag::Invalid);
        assert_eq!(heap.get(dangling), Err(Error::DanglingReference(8 << 3)));
    }

    #[test]
    fn test_capacity() {
        let mut heap = Heap::with_config(&HeapConfig { capacity: Some(2) });

        heap.make_double(1.0).unwrap();
        heap.make_double(2.0).unwrap();

        assert_eq!(
            heap.make_double(3.0),
            Err(Error::HeapExhausted { capacity: 2 })
        );
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_make_list() {
        let mut heap = Heap::new();
        let items = [Value::int(1).unwrap(), Value::int(2).unwrap()];

        let list = heap.make_list(&items).unwrap();
        let first = heap.pair(list).unwrap();
        let second = heap.pair(first.cdr).unwrap();

        assert_eq!(first.car, items[0]);
        assert_eq!(second.car, items[1]);
        assert_eq!(second.cdr, Value::NULL);
        assert_eq!(heap.make_list(&[]).unwrap(), Value::NULL);
    }
}
