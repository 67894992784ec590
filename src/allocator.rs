// This module defines a trait called [Allocator] that owns the storage behind every heap
// reference. The runtime never frees anything by itself: whoever embeds it decides what an
// allocator does with old objects, the default [Arena] just keeps all of them alive.

use crate::error::{Error, Result};
use crate::value::{HeapObject, HeapRef};

pub trait Allocator {
    /// Moves the object into the heap and returns the slot that now holds it.
    fn alloc(&mut self, object: HeapObject) -> Result<HeapRef>;

    fn get(&self, ptr: HeapRef) -> Option<&HeapObject>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A grow-only vector of objects, the slot index is the reference.
#[derive(Debug, Default)]
pub struct Arena {
    objects: Vec<HeapObject>,
    capacity: Option<usize>,
}

impl Arena {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            objects: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl Allocator for Arena {
    fn alloc(&mut self, object: HeapObject) -> Result<HeapRef> {
        let index = self.objects.len();

        if let Some(capacity) = self.capacity {
            if index >= capacity {
                return Err(Error::HeapExhausted { capacity });
            }
        }

        let ptr = HeapRef::new(index)?;

        self.objects.try_reserve(1)?;
        self.objects.push(object);

        Ok(ptr)
    }

    fn get(&self, ptr: HeapRef) -> Option<&HeapObject> {
        let index = usize::try_from(ptr.index()).ok()?;
        self.objects.get(index)
    }

    fn len(&self) -> usize {
        self.objects.len()
    }
}
