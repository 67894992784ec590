//! A plain rust tree that mirrors what a [Value] can hold. It is what the
//! compiler side builds literals from, and what tests compare against.

use super::display::Ancestors;
use super::*;
use crate::allocator::Allocator;
use crate::error::Error;

/// Dropping and comparing walk the tree with a work list, so long lists do
/// not grow the call stack.
#[derive(Debug)]
pub enum Model {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Char(u8),
    Null,
    Symbol(String),
    Pair(Box<Model>, Box<Model>),
}

impl Model {
    pub fn pair(car: Model, cdr: Model) -> Model {
        Model::Pair(Box::new(car), Box::new(cdr))
    }

    pub fn symbol(name: &str) -> Model {
        Model::Symbol(name.to_string())
    }

    /// A `null` terminated chain of pairs holding `items`.
    pub fn list<I>(items: I) -> Model
    where
        I: IntoIterator<Item = Model>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(Model::Null, |tail, head| Model::pair(head, tail))
    }
}

impl Model {
    /// Moves nested pairs out of `self` into `pending`, leaving `Null` behind.
    fn detach(&mut self, pending: &mut Vec<Model>) {
        if let Model::Pair(car, cdr) = self {
            for child in [car, cdr] {
                if let Model::Pair(..) = **child {
                    pending.push(std::mem::replace(&mut **child, Model::Null));
                }
            }
        }
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach(&mut pending);

        while let Some(mut model) = pending.pop() {
            model.detach(&mut pending);
        }
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Model) -> bool {
        let mut work = vec![(self, other)];

        while let Some(step) = work.pop() {
            let same = match step {
                (Model::Pair(a, b), Model::Pair(c, d)) => {
                    work.push((&**b, &**d));
                    work.push((&**a, &**c));
                    true
                }
                (Model::Int(a), Model::Int(b)) => a == b,
                (Model::Float(a), Model::Float(b)) => a == b,
                (Model::String(a), Model::String(b)) => a == b,
                (Model::Bool(a), Model::Bool(b)) => a == b,
                (Model::Char(a), Model::Char(b)) => a == b,
                (Model::Null, Model::Null) => true,
                (Model::Symbol(a), Model::Symbol(b)) => a == b,
                _ => false,
            };

            if !same {
                return false;
            }
        }

        true
    }
}

/// Pops the two finished children of a pair, `car` first.
fn pop_children<T>(done: &mut Vec<T>) -> Result<(T, T)> {
    match (done.pop(), done.pop()) {
        (Some(cdr), Some(car)) => Ok((car, cdr)),
        _ => Err(Error::Internal("pair built before its children")),
    }
}

enum Lower<'m> {
    Visit(&'m Model),
    Build,
}

enum Reify {
    Visit(Value, Ancestors),
    Build,
}

impl<A: Allocator> Heap<A> {
    /// Allocates everything `model` needs and returns its root. Children are
    /// allocated before their parents.
    pub fn lower(&mut self, model: &Model) -> Result<Value> {
        let mut work = vec![Lower::Visit(model)];
        let mut done = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                Lower::Visit(Model::Pair(car, cdr)) => {
                    work.push(Lower::Build);
                    work.push(Lower::Visit(&**cdr));
                    work.push(Lower::Visit(&**car));
                }
                Lower::Visit(leaf) => done.push(self.lower_leaf(leaf)?),
                Lower::Build => {
                    let (car, cdr) = pop_children(&mut done)?;
                    done.push(self.make_pair(car, cdr)?);
                }
            }
        }

        Ok(done.pop().unwrap_or(Value::NULL))
    }

    fn lower_leaf(&mut self, leaf: &Model) -> Result<Value> {
        match leaf {
            Model::Int(n) => Value::int(*n),
            Model::Float(f) => self.make_double(*f),
            Model::String(text) => self.make_string(text),
            Model::Bool(b) => Ok(Value::bool(*b)),
            Model::Char(c) => Ok(Value::char(*c)),
            Model::Null => Ok(Value::NULL),
            Model::Symbol(name) => self.make_symbol(name),
            Model::Pair(..) => Err(Error::Internal("pairs are lowered by the work loop")),
        }
    }

    /// Reads a value back into a tree. Shared pairs are copied once per
    /// path that reaches them; cycles and invalid words are errors.
    pub fn reify(&self, value: Value) -> Result<Model> {
        let mut work = vec![Reify::Visit(value, Ancestors::default())];
        let mut done = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                Reify::Visit(value, ancestors) => {
                    let ptr = match value.unpack() {
                        FatPtr::Int(n) => {
                            done.push(Model::Int(n));
                            continue;
                        }
                        FatPtr::Char(c) => {
                            done.push(Model::Char(c));
                            continue;
                        }
                        FatPtr::Bool(b) => {
                            done.push(Model::Bool(b));
                            continue;
                        }
                        FatPtr::Nil => {
                            done.push(Model::Null);
                            continue;
                        }
                        FatPtr::Invalid(word) => return Err(Error::InvalidValue(word)),
                        FatPtr::Ref(ptr) => ptr,
                    };

                    match self.get(value)? {
                        HeapObject::Double(f) => done.push(Model::Float(*f)),
                        HeapObject::Str(text) => done.push(Model::String(text.to_string())),
                        HeapObject::Symbol(name) => done.push(Model::Symbol(name.to_string())),
                        HeapObject::Pair(pair) => {
                            if ancestors.contains(&ptr) {
                                return Err(Error::CycleDetected(value.to_bits()));
                            }
                            let inner = ancestors.update(ptr);
                            work.push(Reify::Build);
                            work.push(Reify::Visit(pair.cdr, inner.clone()));
                            work.push(Reify::Visit(pair.car, inner));
                        }
                    }
                }
                Reify::Build => {
                    let (car, cdr) = pop_children(&mut done)?;
                    done.push(Model::pair(car, cdr));
                }
            }
        }

        Ok(done.pop().unwrap_or(Model::Null))
    }
}
