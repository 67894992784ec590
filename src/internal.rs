//! Primitives called by generated code. Their names and signatures follow the
//! C runtime header the backend was first written against. Errors cannot
//! cross this boundary, so every failure is logged and turned into
//! [Value::POISON], which prints as `<badval>`.

use std::cell::RefCell;
use std::ffi::CStr;
use std::io::Write;

use libc::{c_char, c_double, c_int};

use crate::error::{Error, Result};
use crate::value::{Heap, Value};

thread_local! {
    static HEAP: RefCell<Heap> = RefCell::new(Heap::new());
}

fn with_heap<T>(f: impl FnOnce(&mut Heap) -> T) -> T {
    HEAP.with(|heap| f(&mut heap.borrow_mut()))
}

fn or_poison(primitive: &'static str, result: Result<Value>) -> Value {
    result.unwrap_or_else(|err| {
        tracing::error!(primitive, %err, "primitive failed");
        Value::POISON
    })
}

/// Borrows a NUL terminated buffer as text. Bytes are never replaced, so
/// anything that is not utf-8 is refused.
fn read_c_str<'a>(ptr: *const c_char) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(Error::NullPointer);
    }

    Ok(unsafe { CStr::from_ptr(ptr) }.to_str()?)
}

#[no_mangle]
pub extern "C" fn prim__int_to_val(value: i64) -> Value {
    or_poison("int_to_val", Value::int(value))
}

#[no_mangle]
pub extern "C" fn prim__val_to_int(value: Value) -> i64 {
    value.as_int().unwrap_or_else(|err| {
        tracing::error!(%err, "val_to_int");
        0
    })
}

#[no_mangle]
pub extern "C" fn prim__char_to_val(value: c_char) -> Value {
    Value::char(value as u8)
}

#[no_mangle]
pub extern "C" fn prim__val_to_char(value: Value) -> c_char {
    value.as_char().unwrap_or_else(|err| {
        tracing::error!(%err, "val_to_char");
        0
    }) as c_char
}

#[no_mangle]
pub extern "C" fn prim__is_int(value: Value) -> c_int {
    value.is_int() as c_int
}

#[no_mangle]
pub extern "C" fn prim__is_bool(value: Value) -> c_int {
    value.is_bool() as c_int
}

#[no_mangle]
pub extern "C" fn prim__is_char(value: Value) -> c_int {
    value.is_char() as c_int
}

#[no_mangle]
pub extern "C" fn prim__is_heap_ptr(value: Value) -> c_int {
    value.is_heap() as c_int
}

#[no_mangle]
pub extern "C" fn prim__box_double(value: c_double) -> Value {
    or_poison("box_double", with_heap(|heap| heap.make_double(value)))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn prim__box_string(text: *const c_char) -> Value {
    let value = read_c_str(text).and_then(|text| with_heap(|heap| heap.make_string(text)));

    or_poison("box_string", value)
}

#[no_mangle]
pub extern "C" fn prim__cons(car: Value, cdr: Value) -> Value {
    or_poison("cons", with_heap(|heap| heap.make_pair(car, cdr)))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn prim__box_symbol(name: *const c_char) -> Value {
    let value = read_c_str(name).and_then(|name| with_heap(|heap| heap.make_symbol(name)));

    or_poison("box_symbol", value)
}

/// Renders a value the same way `prim__print_value` does, without writing it
/// anywhere. Whatever was rendered before a failure is kept.
pub fn render(value: Value) -> String {
    let mut out = String::new();

    with_heap(|heap| {
        if let Err(err) = heap.printer(Default::default()).write(value, &mut out) {
            tracing::error!(%err, "print_value");
        }
    });

    out
}

#[no_mangle]
pub extern "C" fn prim__print_value(value: Value) {
    let text = render(value);
    let mut stdout = std::io::stdout().lock();

    if let Err(err) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
        tracing::error!(%err, "print_value");
    }
}
