mod ffi;
mod library;
mod real;

pub(crate) use real::*;
