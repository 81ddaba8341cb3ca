//! Byte and bit conversion helpers.

pub mod bits;
pub mod converter;
