//! Security utilities shared by the auth paths

pub mod timing;

pub use timing::{constant_time_eq, constant_time_eq_bytes, AuthTimer};
