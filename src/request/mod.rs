//! Request construction from raw operator input

pub mod builder;

pub use builder::{BuildError, RequestBuilder};
