//! Response pipeline
//!
//! Raw model text → [`normalizer`] → [`validator`] → typed result, with
//! [`classify`] turning any failure along the way into a user-facing error.

pub mod classify;
pub mod normalizer;
pub mod schemas;
pub mod validator;

pub use classify::classify;
pub use normalizer::{normalize, strip_fences};
pub use validator::{is_hex_color, validate, validate_kind, Schema, SchemaKind, TypedResult};
