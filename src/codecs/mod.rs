//! Decoding of the newline-delimited input handed over by the upstream agent.

mod json;

pub use self::json::{DecodeError, JsonDeserializer};
