pub mod adapter;
pub mod error;
pub mod json;
pub mod transport;

pub use crate::core::adapter::{dispatch, ChatAdapter, ChatResponse, MessageStream, ModelRequest};
pub use crate::core::error::{SdkError, TransportError};
pub use crate::core::transport::{ByteStream, HttpTransport, TransportConfig};

// Convenience re-exports of the chat abstraction
pub use crate::types;

#[cfg(test)]
#[path = "../tests/json_tests.rs"]
mod json_tests;

#[cfg(test)]
#[path = "../tests/dispatch_tests.rs"]
mod dispatch_tests;
