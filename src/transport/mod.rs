//! HTTP transport shared by tool packages.

mod http;

pub use http::{HttpTransport, TransportError, TransportOptions};
