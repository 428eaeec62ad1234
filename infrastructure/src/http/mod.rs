//! HTTP chat backend adapter
//!
//! [`HttpChatTransport`] implements the
//! [`ChatTransport`](chatline_application::ChatTransport) port over
//! `reqwest`, decoding streamed replies with the domain
//! [`StreamDecoder`](chatline_domain::StreamDecoder).

mod body;
mod protocol;
mod transport;

pub use protocol::{GENERIC_FAILURE, INVALID_RESPONSE};
pub use transport::{HttpChatTransport, HttpTransportConfig};
