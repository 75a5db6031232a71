//! Container-side request/response primitives.
//!
//! # Data Flow
//! ```text
//! axum request
//!     → request.rs (ContainerRequest: serving path + path info)
//!     → [CMS layer writes through the adapter]
//!     → response.rs (ContainerResponse: buffering, commit, errors, redirects)
//!     → axum response
//! ```
//!
//! # Design Decisions
//! - The traits are the seam the CMS adapter depends on; tests plug in
//!   recording implementations
//! - Responses follow servlet commit semantics: once committed, status and
//!   headers are frozen and errors/redirects fail

pub mod request;
pub mod response;

use std::io::Write;

use axum::http::Method;

use crate::error::TransportError;

pub use request::ContainerRequest;
pub use response::ContainerResponse;

/// Request side of the container contract.
pub trait ServletRequest {
    /// Path prefix the application is mounted under (empty when mounted at the root).
    fn servlet_path(&self) -> &str;

    /// Remainder of the request path below the servlet path.
    fn path_info(&self) -> &str;

    /// HTTP method of the request.
    fn method(&self) -> &Method;
}

/// Response side of the container contract.
pub trait ServletResponse {
    /// Writer for the response body.
    fn output_stream(&mut self) -> Result<&mut dyn Write, TransportError>;

    /// Declare the number of body bytes.
    fn set_content_length(&mut self, len: u64);

    /// Set the MIME type of the body.
    fn set_content_type(&mut self, content_type: &str);

    /// Send an error status to the client and complete the response.
    fn send_error(&mut self, code: u16) -> Result<(), TransportError>;

    /// Send an error status with a human-readable message and complete the response.
    fn send_error_with_message(&mut self, code: u16, message: &str) -> Result<(), TransportError>;

    /// Redirect the client to `location` and complete the response.
    fn send_redirect(&mut self, location: &str) -> Result<(), TransportError>;

    /// Content length currently declared on the response.
    fn content_length(&self) -> Option<u64>;

    /// Content type currently declared on the response.
    fn content_type(&self) -> Option<&str>;

    /// Whether status and headers have already been sent.
    fn is_committed(&self) -> bool;
}
