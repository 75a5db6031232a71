//! Transport failure type shared by the container and the CMS layer.
//!
//! Every failure the response stack can report belongs to one category:
//! the underlying transport could not complete the operation. The variants
//! only describe *why*, so callers can match on the cause when they care and
//! treat it as a plain I/O error when they don't.

use thiserror::Error;

/// A transport I/O failure.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Status and headers were already sent.
    #[error("response already committed")]
    Committed,

    /// The response was completed by an error or a redirect; no stream is available.
    #[error("response stream closed")]
    Closed,

    /// The status code cannot be expressed on the wire.
    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    /// A header value contains bytes that are not allowed on the wire.
    #[error("invalid header value: {0:?}")]
    InvalidHeader(String),

    /// Writing to the underlying sink failed.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TransportError> for std::io::Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Io(e) => e,
            TransportError::InvalidStatus(_) | TransportError::InvalidHeader(_) => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
            }
            TransportError::Committed | TransportError::Closed => {
                std::io::Error::new(std::io::ErrorKind::Other, err)
            }
        }
    }
}
