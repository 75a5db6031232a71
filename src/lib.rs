//! CMS response layer.
//!
//! The content core writes responses through [`cms::CmsResponse`]; the
//! servlet-style container in [`servlet`] carries them to the client, and
//! [`cms::HttpCmsResponse`] adapts one onto the other for a single request.

pub mod cms;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod servlet;

pub use cms::{CmsResponse, HttpCmsResponse, OriginalResponse, ResponseKind};
pub use config::CmsConfig;
pub use error::TransportError;
pub use http::CmsServer;
pub use lifecycle::Shutdown;
