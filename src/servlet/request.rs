//! Incoming request as seen by the CMS.
//!
//! # Responsibilities
//! - Split the request path into servlet path and path info
//! - Keep method and headers for the content core

use axum::http::{request::Parts, HeaderMap, Method, Uri};

use super::ServletRequest;

/// A request routed to the CMS mount point.
#[derive(Debug, Clone)]
pub struct ContainerRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    servlet_path: String,
    path_info: String,
}

impl ContainerRequest {
    /// Build a request from axum parts.
    ///
    /// Returns `None` when the path is not below `serving_path`.
    pub fn from_parts(parts: &Parts, serving_path: &str) -> Option<Self> {
        let path_info = split_serving_path(parts.uri.path(), serving_path)?;
        Some(Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            servlet_path: serving_path.to_string(),
            path_info: path_info.to_string(),
        })
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl ServletRequest for ContainerRequest {
    fn servlet_path(&self) -> &str {
        &self.servlet_path
    }

    fn path_info(&self) -> &str {
        &self.path_info
    }

    fn method(&self) -> &Method {
        &self.method
    }
}

/// Strip the serving path from `path`, matching on whole segments.
///
/// `/cms` serves `/cms` and `/cms/...` but not `/cmsx`. The remainder is
/// always absolute; the mount point itself maps to `/`.
pub fn split_serving_path<'p>(path: &'p str, serving_path: &str) -> Option<&'p str> {
    if serving_path.is_empty() {
        return Some(if path.is_empty() { "/" } else { path });
    }

    let rest = path.strip_prefix(serving_path)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
