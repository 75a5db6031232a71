//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check path shapes (serving path, page and redirect paths)
//! - Validate value ranges (timeouts > 0, buffer size > 0)
//! - Detect duplicate pages
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CmsConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::CmsConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("serving path {0:?} must be empty or start with '/' and not end with '/'")]
    ServingPath(String),

    #[error("{field} {path:?} must start with '/'")]
    RelativePath { field: &'static str, path: String },

    #[error("page {0:?} is defined more than once")]
    DuplicatePage(String),

    #[error("response.buffer_size must be greater than zero")]
    BufferSize,

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &CmsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let serving_path = &config.site.serving_path;
    if !serving_path.is_empty() && (!serving_path.starts_with('/') || serving_path.ends_with('/')) {
        errors.push(ValidationError::ServingPath(serving_path.clone()));
    }

    if let Some(default_page) = &config.site.default_page {
        check_absolute(&mut errors, "site.default_page", default_page);
    }

    let mut seen = HashSet::new();
    for page in &config.site.pages {
        check_absolute(&mut errors, "page path", &page.path);
        if !seen.insert(page.path.as_str()) {
            errors.push(ValidationError::DuplicatePage(page.path.clone()));
        }
    }

    for redirect in &config.site.redirects {
        check_absolute(&mut errors, "redirect source", &redirect.from);
        check_absolute(&mut errors, "redirect target", &redirect.to);
    }

    if config.response.buffer_size == 0 {
        errors.push(ValidationError::BufferSize);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_absolute(errors: &mut Vec<ValidationError>, field: &'static str, path: &str) {
    if !path.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field,
            path: path.to_string(),
        });
    }
}
