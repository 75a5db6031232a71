//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the CMS server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::servlet::response::DEFAULT_BUFFER_SIZE;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CmsConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Content served under the serving path.
    pub site: SiteConfig,

    /// Container response settings.
    pub response: ResponseConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Path prefix the site is mounted under ("" for the root).
    pub serving_path: String,

    /// Page the site root redirects to when no page is defined at "/".
    pub default_page: Option<String>,

    /// Static pages, keyed by path below the serving path.
    pub pages: Vec<PageConfig>,

    /// Redirects, keyed by path below the serving path.
    pub redirects: Vec<RedirectConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            serving_path: "/cms".to_string(),
            default_page: Some("/index.html".to_string()),
            pages: vec![PageConfig {
                path: "/index.html".to_string(),
                content_type: default_content_type(),
                body: "<html><body><h1>It works</h1></body></html>".to_string(),
            }],
            redirects: Vec::new(),
        }
    }
}

/// A static page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageConfig {
    /// Path below the serving path (e.g., "/index.html").
    pub path: String,

    /// MIME type sent with the page.
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Page body.
    pub body: String,
}

fn default_content_type() -> String {
    "text/html; charset=utf-8".to_string()
}

/// A redirect from one site path to another.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedirectConfig {
    /// Path below the serving path that triggers the redirect.
    pub from: String,

    /// Target, relative to the content root.
    pub to: String,
}

/// Container response configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Body bytes buffered before the response commits.
    pub buffer_size: usize,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: CmsConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.site.serving_path, "/cms");
        assert_eq!(config.response.buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn test_parse_site() {
        let config: CmsConfig = toml::from_str(
            r#"
            [site]
            serving_path = "/docs"

            [[site.pages]]
            path = "/a.txt"
            content_type = "text/plain"
            body = "A"

            [[site.pages]]
            path = "/b.html"
            body = "<b/>"

            [[site.redirects]]
            from = "/old"
            to = "/a.txt"
            "#,
        )
        .unwrap();

        assert_eq!(config.site.serving_path, "/docs");
        assert_eq!(config.site.pages.len(), 2);
        assert_eq!(config.site.pages[1].content_type, "text/html; charset=utf-8");
        assert_eq!(config.site.redirects[0].to, "/a.txt");
        // Section-level default keeps the default page even when pages are replaced.
        assert_eq!(config.site.default_page.as_deref(), Some("/index.html"));
    }
}
