//! Content core: maps site paths onto pages and redirects.
//!
//! # Responsibilities
//! - Serve configured pages (`GET`, `HEAD`)
//! - Issue CMS redirects for configured aliases and the site root
//! - Report unknown paths and unsupported methods as errors
//!
//! # Design Decisions
//! - Works against `CmsResponse` only, so the same site renders over HTTP
//!   and into static exports
//! - Paths are relative to the serving path; redirects stay relative to the
//!   content root and the response rebases them

use std::collections::HashMap;
use std::io::Write;

use axum::http::{Method, StatusCode};

use super::CmsResponse;
use crate::config::SiteConfig;
use crate::error::TransportError;

/// What the site did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Page,
    Redirect,
    NotFound,
    MethodNotAllowed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Page => "page",
            Outcome::Redirect => "redirect",
            Outcome::NotFound => "not_found",
            Outcome::MethodNotAllowed => "method_not_allowed",
        }
    }
}

#[derive(Debug, Clone)]
struct Page {
    content_type: String,
    body: String,
}

/// An in-memory site.
#[derive(Debug, Clone, Default)]
pub struct Site {
    pages: HashMap<String, Page>,
    redirects: HashMap<String, String>,
    default_page: Option<String>,
}

impl Site {
    pub fn from_config(config: &SiteConfig) -> Self {
        let pages = config
            .pages
            .iter()
            .map(|p| {
                (
                    p.path.clone(),
                    Page {
                        content_type: p.content_type.clone(),
                        body: p.body.clone(),
                    },
                )
            })
            .collect();

        let redirects = config
            .redirects
            .iter()
            .map(|r| (r.from.clone(), r.to.clone()))
            .collect();

        Self {
            pages,
            redirects,
            default_page: config.default_page.clone(),
        }
    }

    /// Number of pages served by this site.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Answer `method path` through `res`.
    pub fn serve(
        &self,
        method: &Method,
        path: &str,
        res: &mut dyn CmsResponse,
    ) -> Result<Outcome, TransportError> {
        if *method != Method::GET && *method != Method::HEAD {
            res.send_error(StatusCode::METHOD_NOT_ALLOWED.as_u16())?;
            return Ok(Outcome::MethodNotAllowed);
        }

        if let Some(page) = self.pages.get(path) {
            res.set_content_type(&page.content_type);
            res.set_content_length(page.body.len() as u64);
            if *method != Method::HEAD {
                res.output_stream()?.write_all(page.body.as_bytes())?;
            }
            return Ok(Outcome::Page);
        }

        if let Some(target) = self.redirects.get(path) {
            res.send_cms_redirect(target)?;
            return Ok(Outcome::Redirect);
        }

        if path == "/" {
            if let Some(default_page) = &self.default_page {
                res.send_cms_redirect(default_page)?;
                return Ok(Outcome::Redirect);
            }
        }

        res.send_error_with_message(
            StatusCode::NOT_FOUND.as_u16(),
            &format!("The resource {path} was not found on this server."),
        )?;
        Ok(Outcome::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::{ExportResponse, OriginalResponse};
    use crate::config::{PageConfig, RedirectConfig};

    fn site() -> Site {
        Site::from_config(&SiteConfig {
            serving_path: "/cms".into(),
            default_page: Some("/index.html".into()),
            pages: vec![PageConfig {
                path: "/index.html".into(),
                content_type: "text/html".into(),
                body: "<h1>home</h1>".into(),
            }],
            redirects: vec![RedirectConfig {
                from: "/home".into(),
                to: "/index.html".into(),
            }],
        })
    }

    fn record(res: &ExportResponse<Vec<u8>>) -> crate::cms::ExportRecord {
        match res.original_response() {
            OriginalResponse::Export(record) => record.clone(),
            OriginalResponse::Http(_) => panic!("expected export record"),
        }
    }

    #[test]
    fn test_serves_page() {
        let mut res = ExportResponse::new(Vec::new());
        let outcome = site().serve(&Method::GET, "/index.html", &mut res).unwrap();
        assert_eq!(outcome, Outcome::Page);

        let (record, body) = res.finish().unwrap();
        assert_eq!(body, b"<h1>home</h1>");
        assert_eq!(record.content_type.as_deref(), Some("text/html"));
        assert_eq!(record.content_length, Some(13));
    }

    #[test]
    fn test_head_skips_body() {
        let mut res = ExportResponse::new(Vec::new());
        site().serve(&Method::HEAD, "/index.html", &mut res).unwrap();

        let (record, body) = res.finish().unwrap();
        assert!(body.is_empty());
        assert_eq!(record.content_length, Some(13));
    }

    #[test]
    fn test_redirects() {
        let mut res = ExportResponse::new(Vec::new());
        assert_eq!(site().serve(&Method::GET, "/home", &mut res).unwrap(), Outcome::Redirect);
        assert_eq!(record(&res).redirect.as_deref(), Some("/index.html"));

        let mut res = ExportResponse::new(Vec::new());
        assert_eq!(site().serve(&Method::GET, "/", &mut res).unwrap(), Outcome::Redirect);
        assert_eq!(record(&res).redirect.as_deref(), Some("/index.html"));
    }

    #[test]
    fn test_errors() {
        let mut res = ExportResponse::new(Vec::new());
        assert_eq!(site().serve(&Method::GET, "/nope", &mut res).unwrap(), Outcome::NotFound);
        assert_eq!(record(&res).status, 404);

        let mut res = ExportResponse::new(Vec::new());
        assert_eq!(
            site().serve(&Method::POST, "/index.html", &mut res).unwrap(),
            Outcome::MethodNotAllowed
        );
        assert_eq!(record(&res).status, 405);
    }
}
