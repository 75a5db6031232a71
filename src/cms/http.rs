//! `CmsResponse` over a servlet container response.
//!
//! Every operation is a single delegation onto the wrapped `ServletResponse`.
//! The only composition is the redirect target: locations are given relative
//! to the content root and rebased onto the request's servlet path, so the
//! content core does not need to know where the site is mounted.
//!
//! Locations are concatenated as-is: no slash normalization, no check for
//! `..` segments.

use std::io::Write;

use super::{CmsResponse, OriginalResponse, ResponseKind};
use crate::error::TransportError;
use crate::servlet::{ServletRequest, ServletResponse};

/// HTTP-backed `CmsResponse`, alive for exactly one request cycle.
pub struct HttpCmsResponse<'a, Q, R> {
    req: &'a Q,
    res: &'a mut R,
}

impl<'a, Q, R> HttpCmsResponse<'a, Q, R>
where
    Q: ServletRequest,
    R: ServletResponse,
{
    /// Wrap the container's request/response pair.
    ///
    /// The request is needed to turn CMS redirects into HTTP redirects.
    pub fn new(req: &'a Q, res: &'a mut R) -> Self {
        Self { req, res }
    }

    /// Typed access to the wrapped response.
    pub fn original(&self) -> &R {
        &*self.res
    }

    /// Mutable typed access to the wrapped response.
    pub fn original_mut(&mut self) -> &mut R {
        &mut *self.res
    }
}

impl<Q, R> CmsResponse for HttpCmsResponse<'_, Q, R>
where
    Q: ServletRequest,
    R: ServletResponse,
{
    fn output_stream(&mut self) -> Result<&mut dyn Write, TransportError> {
        self.res.output_stream()
    }

    fn set_content_length(&mut self, len: u64) {
        self.res.set_content_length(len);
    }

    fn set_content_type(&mut self, content_type: &str) {
        self.res.set_content_type(content_type);
    }

    fn send_error(&mut self, code: u16) -> Result<(), TransportError> {
        self.res.send_error(code)
    }

    fn send_error_with_message(&mut self, code: u16, message: &str) -> Result<(), TransportError> {
        self.res.send_error_with_message(code, message)
    }

    fn send_cms_redirect(&mut self, location: &str) -> Result<(), TransportError> {
        let target = format!("{}{}", self.req.servlet_path(), location);
        self.res.send_redirect(&target)
    }

    fn kind(&self) -> ResponseKind {
        ResponseKind::Http
    }

    fn original_response(&self) -> OriginalResponse<'_> {
        OriginalResponse::Http(&*self.res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servlet::{ContainerRequest, ContainerResponse};
    use axum::http::{Request, StatusCode};

    fn request(uri: &str, serving_path: &str) -> ContainerRequest {
        let (parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ContainerRequest::from_parts(&parts, serving_path).unwrap()
    }

    #[test]
    fn test_redirect_against_container() {
        let req = request("/cms/old", "/cms");
        let mut res = ContainerResponse::new(1024);

        let mut cms = HttpCmsResponse::new(&req, &mut res);
        cms.send_cms_redirect("/index.html").unwrap();

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.location(), Some("/cms/index.html"));
    }

    #[test]
    fn test_root_mount_redirect() {
        let req = request("/old", "");
        let mut res = ContainerResponse::new(1024);

        HttpCmsResponse::new(&req, &mut res)
            .send_cms_redirect("/index.html")
            .unwrap();

        assert_eq!(res.location(), Some("/index.html"));
    }

    #[test]
    fn test_body_reaches_container() {
        let req = request("/cms/a", "/cms");
        let mut res = ContainerResponse::new(1024);

        {
            let mut cms = HttpCmsResponse::new(&req, &mut res);
            cms.set_content_type("text/plain");
            cms.set_content_length(5);
            cms.output_stream().unwrap().write_all(b"hello").unwrap();
            assert_eq!(cms.original().body(), b"hello");
        }

        assert_eq!(res.content_type(), Some("text/plain"));
        assert_eq!(res.content_length(), Some(5));
    }

    #[test]
    fn test_container_commit_via_original() {
        let req = request("/cms/a", "/cms");
        let mut res = ContainerResponse::new(1024);
        let mut cms = HttpCmsResponse::new(&req, &mut res);

        cms.original_mut().flush_buffer();

        assert!(matches!(cms.send_error(500), Err(TransportError::Committed)));
        assert!(matches!(
            cms.send_error_with_message(500, "late"),
            Err(TransportError::Committed)
        ));
        assert!(matches!(
            cms.send_cms_redirect("/index.html"),
            Err(TransportError::Committed)
        ));
    }
}
