use std::any::type_name;
use std::fmt::Debug;

use anyhow::Result;
use rouille::Response;

use crate::acontext::AContext;
use crate::aresponse::AResponse;
use crate::http_request_method::HttpRequestMethodSimple;
use crate::http_response_status_codes::HttpResponseStatusCode;
use crate::title::{Action, Title, parse_page_path};


pub trait Handler: Debug + Send + Sync {
    /// Returning Ok(None) means, the handler is refusing to handle
    /// the request. It is to be handled as 404 not found by the
    /// caller. Err means, the handler has accepted to handle the
    /// request but failed to; this will be handled as internal server
    /// error. `pathrest` is the part of the request path after the
    /// prefix the handler was registered under.
    fn call(
        &self,
        context: &AContext,
        method: HttpRequestMethodSimple,
        pathrest: &str)
        -> Result<Option<AResponse>>;
}

// ------------------------------------------------------------------
/// Wraps a page action: validates the full request path with
/// `parse_page_path` and only then calls the action Fn with the
/// title. Invalid paths, and paths for a different action than the
/// one this handler is for, are refused (404) without calling the Fn.
pub struct TitleHandler<F>
where F: Fn(&AContext, HttpRequestMethodSimple, Title) -> Result<AResponse> + Send + Sync
{
    action: Action,
    handler: F
}

impl<F> TitleHandler<F>
where F: Fn(&AContext, HttpRequestMethodSimple, Title) -> Result<AResponse> + Send + Sync
{
    pub fn new(action: Action, handler: F) -> Self {
        Self {
            action,
            handler,
        }
    }
}

impl<F> Handler for TitleHandler<F>
where F: Fn(&AContext, HttpRequestMethodSimple, Title) -> Result<AResponse> + Send + Sync
{
    fn call(
        &self,
        context: &AContext,
        method: HttpRequestMethodSimple,
        _pathrest: &str) -> Result<Option<AResponse>>
    {
        match parse_page_path(context.path_str()) {
            Some((action, title)) if action == self.action =>
                Ok(Some((self.handler)(context, method, title)?)),
            _ => Ok(None)
        }
    }
}

impl<F> Debug for TitleHandler<F>
where F: Fn(&AContext, HttpRequestMethodSimple, Title) -> Result<AResponse> + Send + Sync
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("TitleHandler({:?}, {})",
                                 self.action,
                                 type_name::<F>()))
    }
}

// ------------------------------------------------------------------
/// A Handler that does not allow a path surplus, passing it to the handler Fn.
pub struct ExactFnHandler<F>
where F: Fn(&AContext, HttpRequestMethodSimple) -> Result<AResponse> + Send + Sync
{
    handler: F
}

impl<F> ExactFnHandler<F>
where F: Fn(&AContext, HttpRequestMethodSimple) -> Result<AResponse> + Send + Sync
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> Handler for ExactFnHandler<F>
where F: Fn(&AContext, HttpRequestMethodSimple) -> Result<AResponse> + Send + Sync
{
    fn call(
        &self,
        context: &AContext,
        method: HttpRequestMethodSimple,
        pathrest: &str) -> Result<Option<AResponse>>
    {
        if pathrest.is_empty() {
            Ok(Some((self.handler)(context, method)?))
        } else {
            // refuse to handle if there is a rest (-> 404)
            Ok(None)
        }
    }
}

impl<F> Debug for ExactFnHandler<F>
where F: Fn(&AContext, HttpRequestMethodSimple) -> Result<AResponse> + Send + Sync
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("ExactFnHandler({})",
                                 type_name::<F>()))
    }
}

// ------------------------------------------------------------------
// Redirect handler

pub fn map_redirect(code: HttpResponseStatusCode) -> Option<fn(String) -> Response>
{
    match code {
        // Instructs the client to do GET
        HttpResponseStatusCode::Found302 => Some(Response::redirect_302::<String>),
        _ => None
    }
}

/// Redirects requests for exactly the path it is registered under to
/// a fixed target.
#[derive(Debug)]
pub struct RedirectHandler {
    target: String,
    code: HttpResponseStatusCode,
}

impl RedirectHandler {
    /// Panics immediately when given a `code` that's not a redirect.
    pub fn new(target: String, code: HttpResponseStatusCode) -> Self {
        let _ = map_redirect(code).expect(
            "given code must be a redirect");
        RedirectHandler {
            target,
            code,
        }
    }
}

impl Handler for RedirectHandler {
    fn call(
        &self,
        _context: &AContext,
        _method: HttpRequestMethodSimple,
        pathrest: &str
    ) -> Result<Option<AResponse>> {
        if !pathrest.is_empty() {
            return Ok(None)
        }
        let responder = map_redirect(self.code).expect("already checked earlier");
        Ok(Some(responder(self.target.clone()).into()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use rouille::Request;

    fn call(handler: &dyn Handler, path: &str, pathrest: &str) -> Option<u16> {
        let request = Request::fake_http("GET", path, vec![], vec![]);
        let context = AContext::new(&request).unwrap();
        handler.call(&context, HttpRequestMethodSimple::GET, pathrest).unwrap()
            .map(|r| r.response.status_code)
    }

    #[test]
    fn t_title_handler() {
        let calls = AtomicUsize::new(0);
        let handler = TitleHandler::new(
            Action::View,
            |_context, _method, title: Title| -> Result<AResponse> {
                calls.fetch_add(1, Ordering::SeqCst);
                assert_eq!(title.as_str(), "Foo");
                Ok(Response::text("ok").into())
            });
        assert_eq!(call(&handler, "/view/Foo", "Foo"), Some(200));
        assert_eq!(call(&handler, "/view/Foo/", "Foo/"), None);
        assert_eq!(call(&handler, "/view/../../etc/passwd", "../../etc/passwd"), None);
        assert_eq!(call(&handler, "/view/", ""), None);
        assert_eq!(call(&handler, "/edit/Foo", "Foo"), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn t_exact_fn_handler() {
        let handler = ExactFnHandler::new(
            |_context, _method| -> Result<AResponse> {
                Ok(Response::text("index").into())
            });
        assert_eq!(call(&handler, "/index", ""), Some(200));
        assert_eq!(call(&handler, "/index/x", "/x"), None);
    }

    #[test]
    fn t_redirect_handler() {
        let handler = RedirectHandler::new("/view/FrontPage".into(),
                                           HttpResponseStatusCode::Found302);
        assert_eq!(call(&handler, "/", ""), Some(302));
        assert_eq!(call(&handler, "/foo", "foo"), None);
    }

    #[test]
    #[should_panic]
    fn t_redirect_handler_non_redirect_code() {
        RedirectHandler::new("/".into(), HttpResponseStatusCode::OK200);
    }
}
