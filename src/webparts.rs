//! The page handlers and the glue turning them into a rouille server
//! handler.

use std::sync::{Arc, Mutex};

use anyhow::{Result, Context, anyhow};
use rouille::{Request, Response};

use crate::acontext::{AContext, FormEncoding};
use crate::apachelog::{Logs, log_combined};
use crate::aresponse::{AResponse, ToAResponse};
use crate::handler::{Handler, TitleHandler, ExactFnHandler, RedirectHandler};
use crate::http_request_method::{HttpRequestMethodGrouped, HttpRequestMethodSimple};
use crate::http_response_status_codes::HttpResponseStatusCode;
use crate::page::{Page, PageStore};
use crate::router::PrefixRouter;
use crate::template::{Templates, View};
use crate::title::{Action, Title};
use crate::warn;
use crate::webutils::{errorpage_from_status, errortext_response, htmlresponse, html_escape};


pub type HandlerRouter = PrefixRouter<Arc<dyn Handler>>;

/// Everything the page handlers share.
#[derive(Debug)]
pub struct Wiki {
    pub store: PageStore,
    pub templates: Arc<Templates>,
}

impl Wiki {
    pub fn new(store: PageStore, templates: Arc<Templates>) -> Self {
        Wiki { store, templates }
    }

    /// Render `page` with `view`; a failure is answered with a 500
    /// carrying the error message.
    fn render(&self, view: View, page: &Page) -> AResponse {
        match self.templates.render(view, page) {
            Ok(html) => htmlresponse(HttpResponseStatusCode::OK200, html).into(),
            Err(e) => {
                let response = errortext_response(
                    HttpResponseStatusCode::InternalServerError500, &e);
                response.to_aresponse_with_error(anyhow!(e))
            }
        }
    }
}

// ------------------------------------------------------------------
// The page actions

/// Show a page, or send the user to its edit form if it doesn't exist
/// yet.
pub fn view_page(wiki: &Wiki, title: Title) -> Result<AResponse> {
    match wiki.store.load(&title) {
        Ok(page) => Ok(wiki.render(View::View, &page)),
        Err(_) => Ok(Response::redirect_302(Action::Edit.path_for(&title)).into()),
    }
}

/// Show the edit form, empty for pages that don't exist yet.
pub fn edit_page(wiki: &Wiki, title: Title) -> Result<AResponse> {
    let page = wiki.store.load(&title).unwrap_or_else(|_| Page::empty(title));
    Ok(wiki.render(View::Edit, &page))
}

/// Store the `body` form field as the page's new content (a missing
/// field counts as empty), then show the page. Only POST requests
/// carrying form data (or no body) are accepted, so that nothing else
/// can overwrite a page.
pub fn save_page(
    wiki: &Wiki,
    context: &AContext,
    method: HttpRequestMethodSimple,
    title: Title
) -> Result<AResponse> {
    if !method.is_post() {
        let mut response = errorpage_from_status(HttpResponseStatusCode::MethodNotAllowed405);
        response.headers.push(("Allow".into(), "POST".into()));
        return Ok(response.into())
    }
    if context.form_encoding() == FormEncoding::Unsupported {
        return Ok(errorpage_from_status(HttpResponseStatusCode::UnsupportedMediaType415).into())
    }
    let body = context.form_value("body")?.unwrap_or_default();
    let page = Page { title, body: body.into_bytes() };
    match wiki.store.save(&page) {
        Ok(()) => Ok(Response::redirect_302(Action::View.path_for(&page.title)).into()),
        Err(e) => {
            let response = errortext_response(
                HttpResponseStatusCode::InternalServerError500, &e);
            Ok(response.to_aresponse_with_error(anyhow!(e)))
        }
    }
}

/// A list of all stored pages.
pub fn index_page(wiki: &Wiki) -> Result<AResponse> {
    let titles = wiki.store.titles().with_context(
        || anyhow!("listing pages in {:?}", wiki.store.dir()))?;
    let mut html = String::from(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>All pages</title>\
         </head><body><h1>All pages</h1>\n<ul>\n");
    for title in &titles {
        let t = html_escape(title.as_str());
        html.push_str(&format!("<li><a href=\"{}\">{t}</a></li>\n",
                               html_escape(&Action::View.path_for(title))));
    }
    html.push_str("</ul>\n</body></html>\n");
    Ok(htmlresponse(HttpResponseStatusCode::OK200, html).into())
}

// ------------------------------------------------------------------
// The mid-level parts

/// The routes: the three page actions, plus `/` redirecting to the
/// front page and the `/index` page list.
pub fn wiki_router(wiki: Arc<Wiki>, front_page: &Title) -> Result<HandlerRouter> {
    let mut router: HandlerRouter = PrefixRouter::new();
    router
        .add("/view/", Arc::new(TitleHandler::new(Action::View, {
            let wiki = wiki.clone();
            move |_context, _method, title| view_page(&wiki, title)
        })))?
        .add("/edit/", Arc::new(TitleHandler::new(Action::Edit, {
            let wiki = wiki.clone();
            move |_context, _method, title| edit_page(&wiki, title)
        })))?
        .add("/save/", Arc::new(TitleHandler::new(Action::Save, {
            let wiki = wiki.clone();
            move |context, method, title| save_page(&wiki, context, method, title)
        })))?
        .add("/index", Arc::new(ExactFnHandler::new({
            let wiki = wiki.clone();
            move |_context, _method| index_page(&wiki)
        })))?
        .add("/", Arc::new(RedirectHandler::new(
            Action::View.path_for(front_page),
            HttpResponseStatusCode::Found302)))?;
    Ok(router)
}

fn dispatch(router: &HandlerRouter, context: &AContext) -> Result<AResponse> {
    match context.method().to_grouped() {
        HttpRequestMethodGrouped::Simple(method) => {
            if let Some((handler, rest)) = router.get(context.path_str()) {
                if let Some(response) = handler.call(context, method, rest)? {
                    return Ok(response)
                }
            }
            Ok(errorpage_from_status(HttpResponseStatusCode::NotFound404).into())
        }
        HttpRequestMethodGrouped::Unsupported(method) => {
            warn!("method {:?} not implemented", method.as_str());
            Ok(errorpage_from_status(HttpResponseStatusCode::NotImplemented501).into())
        }
    }
}

/// Handle one request, with logging.
pub fn handle_request(router: &HandlerRouter, logs: &Mutex<Logs>, request: &Request)
                      -> Response
{
    match AContext::new(request) {
        Ok(context) => {
            log_combined(&context, logs, || dispatch(router, &context)).response
        }
        Err(e) => {
            warn!("{e:#}");
            errorpage_from_status(HttpResponseStatusCode::BadRequest400)
        }
    }
}

/// Make a handler for rouille's `Server::new`.
pub fn server_handler(
    router: Arc<HandlerRouter>,
    logs: Arc<Mutex<Logs>>,
) -> impl Fn(&Request) -> Response + Send + Sync + 'static
{
    move |request: &Request| -> Response {
        handle_request(&router, &logs, request)
    }
}
