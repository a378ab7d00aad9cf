use std::io::Read;
use std::net::IpAddr;

use anyhow::{Result, Context, anyhow};
use rouille::Request;
use rouille::input::multipart::get_multipart_input;
use rouille::input::post::raw_urlencoded_post_input;

use crate::http_request_method::HttpRequestMethod;


/// How a request body carries form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEncoding {
    /// No body to look at (not a POST, or no Content-Type).
    None,
    UrlEncoded,
    Multipart,
    /// A POST body that isn't form data.
    Unsupported,
}

/// A request plus what was derived from it before dispatching.
pub struct AContext<'r> {
    path: String,
    method: HttpRequestMethod,
    request: &'r Request,
}

impl<'r> AContext<'r> {
    /// Fails if the request method is not known.
    pub fn new(request: &'r Request) -> Result<Self> {
        let method = HttpRequestMethod::from_str(request.method())?;
        Ok(AContext {
            // path only, percent-decoded
            path: request.url(),
            method,
            request,
        })
    }

    /// Like the request part in Apache style Combined Log Format
    pub fn request_line(&self) -> String {
        // `Request` does not appear to maintain the original request
        // line string, thus have to reconstruct it.
        format!("{} {}",
                self.request.method(),
                self.request.raw_url())
    }
    pub fn user_agent(&self) -> Option<&str> {
        self.request.header("user-agent")
    }
    pub fn client_ip(&self) -> IpAddr {
        self.request.remote_addr().ip()
    }
    pub fn method(&self) -> HttpRequestMethod { self.method }
    pub fn path_str(&self) -> &str { &self.path }
    pub fn referer(&self) -> Option<&str> {
        self.header("referer")
    }
    pub fn header(&self, key: &str) -> Option<&str> { self.request.header(key) }

    pub fn form_encoding(&self) -> FormEncoding {
        if !self.method.is_post() {
            return FormEncoding::None
        }
        let mime = match self.header("content-type") {
            Some(ct) => ct.split(';').next().unwrap_or("").trim(),
            None => return FormEncoding::None,
        };
        if mime.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            FormEncoding::UrlEncoded
        } else if mime.eq_ignore_ascii_case("multipart/form-data") {
            FormEncoding::Multipart
        } else {
            FormEncoding::Unsupported
        }
    }

    /// The first value of the form field `name`: from an urlencoded
    /// or multipart POST body if there is one, otherwise from the
    /// query string. `None` if the field is absent. Consumes the
    /// request body, thus can only be meaningfully called once per
    /// request.
    pub fn form_value(&self, name: &str) -> Result<Option<String>> {
        match self.form_encoding() {
            FormEncoding::UrlEncoded => {
                let fields = raw_urlencoded_post_input(self.request).with_context(
                    || anyhow!("reading form data of {}", self.request_line()))?;
                if let Some((_, value)) = fields.into_iter().find(|(k, _)| k == name) {
                    return Ok(Some(value))
                }
            }
            FormEncoding::Multipart => {
                let mut input = get_multipart_input(self.request).with_context(
                    || anyhow!("reading multipart form data of {}", self.request_line()))?;
                while let Some(mut field) = input.next() {
                    if &*field.headers.name != name {
                        continue;
                    }
                    let mut bytes = Vec::new();
                    field.data.read_to_end(&mut bytes).with_context(
                        || anyhow!("reading form field {name:?} of {}", self.request_line()))?;
                    let value = String::from_utf8(bytes).with_context(
                        || anyhow!("form field {name:?} of {} is not valid UTF-8",
                                   self.request_line()))?;
                    return Ok(Some(value))
                }
            }
            FormEncoding::None | FormEncoding::Unsupported => (),
        }
        Ok(self.request.get_param(name))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn form_request(body: &str) -> Request {
        Request::fake_http(
            "POST", "/save/Test?body=fromquery",
            vec![("Content-Type".into(),
                  "application/x-www-form-urlencoded; charset=UTF-8".into())],
            body.as_bytes().to_vec())
    }

    #[test]
    fn t_form_value() -> Result<()> {
        let request = form_request("other=1&body=Hello+W%C3%B6rld%21");
        let context = AContext::new(&request)?;
        assert_eq!(context.path_str(), "/save/Test");
        assert_eq!(context.form_value("body")?.as_deref(), Some("Hello Wörld!"));
        Ok(())
    }

    #[test]
    fn t_form_value_fallback_to_query() -> Result<()> {
        let request = form_request("other=1");
        assert_eq!(AContext::new(&request)?.form_value("body")?.as_deref(),
                   Some("fromquery"));

        let request = Request::fake_http("GET", "/save/Test", vec![], vec![]);
        assert_eq!(AContext::new(&request)?.form_value("body")?, None);
        Ok(())
    }

    fn multipart_request(parts: &[(&str, &[u8])]) -> Request {
        let mut body = Vec::new();
        for (name, value) in parts {
            body.extend_from_slice(
                format!("--XyZ\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                    .as_bytes());
            body.extend_from_slice(value);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(b"--XyZ--\r\n");
        Request::fake_http(
            "POST", "/save/Test",
            vec![("Content-Type".into(), "multipart/form-data; boundary=XyZ".into())],
            body)
    }

    #[test]
    fn t_form_value_multipart() -> Result<()> {
        let request = multipart_request(&[("other", &b"1"[..]),
                                         ("body", &b"Hello\r\nW\xc3\xb6rld"[..])]);
        let context = AContext::new(&request)?;
        assert_eq!(context.form_encoding(), FormEncoding::Multipart);
        assert_eq!(context.form_value("body")?.as_deref(), Some("Hello\r\nWörld"));

        let request = multipart_request(&[("other", &b"1"[..])]);
        assert_eq!(AContext::new(&request)?.form_value("body")?, None);

        let request = multipart_request(&[("body", &b"caf\xe9"[..])]);
        assert!(AContext::new(&request)?.form_value("body").is_err());
        Ok(())
    }

    #[test]
    fn t_form_encoding() -> Result<()> {
        let request = Request::fake_http(
            "POST", "/save/Test",
            vec![("Content-Type".into(), "application/json".into())],
            b"{}".to_vec());
        assert_eq!(AContext::new(&request)?.form_encoding(), FormEncoding::Unsupported);
        let request = Request::fake_http("POST", "/save/Test", vec![], vec![]);
        assert_eq!(AContext::new(&request)?.form_encoding(), FormEncoding::None);
        let request = Request::fake_http(
            "GET", "/save/Test",
            vec![("Content-Type".into(), "application/json".into())],
            vec![]);
        assert_eq!(AContext::new(&request)?.form_encoding(), FormEncoding::None);
        let request = form_request("");
        assert_eq!(AContext::new(&request)?.form_encoding(), FormEncoding::UrlEncoded);
        Ok(())
    }

    #[test]
    fn t_unknown_method() {
        let request = Request::fake_http("BREW", "/view/Coffee", vec![], vec![]);
        assert!(AContext::new(&request).is_err());
    }

    #[test]
    fn t_request_line() -> Result<()> {
        let request = Request::fake_http("GET", "/view/A?x=1", vec![], vec![]);
        assert_eq!(AContext::new(&request)?.request_line(), "GET /view/A?x=1");
        Ok(())
    }
}
