use std::borrow::Cow;

use rouille::{Response, ResponseBody};

use crate::http_response_status_codes::HttpResponseStatusCode;


/// Append `s` to `out`, escaping the characters that are special in
/// HTML text and attribute values.
pub fn html_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c)
        }
    }
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    html_escape_into(&mut out, s);
    out
}


pub fn errorpage_from_status(status: HttpResponseStatusCode) -> Response {
    let title = status.title();
    let explanation = html_escape(status.desc());
    let resp = format!("<html><head><title>{title}</title></head><body><h1>{title}</h1>\
                        <p>{explanation}</p></body></html>\n");
    htmlresponse(status, resp)
}

/// A plain text error response carrying the error message itself,
/// for failures the user should get to see (saving, rendering).
pub fn errortext_response(status: HttpResponseStatusCode, err: &dyn std::error::Error)
                          -> Response
{
    Response {
        status_code: status.code(),
        headers: vec![
            (Cow::from("Content-Type"), Cow::from("text/plain; charset=utf-8")),
            (Cow::from("X-Content-Type-Options"), Cow::from("nosniff")),
        ],
        data: ResponseBody::from_string(format!("{err}\n")),
        upgrade: None,
    }
}

pub fn htmlresponse(status: HttpResponseStatusCode, html: impl Into<Vec<u8>>) -> Response {
    Response {
        status_code: status.code(),
        headers: vec![(Cow::from("Content-Type"),
                       Cow::from("text/html; charset=utf-8"))],
        data: ResponseBody::from_data(html.into()),
        upgrade: None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_html_escape() {
        assert_eq!(html_escape(""), "");
        assert_eq!(html_escape("plain"), "plain");
        assert_eq!(html_escape("<a href='x'>&\"</a>"),
                   "&lt;a href=&#39;x&#39;&gt;&amp;&quot;&lt;/a&gt;");
        assert_eq!(html_escape("Grüße"), "Grüße");
    }

    #[test]
    fn t_errorpage_from_status() {
        let r = errorpage_from_status(HttpResponseStatusCode::NotFound404);
        assert_eq!(r.status_code, 404);
        let (mut data, _) = r.data.into_reader_and_size();
        let mut s = String::new();
        std::io::Read::read_to_string(&mut data, &mut s).unwrap();
        assert!(s.contains("<h1>Not Found</h1>"), "{s}");
    }
}
