//! Pattern matching and processing help for HTTP request methods.

// https://developer.mozilla.org/en-US/docs/Web/HTTP/Methods

use anyhow::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpRequestMethod {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
    PATCH,
}

/// The methods the page handlers deal with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpRequestMethodSimple {
    GET,
    HEAD,
    POST,
}

pub enum HttpRequestMethodGrouped {
    Simple(HttpRequestMethodSimple),
    /// Everything else; answered with 501.
    Unsupported(HttpRequestMethod),
}

impl HttpRequestMethodSimple {
    pub fn is_post(self) -> bool {
        self == HttpRequestMethodSimple::POST
    }
}

impl HttpRequestMethod {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(Self::GET),
            "HEAD" => Ok(Self::HEAD),
            "POST" => Ok(Self::POST),
            "PUT" => Ok(Self::PUT),
            "PATCH" => Ok(Self::PATCH),
            "DELETE" => Ok(Self::DELETE),
            "OPTIONS" => Ok(Self::OPTIONS),
            "CONNECT" => Ok(Self::CONNECT),
            "TRACE" => Ok(Self::TRACE),
            _ => bail!("invalid http request method {s:?}")
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::HEAD => "HEAD",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::PATCH => "PATCH",
            Self::DELETE => "DELETE",
            Self::OPTIONS => "OPTIONS",
            Self::CONNECT => "CONNECT",
            Self::TRACE => "TRACE",
        }
    }

    pub fn is_post(self) -> bool {
        self == Self::POST
    }

    pub fn to_grouped(self) -> HttpRequestMethodGrouped {
        use HttpRequestMethodGrouped::*;
        match self {
            Self::GET => Simple(HttpRequestMethodSimple::GET),
            Self::HEAD => Simple(HttpRequestMethodSimple::HEAD),
            Self::POST => Simple(HttpRequestMethodSimple::POST),
            _ => Unsupported(self),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_from_str() {
        for m in ["GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS",
                  "CONNECT", "TRACE"] {
            assert_eq!(HttpRequestMethod::from_str(m).unwrap().as_str(), m);
        }
        assert!(HttpRequestMethod::from_str("get").is_err());
        assert!(HttpRequestMethod::from_str("").is_err());
    }

    #[test]
    fn t_to_grouped() {
        assert!(matches!(HttpRequestMethod::POST.to_grouped(),
                         HttpRequestMethodGrouped::Simple(m) if m.is_post()));
        assert!(matches!(HttpRequestMethod::DELETE.to_grouped(),
                         HttpRequestMethodGrouped::Unsupported(HttpRequestMethod::DELETE)));
    }
}
