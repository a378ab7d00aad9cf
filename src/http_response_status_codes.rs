//! The HTTP status codes this server ever answers with.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpResponseStatusCode {
    OK200,
    Found302,
    BadRequest400,
    NotFound404,
    MethodNotAllowed405,
    UnsupportedMediaType415,
    InternalServerError500,
    NotImplemented501,
}

impl HttpResponseStatusCode {
    pub fn code(self) -> u16 {
        match self {
            Self::OK200 => 200,
            Self::Found302 => 302,
            Self::BadRequest400 => 400,
            Self::NotFound404 => 404,
            Self::MethodNotAllowed405 => 405,
            Self::UnsupportedMediaType415 => 415,
            Self::InternalServerError500 => 500,
            Self::NotImplemented501 => 501,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::OK200 => "OK",
            Self::Found302 => "Found",
            Self::BadRequest400 => "Bad Request",
            Self::NotFound404 => "Not Found",
            Self::MethodNotAllowed405 => "Method Not Allowed",
            Self::UnsupportedMediaType415 => "Unsupported Media Type",
            Self::InternalServerError500 => "Internal Server Error",
            Self::NotImplemented501 => "Not Implemented",
        }
    }

    pub fn desc(self) -> &'static str {
        match self {
            Self::OK200 => "The request succeeded.",
            Self::Found302 => "The resource is temporarily at another URL.",
            Self::BadRequest400 => "The server could not understand the request.",
            Self::NotFound404 => "The requested page does not exist.",
            Self::MethodNotAllowed405 =>
                "The request method is not allowed for this URL.",
            Self::UnsupportedMediaType415 =>
                "The request body is not form data.",
            Self::InternalServerError500 =>
                "The server encountered an error handling the request.",
            Self::NotImplemented501 =>
                "The request method is not supported by this server.",
        }
    }
}
