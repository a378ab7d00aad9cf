use rouille::Response;


/// A response, plus the error that led to it if it is an error
/// response the handler produced itself (so that it still ends up in
/// the error log).
pub struct AResponse {
    pub response: Response,
    pub error: Option<anyhow::Error>,
}

impl From<Response> for AResponse {
    fn from(response: Response) -> Self {
        Self {
            response,
            error: None
        }
    }
}

pub trait ToAResponse {
    fn to_aresponse_with_error(self, error: anyhow::Error) -> AResponse;
}

impl ToAResponse for Response {
    fn to_aresponse_with_error(self, error: anyhow::Error) -> AResponse {
        AResponse { response: self, error: Some(error) }
    }
}
