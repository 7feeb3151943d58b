use log::warn;
use restix::HttpResponse;
use serde::Deserialize;

use crate::{Error, Result};

/// Decides what to do with a response before it is handed to the caller.
pub trait ResponseCheck {
    fn check(&self, response: HttpResponse) -> Result<HttpResponse>;
}

/// Returns every response as is, successful or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCheck;

impl ResponseCheck for NoCheck {
    fn check(&self, response: HttpResponse) -> Result<HttpResponse> {
        Ok(response)
    }
}

/// Turns non-success responses into [Error::Api].
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictCheck;

/// https://core.telegram.org/bots/api#making-requests
#[derive(Deserialize)]
struct ErrorBody {
    description: Option<String>,
    error_code: Option<i64>,
}

impl ResponseCheck for StrictCheck {
    fn check(&self, response: HttpResponse) -> Result<HttpResponse> {
        if response.is_success() {
            return Ok(response);
        }
        let body = serde_json::from_str::<ErrorBody>(&response.body).ok();
        let description = body
            .as_ref()
            .and_then(|it| it.description.clone())
            .unwrap_or_else(|| response.body.clone());
        let error_code = body
            .and_then(|it| it.error_code)
            .unwrap_or(i64::from(response.status));
        warn!("Telegram API responded with {error_code}: {description}");
        Err(Error::api(description, error_code))
    }
}
