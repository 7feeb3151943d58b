use std::fmt::{Debug, Display};

pub const TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

/// Bot access token given by BotFather.
///
/// The token is part of every request url, so it is never printed:
/// `Debug` shows a placeholder instead of the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(***)")
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Bot API methods used by this crate.
///
/// https://core.telegram.org/bots/api#available-methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    SendMessage,
    EditMessageText,
    AnswerCallbackQuery,
    GetWebhookInfo,
    SetWebhook,
    DeleteWebhook,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Endpoint::SendMessage => "sendMessage",
            Endpoint::EditMessageText => "editMessageText",
            Endpoint::AnswerCallbackQuery => "answerCallbackQuery",
            Endpoint::GetWebhookInfo => "getWebhookInfo",
            Endpoint::SetWebhook => "setWebhook",
            Endpoint::DeleteWebhook => "deleteWebhook",
        }
    }

    pub fn url(self, token: &Token) -> String {
        self.url_with_base(TELEGRAM_API_BASE_URL, token)
    }

    /// Same as [Endpoint::url], but against another Bot API server
    pub fn url_with_base(self, base_url: &str, token: &Token) -> String {
        format!(
            "{}/bot{}/{}",
            base_url.trim_end_matches('/'),
            token.as_str(),
            self.as_str()
        )
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
