use std::fmt::Display;

use log::debug;
use restix::{FilePart, HttpClient, HttpRequest, HttpResponse, Restix};
use serde_json::Value;

use crate::{
    keyboard::reply_markup, CallbackQueryId, Endpoint, Error, KeyboardButton, NoCheck,
    ResponseCheck, Result, Token, TELEGRAM_API_BASE_URL,
};

/// Recipient of a message: numeric chat id or `@channelusername`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTarget {
    Id(i64),
    Channel(String),
}

impl Display for ChatTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatTarget::Id(id) => write!(f, "{id}"),
            ChatTarget::Channel(username) => f.write_str(username),
        }
    }
}

impl From<i64> for ChatTarget {
    fn from(value: i64) -> Self {
        Self::Id(value)
    }
}

impl From<&str> for ChatTarget {
    fn from(value: &str) -> Self {
        Self::Channel(value.to_owned())
    }
}

impl From<String> for ChatTarget {
    fn from(value: String) -> Self {
        Self::Channel(value)
    }
}

/// Public key certificate for a webhook with a self-signed certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub file_name: String,
    pub pem: Vec<u8>,
}

impl Certificate {
    pub fn new(file_name: impl Into<String>, pem: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            pem: pem.into(),
        }
    }

    fn to_file_part(&self) -> FilePart {
        FilePart {
            field: "certificate".to_owned(),
            file_name: self.file_name.clone(),
            bytes: self.pem.clone(),
        }
    }
}

/// Webhook management of a bot.
///
/// Every call is one request; failures are returned to the caller as they happen.
/// What counts as a failure is decided by the [ResponseCheck] strategy.
pub struct Webhook<C = Restix, K = NoCheck> {
    token: Token,
    client: C,
    check: K,
    base_url: String,
}

impl Webhook {
    pub fn new(token: impl Into<Token>) -> Self {
        Self {
            token: token.into(),
            client: Restix::default(),
            check: NoCheck,
            base_url: TELEGRAM_API_BASE_URL.to_owned(),
        }
    }
}

impl<C, K> Webhook<C, K> {
    pub fn with_client<C2: HttpClient>(self, client: C2) -> Webhook<C2, K> {
        Webhook {
            token: self.token,
            client,
            check: self.check,
            base_url: self.base_url,
        }
    }

    pub fn with_check<K2: ResponseCheck>(self, check: K2) -> Webhook<C, K2> {
        Webhook {
            token: self.token,
            client: self.client,
            check,
            base_url: self.base_url,
        }
    }

    /// Use another Bot API server, e.g. a local one
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        endpoint.url_with_base(&self.base_url, &self.token)
    }
}

impl<C: HttpClient, K: ResponseCheck> Webhook<C, K> {
    pub(crate) async fn call(
        &self,
        endpoint: Endpoint,
        request: HttpRequest,
    ) -> Result<HttpResponse> {
        debug!("Telegram API call: {endpoint}");
        let response = self.client.execute(request).await?;
        self.check.check(response)
    }

    /// Webhook status as returned by `getWebhookInfo`
    pub async fn info(&self) -> Result<Value> {
        let endpoint = Endpoint::GetWebhookInfo;
        let response = self
            .call(endpoint, HttpRequest::get(self.url_for(endpoint)))
            .await?;
        response.json().map_err(Error::Decode)
    }

    /// Url updates are currently forwarded to (empty if no webhook is set)
    pub async fn url(&self) -> Result<String> {
        self.info()
            .await?
            .pointer("/result/url")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or(Error::MissingField("result.url"))
    }

    pub async fn set_url(
        &self,
        url: &str,
        certificate: Option<&Certificate>,
    ) -> Result<HttpResponse> {
        let endpoint = Endpoint::SetWebhook;
        let mut request = HttpRequest::post(self.url_for(endpoint)).param("url", url);
        if let Some(certificate) = certificate {
            request = request.file(certificate.to_file_part());
        }
        self.call(endpoint, request).await
    }

    /// Forwards updates to `<base_url>/<token>`, so the receiving endpoint
    /// can tell real updates from foreign requests.
    pub async fn set_url_adding_token(
        &self,
        base_url: &str,
        certificate: Option<&Certificate>,
    ) -> Result<HttpResponse> {
        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.token.as_str()
        );
        self.set_url(&url, certificate).await
    }

    pub async fn delete(&self) -> Result<HttpResponse> {
        let endpoint = Endpoint::DeleteWebhook;
        self.call(endpoint, HttpRequest::get(self.url_for(endpoint)))
            .await
    }
}

/// Message operations of a bot.
pub struct Bot<C = Restix, K = NoCheck> {
    webhook: Webhook<C, K>,
}

impl Bot {
    pub fn new(token: impl Into<Token>) -> Self {
        Self {
            webhook: Webhook::new(token),
        }
    }
}

impl<C, K> Bot<C, K> {
    pub fn with_client<C2: HttpClient>(self, client: C2) -> Bot<C2, K> {
        Bot {
            webhook: self.webhook.with_client(client),
        }
    }

    pub fn with_check<K2: ResponseCheck>(self, check: K2) -> Bot<C, K2> {
        Bot {
            webhook: self.webhook.with_check(check),
        }
    }

    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Bot {
            webhook: self.webhook.with_base_url(base_url),
        }
    }

    pub fn webhook(&self) -> &Webhook<C, K> {
        &self.webhook
    }

    pub fn token(&self) -> &Token {
        self.webhook.token()
    }
}

impl<C: HttpClient, K: ResponseCheck> Bot<C, K> {
    /// https://core.telegram.org/bots/api#sendmessage
    pub async fn send_msg(
        &self,
        text: &str,
        to: impl Into<ChatTarget>,
        inline_keyboard: Option<&[Vec<KeyboardButton>]>,
    ) -> Result<HttpResponse> {
        let endpoint = Endpoint::SendMessage;
        let mut request = HttpRequest::post(self.webhook.url_for(endpoint))
            .param("chat_id", to.into().to_string())
            .param("text", text);
        if let Some(keyboard) = inline_keyboard {
            request = request.param("reply_markup", reply_markup(keyboard)?);
        }
        self.webhook.call(endpoint, request).await
    }

    /// https://core.telegram.org/bots/api#editmessagetext
    pub async fn edit_msg_text(
        &self,
        chat_id: impl Into<ChatTarget>,
        message_id: i64,
        text: &str,
        inline_keyboard: Option<&[Vec<KeyboardButton>]>,
    ) -> Result<HttpResponse> {
        let endpoint = Endpoint::EditMessageText;
        let mut request = HttpRequest::post(self.webhook.url_for(endpoint))
            .param("chat_id", chat_id.into().to_string())
            .param("message_id", message_id.to_string())
            .param("text", text);
        if let Some(keyboard) = inline_keyboard {
            request = request.param("reply_markup", reply_markup(keyboard)?);
        }
        self.webhook.call(endpoint, request).await
    }

    /// https://core.telegram.org/bots/api#answercallbackquery
    ///
    /// `show_alert` shows the text as an alert instead of a notification
    /// at the top of the chat screen.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: impl Into<CallbackQueryId>,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<HttpResponse> {
        let endpoint = Endpoint::AnswerCallbackQuery;
        let mut request = HttpRequest::post(self.webhook.url_for(endpoint))
            .param("callback_query_id", callback_query_id.into().to_string());
        if let Some(text) = text {
            request = request.param("text", text);
        }
        request = request.param("show_alert", show_alert.to_string());
        self.webhook.call(endpoint, request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use restix::Method;

    use super::*;
    use crate::{InlineKey, StrictCheck};

    /// Records requests and answers every one of them with the same response
    #[derive(Clone)]
    struct FakeClient {
        response: HttpResponse,
        requests: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl FakeClient {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: HttpResponse::new(status, body),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn last_request(&self) -> HttpRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl HttpClient for FakeClient {
        async fn execute(&self, request: HttpRequest) -> restix::Result<HttpResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    const FORBIDDEN: &str = r#"{"ok":false,"description":"Forbidden","error_code":403}"#;

    fn bot(client: &FakeClient) -> Bot<FakeClient> {
        Bot::new("123:ABC").with_client(client.clone())
    }

    #[test]
    fn test_send_msg_to_chat_id() {
        let client = FakeClient::new(200, r#"{"ok":true}"#);
        tokio_test::block_on(bot(&client).send_msg("hello", 42, None)).unwrap();

        let request = client.last_request();
        assert_eq!(Method::Post, request.method);
        assert_eq!(
            "https://api.telegram.org/bot123:ABC/sendMessage",
            request.url
        );
        assert_eq!(Some("42"), request.param_value("chat_id"));
        assert_eq!(Some("hello"), request.param_value("text"));
        assert_eq!(None, request.param_value("reply_markup"));
    }

    #[test]
    fn test_send_msg_to_channel_with_keyboard() {
        let client = FakeClient::new(200, r#"{"ok":true}"#);
        let keyboard = vec![vec![KeyboardButton::from(InlineKey::new("Yes", "y"))]];
        let bot = bot(&client);
        tokio_test::block_on(bot.send_msg("Sure?", "@news", Some(keyboard.as_slice()))).unwrap();

        let request = client.last_request();
        assert_eq!(Some("@news"), request.param_value("chat_id"));
        assert_eq!(
            Some(r#"{"inline_keyboard":[[{"text":"Yes","callback_data":"y"}]]}"#),
            request.param_value("reply_markup")
        );
    }

    #[test]
    fn test_edit_msg_text() {
        let client = FakeClient::new(200, r#"{"ok":true}"#);
        let mut docs = serde_json::Map::new();
        docs.insert("text".to_owned(), "Docs".into());
        docs.insert("url".to_owned(), "https://core.telegram.org".into());
        let keyboard = vec![vec![
            KeyboardButton::from(InlineKey::new("No", "n")),
            KeyboardButton::from(docs),
        ]];
        let bot = bot(&client);
        tokio_test::block_on(bot.edit_msg_text(-100, 77, "edited", Some(keyboard.as_slice())))
            .unwrap();

        let request = client.last_request();
        assert_eq!(
            "https://api.telegram.org/bot123:ABC/editMessageText",
            request.url
        );
        assert_eq!(Some("-100"), request.param_value("chat_id"));
        assert_eq!(Some("77"), request.param_value("message_id"));
        assert_eq!(Some("edited"), request.param_value("text"));
        assert_eq!(
            Some(concat!(
                r#"{"inline_keyboard":[[{"text":"No","callback_data":"n"},"#,
                r#"{"text":"Docs","url":"https://core.telegram.org"}]]}"#
            )),
            request.param_value("reply_markup")
        );
    }

    #[test]
    fn test_answer_callback_query() {
        let client = FakeClient::new(200, r#"{"ok":true}"#);
        let bot = bot(&client);
        tokio_test::block_on(bot.answer_callback_query("4382bfdwdsb323b2d9", Some("Done"), true))
            .unwrap();

        let request = client.last_request();
        assert_eq!(
            "https://api.telegram.org/bot123:ABC/answerCallbackQuery",
            request.url
        );
        assert_eq!(
            Some("4382bfdwdsb323b2d9"),
            request.param_value("callback_query_id")
        );
        assert_eq!(Some("Done"), request.param_value("text"));
        assert_eq!(Some("true"), request.param_value("show_alert"));

        tokio_test::block_on(bot.answer_callback_query(17, None, false)).unwrap();
        let request = client.last_request();
        assert_eq!(Some("17"), request.param_value("callback_query_id"));
        assert_eq!(None, request.param_value("text"));
        assert_eq!(Some("false"), request.param_value("show_alert"));
    }

    #[test]
    fn test_strict_check_fails_with_remote_description() {
        let client = FakeClient::new(403, FORBIDDEN);
        let bot = bot(&client).with_check(StrictCheck);
        let err = tokio_test::block_on(bot.send_msg("hello", 42, None)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Forbidden"));
        assert!(message.contains("403"));
    }

    #[test]
    fn test_no_check_returns_raw_response() {
        let client = FakeClient::new(403, FORBIDDEN);
        let response = tokio_test::block_on(bot(&client).send_msg("hello", 42, None)).unwrap();
        assert_eq!(HttpResponse::new(403, FORBIDDEN), response);
    }

    #[test]
    fn test_webhook_url_from_info() {
        let client = FakeClient::new(200, r#"{"ok":true,"result":{"url":"https://x.test/abc"}}"#);
        let bot = bot(&client);
        let url = tokio_test::block_on(bot.webhook().url()).unwrap();
        assert_eq!("https://x.test/abc", url);

        let request = client.last_request();
        assert_eq!(Method::Get, request.method);
        assert_eq!(
            "https://api.telegram.org/bot123:ABC/getWebhookInfo",
            request.url
        );
    }

    #[test]
    fn test_webhook_info_decode_errors() {
        let client = FakeClient::new(200, "<html>oops</html>");
        let result = tokio_test::block_on(bot(&client).webhook().info());
        assert!(matches!(result, Err(Error::Decode(_))));

        let client = FakeClient::new(200, r#"{"ok":true,"result":{}}"#);
        let result = tokio_test::block_on(bot(&client).webhook().url());
        assert!(matches!(result, Err(Error::MissingField("result.url"))));
    }

    #[test]
    fn test_webhook_info_under_strict_check() {
        let client = FakeClient::new(
            401,
            r#"{"ok":false,"description":"Unauthorized","error_code":401}"#,
        );
        let webhook = Webhook::new("bad").with_client(client).with_check(StrictCheck);
        let result = tokio_test::block_on(webhook.info());
        assert!(matches!(result, Err(Error::Api { error_code: 401, .. })));
    }

    #[test]
    fn test_set_url_adding_token() {
        let client = FakeClient::new(200, r#"{"ok":true,"result":true}"#);
        let webhook = Webhook::new("123:ABC").with_client(client.clone());
        tokio_test::block_on(webhook.set_url_adding_token("https://bot.example.com/hook/", None))
            .unwrap();

        let request = client.last_request();
        assert_eq!(
            "https://api.telegram.org/bot123:ABC/setWebhook",
            request.url
        );
        assert_eq!(
            Some("https://bot.example.com/hook/123:ABC"),
            request.param_value("url")
        );
        assert_eq!(None, request.file);
    }

    #[test]
    fn test_set_url_with_certificate() {
        let client = FakeClient::new(200, r#"{"ok":true,"result":true}"#);
        let webhook = Webhook::new("123:ABC").with_client(client.clone());
        let certificate = Certificate::new("public.pem", "-----BEGIN CERTIFICATE-----");
        tokio_test::block_on(webhook.set_url("https://bot.example.com", Some(&certificate)))
            .unwrap();

        let file = client.last_request().file.unwrap();
        assert_eq!("certificate", file.field);
        assert_eq!("public.pem", file.file_name);
        assert_eq!(b"-----BEGIN CERTIFICATE-----".to_vec(), file.bytes);
    }

    #[test]
    fn test_delete_webhook() {
        let client = FakeClient::new(200, r#"{"ok":true,"result":true}"#);
        let response = tokio_test::block_on(bot(&client).webhook().delete()).unwrap();
        assert!(response.is_success());

        let request = client.last_request();
        assert_eq!(Method::Get, request.method);
        assert_eq!(
            "https://api.telegram.org/bot123:ABC/deleteWebhook",
            request.url
        );
        assert!(request.params.is_empty());
    }

    #[test]
    fn test_custom_base_url() {
        let client = FakeClient::new(200, "{}");
        let bot = bot(&client).with_base_url("http://localhost:8081");
        tokio_test::block_on(bot.send_msg("hi", 1, None)).unwrap();
        assert_eq!(
            "http://localhost:8081/bot123:ABC/sendMessage",
            client.last_request().url
        );
    }

    #[test]
    fn test_transport_error_is_surfaced() {
        let bot = Bot::new("123:ABC").with_base_url("http://127.0.0.1:1");
        let result = tokio_test::block_on(bot.send_msg("hi", 1, None));
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[test]
    fn test_transport_error_does_not_show_token() {
        let bot = Bot::new("123:SECRET").with_base_url("http://127.0.0.1:1");
        let err = tokio_test::block_on(bot.send_msg("hi", 1, None)).unwrap_err();
        let shown = format!("{err} / {err:?}");
        assert!(!shown.contains("SECRET"), "{shown}");
    }
}
