use std::fmt::Display;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Conversion between Bot API objects and their untyped JSON form.
///
/// Every field of an object is optional: absent (or `null`) keys decode to `None`,
/// and `None` fields are left out on encoding. Keys unknown to the object are dropped.
pub trait TelegramObject: Serialize + DeserializeOwned {
    /// `None` and JSON `null` mean "no object"
    fn decode(value: Option<Value>) -> Result<Option<Self>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(Error::Decode),
        }
    }

    fn from_map(map: Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(map)).map_err(Error::Decode)
    }

    /// Objects are structs of plain values with string keys, so serialization
    /// always yields a JSON object; anything else maps to an empty one.
    fn encode(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// https://core.telegram.org/bots/api/#update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_query: Option<CallbackQuery>,
}

/// https://core.telegram.org/bots/api/#message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "message_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<Chat>,
    /// Unix time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// https://core.telegram.org/bots/api/#user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// https://core.telegram.org/bots/api/#chat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// "private", "group", "supergroup" or "channel"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

/// https://core.telegram.org/bots/api/#callbackquery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CallbackQueryId>,
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Callback query ids are numeric in older payloads and strings in the current
/// Bot API. Both are kept as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallbackQueryId {
    Int(i64),
    Str(String),
}

impl Display for CallbackQueryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallbackQueryId::Int(id) => write!(f, "{id}"),
            CallbackQueryId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for CallbackQueryId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for CallbackQueryId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for CallbackQueryId {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl TelegramObject for Update {}
impl TelegramObject for Message {}
impl TelegramObject for User {}
impl TelegramObject for Chat {}
impl TelegramObject for CallbackQuery {}
