use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// https://core.telegram.org/bots/api/#inlinekeyboardbutton
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKey {
    pub text: String,
    pub callback_data: String,
}

impl InlineKey {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// One button of an inline keyboard row.
///
/// `Raw` is an already shaped button object (e.g. with `url` instead of `callback_data`)
/// and is sent exactly as given.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeyboardButton {
    Key(InlineKey),
    Raw(Map<String, Value>),
}

impl From<InlineKey> for KeyboardButton {
    fn from(value: InlineKey) -> Self {
        Self::Key(value)
    }
}

impl From<Map<String, Value>> for KeyboardButton {
    fn from(value: Map<String, Value>) -> Self {
        Self::Raw(value)
    }
}

/// Rows of buttons, top to bottom
pub type InlineKeyboard = Vec<Vec<KeyboardButton>>;

/// https://core.telegram.org/bots/api/#inlinekeyboardmarkup
#[derive(Serialize)]
struct InlineKeyboardMarkup<'a> {
    inline_keyboard: &'a [Vec<KeyboardButton>],
}

/// Renders the `reply_markup` form value for an inline keyboard
pub fn reply_markup(keyboard: &[Vec<KeyboardButton>]) -> Result<String> {
    serde_json::to_string(&InlineKeyboardMarkup {
        inline_keyboard: keyboard,
    })
    .map_err(Error::Encode)
}
