//! Client for the Telegram Bot API: webhook management, sending and editing
//! messages with inline keyboards, answering callback queries, and typed
//! models of incoming updates.

pub mod checks;
pub mod endpoint;
pub mod errors;
pub mod keyboard;
pub mod models;
pub mod telegram_api;

pub use checks::{NoCheck, ResponseCheck, StrictCheck};
pub use endpoint::{Endpoint, Token, TELEGRAM_API_BASE_URL};
pub use errors::{Error, Result};
pub use keyboard::{reply_markup, InlineKey, InlineKeyboard, KeyboardButton};
pub use models::*;
pub use telegram_api::{Bot, Certificate, ChatTarget, Webhook};
