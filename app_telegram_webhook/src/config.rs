use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use common_rust::env;
use domain_telegram_bot::{Token, TELEGRAM_API_BASE_URL};

pub struct Config {
    pub token: Token,
    pub api_base_url: String,
    pub webhook_base_url: Option<String>,
    pub certificate_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let token = env::require("TELEGRAM_BOT_TOKEN")?;
        Ok(Self {
            token: Token::new(token),
            api_base_url: env::get_or("TELEGRAM_BOT_API_URL", TELEGRAM_API_BASE_URL),
            webhook_base_url: env::get("TELEGRAM_BOT_WEBHOOK_BASE_URL"),
            certificate_path: env::get("TELEGRAM_BOT_CERTIFICATE").map(PathBuf::from),
            timeout: Duration::from_secs(env::get_parsed_or(
                "TELEGRAM_BOT_TIMEOUT_SEC",
                restix::DEFAULT_TIMEOUT.as_secs(),
            )),
        })
    }

    pub fn webhook_base_url(&self) -> anyhow::Result<&str> {
        self.webhook_base_url
            .as_deref()
            .with_context(|| "Environment variable TELEGRAM_BOT_WEBHOOK_BASE_URL not provided")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Info,
    Url,
    Set,
    Delete,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Command::Info),
            "url" => Ok(Command::Url),
            "set" => Ok(Command::Set),
            "delete" => Ok(Command::Delete),
            other => bail!("Unknown command `{other}`, expected one of: info, url, set, delete"),
        }
    }
}
