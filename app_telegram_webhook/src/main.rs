use std::{fs, path::Path};

use anyhow::Context;
use config::{Command, Config};
use domain_telegram_bot::{Certificate, StrictCheck, Webhook};
use log::info;
use restix::Restix;

mod config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let command = std::env::args()
        .nth(1)
        .with_context(|| "Usage: app_telegram_webhook <info|url|set|delete>")?
        .parse::<Command>()?;
    let config = Config::from_env().with_context(|| "Configuration error")?;
    let client = Restix::with_timeout(config.timeout).with_context(|| "HttpClient init error")?;
    let webhook = Webhook::new(config.token.clone())
        .with_base_url(config.api_base_url.clone())
        .with_client(client)
        .with_check(StrictCheck);

    match command {
        Command::Info => {
            let info = webhook
                .info()
                .await
                .with_context(|| "Get webhook info error")?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Url => {
            let url = webhook.url().await.with_context(|| "Get webhook url error")?;
            println!("{url}");
        }
        Command::Set => {
            let certificate = config
                .certificate_path
                .as_deref()
                .map(read_certificate)
                .transpose()?;
            webhook
                .set_url_adding_token(config.webhook_base_url()?, certificate.as_ref())
                .await
                .with_context(|| "Set webhook error")?;
            info!("Webhook is set");
        }
        Command::Delete => {
            webhook
                .delete()
                .await
                .with_context(|| "Delete webhook error")?;
            info!("Webhook is deleted");
        }
    }
    Ok(())
}

fn read_certificate(path: &Path) -> anyhow::Result<Certificate> {
    let pem = fs::read(path)
        .with_context(|| format!("Error while reading certificate {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|it| it.to_string_lossy().into_owned())
        .unwrap_or_else(|| "certificate.pem".to_owned());
    Ok(Certificate::new(file_name, pem))
}
