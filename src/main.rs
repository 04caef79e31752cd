//! wechat-kf - customer-service messaging for WeChat Official Accounts
//!
//! Sends customer-service messages on behalf of staff accounts.

mod api;
mod auth;
mod config;
mod error;
mod models;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use models::Message;

#[derive(Parser)]
#[command(name = "wechat-kf")]
#[command(about = "Customer-service messaging for WeChat Official Accounts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Store AppID and AppSecret
    Configure {
        #[arg(long)]
        app_id: String,

        #[arg(long)]
        secret: String,

        /// Override the API base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Clear the cached access token
    Logout,

    /// Show configuration and token status
    Status,

    /// Send a customer-service message
    Send {
        /// Recipient open id
        #[arg(short, long)]
        to: String,

        /// Staff account to send as (e.g. kf2001@gh_123)
        #[arg(short, long)]
        by: Option<String>,

        #[command(flatten)]
        content: Content,
    },

    /// Show or cancel the typing indicator
    Typing {
        /// Recipient open id
        #[arg(short, long)]
        to: String,

        #[arg(long)]
        cancel: bool,
    },

    /// List staff accounts
    Staff,

    /// List staff currently online
    Online,
}

/// Exactly one message source.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Content {
    /// Text content
    text: Option<String>,

    /// Image media id
    #[arg(long)]
    image: Option<String>,

    /// Voice media id
    #[arg(long)]
    voice: Option<String>,

    /// Permanent news media id
    #[arg(long)]
    mpnews: Option<String>,

    /// Card id
    #[arg(long)]
    card: Option<String>,

    /// Request body sent verbatim (JSON object)
    #[arg(long)]
    raw: Option<String>,

    /// JSON file with a `type`-tagged message
    #[arg(long)]
    file: Option<std::path::PathBuf>,
}

impl Content {
    fn into_message(self) -> Result<Message> {
        let message = if let Some(text) = self.text {
            Message::from(text)
        } else if let Some(id) = self.image {
            Message::image(id)
        } else if let Some(id) = self.voice {
            Message::voice(id)
        } else if let Some(id) = self.mpnews {
            Message::mpnews(id)
        } else if let Some(id) = self.card {
            Message::card(id)
        } else if let Some(raw) = self.raw {
            Message::raw_from_str(&raw)?
        } else if let Some(path) = self.file {
            let doc = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Message::from_json(&doc)?
        } else {
            anyhow::bail!("No message content given");
        };
        Ok(message)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Configure {
            app_id,
            secret,
            base_url,
        } => {
            auth::configure(&app_id, &secret, base_url).await?;
        }
        Commands::Logout => {
            auth::logout().await?;
        }
        Commands::Status => {
            auth::status().await?;
        }
        Commands::Send { to, by, content } => {
            let message = content.into_message()?;
            tracing::info!("Sending {} message...", message.msgtype());
            api::send_message(&to, by.as_deref(), message).await?;
        }
        Commands::Typing { to, cancel } => {
            api::typing(&to, !cancel).await?;
        }
        Commands::Staff => {
            api::list_staff().await?;
        }
        Commands::Online => {
            api::list_online().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Message> {
        let cli = Cli::try_parse_from(args)?;
        match cli.command {
            Commands::Send { content, .. } => content.into_message(),
            _ => anyhow::bail!("not a send command"),
        }
    }

    #[test]
    fn test_send_text() {
        let msg = parse(&["wechat-kf", "send", "--to", "u1", "hello"]).unwrap();
        assert_eq!(msg, Message::text("hello"));
    }

    #[test]
    fn test_send_raw() {
        let msg = parse(&["wechat-kf", "send", "-t", "u1", "--raw", r#"{"foo":"bar"}"#]).unwrap();
        assert_eq!(msg.msgtype(), "raw");
    }

    #[test]
    fn test_send_requires_one_source() {
        assert!(parse(&["wechat-kf", "send", "--to", "u1"]).is_err());
        assert!(parse(&["wechat-kf", "send", "--to", "u1", "hi", "--image", "m1"]).is_err());
    }
}
