//! API client module for Official Account customer service

pub mod builder;
pub mod client;
pub mod customer_service;
pub mod transformer;

use anyhow::Result;

pub use builder::MessageBuilder;
use client::OfficialAccountClient;

use crate::models::Message;

/// Send a message to a user, optionally as a specific staff account
pub async fn send_message(to: &str, by: Option<&str>, message: Message) -> Result<()> {
    let client = OfficialAccountClient::new().await?;

    let mut builder = MessageBuilder::new(&client).message(message).to(to);
    if let Some(account) = by {
        builder = builder.by(account);
    }

    tracing::debug!(
        "Sending {} message to {} (as {:?})",
        builder.current_message().map_or("no", Message::msgtype),
        builder.recipient().unwrap_or_default(),
        builder.account()
    );
    let resp = builder.send().await?;
    tracing::debug!("Send response: {}", resp);
    println!("Message sent.");
    Ok(())
}

/// Toggle the typing indicator for a user
pub async fn typing(to: &str, on: bool) -> Result<()> {
    let client = OfficialAccountClient::new().await?;
    client.typing(to, on).await?;
    println!("Typing indicator {}.", if on { "shown" } else { "cancelled" });
    Ok(())
}

/// List staff accounts
pub async fn list_staff() -> Result<()> {
    let client = OfficialAccountClient::new().await?;
    let staff = client.staff_list().await?;

    println!("\nStaff Accounts:");
    println!("{:-<60}", "");

    if staff.is_empty() {
        println!("  (no staff accounts)");
        return Ok(());
    }

    for kf in &staff {
        println!("{}", kf.kf_nick.as_deref().unwrap_or(&kf.kf_account));
        println!("  Account: {}", kf.kf_account);
        if let Some(ref id) = kf.kf_id {
            println!("  ID: {}", id);
        }
        if let Some(ref wx) = kf.kf_wx {
            println!("  WeChat: {}", wx);
        }
        println!();
    }

    Ok(())
}

/// List staff currently online
pub async fn list_online() -> Result<()> {
    let client = OfficialAccountClient::new().await?;
    let online = client.online_staff().await?;

    if online.is_empty() {
        println!("(no staff online)");
        return Ok(());
    }

    for kf in &online {
        println!(
            "{}  status={}  sessions={}",
            kf.kf_account,
            kf.status,
            kf.accepted_case.unwrap_or(0)
        );
    }

    Ok(())
}
