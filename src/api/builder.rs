//! Fluent builder for customer-service messages
//!
//! ```ignore
//! let resp = MessageBuilder::new(&client)
//!     .message("hello")
//!     .to("oUser123")
//!     .by("kf01@example")
//!     .send()
//!     .await?;
//! ```

use serde_json::Value;

use super::customer_service::CustomerServiceClient;
use super::transformer::{Payload, Transformer, WireTransformer};
use crate::error::{Error, Result};
use crate::models::Message;

/// Collects a message, recipient and sending staff account, then hands the
/// shaped payload to a [`CustomerServiceClient`].
///
/// State is kept after `send`, so the same builder can be sent again or
/// tweaked with further setter calls.
pub struct MessageBuilder<'a, C, T = WireTransformer> {
    client: &'a C,
    transformer: T,
    message: Option<Message>,
    recipient: Option<String>,
    account: Option<String>,
}

impl<'a, C: CustomerServiceClient> MessageBuilder<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self::with_transformer(client, WireTransformer)
    }
}

impl<'a, C: CustomerServiceClient, T: Transformer> MessageBuilder<'a, C, T> {
    pub fn with_transformer(client: &'a C, transformer: T) -> Self {
        Self {
            client,
            transformer,
            message: None,
            recipient: None,
            account: None,
        }
    }

    /// Set the message. Strings become text messages.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the staff account the message is sent as.
    pub fn by(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Set the recipient open id.
    pub fn to(mut self, open_id: impl Into<String>) -> Self {
        self.recipient = Some(open_id.into());
        self
    }

    pub fn current_message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Shape the request body without sending it.
    ///
    /// Raw messages are returned verbatim. Everything else starts from
    /// `touser` (and `customservice` when an account is set) with the
    /// transformed fields merged over it.
    pub fn payload(&self) -> Result<Payload> {
        let message = self.message.as_ref().ok_or(Error::NoMessage)?;

        if let Message::Raw { content } = message {
            return Ok(content.clone());
        }

        let fields = self.transformer.transform(message)?;

        let mut payload = Payload::new();
        payload.insert(
            "touser".to_string(),
            self.recipient.clone().map_or(Value::Null, Value::String),
        );
        if let Some(account) = self.account.as_deref().filter(|a| !a.is_empty()) {
            payload.insert(
                "customservice".to_string(),
                serde_json::json!({ "kf_account": account }),
            );
        }
        // Transformed fields win on collision.
        payload.extend(fields);

        Ok(payload)
    }

    /// Send the message and return the client's response untouched.
    pub async fn send(&self) -> Result<C::Response> {
        let payload = self.payload()?;
        tracing::debug!(
            msgtype = self.message.as_ref().map(Message::msgtype),
            "Sending customer service message"
        );
        Ok(self.client.send(payload).await?)
    }
}
