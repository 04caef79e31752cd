//! Outbound message models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A single article in an external-link news message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "picurl", skip_serializing_if = "Option::is_none")]
    pub pic_url: Option<String>,
}

/// One selectable entry in a menu message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub content: String,
}

/// Customer-service message variants.
///
/// Plain strings convert into [`Message::Text`]; [`Message::Raw`] carries a
/// fully formed request body that is sent as-is. Deserializes from a
/// `type`-tagged document so messages can be loaded from files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Text {
        content: String,
    },
    Image {
        media_id: String,
    },
    Voice {
        media_id: String,
    },
    Video {
        media_id: String,
        thumb_media_id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    Music {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
        music_url: String,
        hq_music_url: String,
        thumb_media_id: String,
    },
    News {
        articles: Vec<Article>,
    },
    MpNews {
        media_id: String,
    },
    Card {
        card_id: String,
    },
    Menu {
        head_content: String,
        items: Vec<MenuItem>,
        tail_content: String,
    },
    MiniProgramPage {
        title: String,
        app_id: String,
        page_path: String,
        thumb_media_id: String,
    },
    Raw {
        content: Map<String, Value>,
    },
}

impl Message {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn image(media_id: impl Into<String>) -> Self {
        Self::Image {
            media_id: media_id.into(),
        }
    }

    pub fn voice(media_id: impl Into<String>) -> Self {
        Self::Voice {
            media_id: media_id.into(),
        }
    }

    pub fn mpnews(media_id: impl Into<String>) -> Self {
        Self::MpNews {
            media_id: media_id.into(),
        }
    }

    pub fn card(card_id: impl Into<String>) -> Self {
        Self::Card {
            card_id: card_id.into(),
        }
    }

    /// Wrap a JSON object as a raw message. Anything but an object is rejected.
    pub fn raw(body: Value) -> Result<Self> {
        match body {
            Value::Object(content) => Ok(Self::Raw { content }),
            other => Err(Error::InvalidArgument(format!(
                "raw message body must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse a raw message from a JSON string.
    pub fn raw_from_str(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::InvalidArgument(format!("raw message is not valid JSON: {}", e)))?;
        Self::raw(value)
    }

    /// Parse a `type`-tagged message document (JSON).
    pub fn from_json(doc: &str) -> Result<Self> {
        serde_json::from_str(doc)
            .map_err(|e| Error::InvalidArgument(format!("invalid message document: {}", e)))
    }

    /// Wire `msgtype` for this variant.
    pub fn msgtype(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Voice { .. } => "voice",
            Self::Video { .. } => "video",
            Self::Music { .. } => "music",
            Self::News { .. } => "news",
            Self::MpNews { .. } => "mpnews",
            Self::Card { .. } => "wxcard",
            Self::Menu { .. } => "msgmenu",
            Self::MiniProgramPage { .. } => "miniprogrampage",
            Self::Raw { .. } => "raw",
        }
    }
}

impl From<&str> for Message {
    fn from(content: &str) -> Self {
        Self::text(content)
    }
}

impl From<String> for Message {
    fn from(content: String) -> Self {
        Self::text(content)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
