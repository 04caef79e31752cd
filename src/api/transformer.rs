//! Message-to-wire transformation
//!
//! Turns a typed [`Message`] into the `msgtype` + body fields the
//! customer-service send endpoint expects, e.g.
//! `{"msgtype": "text", "text": {"content": "hello"}}`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{Article, MenuItem, Message};

/// Wire-shaped request fields.
pub type Payload = Map<String, Value>;

/// Converts a message into the fields merged into the request body.
pub trait Transformer {
    fn transform(&self, message: &Message) -> Result<Payload>;
}

/// Default transformer producing the official account wire format.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireTransformer;

#[derive(Serialize)]
struct TextBody<'a> {
    content: &'a str,
}

#[derive(Serialize)]
struct MediaBody<'a> {
    media_id: &'a str,
}

#[derive(Serialize)]
struct VideoBody<'a> {
    media_id: &'a str,
    thumb_media_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Serialize)]
struct MusicBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    musicurl: &'a str,
    hqmusicurl: &'a str,
    thumb_media_id: &'a str,
}

#[derive(Serialize)]
struct NewsBody<'a> {
    articles: &'a [Article],
}

#[derive(Serialize)]
struct CardBody<'a> {
    card_id: &'a str,
}

#[derive(Serialize)]
struct MenuBody<'a> {
    head_content: &'a str,
    list: &'a [MenuItem],
    tail_content: &'a str,
}

#[derive(Serialize)]
struct MiniProgramBody<'a> {
    title: &'a str,
    appid: &'a str,
    pagepath: &'a str,
    thumb_media_id: &'a str,
}

impl Transformer for WireTransformer {
    fn transform(&self, message: &Message) -> Result<Payload> {
        let msgtype = message.msgtype();
        let body = match message {
            Message::Text { content } => to_value(msgtype, TextBody { content })?,
            Message::Image { media_id }
            | Message::Voice { media_id }
            | Message::MpNews { media_id } => to_value(msgtype, MediaBody { media_id })?,
            Message::Video {
                media_id,
                thumb_media_id,
                title,
                description,
            } => to_value(
                msgtype,
                VideoBody {
                    media_id,
                    thumb_media_id,
                    title: title.as_deref(),
                    description: description.as_deref(),
                },
            )?,
            Message::Music {
                title,
                description,
                music_url,
                hq_music_url,
                thumb_media_id,
            } => to_value(
                msgtype,
                MusicBody {
                    title: title.as_deref(),
                    description: description.as_deref(),
                    musicurl: music_url,
                    hqmusicurl: hq_music_url,
                    thumb_media_id,
                },
            )?,
            Message::News { articles } => to_value(msgtype, NewsBody { articles })?,
            Message::Card { card_id } => to_value(msgtype, CardBody { card_id })?,
            Message::Menu {
                head_content,
                items,
                tail_content,
            } => to_value(
                msgtype,
                MenuBody {
                    head_content,
                    list: items,
                    tail_content,
                },
            )?,
            Message::MiniProgramPage {
                title,
                app_id,
                page_path,
                thumb_media_id,
            } => to_value(
                msgtype,
                MiniProgramBody {
                    title,
                    appid: app_id,
                    pagepath: page_path,
                    thumb_media_id,
                },
            )?,
            // Already wire-shaped.
            Message::Raw { content } => return Ok(content.clone()),
        };

        let mut fields = Payload::new();
        fields.insert("msgtype".to_string(), Value::from(msgtype));
        fields.insert(msgtype.to_string(), body);
        Ok(fields)
    }
}

fn to_value<T: Serialize>(msgtype: &'static str, body: T) -> Result<Value> {
    serde_json::to_value(body).map_err(|source| Error::Transform { msgtype, source })
}
