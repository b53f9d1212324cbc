//! Chat messages and their wire records

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::attachment;

/// A serialized chat turn as it is sent on the wire and stored in history.
///
/// Any JSON object is accepted. Keys other than `role` and `content` are
/// kept in `extra`, and content this crate does not model is kept verbatim,
/// so records read back from a history file serialize to the same JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_content",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Content>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A `content` key that is present, even as `null`, is kept
fn present_content<'de, D>(deserializer: D) -> Result<Option<Content>, D::Error>
where
    D: Deserializer<'de>,
{
    Content::deserialize(deserializer).map(Some)
}

impl MessageRecord {
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// The plain text of this record, if its content is a bare string
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(Content::Text(text)) => Some(text),
            _ => None,
        }
    }
}

/// Message content: a bare string, or an ordered list of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
    /// Any other JSON value (`null`, an object, ...), kept as is
    Other(Value),
}

/// One element of an array-valued `content`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Typed(TypedPart),
    /// A part of a type not modelled here (`input_audio`, ...), or a
    /// malformed one, kept verbatim
    Raw(Value),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Typed(TypedPart::Text(TextPart {
            text: text.into(),
            extra: Map::new(),
        }))
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::Typed(TypedPart::ImageUrl(ImagePart {
            image_url: ImageUrl {
                url: url.into(),
                extra: Map::new(),
            },
            extra: Map::new(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypedPart {
    ImageUrl(ImagePart),
    Text(TextPart),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePart {
    pub image_url: ImageUrl,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `image_url` object; `detail` and similar keys land in `extra`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A chat turn under construction.
///
/// Setters take and return the message so calls chain:
/// `Message::new("user").text("hi").image("shot.png")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    role: String,
    text: Option<String>,
    image: Option<String>,
}

impl Message {
    /// Create an empty message with the given role
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: None,
            image: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Attach an image read from a local file.
    ///
    /// If the file cannot be encoded the image slot is left as it was and
    /// the message stays text-only.
    pub fn image<P: AsRef<Path>>(mut self, path: P) -> Self {
        if let Some(uri) = attachment::image_data_uri(path) {
            self.image = Some(uri);
        }
        self
    }

    /// Like [`Message::image`], but a `None` path is a no-op
    pub fn maybe_image<P: AsRef<Path>>(self, path: Option<P>) -> Self {
        match path {
            Some(path) => self.image(path),
            None => self,
        }
    }

    /// Attach an already encoded image (a `data:` URI or URL)
    pub fn image_data(mut self, data: impl Into<String>) -> Self {
        self.image = Some(data.into());
        self
    }

    pub fn get_role(&self) -> &str {
        &self.role
    }

    pub fn get_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn get_image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Convert to the wire record.
    ///
    /// With an image the content is an array, image part first and text part
    /// second; otherwise it is the bare text, or absent when there is none.
    pub fn to_record(&self) -> MessageRecord {
        let content = match (&self.image, &self.text) {
            (Some(image), text) => {
                let mut parts = vec![ContentPart::image_url(image.clone())];
                if let Some(text) = text {
                    parts.push(ContentPart::text(text.clone()));
                }
                Some(Content::Parts(parts))
            }
            (None, Some(text)) => Some(Content::Text(text.clone())),
            (None, None) => None,
        };

        MessageRecord {
            role: Some(self.role.clone()),
            content,
            extra: Map::new(),
        }
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new("user")
    }
}

impl From<Message> for MessageRecord {
    fn from(message: Message) -> Self {
        message.to_record()
    }
}

impl From<&Message> for MessageRecord {
    fn from(message: &Message) -> Self {
        message.to_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_text_only_serializes_bare_string() {
        let record = Message::new("user").text("Hello").to_record();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"role": "user", "content": "Hello"})
        );
    }

    #[test]
    fn test_image_part_comes_first() {
        let record = Message::new("user")
            .text("What is this?")
            .image_data("data:image/png;base64,AAAA")
            .to_record();

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "role": "user",
                "content": [
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}},
                    {"type": "text", "text": "What is this?"}
                ]
            })
        );
    }

    #[test]
    fn test_image_without_text() {
        let record = Message::new("user")
            .image_data("data:image/png;base64,AAAA")
            .to_record();
        match record.content {
            Some(Content::Parts(parts)) => assert_eq!(parts.len(), 1),
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn test_empty_message_has_no_content_key() {
        let record = Message::new("assistant").to_record();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"role": "assistant"})
        );
    }

    #[test]
    fn test_missing_image_file_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let message = Message::new("user")
            .text("Hello")
            .image(temp_dir.path().join("missing.png"));

        assert!(message.get_image().is_none());
        assert_eq!(
            serde_json::to_value(message.to_record()).unwrap(),
            json!({"role": "user", "content": "Hello"})
        );
    }

    #[test]
    fn test_image_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shot.png");
        std::fs::write(&path, [0u8, 1, 2]).unwrap();

        let message = Message::new("user").image(&path);
        assert_eq!(message.get_image(), Some("data:image/png;base64,AAEC"));
    }

    #[test]
    fn test_maybe_image_none_is_noop() {
        let message = Message::new("user").text("hi").maybe_image(None::<&Path>);
        assert!(message.get_image().is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Message::new("user").text("one");
        let copy = original.clone().text("two").role("system");

        assert_eq!(original.get_text(), Some("one"));
        assert_eq!(original.get_role(), "user");
        assert_eq!(copy.get_text(), Some("two"));
        assert_eq!(copy.get_role(), "system");
    }

    #[test]
    fn test_record_keeps_unknown_keys() {
        let raw = json!({"role": "assistant", "content": null, "name": "bot"});
        let record: MessageRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.content, Some(Content::Other(Value::Null)));
        assert_eq!(record.extra.get("name"), Some(&json!("bot")));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_record_keeps_part_details() {
        let raw = json!({
            "role": "user",
            "content": [
                {"type": "image_url", "image_url": {"url": "data:x", "detail": "high"}},
                {"type": "text", "text": "hi", "cache_control": {"type": "ephemeral"}}
            ]
        });
        let record: MessageRecord = serde_json::from_value(raw.clone()).unwrap();

        match &record.content {
            Some(Content::Parts(parts)) => {
                assert!(matches!(parts[0], ContentPart::Typed(TypedPart::ImageUrl(_))));
                assert!(matches!(parts[1], ContentPart::Typed(TypedPart::Text(_))));
            }
            other => panic!("unexpected content: {other:?}"),
        }
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_record_accepts_unmodelled_shapes() {
        let raw = json!({
            "content": [
                {"type": "input_audio", "input_audio": {"data": "AAAA", "format": "wav"}},
                {"type": "text"}
            ]
        });
        let record: MessageRecord = serde_json::from_value(raw.clone()).unwrap();

        assert!(record.role().is_none());
        match &record.content {
            Some(Content::Parts(parts)) => {
                assert!(parts.iter().all(|p| matches!(p, ContentPart::Raw(_))));
            }
            other => panic!("unexpected content: {other:?}"),
        }
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_record_accepts_object_content() {
        let raw = json!({"role": "tool", "content": {"temp": 21}});
        let record: MessageRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.content, Some(Content::Other(json!({"temp": 21}))));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(Message::default().get_role(), "user");
    }
}
