//! Handler replies and the block message posted to the response URL.
//!
//! Handlers return a [`Reply`] built from whatever is convenient: nothing,
//! a scalar, a raw Block Kit object, or a sequence of sections. Replies are
//! normalised into a [`BlockMessage`] just before delivery:
//!
//! - empty text or no sections serialises to `{}`
//! - text and scalars become one `mrkdwn` section each
//! - JSON objects pass through unchanged as blocks
//! - a header, if any, is prefixed as a `plain_text` header block
//!
//! Reference: <https://api.slack.com/reference/block-kit/blocks>

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who sees a delivered reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Broadcast to the whole channel.
    InChannel,
    /// Shown only to the requesting user.
    Ephemeral,
}

impl ResponseType {
    /// Maps the `--visible` global flag to a response type.
    #[must_use]
    pub const fn from_visible(visible: bool) -> Self {
        if visible {
            Self::InChannel
        } else {
            Self::Ephemeral
        }
    }
}

/// Text object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    /// Unformatted text.
    PlainText,
    /// Slack markdown.
    Mrkdwn,
}

/// A Block Kit text object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    /// Text kind.
    #[serde(rename = "type")]
    pub kind: TextKind,
    /// Text content.
    pub text: String,
}

impl TextObject {
    /// Create a plain text object.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::PlainText,
            text: text.into(),
        }
    }

    /// Create a mrkdwn text object.
    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Mrkdwn,
            text: text.into(),
        }
    }
}

/// The block kinds the library produces itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KitBlock {
    /// Section holding markdown text.
    Section {
        /// Section body.
        text: TextObject,
    },
    /// Large plain-text header.
    Header {
        /// Header text.
        text: TextObject,
    },
}

/// One block of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Block {
    /// A block built by the library.
    Kit(KitBlock),
    /// A caller-supplied block, passed through unchanged.
    Custom(Value),
}

impl Block {
    /// A markdown section.
    #[must_use]
    pub fn section(text: impl Into<String>) -> Self {
        Self::Kit(KitBlock::Section {
            text: TextObject::mrkdwn(text),
        })
    }

    /// A plain-text header.
    #[must_use]
    pub fn header(text: impl Into<String>) -> Self {
        Self::Kit(KitBlock::Header {
            text: TextObject::plain(text),
        })
    }
}

/// The JSON payload posted to a response URL or returned as an HTTP body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockMessage {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_type: Option<ResponseType>,
}

impl BlockMessage {
    /// A message with no content; serialises to `{}`.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            blocks: Vec::new(),
            response_type: None,
        }
    }

    /// A message with the given blocks. No blocks yields [`Self::empty`].
    #[must_use]
    pub fn new(blocks: Vec<Block>, response_type: ResponseType) -> Self {
        if blocks.is_empty() {
            return Self::empty();
        }
        Self {
            blocks,
            response_type: Some(response_type),
        }
    }

    /// A single markdown section.
    #[must_use]
    pub fn text(text: impl Into<String>, response_type: ResponseType) -> Self {
        Reply::text(text).into_message(response_type)
    }

    /// Returns the blocks in order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the response type, absent for empty messages.
    #[must_use]
    pub const fn response_type(&self) -> Option<ResponseType> {
        self.response_type
    }

    /// Returns `true` when there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the text of every markdown section, in order.
    pub fn section_texts(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Kit(KitBlock::Section { text }) => Some(text.text.as_str()),
            _ => None,
        })
    }
}

/// One section of a handler reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Markdown text.
    Text(String),
    /// Raw block passed through unchanged.
    Block(Value),
}

impl Section {
    fn into_block(self) -> Option<Block> {
        match self {
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(Block::section(text)),
            Self::Block(value) => Some(Block::Custom(value)),
        }
    }
}

impl From<Value> for Section {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Text(String::new()),
            Value::String(text) => Self::Text(text),
            Value::Object(_) => Self::Block(value),
            other => Self::Text(other.to_string()),
        }
    }
}

/// What a handler returns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reply {
    header: Option<String>,
    sections: Vec<Section>,
}

impl Reply {
    /// No content.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            header: None,
            sections: Vec::new(),
        }
    }

    /// One markdown section.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::sections([Section::Text(text.into())])
    }

    /// One raw block.
    #[must_use]
    pub fn block(block: Value) -> Self {
        Self::sections([Section::Block(block)])
    }

    /// Several sections in order.
    #[must_use]
    pub fn sections(sections: impl IntoIterator<Item = Section>) -> Self {
        Self {
            header: None,
            sections: sections.into_iter().collect(),
        }
    }

    /// Prefixes a header block. Ignored if the reply has no content.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Returns `true` when the reply carries no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections
            .iter()
            .all(|section| matches!(section, Section::Text(text) if text.is_empty()))
    }

    /// Normalises the reply into a block message.
    #[must_use]
    pub fn into_message(self, response_type: ResponseType) -> BlockMessage {
        let body: Vec<Block> = self
            .sections
            .into_iter()
            .filter_map(Section::into_block)
            .collect();
        if body.is_empty() {
            return BlockMessage::empty();
        }
        let blocks = self
            .header
            .map(Block::header)
            .into_iter()
            .chain(body)
            .collect();
        BlockMessage::new(blocks, response_type)
    }
}

impl From<()> for Reply {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<f64> for Reply {
    fn from(value: f64) -> Self {
        Self::text(value.to_string())
    }
}

impl From<i64> for Reply {
    fn from(value: i64) -> Self {
        Self::text(value.to_string())
    }
}

impl From<Section> for Reply {
    fn from(section: Section) -> Self {
        Self::sections([section])
    }
}

impl From<Vec<Section>> for Reply {
    fn from(sections: Vec<Section>) -> Self {
        Self::sections(sections)
    }
}

impl<T: Into<Self>> From<Option<T>> for Reply {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::empty, Into::into)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::empty(),
            Value::Array(items) => Self::sections(items.into_iter().map(Section::from)),
            other => Self::from(Section::from(other)),
        }
    }
}
