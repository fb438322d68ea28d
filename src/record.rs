use crate::error::ShelfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SCHEME: &str = "bilibili";

/// What a record's content points at. Persisted as 0/1/2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ItemType {
    #[default]
    Video,
    User,
    Custom,
}

impl ItemType {
    pub fn label(self) -> &'static str {
        match self {
            ItemType::Video => "video",
            ItemType::User => "user",
            ItemType::Custom => "custom",
        }
    }

    /// URI path segment used when prefixing; `None` for free-form content.
    fn path_segment(self) -> Option<&'static str> {
        match self {
            ItemType::Video => Some("video"),
            ItemType::User => Some("space"),
            ItemType::Custom => None,
        }
    }
}

impl From<ItemType> for u8 {
    fn from(kind: ItemType) -> Self {
        match kind {
            ItemType::Video => 0,
            ItemType::User => 1,
            ItemType::Custom => 2,
        }
    }
}

impl TryFrom<u8> for ItemType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ItemType::Video),
            1 => Ok(ItemType::User),
            2 => Ok(ItemType::Custom),
            other => Err(format!("unknown item type {other}")),
        }
    }
}

impl FromStr for ItemType {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" | "v" | "0" => Ok(ItemType::Video),
            "user" | "u" | "mid" | "1" => Ok(ItemType::User),
            "custom" | "c" | "2" => Ok(ItemType::Custom),
            _ => Err(ShelfError::InvalidType(s.to_string())),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One stored snippet with its display, order and privacy metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub content: String,
    pub note: String,
    pub order: u32,
    pub masked: bool,
}

impl Record {
    /// A fresh record as produced by Add: video type, nothing typed yet.
    pub fn empty() -> Self {
        Self {
            kind: ItemType::Video,
            content: String::new(),
            note: String::new(),
            order: 0,
            masked: false,
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// URI convention shared by normalization and QR payload building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriScheme {
    scheme: String,
}

impl Default for UriScheme {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEME)
    }
}

impl UriScheme {
    pub fn new(scheme: &str) -> Self {
        let scheme = scheme.trim().trim_end_matches("://");
        Self { scheme: scheme.to_string() }
    }

    pub fn name(&self) -> &str {
        &self.scheme
    }

    /// `scheme://`
    pub fn root(&self) -> String {
        format!("{}://", self.name())
    }

    /// `scheme://video/` or `scheme://space/`; `None` for custom content.
    pub fn type_prefix(&self, kind: ItemType) -> Option<String> {
        kind.path_segment()
            .map(|segment| format!("{}://{}/", self.scheme, segment))
    }

    /// Blur-time normalization of typed content. Custom content and
    /// anything already carrying the scheme root is left untouched, so
    /// applying this twice yields the same string as applying it once.
    pub fn normalize_content(&self, kind: ItemType, content: &str) -> String {
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with(&self.root()) {
            return content.to_string();
        }
        match self.type_prefix(kind) {
            Some(prefix) => format!("{prefix}{trimmed}"),
            None => content.to_string(),
        }
    }

    /// The string a QR symbol is generated from; `None` while blank.
    pub fn qr_payload(&self, kind: ItemType, content: &str) -> Option<String> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }
        match self.type_prefix(kind) {
            Some(prefix) if !trimmed.starts_with(&prefix) => {
                Some(format!("{prefix}{trimmed}"))
            }
            _ => Some(trimmed.to_string()),
        }
    }
}
