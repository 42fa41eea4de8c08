//! Navigation nodes.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// =============================================================================
// NODE ID
// =============================================================================

/// Stable unique identifier of a node.
///
/// The same string is used as the physics body label, the visual element key
/// and the persistence key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for a user-created node, derived from its creation time.
    pub fn custom(created_at_ms: i64) -> Self {
        Self(format!("custom-{}", created_at_ms))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// =============================================================================
// ICON
// =============================================================================

/// Display icon. Never persisted; re-attached by id on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeIcon {
    #[default]
    Brain,
    Zap,
    Radio,
    Hammer,
}

impl NodeIcon {
    /// Single glyph used by hosts without an icon font.
    pub fn glyph(self) -> &'static str {
        match self {
            NodeIcon::Brain => "◉",
            NodeIcon::Zap => "⚡",
            NodeIcon::Radio => "◎",
            NodeIcon::Hammer => "⚒",
        }
    }
}

// =============================================================================
// NODE
// =============================================================================

/// A navigation target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,

    /// Display title, rendered upper-case
    pub label: String,

    /// Secondary descriptive text
    #[serde(default)]
    pub sub: String,

    /// Destination opened on activation
    pub url: String,

    /// Display accent (hex string, not validated)
    #[serde(default)]
    pub color: String,

    /// Lowercase keywords for voice/text matching
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Whether the node was user-added
    #[serde(default)]
    pub is_custom: bool,

    #[serde(skip)]
    pub icon: NodeIcon,
}

impl Node {
    /// Keywords used for matching, falling back to the lower-cased label.
    pub fn match_keywords(&self) -> Vec<String> {
        let keywords: Vec<String> = self
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            vec![self.label.to_lowercase()]
        } else {
            keywords
        }
    }

    /// Upper-cased label for display.
    pub fn display_label(&self) -> String {
        self.label.to_uppercase()
    }
}

/// Shape of a node handed over by the node-creation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDraft {
    pub label: String,
    pub sub: String,
    pub url: String,
    pub color: String,
    /// Explicit keywords; `None` derives one from the label
    pub keywords: Option<Vec<String>>,
}

impl NodeDraft {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            color: "#00ff41".to_string(),
            ..Default::default()
        }
    }

    pub fn with_sub(mut self, sub: impl Into<String>) -> Self {
        self.sub = sub.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }
}
