//! Interpretation of submitted text.
//!
//! `/reset` is checked first in either mode. Otherwise NAVIGATE resolves the
//! text against node labels and subs, and SEARCH turns it into an external
//! search url without ever consulting the nodes.

use crate::error::{Result, TerminalError};
use crate::registry::NodeRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;
use terminal_types::{Node, NodeId};
use url::Url;

/// Reserved control input that restores the built-in nodes.
pub const RESET_COMMAND: &str = "/reset";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputMode {
    #[default]
    Navigate,
    Search,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Navigate => InputMode::Search,
            InputMode::Search => InputMode::Navigate,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Navigate => "NAVIGATE",
            InputMode::Search => "SEARCH",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a submitted line means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank input
    Empty,
    /// `/reset`
    Reset,
    /// NAVIGATE match; goes through activation
    Activate(NodeId),
    /// NAVIGATE without a match
    NoMatch,
    /// SEARCH destination, opened directly
    Search(String),
}

/// External search destination: base url plus the query parameter the
/// search text is appended under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTemplate {
    base: Url,
    param: String,
}

impl SearchTemplate {
    pub fn new(base: &str, param: impl Into<String>) -> Result<Self> {
        let base = Url::parse(base).map_err(|source| TerminalError::SearchTemplate {
            template: base.to_string(),
            source,
        })?;
        Ok(Self {
            base,
            param: param.into(),
        })
    }

    /// Url for `text`, form-encoded into the query.
    pub fn url_for(&self, text: &str) -> String {
        let mut url = self.base.clone();
        url.query_pairs_mut().append_pair(&self.param, text);
        url.into()
    }
}

/// First node (registry order) whose label or sub contains `input`,
/// case-insensitively.
pub fn resolve_navigation_query<'a>(input: &str, nodes: &'a NodeRegistry) -> Option<&'a Node> {
    nodes.find_by_query(input)
}

/// Decide what `input` means in `mode`. Pure; the caller performs it.
pub fn interpret(
    input: &str,
    mode: InputMode,
    registry: &NodeRegistry,
    search: &SearchTemplate,
) -> Submission {
    let text = input.trim();
    if text.is_empty() {
        return Submission::Empty;
    }
    if text == RESET_COMMAND {
        return Submission::Reset;
    }
    match mode {
        InputMode::Navigate => match resolve_navigation_query(text, registry) {
            Some(node) => Submission::Activate(node.id.clone()),
            None => Submission::NoMatch,
        },
        InputMode::Search => Submission::Search(search.url_for(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google() -> SearchTemplate {
        SearchTemplate::new("https://www.google.com/search", "q").unwrap()
    }

    #[test]
    fn search_url_is_encoded() {
        assert_eq!(
            google().url_for("rust & physics?"),
            "https://www.google.com/search?q=rust+%26+physics%3F"
        );
    }

    #[test]
    fn bad_template_is_rejected() {
        assert!(SearchTemplate::new("not a url", "q").is_err());
    }

    #[test]
    fn navigate_matches_label_or_sub() {
        let registry = NodeRegistry::with_defaults();
        assert_eq!(
            interpret("one useful", InputMode::Navigate, &registry, &google()),
            Submission::Activate(NodeId::new("strategist"))
        );
        assert_eq!(
            interpret("zzz", InputMode::Navigate, &registry, &google()),
            Submission::NoMatch
        );
    }

    #[test]
    fn search_never_matches_nodes() {
        let registry = NodeRegistry::with_defaults();
        assert_eq!(
            interpret("strategist", InputMode::Search, &registry, &google()),
            Submission::Search("https://www.google.com/search?q=strategist".to_string())
        );
    }

    #[test]
    fn reset_wins_in_both_modes() {
        let registry = NodeRegistry::with_defaults();
        for mode in [InputMode::Navigate, InputMode::Search] {
            assert_eq!(
                interpret("  /reset ", mode, &registry, &google()),
                Submission::Reset
            );
        }
        assert_eq!(
            interpret("", InputMode::Search, &registry, &google()),
            Submission::Empty
        );
    }

    #[test]
    fn mode_toggle() {
        assert_eq!(InputMode::default(), InputMode::Navigate);
        assert_eq!(InputMode::Navigate.toggled(), InputMode::Search);
        assert_eq!(InputMode::Search.toggled().to_string(), "NAVIGATE");
    }
}
