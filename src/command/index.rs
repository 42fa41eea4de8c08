//! Command Index: keyword → node id, rebuilt from scratch on every registry
//! change.

use std::collections::HashSet;
use terminal_types::{Node, NodeId};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandIndex {
    /// In registry order; iteration order is the match order.
    entries: Vec<(String, NodeId)>,
}

impl CommandIndex {
    /// Index every node's keywords. A keyword already claimed by an earlier
    /// node stays with that node.
    pub fn build(nodes: &[Node]) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for node in nodes {
            for keyword in node.match_keywords() {
                if !seen.insert(keyword.clone()) {
                    debug!(%keyword, shadowed = %node.id, "duplicate keyword ignored");
                    continue;
                }
                entries.push((keyword, node.id.clone()));
            }
        }

        Self { entries }
    }

    /// First indexed keyword contained anywhere in the lower-cased input.
    pub fn resolve(&self, input: &str) -> Option<&NodeId> {
        let input = input.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| input.contains(keyword.as_str()))
            .map(|(_, id)| id)
    }

    pub fn entries(&self) -> &[(String, NodeId)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve a voice transcript or free text against the index.
pub fn resolve_transcript_or_text<'a>(
    input: &str,
    index: &'a CommandIndex,
) -> Option<&'a NodeId> {
    index.resolve(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin_nodes;
    use pretty_assertions::assert_eq;

    fn node(id: &str, label: &str, keywords: &[&str]) -> Node {
        Node {
            id: NodeId::new(id),
            label: label.to_string(),
            sub: String::new(),
            url: format!("https://{}.example", id),
            color: String::new(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            is_custom: false,
            icon: Default::default(),
        }
    }

    #[test]
    fn test_containment_match() {
        let index = CommandIndex::build(&builtin_nodes());
        assert_eq!(
            resolve_transcript_or_text("please open the strategist now", &index),
            Some(&NodeId::new("strategist"))
        );
        assert_eq!(index.resolve("Show me the NEWS"), Some(&NodeId::new("reporter")));
        assert_eq!(index.resolve("nothing to see here"), None);
        assert_eq!(index.resolve(""), None);
    }

    #[test]
    fn test_substring_not_tokenized() {
        let index = CommandIndex::build(&builtin_nodes());
        // "batch" inside a longer word still matches
        assert_eq!(index.resolve("batches"), Some(&NodeId::new("engineer")));
    }

    #[test]
    fn test_label_fallback_keyword() {
        let index = CommandIndex::build(&[node("custom-1", "My Wiki", &[])]);
        assert_eq!(
            index.entries(),
            &[("my wiki".to_string(), NodeId::new("custom-1"))]
        );
        assert_eq!(index.resolve("open my wiki"), Some(&NodeId::new("custom-1")));
    }

    #[test]
    fn test_duplicate_keyword_first_wins() {
        let nodes = vec![
            node("first", "First", &["shared", "alpha"]),
            node("second", "Second", &["shared", "beta"]),
        ];
        let index = CommandIndex::build(&nodes);
        assert_eq!(index.len(), 3);
        for _ in 0..10 {
            assert_eq!(index.resolve("shared"), Some(&NodeId::new("first")));
        }
        assert_eq!(index.resolve("beta"), Some(&NodeId::new("second")));
    }

    #[test]
    fn test_iteration_order_decides_between_keywords() {
        let index = CommandIndex::build(&builtin_nodes());
        // Both "strategist" and "engineer" present: strategist is indexed first
        assert_eq!(
            index.resolve("engineer or strategist"),
            Some(&NodeId::new("strategist"))
        );
    }
}
