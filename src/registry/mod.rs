//! Node Registry
//!
//! Ordered collection of navigation nodes. The registry is the only place
//! node identity is decided: ids are unique and urls non-empty for every
//! node it holds, whichever path the node arrived by (defaults, persisted
//! state, or the add-node form).
//!
//! Every mutation persists the full ordered set and bumps [`NodeRegistry::revision`],
//! which downstream consumers use to know when to rebuild derived state.

mod defaults;
mod store;

pub use defaults::{attach_icons, builtin_icon, builtin_nodes};
pub use store::{FileStore, MemoryStore, NodeStore};

use crate::error::RegistryError;
use std::collections::HashSet;
use std::fmt;
use terminal_types::{Node, NodeDraft, NodeId};
use tracing::{debug, info, warn};

pub struct NodeRegistry {
    nodes: Vec<Node>,
    store: Box<dyn NodeStore>,
    revision: u64,
}

impl NodeRegistry {
    /// Load from the store, falling back to the built-in set when the stored
    /// state is absent, malformed, empty, or violates registry invariants.
    pub fn load(store: Box<dyn NodeStore>) -> Self {
        let nodes = match store.load() {
            Ok(Some(blob)) => match parse_nodes(&blob) {
                Some(nodes) => {
                    info!(count = nodes.len(), "node registry loaded from store");
                    nodes
                }
                None => {
                    warn!("persisted node state unusable, using built-in nodes");
                    builtin_nodes()
                }
            },
            Ok(None) => {
                debug!("no persisted node state, using built-in nodes");
                builtin_nodes()
            }
            Err(e) => {
                warn!(error = %e, "failed to read node store, using built-in nodes");
                builtin_nodes()
            }
        };

        Self {
            nodes,
            store,
            revision: 0,
        }
    }

    /// Registry holding only the built-in nodes over an in-memory store.
    pub fn with_defaults() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Incremented on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find_by_id(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn get(&self, id: &NodeId) -> Result<&Node, RegistryError> {
        self.find_by_id(id)
            .ok_or_else(|| RegistryError::UnknownNode(id.clone()))
    }

    /// First node (registry order) whose label or sub contains `query`,
    /// case-insensitively. Blank queries match nothing.
    pub fn find_by_query(&self, query: &str) -> Option<&Node> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.nodes.iter().find(|n| {
            n.label.to_lowercase().contains(&query) || n.sub.to_lowercase().contains(&query)
        })
    }

    /// Append a fully formed node.
    pub fn insert(&mut self, node: Node) -> Result<(), RegistryError> {
        validate(&node)?;
        if self.find_by_id(&node.id).is_some() {
            return Err(RegistryError::DuplicateId(node.id));
        }
        debug!(id = %node.id, "node added");
        self.nodes.push(node);
        self.commit();
        Ok(())
    }

    /// Append a user-created node built from the add-node form.
    pub fn add_custom(
        &mut self,
        draft: NodeDraft,
        created_at_ms: i64,
    ) -> Result<NodeId, RegistryError> {
        let label = draft.label.trim();
        if label.is_empty() {
            return Err(RegistryError::EmptyLabel);
        }

        let id = self.unique_custom_id(created_at_ms);
        let keywords = match draft.keywords {
            Some(keywords) if keywords.iter().any(|k| !k.trim().is_empty()) => keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            _ => vec![label.to_lowercase()],
        };

        let node = Node {
            id: id.clone(),
            label: label.to_uppercase(),
            sub: draft.sub,
            url: draft.url.trim().to_string(),
            color: draft.color,
            keywords,
            is_custom: true,
            icon: Default::default(),
        };
        self.insert(node)?;
        info!(%id, "custom node created");
        Ok(id)
    }

    /// Drop persisted state and go back to exactly the built-in set.
    pub fn reset(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear node store");
        }
        self.nodes = builtin_nodes();
        self.commit();
        info!(count = self.nodes.len(), "node registry reset to built-in nodes");
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.nodes)
    }

    fn unique_custom_id(&self, created_at_ms: i64) -> NodeId {
        let base = NodeId::custom(created_at_ms);
        if self.find_by_id(&base).is_none() {
            return base;
        }
        let mut suffix = 2u32;
        loop {
            let candidate = NodeId::new(format!("{}-{}", base, suffix));
            if self.find_by_id(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn commit(&mut self) {
        self.revision += 1;
        self.persist();
    }

    fn persist(&mut self) {
        let blob = match self.to_json() {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to serialize nodes");
                return;
            }
        };
        if let Err(e) = self.store.save(&blob) {
            warn!(error = %e, "failed to persist nodes");
        }
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("nodes", &self.nodes.len())
            .field("revision", &self.revision)
            .finish()
    }
}

fn validate(node: &Node) -> Result<(), RegistryError> {
    if node.label.trim().is_empty() {
        return Err(RegistryError::EmptyLabel);
    }
    if node.url.trim().is_empty() {
        return Err(RegistryError::EmptyUrl(node.id.clone()));
    }
    Ok(())
}

/// Decode a persisted blob. `None` for anything that is not a non-empty,
/// valid, duplicate-free node list.
fn parse_nodes(blob: &str) -> Option<Vec<Node>> {
    let mut nodes: Vec<Node> = match serde_json::from_str(blob) {
        Ok(nodes) => nodes,
        Err(e) => {
            debug!(error = %e, "persisted node blob is not a node list");
            return None;
        }
    };
    if nodes.is_empty() {
        return None;
    }

    let mut seen = HashSet::with_capacity(nodes.len());
    for node in &nodes {
        if validate(node).is_err() || !seen.insert(node.id.clone()) {
            debug!(id = %node.id, "persisted node rejected");
            return None;
        }
    }

    attach_icons(&mut nodes);
    Some(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use terminal_types::NodeIcon;

    fn registry() -> (NodeRegistry, MemoryStore) {
        let store = MemoryStore::new();
        (NodeRegistry::load(Box::new(store.clone())), store)
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let (registry, store) = registry();
        assert_eq!(registry.nodes(), builtin_nodes().as_slice());
        assert_eq!(registry.revision(), 0);
        // Loading alone does not write
        assert_eq!(store.blob(), None);
    }

    #[test]
    fn test_malformed_store_loads_defaults() {
        for blob in ["not json", "[]", "{\"id\":\"x\"}", r#"[{"id":"a","label":"A","url":""}]"#] {
            let registry = NodeRegistry::load(Box::new(MemoryStore::with_blob(blob)));
            assert_eq!(registry.len(), 4, "blob: {}", blob);
        }
    }

    #[test]
    fn test_duplicate_ids_in_store_load_defaults() {
        let blob = r#"[
            {"id":"a","label":"A","url":"https://a"},
            {"id":"a","label":"B","url":"https://b"}
        ]"#;
        let registry = NodeRegistry::load(Box::new(MemoryStore::with_blob(blob)));
        assert_eq!(registry.nodes()[0].id.as_str(), "strategist");
    }

    #[test]
    fn test_add_custom_derives_fields() {
        let (mut registry, store) = registry();
        let id = registry
            .add_custom(
                NodeDraft::new("Hacker News", " https://news.ycombinator.com ").with_sub("HN"),
                1_700_000_000_000,
            )
            .unwrap();

        assert_eq!(id.as_str(), "custom-1700000000000");
        let node = registry.find_by_id(&id).unwrap();
        assert_eq!(node.label, "HACKER NEWS");
        assert_eq!(node.keywords, vec!["hacker news".to_string()]);
        assert_eq!(node.url, "https://news.ycombinator.com");
        assert!(node.is_custom);
        assert_eq!(registry.nodes().last().unwrap().id, id);
        assert_eq!(registry.revision(), 1);
        assert!(store.blob().unwrap().contains("custom-1700000000000"));
    }

    #[test]
    fn test_add_custom_same_millisecond_gets_suffix() {
        let (mut registry, _) = registry();
        let first = registry.add_custom(NodeDraft::new("a", "https://a"), 5).unwrap();
        let second = registry.add_custom(NodeDraft::new("b", "https://b"), 5).unwrap();
        let third = registry.add_custom(NodeDraft::new("c", "https://c"), 5).unwrap();
        assert_eq!(first.as_str(), "custom-5");
        assert_eq!(second.as_str(), "custom-5-2");
        assert_eq!(third.as_str(), "custom-5-3");
    }

    #[test]
    fn test_add_custom_rejects_empty_fields() {
        let (mut registry, store) = registry();
        assert_eq!(
            registry.add_custom(NodeDraft::new("  ", "https://a"), 1),
            Err(RegistryError::EmptyLabel)
        );
        assert!(matches!(
            registry.add_custom(NodeDraft::new("label", ""), 1),
            Err(RegistryError::EmptyUrl(_))
        ));
        assert_eq!(registry.len(), 4);
        assert_eq!(store.blob(), None);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let (mut registry, _) = registry();
        let dup = builtin_nodes().remove(0);
        assert_eq!(
            registry.insert(dup),
            Err(RegistryError::DuplicateId(NodeId::new("strategist")))
        );
    }

    #[test]
    fn test_find_by_query_matches_label_or_sub() {
        let registry = NodeRegistry::with_defaults();
        assert_eq!(registry.find_by_query("neuron").unwrap().id.as_str(), "reporter");
        assert_eq!(registry.find_by_query("ENGINEER").unwrap().id.as_str(), "engineer");
        // "the " appears in every label; registry order decides
        assert_eq!(registry.find_by_query("the ").unwrap().id.as_str(), "strategist");
        assert!(registry.find_by_query("   ").is_none());
        assert!(registry.find_by_query("nothing like this").is_none());
    }

    #[test]
    fn test_reset_restores_builtins() {
        let (mut registry, store) = registry();
        registry.add_custom(NodeDraft::new("x", "https://x"), 1).unwrap();
        registry.reset();

        assert_eq!(registry.nodes(), builtin_nodes().as_slice());
        assert_eq!(registry.revision(), 2);
        let reloaded = NodeRegistry::load(Box::new(store));
        assert_eq!(reloaded.nodes(), builtin_nodes().as_slice());
    }

    #[test]
    fn test_reload_reattaches_icons() {
        let (mut registry, store) = registry();
        registry.add_custom(NodeDraft::new("x", "https://x"), 1).unwrap();

        let reloaded = NodeRegistry::load(Box::new(store));
        let icons: Vec<NodeIcon> = reloaded.nodes().iter().map(|n| n.icon).collect();
        assert_eq!(
            icons,
            vec![
                NodeIcon::Brain,
                NodeIcon::Zap,
                NodeIcon::Radio,
                NodeIcon::Hammer,
                NodeIcon::Brain
            ]
        );
    }
}
