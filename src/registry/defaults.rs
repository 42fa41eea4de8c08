//! Built-in nodes and icon re-attachment.

use terminal_types::{Node, NodeIcon, NodeId};

struct Builtin {
    id: &'static str,
    label: &'static str,
    sub: &'static str,
    url: &'static str,
    color: &'static str,
    keywords: &'static [&'static str],
    icon: NodeIcon,
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        id: "strategist",
        label: "THE STRATEGIST",
        sub: "One Useful Thing",
        url: "https://www.oneusefulthing.org/",
        color: "#8b5cf6",
        keywords: &["strategist", "useful"],
        icon: NodeIcon::Brain,
    },
    Builtin {
        id: "tactician",
        label: "THE TACTICIAN",
        sub: "Superhuman",
        url: "https://superhuman.ai/",
        color: "#ec4899",
        keywords: &["tactician", "superhuman"],
        icon: NodeIcon::Zap,
    },
    Builtin {
        id: "reporter",
        label: "THE REPORTER",
        sub: "The Neuron",
        url: "https://www.theneurondaily.com/",
        color: "#06b6d4",
        keywords: &["reporter", "neuron", "news"],
        icon: NodeIcon::Radio,
    },
    Builtin {
        id: "engineer",
        label: "THE ENGINEER",
        sub: "The Batch",
        url: "https://www.deeplearning.ai/the-batch/",
        color: "#f59e0b",
        keywords: &["engineer", "batch", "andrew"],
        icon: NodeIcon::Hammer,
    },
];

/// The default node set, in display order.
pub fn builtin_nodes() -> Vec<Node> {
    BUILTINS
        .iter()
        .map(|b| Node {
            id: NodeId::new(b.id),
            label: b.label.to_string(),
            sub: b.sub.to_string(),
            url: b.url.to_string(),
            color: b.color.to_string(),
            keywords: b.keywords.iter().map(|k| k.to_string()).collect(),
            is_custom: false,
            icon: b.icon,
        })
        .collect()
}

/// Icon for a built-in id, if it is one.
pub fn builtin_icon(id: &NodeId) -> Option<NodeIcon> {
    BUILTINS
        .iter()
        .find(|b| b.id == id.as_str())
        .map(|b| b.icon)
}

/// Icons are not persisted: custom nodes get the generic icon, built-ins get
/// their own back, anything else falls back to the generic one.
pub fn attach_icons(nodes: &mut [Node]) {
    for node in nodes {
        node.icon = if node.is_custom {
            NodeIcon::Brain
        } else {
            builtin_icon(&node.id).unwrap_or_default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_keywords() {
        let nodes = builtin_nodes();
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["strategist", "tactician", "reporter", "engineer"]);
        assert_eq!(nodes[2].keywords, vec!["reporter", "neuron", "news"]);
        assert!(nodes.iter().all(|n| !n.is_custom));
    }

    #[test]
    fn test_attach_icons() {
        let mut nodes = builtin_nodes();
        for node in &mut nodes {
            node.icon = NodeIcon::Brain;
        }
        nodes.push(Node {
            id: NodeId::new("tactician-copy"),
            is_custom: false,
            ..nodes[1].clone()
        });
        nodes.push(Node {
            id: NodeId::new("engineer"),
            is_custom: true,
            ..nodes[3].clone()
        });

        attach_icons(&mut nodes);

        assert_eq!(nodes[1].icon, NodeIcon::Zap);
        assert_eq!(nodes[3].icon, NodeIcon::Hammer);
        assert_eq!(nodes[4].icon, NodeIcon::Brain);
        // Custom flag wins over a built-in id
        assert_eq!(nodes[5].icon, NodeIcon::Brain);
    }
}
