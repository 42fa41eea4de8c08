//! Command Dispatch: the only path that opens a node's destination.
//!
//! `activate` plays the feedback hop immediately and schedules the
//! navigation for later; `fire_due` hands due navigations to the
//! [`Navigator`]. Pending navigations carry no cancellation contract.

use crate::registry::NodeRegistry;
use crate::scheduler::TimerQueue;
use terminal_types::NodeId;
use tracing::debug;

/// Opens a destination in a new browsing context. Fire-and-forget.
pub trait Navigator {
    fn open(&mut self, url: &str);
}

impl<F> Navigator for F
where
    F: FnMut(&str),
{
    fn open(&mut self, url: &str) {
        self(url)
    }
}

/// Narrow command surface onto the live simulation.
pub trait BodyCommands {
    /// Feedback hop on the node's body. `false` when no live body exists.
    fn apply_activation_impulse(&mut self, id: &NodeId) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    pub node: NodeId,
    pub url: String,
}

#[derive(Debug)]
pub struct CommandDispatch {
    feedback_delay_ms: u64,
    pending: TimerQueue<PendingNavigation>,
    activations: u64,
    opened: u64,
}

impl CommandDispatch {
    pub fn new(feedback_delay_ms: u64) -> Self {
        Self {
            feedback_delay_ms,
            pending: TimerQueue::new(),
            activations: 0,
            opened: 0,
        }
    }

    /// Activate `id`: feedback impulse now, navigation after the feedback
    /// delay. Unknown ids are ignored and return `false`. A missing body only
    /// skips the feedback.
    pub fn activate(
        &mut self,
        id: &NodeId,
        registry: &NodeRegistry,
        bodies: &mut dyn BodyCommands,
        now_ms: u64,
    ) -> bool {
        let node = match registry.get(id) {
            Ok(node) => node,
            Err(e) => {
                debug!(error = %e, "activation ignored");
                return false;
            }
        };

        let hopped = bodies.apply_activation_impulse(id);
        let due_ms = now_ms.saturating_add(self.feedback_delay_ms);
        self.pending.schedule(
            due_ms,
            PendingNavigation {
                node: node.id.clone(),
                url: node.url.clone(),
            },
        );
        self.activations += 1;
        debug!(%id, hopped, due_ms, "node activated");
        true
    }

    /// Open every navigation that has come due. Returns how many opened.
    pub fn fire_due(&mut self, now_ms: u64, navigator: &mut dyn Navigator) -> usize {
        let due = self.pending.drain_due(now_ms);
        for nav in &due {
            debug!(node = %nav.node, url = %nav.url, "opening destination");
            navigator.open(&nav.url);
        }
        self.opened += due.len() as u64;
        due.len()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn activations(&self) -> u64 {
        self.activations
    }

    pub fn opened(&self) -> u64 {
        self.opened
    }

    pub fn feedback_delay_ms(&self) -> u64 {
        self.feedback_delay_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Bodies {
        live: HashSet<NodeId>,
        hops: Vec<NodeId>,
    }

    impl BodyCommands for Bodies {
        fn apply_activation_impulse(&mut self, id: &NodeId) -> bool {
            if self.live.contains(id) {
                self.hops.push(id.clone());
                true
            } else {
                false
            }
        }
    }

    #[test]
    fn activate_hops_then_opens_after_delay() {
        let registry = NodeRegistry::with_defaults();
        let mut bodies = Bodies::default();
        bodies.live.insert(NodeId::new("reporter"));
        let mut dispatch = CommandDispatch::new(800);
        let mut opened = Vec::new();

        assert!(dispatch.activate(&NodeId::new("reporter"), &registry, &mut bodies, 1_000));
        assert_eq!(bodies.hops, vec![NodeId::new("reporter")]);

        let mut nav = |url: &str| opened.push(url.to_string());
        assert_eq!(dispatch.fire_due(1_799, &mut nav), 0);
        assert_eq!(dispatch.fire_due(1_800, &mut nav), 1);
        assert_eq!(dispatch.fire_due(5_000, &mut nav), 0);
        assert_eq!(opened, vec!["https://www.theneurondaily.com/".to_string()]);
        assert_eq!(dispatch.activations(), 1);
        assert_eq!(dispatch.opened(), 1);
    }

    #[test]
    fn unknown_node_is_a_no_op() {
        let registry = NodeRegistry::with_defaults();
        let mut bodies = Bodies::default();
        let mut dispatch = CommandDispatch::new(800);

        assert!(!dispatch.activate(&NodeId::new("ghost"), &registry, &mut bodies, 0));
        assert!(bodies.hops.is_empty());
        assert_eq!(dispatch.pending(), 0);
    }

    #[test]
    fn missing_body_still_navigates() {
        let registry = NodeRegistry::with_defaults();
        let mut bodies = Bodies::default();
        let mut dispatch = CommandDispatch::new(0);
        let mut count = 0;

        assert!(dispatch.activate(&NodeId::new("engineer"), &registry, &mut bodies, 10));
        assert_eq!(dispatch.fire_due(10, &mut |_: &str| count += 1), 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn queued_navigations_stay_pending_until_due() {
        let registry = NodeRegistry::with_defaults();
        let mut dispatch = CommandDispatch::new(800);
        let mut opened = Vec::new();

        dispatch.activate(&NodeId::new("engineer"), &registry, &mut Bodies::default(), 0);
        dispatch.activate(&NodeId::new("reporter"), &registry, &mut Bodies::default(), 100);
        assert_eq!(dispatch.pending(), 2);

        let mut nav = |url: &str| opened.push(url.to_string());
        assert_eq!(dispatch.fire_due(850, &mut nav), 1);
        assert_eq!(dispatch.pending(), 1);
        assert_eq!(dispatch.fire_due(900, &mut nav), 1);
        assert_eq!(dispatch.pending(), 0);
        assert_eq!(opened.len(), 2);
        assert_eq!(opened[1], "https://www.theneurondaily.com/");
    }
}
