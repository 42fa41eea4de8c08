//! Command terminal orchestrator.
//!
//! Owns the registry and everything derived from it. Every trigger path
//! (pointer click, touch double-tap, voice transcript, typed NAVIGATE text)
//! ends in [`CommandTerminal::activate`]; SEARCH submissions and `/reset`
//! are the only other outcomes of the command bar.

use crate::command::{
    interpret, CommandDispatch, CommandIndex, InputMode, Navigator, SearchTemplate, Submission,
};
use crate::config::TerminalConfig;
use crate::error::{RegistryError, Result};
use crate::registry::{NodeRegistry, NodeStore};
use crate::scheduler::FixedStepClock;
use crate::session::SimulationSession;
use crate::voice::VoiceControl;
use std::fmt;
use terminal_input::{Interaction, InteractionHandler};
use terminal_physics::TransformSink;
use terminal_types::{Node, NodeDraft, NodeId, Vec2, ViewportSize};
use tracing::{debug, info};

/// What one call to [`CommandTerminal::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub steps: u32,
    pub transforms_written: usize,
    pub voice_activations: usize,
    pub navigations_opened: usize,
}

pub struct CommandTerminal {
    registry: NodeRegistry,
    index: CommandIndex,
    session: SimulationSession,
    interaction: InteractionHandler,
    dispatch: CommandDispatch,
    voice: VoiceControl,
    search: SearchTemplate,
    clock: FixedStepClock,
    navigator: Box<dyn Navigator>,
    mode: InputMode,
    viewport: ViewportSize,
    built_revision: u64,
}

impl CommandTerminal {
    pub fn new(
        config: &TerminalConfig,
        store: Box<dyn NodeStore>,
        navigator: Box<dyn Navigator>,
        voice: VoiceControl,
        viewport: ViewportSize,
    ) -> Result<Self> {
        config.input.validate()?;
        let search =
            SearchTemplate::new(&config.dispatch.search_url, &config.dispatch.search_param)?;
        let registry = NodeRegistry::load(store);

        let mut terminal = Self {
            index: CommandIndex::default(),
            session: SimulationSession::new(config.physics.clone()),
            interaction: InteractionHandler::new(&config.input),
            dispatch: CommandDispatch::new(config.dispatch.feedback_delay_ms),
            voice,
            search,
            clock: FixedStepClock::new(config.physics.step_ms()),
            navigator,
            mode: InputMode::default(),
            viewport,
            built_revision: registry.revision(),
            registry,
        };
        terminal.rebuild_derived();
        info!(nodes = terminal.registry.len(), "command terminal ready");
        Ok(terminal)
    }

    // =========================================================================
    // FRAME
    // =========================================================================

    /// Drive one host frame: voice events, whole simulation steps (each
    /// followed by a transform sync), then due navigations.
    pub fn tick(&mut self, now_ms: u64, sink: &mut dyn TransformSink) -> TickReport {
        let mut report = TickReport::default();

        for transcript in self.voice.poll() {
            if self.activate_transcript(&transcript, now_ms) {
                report.voice_activations += 1;
            }
        }

        report.steps = self.clock.advance(now_ms);
        for _ in 0..report.steps {
            report.transforms_written = self.session.step(sink);
        }

        report.navigations_opened = self.dispatch.fire_due(now_ms, self.navigator.as_mut());
        report
    }

    // =========================================================================
    // ACTIVATION
    // =========================================================================

    /// The activation funnel. `false` if `id` is not a registered node.
    pub fn activate(&mut self, id: &NodeId, now_ms: u64) -> bool {
        self.dispatch
            .activate(id, &self.registry, &mut self.session, now_ms)
    }

    /// Resolve a voice transcript or free text via the keyword index.
    pub fn activate_transcript(&mut self, input: &str, now_ms: u64) -> bool {
        match self.index.resolve(input).cloned() {
            Some(id) => {
                debug!(%input, %id, "command resolved");
                self.activate(&id, now_ms)
            }
            None => {
                debug!(%input, "no command match");
                false
            }
        }
    }

    // =========================================================================
    // POINTER / TOUCH
    // =========================================================================

    pub fn pointer_down(&mut self, pos: Vec2, now_ms: u64) {
        self.interaction.pointer_down(now_ms);
        self.session.begin_drag(pos);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.session.move_drag(pos);
    }

    pub fn pointer_up(&mut self, pos: Vec2, now_ms: u64) -> Interaction {
        self.session.end_drag();
        let outcome = self.interaction.pointer_up(now_ms, pos, &self.session);
        self.route(&outcome, now_ms);
        outcome
    }

    /// Touch release. Single taps stay free for other gestures; only a
    /// double tap on the same node activates.
    pub fn touch_tap(&mut self, pos: Vec2, now_ms: u64) -> Interaction {
        self.session.end_drag();
        let outcome = self.interaction.touch_tap(now_ms, pos, &self.session);
        self.route(&outcome, now_ms);
        outcome
    }

    fn route(&mut self, outcome: &Interaction, now_ms: u64) {
        if let Some(id) = outcome.activation() {
            self.activate(id, now_ms);
        }
    }

    // =========================================================================
    // COMMAND BAR
    // =========================================================================

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> InputMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// Interpret and carry out one submitted line.
    pub fn submit(&mut self, input: &str, now_ms: u64) -> Submission {
        let submission = interpret(input, self.mode, &self.registry, &self.search);
        match &submission {
            Submission::Reset => {
                self.registry.reset();
                self.rebuild_derived();
            }
            Submission::Activate(id) => {
                self.activate(id, now_ms);
            }
            Submission::Search(url) => {
                debug!(%url, "search submitted");
                self.navigator.open(url);
            }
            Submission::NoMatch | Submission::Empty => {}
        }
        submission
    }

    /// Append a node from the add-node form.
    pub fn add_node(
        &mut self,
        draft: NodeDraft,
        created_at_ms: i64,
    ) -> std::result::Result<NodeId, RegistryError> {
        let id = self.registry.add_custom(draft, created_at_ms)?;
        self.rebuild_derived();
        Ok(id)
    }

    // =========================================================================
    // VOICE
    // =========================================================================

    pub fn start_listening(&mut self) -> bool {
        self.voice.start()
    }

    pub fn cancel_listening(&mut self) {
        self.voice.cancel();
    }

    pub fn voice(&self) -> &VoiceControl {
        &self.voice
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    pub fn resize(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
        self.session.resize(viewport);
    }

    /// Tear down the simulation and transient input state. Pending
    /// navigations are left to fire if the host keeps ticking.
    pub fn shutdown(&mut self) {
        self.session.dispose();
        self.interaction.reset();
        self.voice.cancel();
        info!("command terminal shut down");
    }

    /// Rebuild index, world and voice commands from the current registry.
    fn rebuild_derived(&mut self) {
        let nodes = self.registry.nodes();
        self.index = CommandIndex::build(nodes);
        self.session.rebuild(nodes, self.viewport);
        self.clock.reset();
        self.interaction.reset();

        self.voice.register_commands(self.index.entries());
        self.built_revision = self.registry.revision();
        debug!(
            revision = self.built_revision,
            keywords = self.index.len(),
            "derived state rebuilt"
        );
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn nodes(&self) -> &[Node] {
        self.registry.nodes()
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn index(&self) -> &CommandIndex {
        &self.index
    }

    pub fn session(&self) -> &SimulationSession {
        &self.session
    }

    pub fn dispatch(&self) -> &CommandDispatch {
        &self.dispatch
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Registry revision the derived state was built from.
    pub fn built_revision(&self) -> u64 {
        self.built_revision
    }
}

impl fmt::Debug for CommandTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTerminal")
            .field("registry", &self.registry)
            .field("mode", &self.mode)
            .field("generation", &self.session.generation())
            .field("voice", &self.voice)
            .finish()
    }
}
