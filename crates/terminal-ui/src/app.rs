//! Command Terminal application
//!
//! Layout:
//! ┌──────────────────────────────────────┐
//! │ PHYSICS: ACTIVE   NODES: 4   HEARD:  │  status line
//! ├──────────────────────────────────────┤
//! │                                      │
//! │        falling node blocks           │  simulation surface
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ [NAVIGATE] ____________ EXEC 🎤  +   │  command bar
//! └──────────────────────────────────────┘

use crate::modals::{AddNodeModal, AddNodeResult};
use crate::panels::{command_bar, status_line, CommandBarData, StatusData};
use crate::surface::BlockSurface;
use command_terminal::{
    CommandTerminal, FileStore, Submission, TerminalConfig, Vec2, ViewportSize, VoiceControl,
};
use eframe::egui;
use egui::{Color32, Pos2, Sense};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Urls handed over by the dispatch navigator, opened on the next frame.
type UrlQueue = Rc<RefCell<VecDeque<String>>>;

pub struct TerminalApp {
    terminal: CommandTerminal,
    surface: BlockSurface,
    add_node: AddNodeModal,

    command_input: String,
    feedback: Option<String>,
    open_queue: UrlQueue,

    // Pointer gesture in progress on the surface
    pressing: bool,
    touch_gesture: bool,
    last_pointer: Vec2,

    mounted_generation: u64,
    started: instant::Instant,
}

impl TerminalApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: TerminalConfig) -> anyhow::Result<Self> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let open_queue: UrlQueue = Rc::new(RefCell::new(VecDeque::new()));
        let queue = open_queue.clone();
        let navigator = move |url: &str| queue.borrow_mut().push_back(url.to_string());

        let store = FileStore::new(&config.storage.path);
        tracing::info!(path = %config.storage.path.display(), "using node store");

        let terminal = CommandTerminal::new(
            &config,
            Box::new(store),
            Box::new(navigator),
            VoiceControl::unavailable("speech recognition is not available in this build"),
            ViewportSize::default(),
        )?;

        let block = &config.physics.block;
        let mut surface = BlockSurface::new(Vec2::new(block.width, block.height), block.chamfer);
        surface.mount(terminal.nodes());

        Ok(Self {
            mounted_generation: terminal.session().generation(),
            terminal,
            surface,
            add_node: AddNodeModal::new(),
            command_input: String::new(),
            feedback: None,
            open_queue,
            pressing: false,
            touch_gesture: false,
            last_pointer: Vec2::ZERO,
            started: instant::Instant::now(),
        })
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn remount_if_rebuilt(&mut self) {
        let generation = self.terminal.session().generation();
        if generation != self.mounted_generation {
            self.surface.mount(self.terminal.nodes());
            self.mounted_generation = generation;
        }
    }

    fn handle_submit(&mut self, text: String, now_ms: u64) {
        self.feedback = match self.terminal.submit(&text, now_ms) {
            Submission::Reset => Some("NODES RESET".to_string()),
            Submission::NoMatch => Some(format!("NO MATCH: {}", text.trim())),
            Submission::Activate(id) => Some(format!("OPENING {}", id)),
            Submission::Search(_) => Some("SEARCHING...".to_string()),
            Submission::Empty => None,
        };
    }

    fn handle_add_node(&mut self, result: AddNodeResult) {
        if let AddNodeResult::Submitted(draft) = result {
            let created_at = chrono::Utc::now().timestamp_millis();
            match self.terminal.add_node(draft, created_at) {
                Ok(id) => {
                    self.feedback = Some(format!("NODE ADDED: {}", id));
                    self.add_node.close();
                }
                Err(e) => self.add_node.set_error(e.to_string()),
            }
        }
    }

    /// Forward surface pointer events to the terminal in simulation space.
    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response, origin: Pos2) {
        let now_ms = self.now_ms();
        let (pressed, released, pos, touched) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
                i.events.iter().any(|e| matches!(e, egui::Event::Touch { .. })),
            )
        });
        // Touch releases may arrive without a position
        let sim = match pos {
            Some(pos) => Vec2::new(pos.x - origin.x, pos.y - origin.y),
            None if self.pressing => self.last_pointer,
            None => return,
        };
        self.last_pointer = sim;

        if pressed && response.hovered() {
            self.pressing = true;
            self.touch_gesture = touched;
            self.terminal.pointer_down(sim, now_ms);
        } else if self.pressing {
            self.touch_gesture |= touched;
            self.terminal.pointer_move(sim);
        }

        if released && self.pressing {
            self.pressing = false;
            let outcome = if self.touch_gesture {
                self.terminal.touch_tap(sim, now_ms)
            } else {
                self.terminal.pointer_up(sim, now_ms)
            };
            tracing::debug!(?outcome, "pointer released");
        }
    }
}

impl eframe::App for TerminalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Physics runs continuously
        ctx.request_repaint();

        let add_node_result = self.add_node.ui(ctx);
        self.handle_add_node(add_node_result);

        // =====================================================================
        // TOP PANEL - status line
        // =====================================================================
        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            status_line(
                ui,
                &StatusData {
                    physics_live: self.terminal.session().is_live(),
                    blocks: self.terminal.nodes().len(),
                    last_transcript: self.terminal.voice().last_transcript(),
                    feedback: self.feedback.as_deref(),
                },
            );
        });

        // =====================================================================
        // BOTTOM PANEL - command bar
        // =====================================================================
        let voice_status = match self.terminal.voice().state() {
            command_terminal::VoiceState::Unavailable { reason } => Some(reason.clone()),
            _ => self.terminal.voice().last_error().map(str::to_string),
        };
        let bar_data = CommandBarData {
            mode: self.terminal.mode(),
            voice_available: self.terminal.voice().is_available(),
            listening: self.terminal.voice().is_listening(),
            voice_status: voice_status.as_deref(),
        };
        let mut input = std::mem::take(&mut self.command_input);
        let action = egui::TopBottomPanel::bottom("command_bar")
            .show(ctx, |ui| command_bar(ui, &mut input, &bar_data))
            .inner;
        self.command_input = input;

        let now_ms = self.now_ms();
        if action.toggle_mode {
            self.terminal.toggle_mode();
        }
        if let Some(text) = action.submit {
            self.handle_submit(text, now_ms);
        }
        if action.toggle_voice {
            if self.terminal.voice().is_listening() {
                self.terminal.cancel_listening();
            } else {
                self.terminal.start_listening();
            }
        }
        if action.open_add_node {
            self.add_node.open();
        }

        // =====================================================================
        // CENTRAL PANEL - simulation surface
        // =====================================================================
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let response = ui.interact(rect, ui.id().with("surface"), Sense::click_and_drag());

                let viewport = ViewportSize::new(rect.width(), rect.height());
                if viewport != self.terminal.viewport() {
                    self.terminal.resize(viewport);
                }

                if !self.add_node.is_open() {
                    self.handle_pointer(ctx, &response, rect.min);
                }

                self.remount_if_rebuilt();
                let now_ms = self.now_ms();
                self.terminal.tick(now_ms, &mut self.surface);

                self.surface.paint(ui.painter(), rect.min, self.terminal.nodes());
            });

        // Navigations that came due this frame
        let due: Vec<String> = self.open_queue.borrow_mut().drain(..).collect();
        for url in due {
            ctx.open_url(egui::OpenUrl::new_tab(url));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.terminal.shutdown();
    }
}
