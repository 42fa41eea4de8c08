//! Add-node modal
//!
//! Plain data-entry dialog. Validation beyond "something was typed" belongs
//! to the registry; its error is shown back in the dialog.

use command_terminal::NodeDraft;
use egui::{Color32, RichText, TextEdit};

pub struct AddNodeModal {
    open: bool,
    label: String,
    sub: String,
    url: String,
    color: String,
    error: Option<String>,
}

/// Result from the add-node modal
#[derive(Debug, Clone)]
pub enum AddNodeResult {
    None,
    Submitted(NodeDraft),
    Closed,
}

impl Default for AddNodeModal {
    fn default() -> Self {
        Self::new()
    }
}

impl AddNodeModal {
    pub fn new() -> Self {
        Self {
            open: false,
            label: String::new(),
            sub: String::new(),
            url: String::new(),
            color: "#00ff41".to_string(),
            error: None,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.error = None;
    }

    pub fn close(&mut self) {
        *self = Self::new();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Keep the dialog open and show why the node was rejected.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.open = true;
        self.error = Some(error.into());
    }

    pub fn ui(&mut self, ctx: &egui::Context) -> AddNodeResult {
        if !self.open {
            return AddNodeResult::None;
        }

        let mut result = AddNodeResult::None;

        egui::Window::new("ADD NODE")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("add_node_fields")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("LABEL");
                        ui.add(TextEdit::singleline(&mut self.label).hint_text("Hacker News"));
                        ui.end_row();

                        ui.label("SUB");
                        ui.add(TextEdit::singleline(&mut self.sub).hint_text("optional"));
                        ui.end_row();

                        ui.label("URL");
                        ui.add(TextEdit::singleline(&mut self.url).hint_text("https://"));
                        ui.end_row();

                        ui.label("COLOR");
                        ui.add(TextEdit::singleline(&mut self.color));
                        ui.end_row();
                    });

                if let Some(error) = &self.error {
                    ui.label(RichText::new(error).color(Color32::LIGHT_RED));
                }

                ui.separator();
                ui.horizontal(|ui| {
                    let ready = !self.label.trim().is_empty() && !self.url.trim().is_empty();
                    if ui.add_enabled(ready, egui::Button::new("CREATE")).clicked() {
                        result = AddNodeResult::Submitted(
                            NodeDraft::new(self.label.trim(), self.url.trim())
                                .with_sub(self.sub.trim())
                                .with_color(self.color.trim()),
                        );
                    }
                    if ui.button("CANCEL").clicked() {
                        result = AddNodeResult::Closed;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            result = AddNodeResult::Closed;
        }

        match &result {
            AddNodeResult::Closed => self.close(),
            AddNodeResult::Submitted(_) => self.open = false,
            AddNodeResult::None => {}
        }
        result
    }
}
