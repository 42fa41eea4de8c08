//! Status line and bottom command bar.

use command_terminal::InputMode;
use egui::{Color32, RichText, TextEdit, Ui};

const TERMINAL_GREEN: Color32 = Color32::from_rgb(0, 255, 65);

/// Data needed to render the status line (extracted before render)
pub struct StatusData<'a> {
    pub physics_live: bool,
    pub blocks: usize,
    pub last_transcript: Option<&'a str>,
    pub feedback: Option<&'a str>,
}

pub fn status_line(ui: &mut Ui, data: &StatusData<'_>) {
    ui.horizontal(|ui| {
        let physics = if data.physics_live {
            "PHYSICS: ACTIVE"
        } else {
            "PHYSICS: OFFLINE"
        };
        ui.label(RichText::new(physics).monospace().color(TERMINAL_GREEN));
        ui.label(RichText::new(format!("NODES: {}", data.blocks)).monospace().weak());

        if let Some(transcript) = data.last_transcript {
            ui.separator();
            ui.label(RichText::new(format!("HEARD: \"{}\"", transcript)).monospace());
        }
        if let Some(feedback) = data.feedback {
            ui.separator();
            ui.label(RichText::new(feedback).monospace().color(Color32::YELLOW));
        }
    });
}

/// Data needed to render the command bar (extracted before render)
pub struct CommandBarData<'a> {
    pub mode: InputMode,
    pub voice_available: bool,
    pub listening: bool,
    pub voice_status: Option<&'a str>,
}

/// Actions triggered from the command bar
#[derive(Debug, Default)]
pub struct CommandBarAction {
    pub submit: Option<String>,
    pub toggle_mode: bool,
    pub toggle_voice: bool,
    pub open_add_node: bool,
}

pub fn command_bar(
    ui: &mut Ui,
    input: &mut String,
    data: &CommandBarData<'_>,
) -> CommandBarAction {
    let mut action = CommandBarAction::default();

    ui.horizontal(|ui| {
        let mode_label = RichText::new(format!("[{}]", data.mode)).monospace().strong();
        if ui
            .button(mode_label)
            .on_hover_text("Toggle NAVIGATE / SEARCH")
            .clicked()
        {
            action.toggle_mode = true;
        }

        let hint = match data.mode {
            InputMode::Navigate => "type a node name...",
            InputMode::Search => "search the web...",
        };
        let width = (ui.available_width() - 200.0).max(120.0);
        let response = ui.add(
            TextEdit::singleline(input)
                .hint_text(hint)
                .font(egui::TextStyle::Monospace)
                .desired_width(width),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button(RichText::new("EXEC").monospace()).clicked() || entered {
            let text = std::mem::take(input);
            if !text.trim().is_empty() {
                action.submit = Some(text);
            }
            response.request_focus();
        }

        let mic = if data.listening { "● LISTENING" } else { "🎤 VOICE" };
        let voice = ui.add_enabled(
            data.voice_available,
            egui::Button::new(RichText::new(mic).monospace()),
        );
        let voice = match data.voice_status {
            Some(status) => voice.on_disabled_hover_text(status),
            None => voice,
        };
        if voice.clicked() {
            action.toggle_voice = true;
        }

        if ui.button(RichText::new("+ ADD NODE").monospace()).clicked() {
            action.open_add_node = true;
        }
    });

    action
}
