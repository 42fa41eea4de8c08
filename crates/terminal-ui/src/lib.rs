//! egui host for the command terminal.

pub mod app;
pub mod modals;
pub mod panels;
pub mod surface;

pub use app::TerminalApp;
