/*
[INPUT]:  WizardSession and log buffer
[OUTPUT]: Ratatui-based TUI for the four-step submission form
[POS]:    TUI module for street-art-wizard binary
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
*/

mod app;
mod events;
mod runtime;
mod terminal;
mod ui;

pub(crate) use runtime::LOG_BUFFER_CAPACITY;
pub use runtime::{LogBuffer, LogBufferHandle, LogWriterFactory, run_tui_with_log};
