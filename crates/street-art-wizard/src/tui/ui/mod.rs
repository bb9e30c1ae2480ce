/*
[INPUT]:  TUI app state and wizard controller for UI components
[OUTPUT]: UI component render functions and module exports
[POS]:    TUI UI module root
[UPDATE]: When adding or removing panels
*/

mod form;
mod layout;
mod logs;

pub mod modal;

pub(in crate::tui) use form::draw_form;
pub(in crate::tui) use layout::draw_steps;
pub(in crate::tui) use logs::draw_logs;
