/*
[INPUT]:  Modal state, fields, and key events
[OUTPUT]: Modal rendering output and modal action results
[POS]:    TUI UI modal module root
[UPDATE]: When adding modals or new modal field kinds
*/

mod terms;

pub(in crate::tui) use terms::TermsModal;

use ratatui::crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::runtime::border_style;

#[derive(Clone)]
pub(in crate::tui) struct Modal {
    pub(in crate::tui) title: String,
    pub(in crate::tui) focus_index: usize,
    pub(in crate::tui) fields: Vec<ModalField>,
}

impl Modal {
    fn is_focusable(&self, index: usize) -> bool {
        matches!(self.fields.get(index), Some(ModalField::Button { .. }))
    }

    fn cycle_focus(&mut self, forward: bool) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        for step in 1..=len {
            let index = if forward {
                (self.focus_index + step) % len
            } else {
                (self.focus_index + len * step - step) % len
            };
            if self.is_focusable(index) {
                self.focus_index = index;
                return;
            }
        }
    }
}

#[derive(Clone)]
pub(in crate::tui) enum ModalField {
    Text { content: String },
    Button { label: String, action: ModalAction },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::tui) enum ModalAction {
    Submit,
    Cancel,
    None,
}

pub(in crate::tui) fn draw_modal(frame: &mut ratatui::Frame, area: Rect, modal: &Modal) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(modal.title.as_str());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    let mut buttons: Vec<Span> = Vec::new();
    for (index, field) in modal.fields.iter().enumerate() {
        match field {
            ModalField::Text { content } => lines.push(Line::from(content.as_str())),
            ModalField::Button { label, .. } => {
                let style = if index == modal.focus_index {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                buttons.push(Span::styled(format!("[ {label} ]"), style));
                buttons.push(Span::raw("  "));
            }
        }
    }
    lines.push(Line::default());
    lines.push(Line::from(buttons));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

pub(in crate::tui) fn handle_modal_key(modal: &mut Modal, key: KeyCode) -> ModalAction {
    match key {
        KeyCode::Esc => ModalAction::Cancel,
        KeyCode::Tab | KeyCode::Right => {
            modal.cycle_focus(true);
            ModalAction::None
        }
        KeyCode::BackTab | KeyCode::Left => {
            modal.cycle_focus(false);
            ModalAction::None
        }
        KeyCode::Enter => {
            if let Some(ModalField::Button { action, .. }) = modal.fields.get(modal.focus_index) {
                return *action;
            }
            ModalAction::None
        }
        _ => ModalAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modal() -> Modal {
        Modal {
            title: "Test".to_string(),
            focus_index: 1,
            fields: vec![
                ModalField::Text {
                    content: "body".to_string(),
                },
                ModalField::Button {
                    label: "Ok".to_string(),
                    action: ModalAction::Submit,
                },
                ModalField::Button {
                    label: "No".to_string(),
                    action: ModalAction::Cancel,
                },
            ],
        }
    }

    #[test]
    fn test_focus_skips_text_fields() {
        let mut modal = modal();
        assert_eq!(handle_modal_key(&mut modal, KeyCode::Tab), ModalAction::None);
        assert_eq!(modal.focus_index, 2);
        handle_modal_key(&mut modal, KeyCode::Tab);
        assert_eq!(modal.focus_index, 1);
        handle_modal_key(&mut modal, KeyCode::BackTab);
        assert_eq!(modal.focus_index, 2);
    }

    #[test]
    fn test_enter_returns_focused_button_action() {
        let mut modal = modal();
        assert_eq!(handle_modal_key(&mut modal, KeyCode::Enter), ModalAction::Submit);
        handle_modal_key(&mut modal, KeyCode::Right);
        assert_eq!(handle_modal_key(&mut modal, KeyCode::Enter), ModalAction::Cancel);
        assert_eq!(handle_modal_key(&mut modal, KeyCode::Esc), ModalAction::Cancel);
    }
}
