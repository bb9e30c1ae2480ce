/*
[INPUT]:  Nothing beyond the fixed terms text
[OUTPUT]: Terms acceptance modal shown before the form unlocks
[POS]:    TUI UI modal for terms of submission
[UPDATE]: When the submission terms change
*/

use ratatui::crossterm::event::KeyCode;

use super::{Modal, ModalAction, ModalField, handle_modal_key};

const TERMS: &[&str] = &[
    "By submitting you confirm that you are the artist or hold the rights",
    "to the artwork, and that the images you upload may be published",
    "alongside your name, links and artwork details.",
    "",
    "Press y to accept or n to leave.",
];

pub(in crate::tui) struct TermsModal {
    modal: Modal,
}

impl TermsModal {
    pub(in crate::tui) fn new() -> Self {
        let mut fields: Vec<ModalField> = TERMS
            .iter()
            .map(|line| ModalField::Text {
                content: line.to_string(),
            })
            .collect();
        let accept_index = fields.len();
        fields.push(ModalField::Button {
            label: "Accept".to_string(),
            action: ModalAction::Submit,
        });
        fields.push(ModalField::Button {
            label: "Decline".to_string(),
            action: ModalAction::Cancel,
        });

        Self {
            modal: Modal {
                title: "Terms of Submission".to_string(),
                focus_index: accept_index,
                fields,
            },
        }
    }

    pub(in crate::tui) fn to_modal(&self) -> Modal {
        self.modal.clone()
    }

    /// `y`/`n` shortcuts on top of the shared modal keys
    pub(in crate::tui) fn handle_key(&mut self, key: KeyCode) -> ModalAction {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => ModalAction::Submit,
            KeyCode::Char('n') | KeyCode::Char('N') => ModalAction::Cancel,
            other => handle_modal_key(&mut self.modal, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_is_focused_initially() {
        let mut terms = TermsModal::new();
        assert_eq!(terms.handle_key(KeyCode::Enter), ModalAction::Submit);
    }

    #[test]
    fn test_shortcuts() {
        let mut terms = TermsModal::new();
        assert_eq!(terms.handle_key(KeyCode::Char('n')), ModalAction::Cancel);
        assert_eq!(terms.handle_key(KeyCode::Char('y')), ModalAction::Submit);
        assert_eq!(terms.handle_key(KeyCode::Char('x')), ModalAction::None);
    }
}
