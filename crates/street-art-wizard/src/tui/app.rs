/*
[INPUT]:  WizardSession, log buffer, key-driven focus changes
[OUTPUT]: AppState holding focus, pending file paths, modal and status line
[POS]:    TUI app state
[UPDATE]: When adding focusable widgets or new modals
*/

use std::collections::HashMap;

use street_art_wizard::{Field, FieldKind, Step, WizardSession};

use crate::tui::LogBufferHandle;
use crate::tui::ui::modal::{Modal, ModalAction, TermsModal};

pub(super) enum ActiveModal {
    Terms(TermsModal),
}

impl ActiveModal {
    pub(super) fn to_modal(&self) -> Modal {
        match self {
            ActiveModal::Terms(modal) => modal.to_modal(),
        }
    }
}

/// Something on the form that can hold focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FocusTarget {
    Field(Field),
    Back,
    Next,
    Submit,
}

pub(super) struct AppState {
    pub(super) session: WizardSession,
    pub(super) log_buffer: LogBufferHandle,
    pub(super) focus_index: usize,
    /// Paths typed into file fields, attached on Enter
    pub(super) path_inputs: HashMap<Field, String>,
    pub(super) status_message: String,
    pub(super) active_modal: Option<ActiveModal>,
    last_step: Step,
    was_submitting: bool,
}

impl AppState {
    pub(super) fn new(session: WizardSession, log_buffer: LogBufferHandle) -> Self {
        let last_step = session.controller().step();
        let active_modal = if session.controller().terms_accepted() {
            None
        } else {
            Some(ActiveModal::Terms(TermsModal::new()))
        };
        Self {
            session,
            log_buffer,
            focus_index: 0,
            path_inputs: HashMap::new(),
            status_message: "Ready".to_string(),
            active_modal,
            last_step,
            was_submitting: false,
        }
    }

    /// Focusable targets of the current step in display order
    pub(super) fn focus_targets(&self) -> Vec<FocusTarget> {
        let controller = self.session.controller();
        let step = controller.step();
        let mut targets: Vec<FocusTarget> = step.fields().iter().copied().map(FocusTarget::Field).collect();
        if step.previous(controller.artist_exists()).is_some() {
            targets.push(FocusTarget::Back);
        }
        if step.next(controller.artist_exists()).is_some() {
            targets.push(FocusTarget::Next);
        } else {
            targets.push(FocusTarget::Submit);
        }
        targets
    }

    pub(super) fn focused(&self) -> Option<FocusTarget> {
        self.focus_targets().get(self.focus_index).copied()
    }

    pub(super) fn focused_field(&self) -> Option<Field> {
        match self.focused() {
            Some(FocusTarget::Field(field)) => Some(field),
            _ => None,
        }
    }

    pub(super) fn move_focus(&mut self, delta: isize) {
        let len = self.focus_targets().len() as isize;
        if len == 0 {
            return;
        }
        self.focus_index = (self.focus_index as isize + delta).rem_euclid(len) as usize;
    }

    /// Current value shown for a field: draft text, or the typed path for
    /// file fields
    pub(super) fn input_value(&self, field: Field) -> String {
        match field.kind() {
            FieldKind::File => self.path_inputs.get(&field).cloned().unwrap_or_default(),
            FieldKind::Text | FieldKind::LongText => self
                .session
                .controller()
                .draft()
                .text(field)
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub(super) fn close_modal(&mut self) {
        self.active_modal = None;
    }

    pub(super) fn handle_modal_action(&mut self, action: ModalAction) -> bool {
        match action {
            ModalAction::Submit => {
                self.session.accept_terms();
                self.close_modal();
                self.status_message = "Terms accepted".to_string();
                false
            }
            ModalAction::Cancel => {
                self.session.decline_terms();
                true
            }
            ModalAction::None => false,
        }
    }

    /// Follow changes made by background completions
    pub(super) fn sync_with_session(&mut self) {
        let controller = self.session.controller();
        let step = controller.step();
        let submitting = controller.is_submitting();

        if step != self.last_step {
            self.last_step = step;
            self.focus_index = 0;
            if step == Step::Identity && controller.draft().artist_name.is_empty() {
                self.path_inputs.clear();
            }
        }

        if self.was_submitting && !submitting {
            self.status_message = match self.session.last_error() {
                Some(err) => format!("submission failed: {err} (Ctrl+S to retry)"),
                None => "Submission successful".to_string(),
            };
        }
        self.was_submitting = submitting;
    }
}
