/*
[INPUT]:  Crossterm key events
[OUTPUT]: Wizard commands, focus moves, modal actions
[POS]:    TUI key routing
[UPDATE]: When keybindings or focusable widgets change
*/

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use street_art_wizard::{Field, FieldKind, WizardError};

use super::app::{ActiveModal, AppState, FocusTarget};

/// Handles key events for the TUI.
///
/// Returns `true` if quit is requested, `false` otherwise.
pub(super) async fn handle_key_event(app: &mut AppState, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return true;
    }

    if let Some(ActiveModal::Terms(modal)) = app.active_modal.as_mut() {
        let action = modal.handle_key(key.code);
        return app.handle_modal_action(action);
    }

    match (key.code, ctrl) {
        (KeyCode::Esc, _) => true,
        (KeyCode::Char('s'), true) => {
            let result = app_submit(app);
            report(app, result);
            false
        }
        (KeyCode::Char('d'), true) => {
            if let Some(field) = app.focused_field() {
                remove_attachment(app, field);
            }
            false
        }
        (KeyCode::PageDown, _) => {
            let result = app.session.next();
            report(app, result);
            false
        }
        (KeyCode::PageUp, _) => {
            let result = app.session.back();
            report(app, result);
            false
        }
        (KeyCode::Tab | KeyCode::Down, _) => {
            app.move_focus(1);
            false
        }
        (KeyCode::BackTab | KeyCode::Up, _) => {
            app.move_focus(-1);
            false
        }
        (KeyCode::Enter, _) => {
            press_focused(app).await;
            false
        }
        (KeyCode::Backspace, _) => {
            if let Some(field) = app.focused_field() {
                edit_field(app, field, |value| {
                    value.pop();
                });
            }
            false
        }
        (KeyCode::Char(ch), false) => {
            if let Some(field) = app.focused_field() {
                edit_field(app, field, |value| value.push(ch));
            }
            false
        }
        _ => false,
    }
}

fn app_submit(app: &mut AppState) -> Result<(), WizardError> {
    app.session.submit()?;
    if app.session.controller().is_submitting() {
        app.status_message = "Submitting...".to_string();
    }
    Ok(())
}

async fn press_focused(app: &mut AppState) {
    match app.focused() {
        Some(FocusTarget::Back) => {
            let result = app.session.back();
            report(app, result);
        }
        Some(FocusTarget::Next) => {
            let result = app.session.next();
            report(app, result);
        }
        Some(FocusTarget::Submit) => {
            let result = app_submit(app);
            report(app, result);
        }
        Some(FocusTarget::Field(field)) if field.kind() == FieldKind::File => {
            attach_typed_path(app, field).await;
        }
        Some(FocusTarget::Field(_)) => app.move_focus(1),
        None => {}
    }
}

async fn attach_typed_path(app: &mut AppState, field: Field) {
    let path = app.input_value(field);
    let path = path.trim();
    if path.is_empty() {
        app.status_message = format!("type a file path for {} first", field.label());
        return;
    }

    match app.session.attach_path(field, path).await {
        Ok(()) => {
            app.path_inputs.remove(&field);
            app.status_message = format!("{} attached", field.label());
        }
        Err(err) => {
            tracing::warn!(field = %field, error = %err, "attach failed");
            app.status_message = format!("{err:#}");
        }
    }
}

fn remove_attachment(app: &mut AppState, field: Field) {
    match app.session.remove_file(field) {
        Ok(Some(removed)) => {
            app.status_message = format!("removed {}", removed.file_name());
        }
        Ok(None) => {
            app.status_message = format!("{} has no file", field.label());
        }
        Err(err) => app.status_message = err.to_string(),
    }
}

fn edit_field(app: &mut AppState, field: Field, edit: impl FnOnce(&mut String)) {
    let mut value = app.input_value(field);
    edit(&mut value);
    if field.kind() == FieldKind::File {
        app.path_inputs.insert(field, value);
        return;
    }
    let result = app.session.set_text(field, value);
    report(app, result);
}

fn report(app: &mut AppState, result: Result<(), WizardError>) {
    if let Err(err) = result {
        app.status_message = err.to_string();
    }
}
