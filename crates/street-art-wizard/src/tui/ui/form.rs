/*
[INPUT]:  AppState focus, draft values, field errors, attachments
[OUTPUT]: Current step's form panel rendered into Ratatui frame
[POS]:    TUI UI form panel
[UPDATE]: When field rendering or button layout changes
*/

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use street_art_wizard::{Field, FieldKind};

use crate::tui::app::{AppState, FocusTarget};
use crate::tui::runtime::{border_style, error_style, focus_style};

pub(in crate::tui) fn draw_form(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, app: &AppState) {
    let controller = app.session.controller();
    let step = controller.step();
    let focused = app.focused();

    let mut lines: Vec<Line> = Vec::new();
    if controller.artist_exists() {
        lines.push(Line::from(Span::styled(
            "Welcome back! Your artist profile is already on file.",
            Style::default().fg(Color::LightGreen),
        )));
        lines.push(Line::default());
    }

    for field in step.fields() {
        lines.extend(field_lines(app, *field, focused == Some(FocusTarget::Field(*field))));
    }

    let mut buttons = Vec::new();
    for target in app.focus_targets() {
        let label = match target {
            FocusTarget::Back => "[ Back ]",
            FocusTarget::Next => "[ Next ]",
            FocusTarget::Submit => "[ Submit ]",
            FocusTarget::Field(_) => continue,
        };
        let style = if focused == Some(target) {
            focus_style()
        } else {
            Style::default()
        };
        buttons.push(Span::styled(label, style));
        buttons.push(Span::raw("  "));
    }
    lines.push(Line::default());
    lines.push(Line::from(buttons));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(format!("Step {step}"));
    let widget = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn field_lines(app: &AppState, field: Field, focused: bool) -> Vec<Line<'static>> {
    let controller = app.session.controller();
    let required = controller.step().required_fields().contains(&field);
    let marker = if required { "*" } else { " " };
    let value = app.input_value(field);
    let cursor = if focused { "_" } else { "" };
    let value_style = if focused {
        focus_style()
    } else {
        Style::default()
    };

    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{marker} {:<22}", field.label())),
        Span::styled(format!("{value}{cursor}"), value_style),
    ])];
    if let Some(note) = field_note(field) {
        lines.push(Line::from(Span::styled(
            format!("    {note}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if field.kind() == FieldKind::File {
        let preview = match controller.draft().attachment(field) {
            Some(attachment) => format!("    attached: {}", attachment.preview()),
            None => "    no file attached (type a path, Enter to attach)".to_string(),
        };
        lines.push(Line::from(Span::styled(preview, Style::default().fg(Color::Gray))));
    }

    if let Some(message) = controller.errors().get(&field) {
        lines.push(Line::from(Span::styled(format!("    {message}"), error_style())));
    }
    lines
}

fn field_note(field: Field) -> Option<&'static str> {
    field
        .is_new_artist_only()
        .then_some("*For new applicants only")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_fields_carry_new_applicant_note() {
        for field in Field::ALL {
            let expected = matches!(
                field,
                Field::ArtistAbout | Field::ArtistImage | Field::ArtistPortfolioLink | Field::ArtistSocialLink
            );
            assert_eq!(field_note(field).is_some(), expected, "{field}");
        }
        assert_eq!(field_note(Field::ArtistImage), Some("*For new applicants only"));
    }
}
