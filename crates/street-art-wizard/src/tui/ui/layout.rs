/*
[INPUT]:  Wizard controller step and identity state
[OUTPUT]: Step bar rendered into Ratatui frame
[POS]:    TUI UI step navigation bar
[UPDATE]: When steps are added or renamed
*/

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Tabs};

use street_art_wizard::{Step, WizardController};

use crate::tui::runtime::{border_style, header_style};

pub(in crate::tui) fn draw_steps(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    controller: &WizardController,
) {
    let visible = controller.visible_steps();
    let titles = Step::ALL
        .iter()
        .map(|step| {
            if visible.contains(step) {
                Line::from(step.to_string())
            } else {
                Line::from(Span::styled(
                    format!("{step} (skipped)"),
                    Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT),
                ))
            }
        })
        .collect::<Vec<_>>();
    let selected = usize::from(controller.step().number() - 1);

    let title = match controller.pending_transition() {
        Some(pending) => format!("Steps (moving to {})", pending.target),
        None => "Steps".to_string(),
    };
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(title),
        )
        .highlight_style(header_style())
        .select(selected);

    frame.render_widget(tabs, area);
}
