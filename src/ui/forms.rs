//! Create / update dialogs.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{AppState, FormField};
use crate::sync::FormKind;
use crate::ui::components::centered_rect;

pub fn render_user_form(f: &mut Frame, area: Rect, app: &AppState, kind: FormKind, focused: FormField) {
    let fields = FormField::order(kind);
    let height = fields.len() as u16 + 5;
    let width = 60u16.min(area.width.saturating_sub(4)).max(30);
    let rect = centered_rect(width, height, area);
    let form = app.form(kind);

    let mut lines: Vec<Line> = Vec::with_capacity(fields.len() + 2);
    for field in fields {
        let active = *field == focused;
        let marker = if active { "▶ " } else { "  " };
        let value_style = if active {
            Style::default().fg(app.theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let cursor = if active { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::raw(format!("{marker}{:<7} ", format!("{}:", field.label()))),
            Span::styled(format!("{}{cursor}", form.value(*field)), value_style),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Tab: next field  Enter: submit  Esc: close",
        Style::default().fg(app.theme.muted),
    )));

    let title = match kind {
        FormKind::Create => "Add New User",
        FormKind::Update => "Update User",
    };
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.accent)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
