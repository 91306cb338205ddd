//! Shared UI components (status bar, help dialog, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::app::keymap::KeyAction;
use crate::sync::NoticeKind;

/// Bottom line: the current notice if there is one, otherwise counts and hints.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let base = Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg);
    let pending = match app.dispatcher.in_flight() {
        0 => String::new(),
        n => format!("  pending:{n}"),
    };

    let line = match app.visible_notice() {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Success => app.theme.success,
                NoticeKind::Failure => app.theme.failure,
            };
            Line::from(vec![
                Span::styled(notice.message.clone(), base.fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(pending, base),
            ])
        }
        None => Line::from(Span::styled(
            format!(
                "users:{}  rows/page:{}{}  | n: new  e: edit  d: delete  r: reload  ?: help  q: quit",
                app.users().len(),
                app.rows_per_page,
                pending
            ),
            base,
        )),
    };
    f.render_widget(Paragraph::new(line).style(base), area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help dialog listing the current bindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 20u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Users", bold))];

    for (label, action) in [
        ("Create user", KeyAction::NewUser),
        ("Update selected user", KeyAction::EditSelection),
        ("Delete selected user", KeyAction::DeleteSelection),
        ("Reload all users", KeyAction::Reload),
        ("Refresh selected user", KeyAction::RefreshSelection),
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Page up", KeyAction::PageUp),
        ("Page down", KeyAction::PageDown),
        ("Quit", KeyAction::Quit),
    ] {
        let keys = app.keymap.keys_for(action).join(", ");
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:<24}")),
            Span::styled(keys, italic),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Forms", bold)));
    for (label, keys) in [
        ("Next / previous field", "Tab, Shift+Tab"),
        ("Submit", "Enter"),
        ("Close (keeps input)", "Esc"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:<24}")),
            Span::styled(keys, italic),
        ]));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
