pub mod components;
pub mod forms;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, LoadState, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(root[1]);

    render_header(f, root[0], app);
    users::render_users_table(f, body[0], app);
    users::render_user_details(f, body[1], app);
    components::render_status_bar(f, root[2], app);

    if let Some(state) = app.modal.clone() {
        render_modal(f, app, &state);
    }
}

fn render_header(f: &mut Frame, area: ratatui::layout::Rect, app: &AppState) {
    let (state, state_style) = match app.load_state {
        LoadState::Loading => ("loading…", Style::default().fg(app.theme.muted)),
        LoadState::Ready => ("connected", Style::default().fg(app.theme.success)),
        LoadState::Failed => ("load failed", Style::default().fg(app.theme.failure)),
    };
    let line = Line::from(vec![
        Span::styled(
            "USER MANAGEMENT",
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  [{}]  {}  ", app.api.backend, app.api.base_url)),
        Span::styled(state, state_style),
        Span::raw(format!("  users:{}", app.users().len())),
    ]);
    let p = Paragraph::new(line)
        .block(
            Block::default()
                .title("userdesk")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, app: &AppState, state: &ModalState) {
    let area = f.area();
    match state {
        ModalState::Form { kind, field } => forms::render_user_form(f, area, app, *kind, *field),
        ModalState::DeleteConfirm { id, selected } => {
            users::render_delete_confirm(f, area, app, *id, *selected)
        }
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
    }
}
