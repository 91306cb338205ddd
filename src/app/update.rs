use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::Duration;
use tracing::{info, warn};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, FormField, ModalState};
use crate::error::SyncError;
use crate::model::UserDraft;
use crate::sync::{FormKind, Notice, SyncRequest};
use crate::ui;

const TICK: Duration = Duration::from_millis(100);

/// Draw, apply completed requests, handle one key; until the user quits.
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: AppState) -> Result<()> {
    info!(url = %app.api.users_url(), "starting");
    app.request(SyncRequest::Load);

    while !app.should_quit {
        app.pump();
        terminal.draw(|f| ui::render(f, &mut app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key(&mut app, key);
        }
    }

    info!(in_flight = app.dispatcher.in_flight(), "quitting");
    Ok(())
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    if app.modal.is_some() {
        handle_modal_key(app, key);
        return;
    }
    if let Some(action) = app.keymap.resolve(&key) {
        handle_action(app, action);
    }
}

pub fn handle_action(app: &mut AppState, action: KeyAction) {
    let total = app.users().len();
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::OpenHelp => app.modal = Some(ModalState::Help { scroll: 0 }),
        KeyAction::NewUser => {
            app.modal = Some(ModalState::Form { kind: FormKind::Create, field: FormField::Name });
        }
        KeyAction::EditSelection => {
            // Pre-fill from the selection; with nothing selected keep what was typed.
            if let Some(user) = app.selected_user().cloned() {
                app.update_form.fill_from(&user);
            }
            app.modal = Some(ModalState::Form { kind: FormKind::Update, field: FormField::Name });
        }
        KeyAction::DeleteSelection => {
            if let Some(id) = app.selected_user().map(|u| u.id) {
                app.modal = Some(ModalState::DeleteConfirm { id, selected: 1 });
            }
        }
        KeyAction::Reload => app.request(SyncRequest::Load),
        KeyAction::RefreshSelection => {
            if let Some(id) = app.selected_user().map(|u| u.id) {
                app.request(SyncRequest::Refresh { id });
            }
        }
        KeyAction::MoveUp => {
            app.selected_user_index = app.selected_user_index.saturating_sub(1);
        }
        KeyAction::MoveDown => {
            if app.selected_user_index + 1 < total {
                app.selected_user_index += 1;
            }
        }
        KeyAction::PageUp => {
            app.selected_user_index = app.selected_user_index.saturating_sub(app.rows_per_page.max(1));
        }
        KeyAction::PageDown => {
            app.selected_user_index =
                (app.selected_user_index + app.rows_per_page.max(1)).min(total.saturating_sub(1));
        }
        KeyAction::Ignore => {}
    }
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) {
    let Some(modal) = app.modal.clone() else {
        return;
    };
    let code = key.code;
    match modal {
        ModalState::Form { kind, field } => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Tab | KeyCode::Down => {
                app.modal = Some(ModalState::Form { kind, field: field.next(kind) });
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.modal = Some(ModalState::Form { kind, field: field.prev(kind) });
            }
            KeyCode::Backspace => {
                app.form_mut(kind).value_mut(field).pop();
            }
            KeyCode::Enter => submit_form(app, kind),
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {}
            KeyCode::Char(c) => app.form_mut(kind).value_mut(field).push(c),
            _ => {}
        },
        ModalState::DeleteConfirm { id, selected } => match code {
            KeyCode::Esc | KeyCode::Char('n') => close_modal(app),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                app.modal = Some(ModalState::DeleteConfirm { id, selected: 1 - selected.min(1) });
            }
            KeyCode::Char('y') => {
                close_modal(app);
                app.request(SyncRequest::Delete { id });
            }
            KeyCode::Enter => {
                close_modal(app);
                if selected == 0 {
                    app.request(SyncRequest::Delete { id });
                }
            }
            _ => {}
        },
        ModalState::Help { scroll } => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => close_modal(app),
            KeyCode::Up | KeyCode::Char('k') => {
                app.modal = Some(ModalState::Help { scroll: scroll.saturating_sub(1) });
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.modal = Some(ModalState::Help { scroll: scroll.saturating_add(1) });
            }
            _ => {}
        },
    }
}

/// Send the form's request and close it. Inputs are cleared only once the
/// server confirms; a request that cannot be formed keeps the form open.
fn submit_form(app: &mut AppState, kind: FormKind) {
    let form = app.form(kind).clone();
    let draft = UserDraft::new(form.name, form.email);
    let request = match kind {
        FormKind::Create => SyncRequest::Create(draft),
        FormKind::Update => match form.id.trim().parse::<i64>() {
            Ok(id) => SyncRequest::Update { id, draft },
            Err(_) => {
                let e = SyncError::invalid(format!("Invalid user ID: '{}'", form.id.trim()));
                warn!(error = %e, "update not sent");
                app.notify(Notice::failure(e.to_string()));
                app.modal = Some(ModalState::Form { kind, field: FormField::Id });
                return;
            }
        },
    };
    close_modal(app);
    app.request(request);
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
}
