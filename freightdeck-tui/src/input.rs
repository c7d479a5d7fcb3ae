//! Keyboard input dispatch — overlays → text inputs → global keys →
//! panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use freightdeck_core::schema::{InviteRequest, UploadMode};

use crate::app::{
    AppState, ErrorCategory, Overlay, Panel, StatusLevel, TransferInput,
};
use crate::worker::WorkerCommand;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Login => {
            handle_login_overlay(app, key);
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Active text inputs capture everything except their exit keys.
    if app.active_panel == Panel::Form && app.form.insert_mode {
        handle_form_insert(app, key);
        return;
    }
    if app.active_panel == Panel::Transfer && app.transfer.editing.is_some() {
        handle_transfer_insert(app, key);
        return;
    }
    if app.active_panel == Panel::Users && app.users.inviting {
        handle_invite_insert(app, key);
        return;
    }

    // 3. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => {
            app.active_panel = Panel::Schedules;
            return;
        }
        KeyCode::Char('2') => {
            app.active_panel = Panel::Form;
            return;
        }
        KeyCode::Char('3') => {
            app.active_panel = Panel::Transfer;
            return;
        }
        KeyCode::Char('4') => {
            app.active_panel = Panel::Users;
            return;
        }
        KeyCode::Char('5') => {
            app.active_panel = Panel::Help;
            return;
        }
        KeyCode::Tab => {
            app.active_panel = app.active_panel.next();
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('v') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('L') => {
            let _ = app.worker_tx.send(WorkerCommand::Logout);
            return;
        }
        KeyCode::Esc => {
            app.status_message = None;
            return;
        }
        _ => {}
    }

    // 4. Panel-specific keys.
    match app.active_panel {
        Panel::Schedules => handle_schedules_key(app, key),
        Panel::Form => handle_form_key(app, key),
        Panel::Transfer => handle_transfer_key(app, key),
        Panel::Users => handle_users_key(app, key),
        Panel::Help => {} // display only
    }
}

fn handle_login_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
            app.login.field = 1 - app.login.field;
        }
        KeyCode::Backspace => {
            let field = active_login_field(app);
            field.pop();
        }
        KeyCode::Char(c) => {
            active_login_field(app).push(c);
        }
        KeyCode::Enter => {
            if !app.login.in_flight && !app.login.email.is_empty() {
                app.login.in_flight = true;
                let _ = app.worker_tx.send(WorkerCommand::Login {
                    email: app.login.email.clone(),
                    password: app.login.password.clone(),
                });
            }
        }
        KeyCode::Esc => {
            // Only dismissible when a session already exists.
            if app.logged_in {
                app.overlay = Overlay::None;
            }
        }
        _ => {}
    }
}

fn active_login_field(app: &mut AppState) -> &mut String {
    if app.login.field == 0 {
        &mut app.login.email
    } else {
        &mut app.login.password
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('v') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_schedules_key(app: &mut AppState, key: KeyEvent) {
    let depth = app.schedules.cascade.depth();
    match key.code {
        KeyCode::Char('m') => app.toggle_filter_mode(),
        KeyCode::Char('h') | KeyCode::Left => {
            app.schedules.focused_level = app.schedules.focused_level.saturating_sub(1);
            app.schedules.highlighted = 0;
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.schedules.focused_level + 1 < depth {
                app.schedules.focused_level += 1;
                app.schedules.highlighted = 0;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let count = app.schedules.cascade.options(app.schedules.focused_level).len();
            if count > 0 && app.schedules.highlighted + 1 < count {
                app.schedules.highlighted += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.schedules.highlighted = app.schedules.highlighted.saturating_sub(1);
        }
        KeyCode::Enter => app.select_highlighted(),
        KeyCode::Char('x') | KeyCode::Backspace => app.clear_focused_level(),
        KeyCode::Char('r') => app.refresh_rows(),
        KeyCode::Char('J') => {
            let count = app.schedules.cascade.rows().map_or(0, <[_]>::len);
            if count > 0 && app.schedules.row_cursor + 1 < count {
                app.schedules.row_cursor += 1;
            }
        }
        KeyCode::Char('K') => {
            app.schedules.row_cursor = app.schedules.row_cursor.saturating_sub(1);
        }
        KeyCode::Char('e') => {
            let row = app
                .schedules
                .cascade
                .rows()
                .and_then(|rows| rows.get(app.schedules.row_cursor))
                .cloned();
            if let Some(row) = row {
                app.form.load(&row);
                app.active_panel = Panel::Form;
            }
        }
        KeyCode::Char('d') => {
            let id = app
                .schedules
                .cascade
                .rows()
                .and_then(|rows| rows.get(app.schedules.row_cursor))
                .map(|r| r.id.clone());
            if let Some(id) = id {
                let _ = app.worker_tx.send(WorkerCommand::DeleteSchedule { id });
            }
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.form.active_field + 1 < app.form.values.len() {
                app.form.active_field += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.form.active_field = app.form.active_field.saturating_sub(1);
        }
        KeyCode::Char('i') | KeyCode::Enter => {
            app.form.insert_mode = true;
        }
        KeyCode::Char('n') => {
            app.form.reset();
            app.set_status("New schedule", StatusLevel::Info);
        }
        KeyCode::Char('s') => submit_form(app),
        _ => {}
    }
}

fn handle_form_insert(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.form.insert_mode = false,
        KeyCode::Backspace => {
            let field = app.form.active_field;
            app.form.values[field].pop();
        }
        KeyCode::Char(c) => {
            let field = app.form.active_field;
            app.form.values[field].push(c);
        }
        _ => {}
    }
}

fn submit_form(app: &mut AppState) {
    if app.form.saving {
        return;
    }
    match app.form.to_draft() {
        Ok(draft) => {
            app.form.saving = true;
            let _ = app.worker_tx.send(WorkerCommand::SaveSchedule {
                id: app.form.schedule_id.clone(),
                draft,
            });
        }
        Err(message) => {
            app.push_error(ErrorCategory::Validation, message, "schedule form");
        }
    }
}

fn handle_transfer_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('t') => {
            app.transfer.export_kind = app.transfer.export_kind.next();
        }
        KeyCode::Char('c') => app.transfer.csv = !app.transfer.csv,
        KeyCode::Char('o') => app.transfer.editing = Some(TransferInput::OutDir),
        KeyCode::Char('p') => app.transfer.editing = Some(TransferInput::ImportPath),
        KeyCode::Char('w') => app.transfer.overwrite = !app.transfer.overwrite,
        KeyCode::Char('b') => {
            app.transfer.upload_mode = match app.transfer.upload_mode {
                UploadMode::Bulk => UploadMode::Origin,
                UploadMode::Origin => UploadMode::Bulk,
            };
        }
        KeyCode::Char('x') => {
            if !app.transfer.in_flight {
                app.transfer.in_flight = true;
                let _ = app.worker_tx.send(WorkerCommand::Export {
                    kind: app.transfer.export_kind,
                    csv: app.transfer.csv,
                    out_dir: app.transfer.out_dir.clone().into(),
                });
            }
        }
        KeyCode::Char('u') => {
            if app.transfer.import_path.trim().is_empty() {
                app.set_status("Set an import file path first [p]", StatusLevel::Warning);
            } else if !app.transfer.in_flight {
                app.transfer.in_flight = true;
                let _ = app.worker_tx.send(WorkerCommand::Import {
                    path: app.transfer.import_path.clone().into(),
                    overwrite: app.transfer.overwrite,
                    mode: app.transfer.upload_mode,
                });
            }
        }
        _ => {}
    }
}

fn handle_transfer_insert(app: &mut AppState, key: KeyEvent) {
    let Some(input) = app.transfer.editing else {
        return;
    };
    let field = match input {
        TransferInput::OutDir => &mut app.transfer.out_dir,
        TransferInput::ImportPath => &mut app.transfer.import_path,
    };
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.transfer.editing = None,
        KeyCode::Backspace => {
            field.pop();
        }
        KeyCode::Char(c) => field.push(c),
        _ => {}
    }
}

fn handle_users_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => {
            app.users.loading = true;
            let _ = app.worker_tx.send(WorkerCommand::FetchUsers);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if !app.users.users.is_empty() && app.users.cursor + 1 < app.users.users.len() {
                app.users.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.users.cursor = app.users.cursor.saturating_sub(1);
        }
        KeyCode::Char('d') => {
            let id = app.users.users.get(app.users.cursor).map(|u| u.id.clone());
            if let Some(id) = id {
                let _ = app.worker_tx.send(WorkerCommand::DeleteUser { id });
            }
        }
        KeyCode::Char('i') => {
            app.users.inviting = true;
            app.users.invite_field = 0;
        }
        _ => {}
    }
}

fn handle_invite_insert(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.users.inviting = false;
            app.users.invite_name.clear();
            app.users.invite_email.clear();
        }
        KeyCode::Tab => {
            app.users.invite_field = 1 - app.users.invite_field;
        }
        KeyCode::Down | KeyCode::Up => {
            let count = freightdeck_core::domain::Role::ALL.len();
            app.users.invite_role = (app.users.invite_role + 1) % count;
        }
        KeyCode::Backspace => {
            active_invite_field(app).pop();
        }
        KeyCode::Char(c) => {
            active_invite_field(app).push(c);
        }
        KeyCode::Enter => {
            if app.users.invite_name.trim().is_empty() || app.users.invite_email.trim().is_empty()
            {
                app.set_status("Invite needs a name and an email", StatusLevel::Warning);
                return;
            }
            let invite = InviteRequest {
                name: app.users.invite_name.trim().to_string(),
                email: app.users.invite_email.trim().to_string(),
                role: freightdeck_core::domain::Role::ALL[app.users.invite_role],
            };
            app.users.inviting = false;
            app.users.invite_name.clear();
            app.users.invite_email.clear();
            let _ = app.worker_tx.send(WorkerCommand::InviteUser { invite });
        }
        _ => {}
    }
}

fn active_invite_field(app: &mut AppState) -> &mut String {
    if app.users.invite_field == 0 {
        &mut app.users.invite_name
    } else {
        &mut app.users.invite_email
    }
}
