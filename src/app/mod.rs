//! Application state types and entry glue.
//!
//! Defines the state the TUI renders from (the synchronized users list, the
//! two forms, modal dialogs, the current notice), the theme, and the
//! config-directory lookup. The event loop lives in `update` and is
//! re-exported as `run`.
//!
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::{ApiConfig, UserBackend};
use crate::model::UserRecord;
use crate::sync::dispatch::Dispatcher;
use crate::sync::{FormKind, Notice, SyncOutcome, SyncRequest, UserListSynchronizer};
use keymap::Keymap;

/// How long a notice stays in the status bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub accent: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub failure: Color,
}

impl Theme {
    /// Plain terminal colors.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            accent: Color::Cyan,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            success: Color::Green,
            failure: Color::Red,
        }
    }

    /// Near-black panels with the gopher-blue accent.
    pub fn gopher() -> Self {
        Self {
            text: Color::Rgb(0xf5, 0xf5, 0xf5),
            muted: Color::Rgb(0x9c, 0xa3, 0xaf),
            title: Color::Rgb(0x00, 0xad, 0xd8),
            border: Color::Rgb(0x26, 0x26, 0x26),
            accent: Color::Rgb(0x00, 0xad, 0xd8),
            header_bg: Color::Rgb(0x17, 0x17, 0x17),
            header_fg: Color::Rgb(0xf5, 0xf5, 0xf5),
            status_bg: Color::Rgb(0x17, 0x17, 0x17),
            status_fg: Color::Rgb(0xd1, 0xd5, 0xdb),
            highlight_fg: Color::Rgb(0x00, 0x00, 0x00),
            highlight_bg: Color::Rgb(0x00, 0xad, 0xd8),
            success: Color::Rgb(0x22, 0xc5, 0x5e),
            failure: Color::Rgb(0xef, 0x44, 0x44),
        }
    }

    /// Load theme from a key = value file. Unknown or missing keys fall back to `gopher`.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::gopher();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            match key.trim() {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "accent" => theme.accent = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "success" => theme.success = color,
                "failure" => theme.failure = color,
                _ => {}
            }
        }

        Some(theme)
    }

    /// Parse "#RRGGBB", "RRGGBB" or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    fn color_to_str(c: Color) -> String {
        match c {
            Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
            Color::Reset => "reset".to_string(),
            // Named colors get a best-effort hex approximation
            Color::Black => "#000000".to_string(),
            Color::Red => "#FF0000".to_string(),
            Color::Green => "#00FF00".to_string(),
            Color::Yellow => "#FFFF00".to_string(),
            Color::Blue => "#0000FF".to_string(),
            Color::Magenta => "#FF00FF".to_string(),
            Color::Cyan => "#00FFFF".to_string(),
            Color::Gray => "#B3B3B3".to_string(),
            Color::DarkGray => "#4D4D4D".to_string(),
            Color::LightRed => "#FF6666".to_string(),
            Color::LightGreen => "#66FF66".to_string(),
            Color::LightYellow => "#FFFF66".to_string(),
            Color::LightBlue => "#6666FF".to_string(),
            Color::LightMagenta => "#FF66FF".to_string(),
            Color::LightCyan => "#66FFFF".to_string(),
            Color::White => "#FFFFFF".to_string(),
            Color::Indexed(_) => "reset".to_string(),
        }
    }

    /// Persist the theme in key = value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdesk theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, Self::color_to_str(v));
        };
        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("accent", self.accent);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("success", self.success);
        kv("failure", self.failure);

        std::fs::write(path, buf)
    }

    /// Load from `path`, or write the default theme there and return it.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::gopher);
        }
        let t = Self::gopher();
        if let Err(e) = t.write_file(path) {
            tracing::debug!(path = %path.display(), error = %e, "could not write default theme");
        }
        t
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::gopher()
    }
}

/// Resolve the directory holding `theme.conf` and `keybinds.conf`.
///
/// Order: explicit override, `$XDG_CONFIG_HOME/userdesk`, `$HOME/.config/userdesk`,
/// then the current directory.
pub fn config_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    let from_env = |var: &str| std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from);
    if let Some(xdg) = from_env("XDG_CONFIG_HOME") {
        return xdg.join("userdesk");
    }
    if let Some(home) = from_env("HOME") {
        return home.join(".config").join("userdesk");
    }
    PathBuf::from(".")
}

/// Whether the initial / latest full fetch has completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

/// Input field selector shared by the create and update forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Id,
}

impl FormField {
    /// Fields shown by each form, in tab order.
    pub fn order(kind: FormKind) -> &'static [FormField] {
        match kind {
            FormKind::Create => &[FormField::Name, FormField::Email],
            FormKind::Update => &[FormField::Name, FormField::Email, FormField::Id],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Id => "UserID",
        }
    }

    pub fn next(self, kind: FormKind) -> Self {
        let order = Self::order(kind);
        let i = order.iter().position(|f| *f == self).unwrap_or(0);
        order[(i + 1) % order.len()]
    }

    pub fn prev(self, kind: FormKind) -> Self {
        let order = Self::order(kind);
        let i = order.iter().position(|f| *f == self).unwrap_or(0);
        order[(i + order.len() - 1) % order.len()]
    }
}

/// Text inputs backing a form. Kept across open/close until a successful submit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserForm {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl UserForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Id => &self.id,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Id => &mut self.id,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn fill_from(&mut self, user: &UserRecord) {
        self.id = user.id.to_string();
        self.name = user.name.clone();
        self.email = user.email.clone();
    }
}

/// Modal dialogs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Form { kind: FormKind, field: FormField },
    DeleteConfirm { id: i64, selected: usize },
    Help { scroll: u16 },
}

pub struct AppState {
    pub api: ApiConfig,
    pub sync: UserListSynchronizer,
    pub dispatcher: Dispatcher,
    pub load_state: LoadState,
    pub selected_user_index: usize,
    pub rows_per_page: usize,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub create_form: UserForm,
    pub update_form: UserForm,
    pub notice: Option<(Notice, Instant)>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(backend: Arc<dyn UserBackend>, api: ApiConfig) -> Self {
        Self {
            api,
            sync: UserListSynchronizer::new(),
            dispatcher: Dispatcher::new(backend),
            load_state: LoadState::Loading,
            selected_user_index: 0,
            rows_per_page: 10,
            theme: Theme::default(),
            keymap: Keymap::default(),
            modal: None,
            create_form: UserForm::default(),
            update_form: UserForm::default(),
            notice: None,
            should_quit: false,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn users(&self) -> &[UserRecord] {
        self.sync.users()
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.sync.users().get(self.selected_user_index)
    }

    pub fn form(&self, kind: FormKind) -> &UserForm {
        match kind {
            FormKind::Create => &self.create_form,
            FormKind::Update => &self.update_form,
        }
    }

    pub fn form_mut(&mut self, kind: FormKind) -> &mut UserForm {
        match kind {
            FormKind::Create => &mut self.create_form,
            FormKind::Update => &mut self.update_form,
        }
    }

    /// Send a request to the backend; the result shows up in a later `pump`.
    pub fn request(&mut self, request: SyncRequest) {
        if request == SyncRequest::Load {
            self.load_state = LoadState::Loading;
        }
        self.dispatcher.dispatch(request);
    }

    /// Apply every outcome that has come back since the last tick.
    pub fn pump(&mut self) {
        for outcome in self.dispatcher.drain() {
            self.apply_outcome(outcome);
        }
    }

    /// Reconcile one outcome: collection, forms, notice, load state, selection.
    pub fn apply_outcome(&mut self, outcome: SyncOutcome) {
        let selected_id = self.selected_user().map(|u| u.id);
        let applied = self.sync.apply(outcome);

        if let Some(kind) = applied.clear_form {
            self.form_mut(kind).clear();
        }
        if let Some(ok) = applied.loaded {
            self.load_state = if ok { LoadState::Ready } else { LoadState::Failed };
        }
        if let Some(notice) = applied.notice {
            self.notify(notice);
        }

        // Follow the selected record if it moved; clamp if it is gone.
        self.selected_user_index = selected_id
            .and_then(|id| self.sync.position(id))
            .unwrap_or(self.selected_user_index)
            .min(self.sync.len().saturating_sub(1));
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    /// The current notice, unless it has expired.
    pub fn visible_notice(&self) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|(_, at)| at.elapsed() < NOTICE_TTL)
            .map(|(n, _)| n)
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
