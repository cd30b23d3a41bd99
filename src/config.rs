//! User configuration: storage locations, admin credential, animation
//! tuning and keybindings.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/folio/config.toml` (default `~/.config/folio/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::helix::HelixConfig;
use crate::core::smooth_scroll::DEFAULT_LERP;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    Open,
    Back,
    ToggleHelix,
    OpenAdmin,
    Quit,
}

impl Action {
    /// Every action, in the order they are written to the config file.
    pub const ALL: &[Action] = &[
        Action::ScrollDown,
        Action::ScrollUp,
        Action::PageDown,
        Action::PageUp,
        Action::Open,
        Action::Back,
        Action::ToggleHelix,
        Action::OpenAdmin,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollDown => "scroll_down",
            Action::ScrollUp => "scroll_up",
            Action::PageDown => "page_down",
            Action::PageUp => "page_up",
            Action::Open => "open",
            Action::Back => "back",
            Action::ToggleHelix => "toggle_helix",
            Action::OpenAdmin => "open_admin",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code plus modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"↓"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"PageDown"`, `"Ctrl+c"`).
    fn to_config_string(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Delete => "Delete".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => {
                let n: u8 = k[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Keep the original case for single characters.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Overrides `<data_dir>/folio.db`.
    pub db_path: Option<PathBuf>,
    /// Overrides `<data_dir>/objects`.
    pub store_dir: Option<PathBuf>,
    /// Overrides `file://<store_dir>`.
    pub public_base_url: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Animation frame interval.
    pub frame_ms: u64,
    /// Terminals narrower than this use the mobile layout.
    pub mobile_breakpoint_cols: u16,
    pub scroll_lerp: f64,
    pub helix: HelixConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            db_path: None,
            store_dir: None,
            public_base_url: None,
            admin_email: None,
            admin_password: None,
            frame_ms: 16,
            mobile_breakpoint_cols: 80,
            scroll_lerp: DEFAULT_LERP,
            helix: HelixConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(Action::ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Action::ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(Action::PageDown, vec![KeyBind::new(PageDown, n), KeyBind::new(Char(' '), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(PageUp, n)]);
        m.insert(Action::Open, vec![KeyBind::new(Enter, n)]);
        m.insert(Action::Back, vec![KeyBind::new(Esc, n), KeyBind::new(Backspace, n)]);
        m.insert(Action::ToggleHelix, vec![KeyBind::new(Tab, n), KeyBind::new(Char('h'), n)]);
        m.insert(Action::OpenAdmin, vec![KeyBind::new(Char('a'), n)]);
        m.insert(Action::Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When several bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"↓/j"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: open | {}: helix | {}: admin | {}: quit",
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::Open),
            self.short_binding(Action::ToggleHelix),
            self.short_binding(Action::OpenAdmin),
            self.short_binding(Action::Quit),
        )
    }

    // ── resolved locations ──────────────────────────────────────

    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| data_dir().join("folio.db"))
    }

    pub fn store_dir(&self) -> PathBuf {
        self.store_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("objects"))
    }

    pub fn public_base_url(&self) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| format!("file://{}", self.store_dir().display()))
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
                }
                Self::default()
            }
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut cfg = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            let text = value.trim_matches('"');

            match key {
                "db_path" => cfg.db_path = non_empty(text).map(PathBuf::from),
                "store_dir" => cfg.store_dir = non_empty(text).map(PathBuf::from),
                "public_base_url" => cfg.public_base_url = non_empty(text).map(String::from),
                "admin_email" => cfg.admin_email = non_empty(text).map(String::from),
                "admin_password" => cfg.admin_password = non_empty(text).map(String::from),
                "frame_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.frame_ms = v.clamp(16, 100);
                    }
                }
                "mobile_breakpoint_cols" => {
                    if let Ok(v) = value.parse::<u16>() {
                        cfg.mobile_breakpoint_cols = v.clamp(20, 400);
                    }
                }
                "scroll_lerp" => set_f64(&mut cfg.scroll_lerp, value, 0.02, 1.0),
                "helix_turns" => set_f64(&mut cfg.helix.turns, value, 0.25, 10.0),
                "helix_radius" => set_f64(&mut cfg.helix.radius, value, 1.0, 50.0),
                "helix_spacing" => set_f64(&mut cfg.helix.spacing, value, 0.5, 20.0),
                "fog_near" => set_f64(&mut cfg.helix.fog.near, value, 0.0, 200.0),
                "fog_far" => set_f64(&mut cfg.helix.fog.far, value, 0.0, 400.0),
                "fog_min" => set_f64(&mut cfg.helix.fog.min_distance, value, 0.0, 100.0),
                _ => {
                    let Some(action) = Action::from_config_key(key) else {
                        continue;
                    };
                    let parsed: Vec<KeyBind> = value
                        .split(',')
                        .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                        .collect();
                    if !parsed.is_empty() {
                        cfg.bindings.insert(action, parsed);
                    }
                }
            }
        }

        if cfg.helix.fog.far <= cfg.helix.fog.near {
            cfg.helix.fog.far = cfg.helix.fog.near + 1.0;
        }
        cfg
    }

    fn serialise(&self) -> String {
        let opt_path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        let mut lines = vec![
            "# folio configuration".to_string(),
            String::new(),
            "# Storage (empty = default under the data directory)".to_string(),
            format!("db_path = {}", opt_path(&self.db_path).unwrap_or_default()),
            format!("store_dir = {}", opt_path(&self.store_dir).unwrap_or_default()),
            format!(
                "public_base_url = {}",
                self.public_base_url.clone().unwrap_or_default()
            ),
            String::new(),
            "# Admin account".to_string(),
            format!("admin_email = {}", self.admin_email.clone().unwrap_or_default()),
            format!(
                "admin_password = {}",
                self.admin_password.clone().unwrap_or_default()
            ),
            String::new(),
            "# Animation".to_string(),
            format!("frame_ms = {}", self.frame_ms),
            format!("mobile_breakpoint_cols = {}", self.mobile_breakpoint_cols),
            format!("scroll_lerp = {}", self.scroll_lerp),
            format!("helix_turns = {}", self.helix.turns),
            format!("helix_radius = {}", self.helix.radius),
            format!("helix_spacing = {}", self.helix.spacing),
            format!("fog_near = {}", self.helix.fog.near),
            format!("fog_far = {}", self.helix.fog.far),
            format!("fog_min = {}", self.helix.fog.min_distance),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn set_f64(slot: &mut f64, value: &str, min: f64, max: f64) {
    if let Ok(v) = value.parse::<f64>() {
        if v.is_finite() {
            *slot = v.clamp(min, max);
        }
    }
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()))
}

/// Return the config file path (`$XDG_CONFIG_HOME/folio/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    config_dir.join("folio").join("config.toml")
}

/// `$XDG_DATA_HOME/folio` (default `~/.local/share/folio`).
pub fn data_dir() -> PathBuf {
    let data_home = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"));
    data_home.join("folio")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn defaults_match_expected_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.match_key(key(KeyCode::Char('j'), KeyModifiers::NONE)), Some(Action::ScrollDown));
        assert_eq!(cfg.match_key(key(KeyCode::Enter, KeyModifiers::NONE)), Some(Action::Open));
        assert_eq!(cfg.match_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL)), None);
        assert_eq!(cfg.display_bindings(Action::ScrollDown), "↓/j");
    }

    #[test]
    fn parse_reads_values_and_clamps() {
        let cfg = AppConfig::parse_config(
            "# comment\n\
             db_path = /tmp/folio.db\n\
             admin_email = \"me@example.com\"\n\
             frame_ms = 5\n\
             scroll_lerp = 3.0\n\
             helix_turns = 3\n\
             fog_near = 30\n\
             fog_far = 10\n\
             unknown_key = whatever\n\
             quit = Ctrl+c, Q\n",
        );
        assert_eq!(cfg.db_path, Some(PathBuf::from("/tmp/folio.db")));
        assert_eq!(cfg.admin_email.as_deref(), Some("me@example.com"));
        assert_eq!(cfg.admin_password, None);
        assert_eq!(cfg.frame_ms, 16);
        assert_eq!(cfg.scroll_lerp, 1.0);
        assert_eq!(cfg.helix.turns, 3.0);
        assert_eq!(cfg.helix.fog.far, 31.0);
        assert_eq!(
            cfg.match_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(cfg.match_key(key(KeyCode::Char('Q'), KeyModifiers::NONE)), Some(Action::Quit));
        assert_eq!(cfg.match_key(key(KeyCode::Char('q'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.store_dir = Some(dir.path().join("objects"));
        cfg.mobile_breakpoint_cols = 100;
        cfg.helix.radius = 8.5;
        cfg.bindings.insert(Action::OpenAdmin, vec![KeyBind::new(KeyCode::F(2), KeyModifiers::ALT)]);
        cfg.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.store_dir, cfg.store_dir);
        assert_eq!(loaded.db_path, None);
        assert_eq!(loaded.mobile_breakpoint_cols, 100);
        assert_eq!(loaded.helix.radius, 8.5);
        assert_eq!(loaded.bindings, cfg.bindings);
    }

    #[test]
    fn public_base_defaults_to_store_dir() {
        let mut cfg = AppConfig::default();
        cfg.store_dir = Some(PathBuf::from("/srv/objects"));
        assert_eq!(cfg.public_base_url(), "file:///srv/objects");
        cfg.public_base_url = Some("https://cdn.example.com".into());
        assert_eq!(cfg.public_base_url(), "https://cdn.example.com");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("nope.toml"));
        assert_eq!(cfg.frame_ms, 16);
        assert_eq!(cfg.bindings, AppConfig::default_bindings());
    }
}
