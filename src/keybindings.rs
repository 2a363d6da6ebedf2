use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub use crate::actions::Action;
use crate::layout::SnapEdge;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Letters compare case-insensitively: hosts report Ctrl+Shift+F as
    /// either `F` or `f` depending on the platform.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.modifiers == self.mods && codes_equal(key.code, self.code)
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.mods.contains(KeyModifiers::SUPER) {
            parts.push("Super".to_string());
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

fn codes_equal(a: KeyCode, b: KeyCode) -> bool {
    match (a, b) {
        (KeyCode::Char(x), KeyCode::Char(y)) => x.eq_ignore_ascii_case(&y),
        _ => a == b,
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl FromStr for KeyCombo {
    type Err = String;

    /// Parses `ctrl+shift+f`, `Ctrl+Left`, `super+d` and the like.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mods = KeyModifiers::NONE;
        let mut code = None;
        for part in s.split('+').map(str::trim) {
            let lower = part.to_ascii_lowercase();
            match lower.as_str() {
                "ctrl" | "control" => mods |= KeyModifiers::CONTROL,
                "shift" => mods |= KeyModifiers::SHIFT,
                "alt" => mods |= KeyModifiers::ALT,
                "super" | "meta" | "cmd" => mods |= KeyModifiers::SUPER,
                _ if code.is_some() => return Err(format!("more than one key in `{s}`")),
                "left" => code = Some(KeyCode::Left),
                "right" => code = Some(KeyCode::Right),
                "up" => code = Some(KeyCode::Up),
                "down" => code = Some(KeyCode::Down),
                "esc" | "escape" => code = Some(KeyCode::Esc),
                "enter" => code = Some(KeyCode::Enter),
                "tab" => code = Some(KeyCode::Tab),
                "space" => code = Some(KeyCode::Char(' ')),
                _ => {
                    let mut chars = lower.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => code = Some(KeyCode::Char(c)),
                        _ => return Err(format!("unknown key `{part}`")),
                    }
                }
            }
        }
        code.map(|code| KeyCombo::new(code, mods))
            .ok_or_else(|| format!("no key in `{s}`"))
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let ctrl = KeyModifiers::CONTROL;
        let ctrl_shift = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
        let mut kb = Self::new();
        kb.add(CloseActive, KeyCombo::new(KeyCode::Char('w'), ctrl));
        kb.add(MinimizeActive, KeyCombo::new(KeyCode::Char('m'), ctrl));
        kb.add(MaximizeActive, KeyCombo::new(KeyCode::Char('f'), ctrl_shift));
        // Snapping
        kb.add(SnapActive(SnapEdge::Left), KeyCombo::new(KeyCode::Left, ctrl));
        kb.add(
            SnapActive(SnapEdge::Right),
            KeyCombo::new(KeyCode::Right, ctrl),
        );
        kb.add(SnapActive(SnapEdge::Top), KeyCombo::new(KeyCode::Up, ctrl));
        kb.add(
            SnapActive(SnapEdge::Bottom),
            KeyCombo::new(KeyCode::Down, ctrl),
        );
        kb.add(ShowDesktop, KeyCombo::new(KeyCode::Char('d'), ctrl));
        kb.add(CloseAll, KeyCombo::new(KeyCode::Char('q'), ctrl_shift));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        for (act, list) in &self.map {
            if list.iter().any(|c| c.matches(key)) {
                return Some(*act);
            }
        }
        None
    }

    /// Action and display strings, sorted by action name for stable output.
    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        let mut v: Vec<(Action, Vec<String>)> = self
            .map
            .iter()
            .map(|(act, list)| (*act, list.iter().map(|c| c.display()).collect()))
            .collect();
        v.sort_by_key(|(act, _)| act.to_string());
        v
    }

    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_window_shortcuts() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(kb.action_for_key(&ev), Some(Action::CloseActive));
        let ev = KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL);
        assert_eq!(
            kb.action_for_key(&ev),
            Some(Action::SnapActive(SnapEdge::Left))
        );
        let ev = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&ev), None);
    }

    #[test]
    fn shifted_letters_match_either_case() {
        let kb = KeyBindings::default();
        let mods = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
        assert!(kb.matches(
            Action::MaximizeActive,
            &KeyEvent::new(KeyCode::Char('F'), mods)
        ));
        assert!(kb.matches(
            Action::MaximizeActive,
            &KeyEvent::new(KeyCode::Char('f'), mods)
        ));
    }

    #[test]
    fn combo_parse_and_display() {
        let combo: KeyCombo = "ctrl+shift+f".parse().unwrap();
        assert_eq!(combo.display(), "Ctrl+Shift+F");
        let combo: KeyCombo = "Ctrl+Left".parse().unwrap();
        assert_eq!(combo, KeyCombo::new(KeyCode::Left, KeyModifiers::CONTROL));
        assert!("ctrl+shift".parse::<KeyCombo>().is_err());
        assert!("ctrl+a+b".parse::<KeyCombo>().is_err());
        assert!("ctrl+banana".parse::<KeyCombo>().is_err());
    }

    #[test]
    fn help_lists_each_action_once() {
        let kb = KeyBindings::default();
        let entries = kb.help_entries();
        assert_eq!(entries.len(), 9);
        assert_eq!(kb.combos_for(Action::ShowDesktop), vec!["Ctrl+D"]);
    }
}
