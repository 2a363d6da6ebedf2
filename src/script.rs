//! Line-oriented command scripts for driving a [`WindowManager`] headlessly.
//!
//! ```text
//! # open two apps and tile them
//! open notes
//! open files My Files
//! snap 1 left
//! snap @active right
//! key ctrl+d
//! show
//! ```

use std::str::FromStr;

use crossterm::event::KeyEvent;
use thiserror::Error;

use crate::apps;
use crate::keybindings::{KeyBindings, KeyCombo};
use crate::layout::SnapEdge;
use crate::window::{Snapshot, WindowId, WindowManager};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

/// Window a command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Id(WindowId),
    /// Whatever window is active when the command runs.
    Active,
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "@active" {
            return Ok(Target::Active);
        }
        s.parse()
            .map(Target::Id)
            .map_err(|_| format!("expected a window id or @active, got `{s}`"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open { app: String, title: Option<String> },
    Close(Target),
    CloseAll,
    Minimize(Target),
    MinimizeAll,
    Maximize(Target),
    Focus(Target),
    Move { target: Target, x: i32, y: i32 },
    Resize { target: Target, width: i32, height: i32 },
    Snap { target: Target, edge: SnapEdge },
    Click(Target),
    Key(KeyCombo),
    Show,
}

fn arg<'a>(args: &[&'a str], idx: usize, what: &str) -> Result<&'a str, String> {
    args.get(idx)
        .copied()
        .ok_or_else(|| format!("missing {what}"))
}

fn number(args: &[&str], idx: usize, what: &str) -> Result<i32, String> {
    let raw = arg(args, idx, what)?;
    raw.parse()
        .map_err(|_| format!("{what} must be an integer, got `{raw}`"))
}

fn target(args: &[&str]) -> Result<Target, String> {
    arg(args, 0, "window id")?.parse()
}

fn arity(args: &[&str], expected: usize) -> Result<(), String> {
    if args.len() > expected {
        return Err(format!("unexpected argument `{}`", args[expected]));
    }
    Ok(())
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let command = match verb {
        "open" => {
            let app = arg(&args, 0, "app id")?.to_string();
            let title = (args.len() > 1).then(|| args[1..].join(" "));
            Command::Open { app, title }
        }
        "close" => {
            arity(&args, 1)?;
            Command::Close(target(&args)?)
        }
        "close-all" => {
            arity(&args, 0)?;
            Command::CloseAll
        }
        "minimize" => {
            arity(&args, 1)?;
            Command::Minimize(target(&args)?)
        }
        "minimize-all" => {
            arity(&args, 0)?;
            Command::MinimizeAll
        }
        "maximize" => {
            arity(&args, 1)?;
            Command::Maximize(target(&args)?)
        }
        "focus" => {
            arity(&args, 1)?;
            Command::Focus(target(&args)?)
        }
        "move" => {
            arity(&args, 3)?;
            Command::Move {
                target: target(&args)?,
                x: number(&args, 1, "x")?,
                y: number(&args, 2, "y")?,
            }
        }
        "resize" => {
            arity(&args, 3)?;
            Command::Resize {
                target: target(&args)?,
                width: number(&args, 1, "width")?,
                height: number(&args, 2, "height")?,
            }
        }
        "snap" => {
            arity(&args, 2)?;
            Command::Snap {
                target: target(&args)?,
                edge: arg(&args, 1, "edge")?.parse()?,
            }
        }
        "click" => {
            arity(&args, 1)?;
            Command::Click(target(&args)?)
        }
        "key" => {
            arity(&args, 1)?;
            Command::Key(arg(&args, 0, "key combo")?.parse()?)
        }
        "show" => {
            arity(&args, 0)?;
            Command::Show
        }
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(Some(command))
}

/// Parse a whole script, keeping 1-based line numbers.
pub fn parse_script(source: &str) -> Result<Vec<(usize, Command)>, ScriptError> {
    let mut commands = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        match parse_line(line) {
            Ok(Some(command)) => commands.push((line_no, command)),
            Ok(None) => {}
            Err(message) => {
                return Err(ScriptError {
                    line: line_no,
                    message,
                });
            }
        }
    }
    Ok(commands)
}

/// What running a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Opened(WindowId),
    /// `false` when the command was a no-op.
    Applied(bool),
    Show(Snapshot),
}

fn resolve(wm: &WindowManager, target: Target) -> Option<WindowId> {
    match target {
        Target::Id(id) => Some(id),
        Target::Active => wm.active_id(),
    }
}

fn on_target(
    wm: &mut WindowManager,
    target: Target,
    op: fn(&mut WindowManager, WindowId) -> bool,
) -> Outcome {
    Outcome::Applied(resolve(wm, target).is_some_and(|id| op(wm, id)))
}

/// Run one command. Commands aimed at `@active` do nothing when no window
/// is active.
pub fn execute(wm: &mut WindowManager, bindings: &KeyBindings, command: &Command) -> Outcome {
    match command {
        Command::Open { app, title } => {
            let title = title.as_deref().unwrap_or_else(|| apps::title_for(app));
            Outcome::Opened(wm.open(app, title))
        }
        Command::Close(t) => on_target(wm, *t, WindowManager::close),
        Command::CloseAll => Outcome::Applied(wm.close_all()),
        Command::Minimize(t) => on_target(wm, *t, WindowManager::minimize_toggle),
        Command::MinimizeAll => Outcome::Applied(wm.minimize_all()),
        Command::Maximize(t) => on_target(wm, *t, WindowManager::maximize_toggle),
        Command::Focus(t) => on_target(wm, *t, WindowManager::focus),
        Command::Click(t) => on_target(wm, *t, WindowManager::taskbar_click),
        Command::Move { target, x, y } => Outcome::Applied(
            resolve(wm, *target).is_some_and(|id| wm.move_window(id, *x, *y)),
        ),
        Command::Resize {
            target,
            width,
            height,
        } => Outcome::Applied(
            resolve(wm, *target).is_some_and(|id| wm.resize(id, *width, *height)),
        ),
        Command::Snap { target, edge } => Outcome::Applied(
            resolve(wm, *target).is_some_and(|id| wm.snap_to_edge(id, *edge)),
        ),
        Command::Key(combo) => {
            let event = KeyEvent::new(combo.code, combo.mods);
            match bindings.action_for_key(&event) {
                Some(action) => Outcome::Applied(wm.dispatch(action)),
                None => {
                    tracing::debug!(%combo, "no action bound");
                    Outcome::Applied(false)
                }
            }
        }
        Command::Show => Outcome::Show(wm.snapshot()),
    }
}
