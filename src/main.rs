use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use desktop_wm::config::Config;
use desktop_wm::keybindings::KeyBindings;
use desktop_wm::persist::{JsonFileStore, PersistWriter};
use desktop_wm::script::{self, Outcome};
use desktop_wm::{Snapshot, WindowManager, tracing_sub};

#[derive(Parser, Debug)]
#[command(
    name = "desktop-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Run a window manager command script headlessly"
)]
struct Cli {
    /// TOML configuration file. Missing files fall back to defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for saved sessions. Enables hydration and write-through saves.
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Session key to load and save under.
    #[arg(long, value_name = "KEY", default_value = "default")]
    session: String,

    /// Screen size, e.g. `1280x800`.
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    viewport: Option<(i32, i32)>,

    /// Height of the taskbar band at the bottom of the screen.
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(i32).range(0..))]
    reserved_bottom: Option<i32>,

    /// Seed for new-window placement jitter.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Print snapshots as JSON.
    #[arg(long)]
    json: bool,

    /// Script to run, or `-` for stdin.
    script: PathBuf,
}

fn parse_size(raw: &str) -> Result<(i32, i32), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{raw}`"))?;
    let w: i32 = w.trim().parse().map_err(|_| format!("bad width `{w}`"))?;
    let h: i32 = h.trim().parse().map_err(|_| format!("bad height `{h}`"))?;
    if w <= 0 || h <= 0 {
        return Err(format!("viewport must be positive, got `{raw}`"));
    }
    Ok((w, h))
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some((width, height)) = self.viewport {
            config.viewport.width = Some(width);
            config.viewport.height = Some(height);
        }
        if let Some(px) = self.reserved_bottom {
            config.viewport.reserved_bottom = px;
        }
        if let Some(seed) = self.seed {
            config.window.jitter = true;
            config.window.seed = Some(seed);
        }
        Ok(config)
    }
}

fn read_script(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("reading script from stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))
}

fn print_snapshot(out: &mut impl Write, snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, snapshot)?;
        writeln!(out)?;
        return Ok(());
    }
    if snapshot.windows.is_empty() {
        writeln!(out, "(no windows)")?;
    }
    for w in &snapshot.windows {
        let mut flags = String::new();
        if snapshot.active == Some(w.id) {
            flags.push_str(" active");
        }
        if w.minimized {
            flags.push_str(" minimized");
        }
        if w.maximized {
            flags.push_str(" maximized");
        }
        writeln!(
            out,
            "#{} {} {:?} {},{} {}x{} z={}{}",
            w.id, w.app_id, w.title, w.x, w.y, w.width, w.height, w.z_index, flags
        )?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;
    tracing_sub::init(config.log_level(), config.log_file.as_deref())
        .context("opening log file")?;

    let source = read_script(&cli.script)?;
    let commands = script::parse_script(&source)
        .with_context(|| format!("parsing {}", cli.script.display()))?;

    let mut wm: WindowManager = config.build_manager();
    if let Some(dir) = &cli.state_dir {
        let store = JsonFileStore::new(dir);
        match wm.hydrate_from(&store, &cli.session) {
            Ok(true) => tracing::info!(session = %cli.session, "restored session"),
            Ok(false) => tracing::debug!(session = %cli.session, "no saved session"),
            Err(err) => tracing::warn!(session = %cli.session, error = %err, "could not load session"),
        }
        wm.attach_writer(PersistWriter::spawn(store), cli.session.clone());
    }

    let bindings = KeyBindings::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (line, command) in &commands {
        tracing::debug!(line, ?command, "running");
        match script::execute(&mut wm, &bindings, command) {
            Outcome::Opened(id) => {
                if !cli.json {
                    writeln!(out, "opened #{id}")?;
                }
            }
            Outcome::Applied(false) => tracing::debug!(line, "no change"),
            Outcome::Applied(true) => {}
            Outcome::Show(snapshot) => print_snapshot(&mut out, &snapshot, cli.json)?,
        }
    }

    wm.flush();
    Ok(())
}
