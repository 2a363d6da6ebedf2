use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use desktop_wm::actions::Action;
use desktop_wm::jitter::SeededJitter;
use desktop_wm::persist::{MemoryStore, PersistWriter};
use desktop_wm::window::InvariantViolation;
use desktop_wm::{SnapEdge, Viewport, WindowId, WindowManager, WindowManagerOptions, tracing_sub};

const APPS: [&str; 4] = ["notes", "files", "settings", "terminal"];

#[derive(Parser, Debug)]
#[command(
    name = "wm-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Random-operation benchmark for the window manager state model"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 5.0
    )]
    duration_seconds: f64,

    /// Seed for the operation stream. Random when omitted.
    #[arg(short = 's', long = "seed", value_name = "N")]
    seed: Option<u64>,

    /// Soft cap on open windows; opens are skipped above it.
    #[arg(short = 'w', long = "max-windows", value_name = "N", default_value_t = 32)]
    max_windows: usize,

    /// Check collection invariants after every operation.
    #[arg(long = "validate")]
    validate: bool,

    /// Attach an in-memory persistence writer.
    #[arg(long = "persist")]
    persist: bool,
}

struct BenchConfig {
    duration: Duration,
    seed: u64,
    max_windows: usize,
    validate: bool,
    persist: bool,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.1..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.1 and 600 seconds".to_string());
        }
        if !(1..=10_000).contains(&cli.max_windows) {
            return Err("max-windows must be between 1 and 10000".to_string());
        }
        Ok(Self {
            duration: Duration::from_secs_f64(cli.duration_seconds),
            seed: cli.seed.unwrap_or_else(|| fastrand::u64(..)),
            max_windows: cli.max_windows,
            validate: cli.validate,
            persist: cli.persist,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    tracing_sub::init("warn", None)?;

    let stats = run_benchmark(&config);
    println!("{}", stats.final_report(&config));
    if let ExitReason::InvariantBroken(err) = &stats.exit_reason {
        return Err(io::Error::other(err.to_string()));
    }
    Ok(())
}

fn run_benchmark(config: &BenchConfig) -> BenchStats {
    let mut rng = fastrand::Rng::with_seed(config.seed);
    let mut wm = WindowManager::with_jitter(
        WindowManagerOptions::default(),
        SeededJitter::new(config.seed),
    );
    wm.set_viewport(Some(Viewport::new(1920, 1080, 40)));
    if config.persist {
        wm.attach_writer(PersistWriter::spawn(MemoryStore::new()), "bench");
    }

    let mut stats = BenchStats::new();
    loop {
        let op_start = Instant::now();
        let changed = random_op(&mut wm, &mut rng, config.max_windows);
        stats.record_op(changed, op_start.elapsed(), wm.windows().len());

        if config.validate
            && let Err(err) = wm.validate()
        {
            stats.exit_reason = ExitReason::InvariantBroken(err);
            break;
        }
        // only read the clock every 256 ops
        if stats.op_count % 256 == 0 && stats.elapsed() >= config.duration {
            break;
        }
    }
    wm.flush();
    stats.mark_completed();
    stats
}

fn pick(wm: &WindowManager, rng: &mut fastrand::Rng) -> WindowId {
    let windows = wm.windows();
    if windows.is_empty() || rng.u8(..10) == 0 {
        // occasionally aim at an id that does not exist
        return WindowId(u64::MAX - rng.u64(..1000));
    }
    windows[rng.usize(..windows.len())].id
}

fn random_edge(rng: &mut fastrand::Rng) -> SnapEdge {
    SnapEdge::ALL[rng.usize(..SnapEdge::ALL.len())]
}

fn random_op(wm: &mut WindowManager, rng: &mut fastrand::Rng, max_windows: usize) -> bool {
    match rng.u8(..100) {
        0..=14 if wm.windows().len() < max_windows => {
            wm.open_app(APPS[rng.usize(..APPS.len())]);
            true
        }
        0..=24 => {
            let id = pick(wm, rng);
            wm.close(id)
        }
        25..=44 => {
            let id = pick(wm, rng);
            wm.focus(id)
        }
        45..=59 => {
            let id = pick(wm, rng);
            wm.move_window(id, rng.i32(-200..2200), rng.i32(-200..1300))
        }
        60..=69 => {
            let id = pick(wm, rng);
            wm.resize(id, rng.i32(0..2500), rng.i32(0..1500))
        }
        70..=77 => {
            let id = pick(wm, rng);
            wm.snap_to_edge(id, random_edge(rng))
        }
        78..=85 => {
            let id = pick(wm, rng);
            wm.minimize_toggle(id)
        }
        86..=92 => {
            let id = pick(wm, rng);
            wm.maximize_toggle(id)
        }
        93..=96 => {
            let id = pick(wm, rng);
            wm.taskbar_click(id)
        }
        97 => wm.dispatch(Action::SnapActive(random_edge(rng))),
        98 => wm.dispatch(Action::ShowDesktop),
        _ => wm.dispatch(Action::CloseAll),
    }
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    op_count: u64,
    changed_count: u64,
    peak_windows: usize,
    total_op_time: Duration,
    fastest_op: Duration,
    slowest_op: Duration,
    exit_reason: ExitReason,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            op_count: 0,
            changed_count: 0,
            peak_windows: 0,
            total_op_time: Duration::ZERO,
            fastest_op: Duration::MAX,
            slowest_op: Duration::ZERO,
            exit_reason: ExitReason::Completed,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_op(&mut self, changed: bool, op_time: Duration, windows: usize) {
        self.op_count = self.op_count.saturating_add(1);
        if changed {
            self.changed_count = self.changed_count.saturating_add(1);
        }
        self.peak_windows = self.peak_windows.max(windows);
        self.total_op_time += op_time;
        if op_time < self.fastest_op {
            self.fastest_op = op_time;
        }
        if op_time > self.slowest_op {
            self.slowest_op = op_time;
        }
    }

    fn average_op_us(&self) -> f64 {
        if self.op_count == 0 {
            return 0.0;
        }
        (self.total_op_time.as_secs_f64() / self.op_count as f64) * 1_000_000.0
    }

    fn fastest_op_us(&self) -> f64 {
        if self.op_count == 0 {
            return 0.0;
        }
        self.fastest_op.as_secs_f64() * 1_000_000.0
    }

    fn slowest_op_us(&self) -> f64 {
        self.slowest_op.as_secs_f64() * 1_000_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let ops_per_second = if elapsed > 0.0 {
            self.op_count as f64 / elapsed
        } else {
            0.0
        };

        indoc::formatdoc!(
            r#"
            WM bench {status}.
            Seed: {seed} | Duration: {elapsed:.2}s (target {target:.2}s)
            Operations: {ops} ({changed} changed state) | ~{ops_per_sec:.0}/s
            Avg op: {avg:.2} us | Best: {best:.2} us | Worst: {worst:.2} us
            Peak windows: {peak} (cap {cap})
            "#,
            status = self.exit_reason.describe(),
            seed = config.seed,
            elapsed = elapsed,
            target = config.duration.as_secs_f64(),
            ops = self.op_count,
            changed = self.changed_count,
            ops_per_sec = ops_per_second,
            avg = self.average_op_us(),
            best = self.fastest_op_us(),
            worst = self.slowest_op_us(),
            peak = self.peak_windows,
            cap = config.max_windows,
        )
    }
}

enum ExitReason {
    Completed,
    InvariantBroken(InvariantViolation),
}

impl ExitReason {
    fn describe(&self) -> String {
        match self {
            ExitReason::Completed => "completed full duration".to_string(),
            ExitReason::InvariantBroken(err) => format!("stopped on broken invariant: {err}"),
        }
    }
}
