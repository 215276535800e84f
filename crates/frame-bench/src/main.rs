use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use frame_wm::drivers::ScriptedDriver;
use frame_wm::event_loop::{ControlFlow, EventLoop};
use frame_wm::input::PointerRouter;
use frame_wm::layout::{FloatRect, Viewport};
use frame_wm::render::{FrameStyle, render};
use frame_wm::{WindowManager, WindowOptions, WmConfig};

const VIEWPORT: Viewport = Viewport::new(160, 48);
const DRAGS_PER_GESTURE: usize = 12;

#[derive(Parser, Debug)]
#[command(
    name = "frame-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replays random move/resize gestures against the window manager"
)]
struct BenchCli {
    /// Gestures to replay.
    #[arg(short = 'g', long = "gestures", value_name = "N", default_value_t = 10_000)]
    gestures: usize,

    /// Windows open during the run.
    #[arg(short = 'w', long = "windows", value_name = "N", default_value_t = 12)]
    windows: usize,

    /// PRNG seed. Defaults to the clock, so runs differ unless given.
    #[arg(short = 's', long = "seed", value_name = "N")]
    seed: Option<u64>,
}

struct BenchConfig {
    gestures: usize,
    windows: usize,
    seed: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if cli.gestures == 0 {
            return Err("gestures must be at least 1".to_string());
        }
        if !(1..=256).contains(&cli.windows) {
            return Err("windows must be between 1 and 256".to_string());
        }
        Ok(Self {
            gestures: cli.gestures,
            windows: cli.windows,
            seed: cli.seed.unwrap_or_else(clock_seed),
        })
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
        ^ 0xA5A5_A5A5_1234_5678
}

struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Uniform-ish in `lo..hi`.
    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        let span = (hi - lo).max(1) as u32;
        lo + (self.next() % span) as i32
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    let stats = run_benchmark(&config)?;
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn open_windows(wm: &mut WindowManager, rng: &mut Rng, count: usize) -> io::Result<()> {
    for n in 0..count {
        let rect = FloatRect::new(
            rng.range(0, VIEWPORT.width - 30),
            rng.range(0, VIEWPORT.height - 12),
            rng.range(20, 40),
            rng.range(6, 14),
        );
        let options = WindowOptions {
            min_rect: FloatRect::new(-500, -500, 12, 4),
            ..WindowOptions::titled(format!("bench {n}"))
        };
        wm.open(rect, options).map_err(io::Error::other)?;
    }
    Ok(())
}

fn mouse(kind: MouseEventKind, x: i32, y: i32) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column: x.clamp(0, i32::from(u16::MAX)) as u16,
        row: y.clamp(0, i32::from(u16::MAX)) as u16,
        modifiers: KeyModifiers::NONE,
    })
}

/// Press on a title bar or the bottom-right corner of a random window, drag
/// around, release.
fn gesture_script(wm: &WindowManager, rng: &mut Rng) -> Vec<Event> {
    let ids = wm.registry().ids();
    let Some(&id) = ids.get(rng.next() as usize % ids.len().max(1)) else {
        return Vec::new();
    };
    let Ok(window) = wm.window(id) else {
        return Vec::new();
    };
    let rect = window.rect();
    let (mut x, mut y) = if rng.next() % 2 == 0 {
        (rect.x + 2, rect.y + 1)
    } else {
        (rect.right() - 1, rect.bottom() - 1)
    };
    let mut script = Vec::with_capacity(DRAGS_PER_GESTURE + 2);
    script.push(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
    for _ in 0..DRAGS_PER_GESTURE {
        x += rng.range(-3, 4);
        y += rng.range(-2, 3);
        script.push(mouse(MouseEventKind::Drag(MouseButton::Left), x, y));
    }
    script.push(mouse(MouseEventKind::Up(MouseButton::Left), x, y));
    script
}

fn run_benchmark(config: &BenchConfig) -> io::Result<BenchStats> {
    let mut rng = Rng::new(config.seed);
    let mut wm = WindowManager::new(WmConfig::terminal(VIEWPORT));
    open_windows(&mut wm, &mut rng, config.windows)?;

    let mut router = PointerRouter::new();
    let style = FrameStyle::default();
    let area = Rect::new(0, 0, VIEWPORT.width as u16, VIEWPORT.height as u16);
    let mut buffer = Buffer::empty(area);
    let mut stats = BenchStats::new();

    for _ in 0..config.gestures {
        let script = gesture_script(&wm, &mut rng);
        let mut event_loop = EventLoop::new(ScriptedDriver::new(script), Duration::ZERO);
        let mut events: u64 = 0;
        let mut consumed: u64 = 0;
        let mut render_time = Duration::ZERO;
        let started = Instant::now();
        event_loop.run(|driver, event| {
            match event {
                Some(Event::Mouse(m)) => {
                    events += 1;
                    if router.handle_mouse(&mut wm, m) {
                        consumed += 1;
                    }
                }
                Some(_) => {}
                None if driver.remaining() == 0 => {
                    let t = Instant::now();
                    buffer.reset();
                    render(&wm, &mut buffer, &style);
                    render_time += t.elapsed();
                    return Ok(ControlFlow::Quit);
                }
                None => {}
            }
            Ok(ControlFlow::Continue)
        })?;
        stats.record_gesture(events, consumed, started.elapsed(), render_time);
    }
    stats.mark_completed();
    Ok(stats)
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    gestures: u64,
    events: u64,
    consumed: u64,
    total_render: Duration,
    slowest_gesture: Duration,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            gestures: 0,
            events: 0,
            consumed: 0,
            total_render: Duration::ZERO,
            slowest_gesture: Duration::ZERO,
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

    fn record_gesture(&mut self, events: u64, consumed: u64, took: Duration, render: Duration) {
        self.gestures = self.gestures.saturating_add(1);
        self.events = self.events.saturating_add(events);
        self.consumed = self.consumed.saturating_add(consumed);
        self.total_render += render;
        if took > self.slowest_gesture {
            self.slowest_gesture = took;
        }
    }

    fn per_second(&self, count: u64) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            count as f64 / elapsed
        } else {
            0.0
        }
    }

    fn average_render_ms(&self) -> f64 {
        if self.gestures == 0 {
            return 0.0;
        }
        (self.total_render.as_secs_f64() / self.gestures as f64) * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        indoc::formatdoc!(
            r#"
            Gesture bench completed (seed {seed}).
            Windows: {windows} | Gestures: {gestures} | Duration: {elapsed:.3}s
            Events: {events} total, {consumed} consumed (~{events_per_sec:.0}/s)
            Gestures/s: {gestures_per_sec:.0} | Slowest gesture: {slowest:.3} ms
            Avg render: {render:.3} ms
            "#,
            seed = config.seed,
            windows = config.windows,
            gestures = self.gestures,
            elapsed = self.elapsed().as_secs_f64(),
            events = self.events,
            consumed = self.consumed,
            events_per_sec = self.per_second(self.events),
            gestures_per_sec = self.per_second(self.gestures),
            slowest = self.slowest_gesture.as_secs_f64() * 1_000.0,
            render = self.average_render_ms(),
        )
    }
}
