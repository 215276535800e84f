use std::cell::Cell;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use frame_wm::drivers::console::ConsoleDriver;
use frame_wm::event_loop::{ControlFlow, EventLoop};
use frame_wm::input::PointerRouter;
use frame_wm::layout::{FloatRect, Viewport};
use frame_wm::render::{FrameStyle, render, taskbar_hit};
use frame_wm::window::{Notification, WindowObserver};
use frame_wm::{WindowManager, WindowOptions, WmConfig, tracing_sub};

const KEYS: &str = indoc::indoc! {"
    Keys:
      n        open a window
      d        open a modal dialog
      m        maximize / restore the active window
      i        minimize the active window
      c        close the active window
      q, Esc   quit

    Drag title bars to move, borders and corners to resize. Double-click a
    title bar to maximize. Click taskbar entries to switch windows.
"};

#[derive(Parser, Debug)]
#[command(
    name = "frame-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Floating windows in the terminal, driven by the mouse",
    after_help = KEYS
)]
struct Cli {
    /// Windows to open at startup.
    #[arg(short = 'n', long = "windows", value_name = "N", default_value_t = 3)]
    windows: usize,

    /// Keep gestures inside the terminal instead of allowing windows to be
    /// dragged partly off-screen.
    #[arg(long)]
    confine: bool,

    /// Drag an outline and apply it on release instead of moving windows live.
    #[arg(long)]
    preview: bool,

    /// Append logs to this file. Without it logs are discarded.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: tracing::Level,
}

/// Logs every change and marks the screen for repaint.
struct LogObserver {
    dirty: Rc<Cell<bool>>,
}

impl WindowObserver for LogObserver {
    fn notify(&mut self, notification: &Notification) {
        tracing::debug!(window_id = %notification.window(), ?notification, "window changed");
        self.dirty.set(true);
    }
}

type DemoTerminal = Terminal<CrosstermBackend<Stdout>>;

struct Demo {
    wm: WindowManager,
    router: PointerRouter,
    style: FrameStyle,
    preview: bool,
    opened: usize,
    dirty: Rc<Cell<bool>>,
}

impl Demo {
    fn new(config: WmConfig, preview: bool) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let mut wm = WindowManager::new(config);
        wm.add_observer(Box::new(LogObserver {
            dirty: Rc::clone(&dirty),
        }));
        Self {
            wm,
            router: PointerRouter::new(),
            style: FrameStyle::default(),
            preview,
            opened: 0,
            dirty,
        }
    }

    fn options(&self, title: String) -> WindowOptions {
        WindowOptions {
            min_rect: FloatRect::new(-200, -200, 16, 5),
            show_content_while_moving: !self.preview,
            ..WindowOptions::titled(title)
        }
    }

    fn open_window(&mut self) {
        self.opened += 1;
        let step = (self.opened as i32 - 1) % 8;
        let rect = FloatRect::new(2 + step * 4, 1 + step * 2, 36, 10);
        let options = self.options(format!("Window {}", self.opened));
        if let Err(err) = self.wm.open(rect, options) {
            tracing::warn!(%err, "open failed");
        }
    }

    fn open_dialog(&mut self) {
        let options = self.options("Dialog".to_string()).modal_can_close().centered();
        if let Err(err) = self.wm.open(FloatRect::new(0, 0, 30, 7), options) {
            tracing::warn!(%err, "open failed");
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> ControlFlow {
        if key.kind != KeyEventKind::Press {
            return ControlFlow::Continue;
        }
        let active = self.wm.active();
        let result = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return ControlFlow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return ControlFlow::Quit;
            }
            KeyCode::Char('n') => {
                self.open_window();
                Ok(true)
            }
            KeyCode::Char('d') => {
                self.open_dialog();
                Ok(true)
            }
            KeyCode::Char('m') => match active {
                Some(id) => self.wm.toggle_maximize(id),
                None => Ok(false),
            },
            KeyCode::Char('i') => match active {
                Some(id) => self.wm.minimize(id),
                None => Ok(false),
            },
            KeyCode::Char('c') => Ok(active.is_some_and(|id| self.wm.close(id))),
            _ => Ok(false),
        };
        if let Err(err) = result {
            tracing::warn!(%err, "key action failed");
        }
        ControlFlow::Continue
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let viewport = self.wm.viewport();
        let on_taskbar = i32::from(mouse.row) == viewport.height - 1;
        if on_taskbar && mouse.kind == MouseEventKind::Down(MouseButton::Left) {
            let width = u16::try_from(viewport.width).unwrap_or(u16::MAX);
            let entries = self.wm.taskbar_entries();
            if let Some(id) = taskbar_hit(&entries, width, mouse.column)
                && let Err(err) = self.wm.taskbar_click(id)
            {
                tracing::warn!(window_id = %id, %err, "taskbar click failed");
            }
            return;
        }
        self.router.handle_mouse(&mut self.wm, mouse);
    }

    fn handle(&mut self, event: Option<Event>, terminal: &mut DemoTerminal) -> io::Result<ControlFlow> {
        match event {
            None => {
                if self.dirty.replace(false) {
                    terminal.draw(|frame| render(&self.wm, frame.buffer_mut(), &self.style))?;
                }
            }
            Some(Event::Key(key)) => return Ok(self.on_key(key)),
            Some(Event::Mouse(mouse)) => self.on_mouse(mouse),
            Some(Event::Resize(width, height)) => {
                self.wm
                    .set_viewport(Viewport::new(i32::from(width), i32::from(height)));
                self.dirty.set(true);
            }
            Some(_) => {}
        }
        Ok(ControlFlow::Continue)
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init(cli.log_file.as_deref(), cli.log_level)?;

    let (width, height) = crossterm::terminal::size()?;
    let config = WmConfig {
        confine_to_viewport: cli.confine,
        ..WmConfig::terminal(Viewport::new(i32::from(width), i32::from(height)))
    };
    let mut demo = Demo::new(config, cli.preview);
    for _ in 0..cli.windows {
        demo.open_window();
    }
    tracing::info!(windows = cli.windows, confine = cli.confine, preview = cli.preview, "starting");

    let mut driver = ConsoleDriver::new();
    driver.enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.hide_cursor()?;

    let result = EventLoop::new(&mut driver, Duration::from_millis(16))
        .run(|_, event| demo.handle(event, &mut terminal));

    terminal.show_cursor()?;
    driver.exit()?;
    result
}
