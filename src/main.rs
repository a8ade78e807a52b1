//! `themeapp` developer tool.
//!
//! Runs the theme layer against a headless host:
//!
//! - `themeapp replay <file>` feeds a JSON-lines log of raw application core
//!   events (`{"event": "error:sync", "data": {...}}`) through the event bus and
//!   prints every general-channel delivery as
//!   `{"channel": ..., "envelope": {...}}`.
//! - `themeapp direction <current> <previous>` prints the transition
//!   direction between two screen types.

#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use themeapp::events::ReservedEvent;
use themeapp::host::{
    AppCore, Completion, MoreItems, MoreItemsCompletion, RegionCallback, RegionManager, Router,
    SyncCompletion,
};
use themeapp::navigation::resolve_direction;
use themeapp::{Config, Host, ScreenDescriptor, ScreenType, ThemeApp, ThemeError};

#[derive(Parser)]
#[command(name = "themeapp")]
#[command(version)]
#[command(about = "Inspect theme layer event routing and screen transitions")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines log of raw core events through the event bus
    Replay {
        /// Log file, one `{"event": ..., "data": ...}` object per line
        file: PathBuf,

        /// Also report events that the relay drops
        #[arg(long)]
        show_dropped: bool,
    },
    /// Print the transition direction between two screen types
    Direction {
        current: String,
        previous: String,
    },
}

#[derive(Debug, Deserialize)]
struct LoggedEvent {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Host that has no screens, no content and no renderer.
struct HeadlessHost;

impl AppCore for HeadlessHost {
    fn sync(&self, completion: SyncCompletion) {
        completion(Err(json!({"type": "headless"})));
    }
    fn reset_default_route(&self) {}
    fn set_param(&self, name: &str, value: Value) {
        tracing::debug!(param = %name, value = %value, "headless host ignoring parameter");
    }
    fn current_screen(&self) -> Option<ScreenDescriptor> {
        None
    }
    fn previous_screen(&self) -> Option<ScreenDescriptor> {
        None
    }
    fn previous_screen_link(&self) -> String {
        String::new()
    }
    fn component_data(&self, _component_id: &str) -> Option<Value> {
        None
    }
    fn fetch_more_of_component(&self, _component_id: &str, completion: MoreItemsCompletion) {
        completion(MoreItems {
            is_last: true,
            ..MoreItems::default()
        });
    }
    fn show_custom_page(&self, _template: &str, _data: Value) {}
}

impl Router for HeadlessHost {
    fn navigate(&self, _fragment: &str, _trigger: bool) {}
    fn default_route(&self) {}
    fn restart_history(&self) {}
}

impl RegionManager for HeadlessHost {
    fn on(&self, _event: ReservedEvent, _callback: RegionCallback) {}
    fn build_menu(&self, completion: Completion, _silent: bool) {
        completion();
    }
    fn append_to_current_view(&self, _items: &[Value]) {}
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("themeapp: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> themeapp::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    themeapp::observability::init_tracing(&config);

    match cli.command {
        Commands::Replay { file, show_dropped } => {
            let out: Output = Rc::new(RefCell::new(io::stdout()));
            replay(&config, &file, show_dropped, &out)
        }
        Commands::Direction { current, previous } => {
            let direction =
                resolve_direction(&ScreenType::from(current), &ScreenType::from(previous));
            println!("{direction}");
            Ok(())
        }
    }
}

/// Sink for replay output.
type Output = Rc<RefCell<dyn Write>>;

/// Feeds every line of `path` through the event bus of a headless theme app
/// and writes each delivery to `out`.
///
/// # Errors
///
/// - [`ThemeError::Io`] when the log cannot be read or `out` rejects a write
/// - [`ThemeError::JsonLine`] for a line that is not a logged event
fn replay(config: &Config, path: &Path, show_dropped: bool, out: &Output) -> themeapp::Result<()> {
    let _span = tracing::debug_span!("replay", file = %path.display()).entered();

    let host = Rc::new(HeadlessHost);
    let theme = themeapp::initialize(
        Host {
            core: Rc::clone(&host) as Rc<dyn AppCore>,
            router: Rc::clone(&host) as Rc<dyn Router>,
            regions: host as Rc<dyn RegionManager>,
        },
        config,
    );

    let printer = Printer::new(Rc::clone(out));
    let mut subscribed = HashSet::new();
    for channel in ["error", "info"] {
        printer.subscribe(&theme, channel);
        subscribed.insert(channel.to_string());
    }

    let reader = BufReader::new(File::open(path)?);
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let logged = parse_line(index + 1, &line)?;

        if subscribed.insert(logged.event.clone()) {
            printer.subscribe(&theme, &logged.event);
        }

        if theme.relay(&logged.event, logged.data).is_none() && show_dropped {
            printer.print(&json!({ "channel": Value::Null, "dropped": logged.event }));
        }
        printer.check()?;
    }

    out.borrow_mut().flush()?;
    Ok(())
}

fn parse_line(line: usize, text: &str) -> themeapp::Result<LoggedEvent> {
    serde_json::from_str(text).map_err(|source| ThemeError::JsonLine { line, source })
}

/// Writes JSON lines for bus listeners.
///
/// Listeners cannot return errors, so the first failed write is kept until
/// [`Printer::check`] hands it back; later prints are skipped.
#[derive(Clone)]
struct Printer {
    out: Output,
    failure: Rc<RefCell<Option<io::Error>>>,
}

impl Printer {
    fn new(out: Output) -> Self {
        Self {
            out,
            failure: Rc::default(),
        }
    }

    fn subscribe(&self, theme: &ThemeApp, channel: &str) {
        let printer = self.clone();
        let name = channel.to_string();
        theme.on(channel, move |envelope| {
            printer.print(&json!({ "channel": name, "envelope": envelope }));
        });
    }

    fn print(&self, value: &Value) {
        if self.failure.borrow().is_some() {
            return;
        }
        let result = writeln!(self.out.borrow_mut(), "{value}");
        if let Err(e) = result {
            *self.failure.borrow_mut() = Some(e);
        }
    }

    fn check(&self) -> io::Result<()> {
        self.failure.borrow_mut().take().map_or(Ok(()), Err)
    }
}
