// SPDX-License-Identifier: MPL-2.0
//! Interactive host loop.
//!
//! Reads one command per line and, when automatic changes are enabled,
//! applies the next wallpaper every interval. A navigation in progress is
//! polled alongside input and the timer, so a command or tick that arrives
//! meanwhile reaches the engine's busy gate and is reported as busy rather
//! than queued.

use super::library::ListSelection;
use super::persisted_state::AppState;
use crate::application::port::{BackgroundApplier, HttpClient, ImageDecoder};
use crate::config::RotationConfig;
use crate::error::Result;
use crate::navigation::{NavigationEngine, NavigationOutcome};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{self, Instant, MissedTickBehavior};

/// A user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move to the next wallpaper, applying it when `apply` is set.
    Next { apply: bool },
    Previous,
    /// Re-validate the current wallpaper.
    Current,
    /// Apply the current wallpaper.
    Apply,
    Quit,
}

impl Command {
    /// Parses an interactive command line. Unknown input yields `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "n" | "next" => Some(Command::Next { apply: false }),
            "p" | "prev" | "previous" => Some(Command::Previous),
            "c" | "current" => Some(Command::Current),
            "s" | "set" | "apply" => Some(Command::Apply),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub change_automatically: bool,
    pub interval: Duration,
    pub change_at_startup: bool,
}

impl RunOptions {
    #[must_use]
    pub fn from_rotation(rotation: &RotationConfig) -> Self {
        Self {
            change_automatically: rotation.change_automatically,
            interval: rotation.interval(),
            change_at_startup: rotation.change_at_startup,
        }
    }
}

/// A navigation started by the loop, resolving to its command and outcome.
type Pending<'a> = LocalBoxFuture<'a, (Command, Result<NavigationOutcome>)>;

/// Waits for the in-flight navigation; never resolves when there is none.
async fn finish(in_flight: &mut Option<Pending<'_>>) -> (Command, Result<NavigationOutcome>) {
    match in_flight {
        Some(operation) => operation.await,
        None => std::future::pending().await,
    }
}

pub struct Runner<'a, C, D, A> {
    engine: &'a NavigationEngine<C, D, A>,
    list: ListSelection,
    state: AppState,
    /// Where session state is saved; `None` uses the default data directory.
    state_dir: Option<PathBuf>,
}

impl<'a, C, D, A> Runner<'a, C, D, A>
where
    C: HttpClient + 'a,
    D: ImageDecoder,
    A: BackgroundApplier,
{
    pub fn new(
        engine: &'a NavigationEngine<C, D, A>,
        list: ListSelection,
        state: AppState,
        state_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            engine,
            list,
            state,
            state_dir,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Runs one command and writes a one-line report to `out`.
    ///
    /// Failures are reported, not returned; only writing to `out` can fail.
    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        let Some(operation) = self.start(command) else {
            return Ok(());
        };
        let (command, outcome) = operation.await;
        self.report(command, outcome, out)
    }

    /// Starts the engine operation behind `command`. `None` for `Quit`.
    fn start(&self, command: Command) -> Option<Pending<'a>> {
        let engine = self.engine;
        let operation = match command {
            Command::Next { apply } => engine.goto_next(apply, None).boxed_local(),
            Command::Previous => engine.goto_previous(false).boxed_local(),
            Command::Current => engine.goto_current().boxed_local(),
            Command::Apply => engine.set_current_as_background().boxed_local(),
            Command::Quit => return None,
        };
        Some(operation.map(move |outcome| (command, outcome)).boxed_local())
    }

    /// Starts `command` in the background, or runs it right away when a
    /// navigation is already in flight (the engine then reports busy).
    async fn dispatch<W: Write>(
        &mut self,
        command: Command,
        in_flight: &mut Option<Pending<'a>>,
        out: &mut W,
    ) -> Result<()> {
        if in_flight.is_some() {
            return self.execute(command, out).await;
        }
        *in_flight = self.start(command);
        Ok(())
    }

    fn report<W: Write>(
        &mut self,
        command: Command,
        outcome: Result<NavigationOutcome>,
        out: &mut W,
    ) -> Result<()> {
        let applied = matches!(command, Command::Next { apply: true } | Command::Apply);
        match outcome {
            Ok(NavigationOutcome::Selected { index, entry }) => {
                self.state.record_current(self.list, Some(entry.source()));
                if applied {
                    self.state.mark_applied();
                }
                self.save_state();
                writeln!(
                    out,
                    "[{}] {} ({})",
                    index + 1,
                    entry.source(),
                    entry.dimensions().unwrap_or("size unknown")
                )?;
            }
            Ok(NavigationOutcome::Exhausted) => {
                self.state.record_current(self.list, None);
                self.save_state();
                writeln!(out, "no wallpaper available in the {} list", self.list)?;
            }
            Ok(NavigationOutcome::Busy) => writeln!(out, "busy, try again")?,
            Err(err) => {
                tracing::warn!(?command, error = %err, "command failed");
                writeln!(out, "error: {err}")?;
            }
        }
        Ok(())
    }

    /// Reads commands from `input` until `q` or end of input, changing the
    /// wallpaper on the configured interval in between.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `input` or writing `out` fails.
    pub async fn run<R, W>(&mut self, options: RunOptions, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let startup = if options.change_at_startup {
            Command::Next { apply: true }
        } else {
            Command::Current
        };
        self.execute(startup, out).await?;

        let mut ticker = time::interval_at(Instant::now() + options.interval, options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut lines = input.lines();
        let mut in_flight: Option<Pending<'a>> = None;

        loop {
            tokio::select! {
                biased;

                (command, outcome) = finish(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    self.report(command, outcome, out)?;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match Command::parse(&line) {
                        Some(Command::Quit) => break,
                        Some(command) => self.dispatch(command, &mut in_flight, out).await?,
                        None => writeln!(out, "commands: n(ext) p(revious) c(urrent) s(et) q(uit)")?,
                    }
                }
                _ = ticker.tick(), if options.change_automatically => {
                    tracing::debug!("interval elapsed, changing wallpaper");
                    self.dispatch(Command::Next { apply: true }, &mut in_flight, out).await?;
                }
            }
        }

        if let Some(operation) = in_flight {
            let (command, outcome) = operation.await;
            self.report(command, outcome, out)?;
        }
        Ok(())
    }

    fn save_state(&self) {
        if let Some(warning) = self.state.save_to(self.state_dir.clone()) {
            tracing::warn!("{warning}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::AssetCache;
    use crate::catalog::{Catalog, CatalogMode};
    use crate::compositor::CanvasSpec;
    use crate::navigation::NavigationSettings;
    use crate::test_utils::{touch_image, FakeDecoder, FakeHttp, RecordingApplier};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};
    use tokio::io::AsyncWriteExt;

    type Engine = NavigationEngine<FakeHttp, FakeDecoder, RecordingApplier>;

    fn setup(names: &[&str]) -> (TempDir, Vec<String>, Engine, Arc<RecordingApplier>) {
        let dir = tempdir().expect("temp dir");
        let mut catalog = Catalog::new(CatalogMode::Sorted);
        let sources: Vec<String> = names.iter().map(|n| touch_image(dir.path(), n)).collect();
        for source in &sources {
            catalog.add_file(source);
        }
        let applier = Arc::new(RecordingApplier::default());
        let cache = AssetCache::new(
            Arc::new(FakeHttp::new()),
            dir.path().join("thumbs"),
            dir.path().join("full"),
        );
        let settings = NavigationSettings {
            change_randomly: false,
            canvas: CanvasSpec::new(32, 24, 0),
            ..NavigationSettings::default()
        };
        let engine = NavigationEngine::new(
            catalog,
            cache,
            Arc::new(FakeDecoder::new(4, 4)),
            Arc::clone(&applier),
            settings,
        );
        (dir, sources, engine, applier)
    }

    fn options(change_at_startup: bool) -> RunOptions {
        RunOptions {
            change_automatically: false,
            interval: Duration::from_secs(3600),
            change_at_startup,
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("n"), Some(Command::Next { apply: false }));
        assert_eq!(Command::parse(" Previous "), Some(Command::Previous));
        assert_eq!(Command::parse("s"), Some(Command::Apply));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("x"), None);
    }

    /// Input that delivers one line at a time, leaving each navigation room
    /// to finish before the next command arrives.
    fn paced(script: &'static [&'static str]) -> tokio::io::BufReader<tokio::io::DuplexStream> {
        let (mut writer, reader) = tokio::io::duplex(256);
        tokio::spawn(async move {
            for line in script {
                time::sleep(Duration::from_millis(60)).await;
                writer.write_all(line.as_bytes()).await.expect("write line");
            }
        });
        tokio::io::BufReader::new(reader)
    }

    #[tokio::test]
    async fn scripted_session_navigates_and_records_state() {
        let (dir, sources, engine, applier) = setup(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut runner = Runner::new(&engine, ListSelection::Local, AppState::default(), Some(dir.path().to_path_buf()));
        let mut out = Vec::new();

        let input = paced(&["n\n", "n\n", "p\n", "s\n", "q\n", "n\n"]);
        runner.run(options(true), input, &mut out).await.expect("run");

        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5, "{text}");
        assert!(lines[0].starts_with("[1] "));
        assert!(lines[2].starts_with("[3] "));
        assert!(lines[3].starts_with("[2] "));
        // Startup change and the explicit apply.
        assert_eq!(applier.applied().len(), 2);
        assert_eq!(runner.state().current_for(ListSelection::Local), Some(sources[1].as_str()));
        assert!(runner.state().last_applied_at.is_some());

        let (saved, _) = AppState::load_from(Some(dir.path().to_path_buf()));
        assert_eq!(saved, *runner.state());
    }

    #[tokio::test]
    async fn command_during_navigation_is_rejected_as_busy() {
        let (dir, sources, engine, _applier) = setup(&["a.jpg", "b.jpg"]);
        let mut runner = Runner::new(&engine, ListSelection::Local, AppState::default(), Some(dir.path().to_path_buf()));
        let mut out = Vec::new();

        // Both lines are readable at once: the second arrives while the first
        // navigation still holds the engine.
        runner.run(options(false), &b"n\nn\n"[..], &mut out).await.expect("run");

        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3, "{text}");
        assert!(lines[0].starts_with("no wallpaper available"));
        assert_eq!(lines[1], "busy, try again");
        assert!(lines[2].starts_with("[1] "));
        assert_eq!(engine.current().await.map(|e| e.source().to_string()), Some(sources[0].clone()));
    }

    #[tokio::test]
    async fn unknown_commands_print_help() {
        let (dir, _sources, engine, _applier) = setup(&["a.jpg"]);
        let mut runner = Runner::new(&engine, ListSelection::Local, AppState::default(), Some(dir.path().to_path_buf()));
        let mut out = Vec::new();

        runner.run(options(false), &b"what\n"[..], &mut out).await.expect("run");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("no wallpaper available"));
        assert!(text.contains("commands:"));
    }

    #[tokio::test]
    async fn interval_applies_next_wallpaper() {
        let (dir, _sources, engine, applier) = setup(&["a.jpg", "b.jpg"]);
        let mut runner = Runner::new(&engine, ListSelection::Local, AppState::default(), Some(dir.path().to_path_buf()));
        let mut out = Vec::new();
        let opts = RunOptions {
            change_automatically: true,
            interval: Duration::from_millis(40),
            change_at_startup: false,
        };

        // The input never ends, so only the timer drives changes until the
        // timeout drops the loop.
        let (_writer, reader) = tokio::io::duplex(64);
        let run = runner.run(opts, tokio::io::BufReader::new(reader), &mut out);
        let _ = time::timeout(Duration::from_millis(400), run).await;

        assert!(applier.applied().len() >= 2);
    }
}
