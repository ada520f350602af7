mod cli;
mod keys;
mod render;
mod terminal;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

use algoviz_core::config::load_dotenv;
use algoviz_core::{parse_values, Frame, PlaybackConfig};
use algoviz_playback::{
    drive, BubbleSort, NextGreater, PlaybackController, PlaybackError, RunOutcome, RunReport,
    StepMachine, TransportState, TwoSum,
};

use crate::cli::{Algorithm, CliArgs};
use crate::keys::{adjust_speed, map_key, KeyCommand};
use crate::render::{RenderText, Summary};
use crate::terminal::{RawModeGuard, Terminal};

/// How often the key reader checks whether the session has ended.
const KEY_POLL: Duration = Duration::from_millis(100);

type Joined<O> = Result<Result<RunReport<O>, PlaybackError>, JoinError>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    let mut config = PlaybackConfig::from_env();
    if let Some(resolution) = args.resolution {
        config.resolution_ms = resolution;
    }
    config
        .validate()
        .context("invalid playback configuration")?;
    config.log_summary();

    let values = parse_values(&args.input).context("failed to parse --input")?;
    let success_hold = config.success_hold;
    let controller = PlaybackController::new(config);
    if let Some(speed) = args.speed {
        controller.set_speed(speed);
    }

    let terminal = Terminal::new(args.format, args.interactive);
    let session = Session {
        controller,
        terminal,
        interactive: args.interactive,
    };

    match args.algorithm {
        Algorithm::Bubble => {
            terminal.print_banner("bubble sort", &values, session.controller.speed_ms())?;
            session.play(|| BubbleSort::new(&values)).await
        }
        Algorithm::Nge => {
            terminal.print_banner("next greater element", &values, session.controller.speed_ms())?;
            session.play(|| NextGreater::new(&values)).await
        }
        Algorithm::TwoSum => {
            let target = args.target.context("two-sum requires --target")?;
            terminal.print_banner(
                &format!("two sum (target {})", target),
                &values,
                session.controller.speed_ms(),
            )?;
            session
                .play(|| TwoSum::new(&values, target).with_success_hold(success_hold))
                .await
        }
    }
}

/// One CLI invocation: a controller plus where its frames go.
struct Session {
    controller: PlaybackController,
    terminal: Terminal,
    interactive: bool,
}

impl Session {
    /// Play runs built by `make` until completion, or until the user quits
    /// when interactive.
    async fn play<M, F>(&self, make: F) -> Result<()>
    where
        F: Fn() -> M,
        M: StepMachine + Send + 'static,
        M::State: RenderText + Serialize + Send + 'static,
        M::Output: Summary + Send + 'static,
    {
        if !self.interactive {
            let joined = self.spawn_run(make()).await;
            return self.report(joined);
        }

        let _raw = RawModeGuard::enable().context("failed to enter raw mode")?;
        let (tx, mut keys) = mpsc::unbounded_channel();
        let reader = tokio::task::spawn_blocking(move || read_keys(tx));

        let mut run = Some(self.spawn_run(make()));
        loop {
            tokio::select! {
                Some(joined) = wait_for(&mut run) => {
                    run = None;
                    self.report(joined)?;
                    self.terminal.print_notice("space: replay | q: quit")?;
                }
                command = keys.recv() => {
                    let Some(command) = command else { break };
                    debug!(?command, "key command");
                    match command {
                        KeyCommand::TogglePause => match self.controller.transport() {
                            TransportState::Running => {
                                self.controller.pause();
                                self.terminal.print_notice("paused")?;
                            }
                            TransportState::Paused => {
                                self.controller.play();
                                self.terminal.print_notice("resumed")?;
                            }
                            // A reset run may still be draining its last tick.
                            TransportState::Idle if run.is_none() => {
                                run = Some(self.spawn_run(make()));
                            }
                            TransportState::Idle => {}
                        },
                        KeyCommand::Reset => {
                            self.controller.reset();
                            self.terminal.print_notice("reset")?;
                        }
                        KeyCommand::Faster | KeyCommand::Slower => {
                            let speed = adjust_speed(self.controller.speed_ms(), command);
                            self.controller.set_speed(speed);
                            self.terminal
                                .print_notice(&format!("speed {} ms", self.controller.speed_ms()))?;
                        }
                        KeyCommand::Quit => break,
                    }
                }
            }
        }

        self.controller.reset();
        if let Some(handle) = run.take() {
            self.report(handle.await)?;
        }
        drop(keys);
        reader.await.context("key reader task failed")??;

        let metrics = self.controller.metrics();
        info!(
            runs_started = metrics.runs_started,
            runs_completed = metrics.runs_completed,
            runs_cancelled = metrics.runs_cancelled,
            paused_ms = metrics.total_paused.as_millis() as u64,
            "session finished"
        );
        Ok(())
    }

    /// Start a fresh run of `machine` on its own task.
    fn spawn_run<M>(
        &self,
        mut machine: M,
    ) -> JoinHandle<Result<RunReport<M::Output>, PlaybackError>>
    where
        M: StepMachine + Send + 'static,
        M::State: RenderText + Serialize + Send + 'static,
        M::Output: Send + 'static,
    {
        self.controller.play();
        let scope = self.controller.scope();
        let terminal = self.terminal;
        tokio::spawn(async move {
            let mut observer = |frame: Frame<M::State>| terminal.show(&frame);
            drive(&mut machine, &scope, &mut observer).await
        })
    }

    /// Print how a run ended. A failed run is shown and returned as an error.
    fn report<O: Summary>(&self, joined: Joined<O>) -> Result<()> {
        let report = match joined {
            Ok(Ok(report)) => report,
            Ok(Err(err)) => {
                self.terminal.print_error(&err.to_string())?;
                return Err(err).context("run aborted");
            }
            Err(err) => {
                self.terminal.print_error("run task panicked")?;
                return Err(err).context("run task panicked");
            }
        };
        match &report.outcome {
            RunOutcome::Done(output) => self
                .terminal
                .print_done(&output.summary(), report.frames_published),
            RunOutcome::Cancelled => self.terminal.print_cancelled(report.frames_published),
        }
    }
}

/// Resolves with the run's result, or never when no run is active.
async fn wait_for<T>(run: &mut Option<JoinHandle<T>>) -> Option<Result<T, JoinError>> {
    match run {
        Some(handle) => Some(handle.await),
        None => std::future::pending().await,
    }
}

/// Forward key commands until quit or until the receiver goes away.
fn read_keys(tx: UnboundedSender<KeyCommand>) -> Result<()> {
    while !tx.is_closed() {
        if !event::poll(KEY_POLL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            let Some(command) = map_key(key) else { continue };
            if tx.send(command).is_err() || command == KeyCommand::Quit {
                break;
            }
        }
    }
    Ok(())
}
