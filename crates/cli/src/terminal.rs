use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

use algoviz_core::Frame;

use crate::cli::OutputFormat;
use crate::render::RenderText;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const HEADER: Color = Color::Magenta;
    const LABEL: Color = Color::Yellow;
    const STATE: Color = Color::Cyan;
    const DONE: Color = Color::Green;
    const CANCELLED: Color = Color::DarkYellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
}

/// Writes frames and status lines to stdout.
///
/// In raw mode the terminal does no newline translation, so every line ends
/// with `\r\n` when interactive.
#[derive(Debug, Clone, Copy)]
pub struct Terminal {
    format: OutputFormat,
    interactive: bool,
}

impl Terminal {
    pub fn new(format: OutputFormat, interactive: bool) -> Self {
        Self {
            format,
            interactive,
        }
    }

    fn eol(&self) -> &'static str {
        if self.interactive {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Print the startup banner. Suppressed for JSON output.
    pub fn print_banner(&self, algorithm: &str, values: &[i64], speed_ms: u64) -> Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        let eol = self.eol();
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("algoviz"),
            ResetColor,
            Print(format!(" - {}{}", algorithm, eol)),
            SetForegroundColor(Colors::DIM),
            Print(format!("input: {:?} | speed: {} ms{}", values, speed_ms, eol)),
        )?;
        if self.interactive {
            execute!(
                stdout,
                Print(format!(
                    "space: pause/resume | r: reset | +/-: speed | q: quit{}",
                    eol
                )),
            )?;
        }
        execute!(stdout, Print(format!("---{}", eol)), ResetColor)?;
        stdout.flush()?;
        Ok(())
    }

    /// Print one published frame.
    pub fn print_frame<S>(&self, frame: &Frame<S>) -> Result<()>
    where
        S: RenderText + Serialize,
    {
        let eol = self.eol();
        let mut stdout = io::stdout();
        match self.format {
            OutputFormat::Json => {
                let line = serde_json::to_string(frame)?;
                execute!(stdout, Print(line), Print(eol))?;
            }
            OutputFormat::Text => {
                execute!(
                    stdout,
                    SetForegroundColor(Colors::DIM),
                    Print(format!("{:>4} ", frame.seq)),
                    SetForegroundColor(Colors::LABEL),
                    Print(&frame.label),
                    Print(eol),
                    SetForegroundColor(Colors::STATE),
                    Print(format!("     {}", frame.state.render())),
                    ResetColor,
                    Print(eol),
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    /// Print a frame from inside an observer, where errors cannot propagate.
    pub fn show<S>(&self, frame: &Frame<S>)
    where
        S: RenderText + Serialize,
    {
        if let Err(e) = self.print_frame(frame) {
            debug!(seq = frame.seq, error = %e, "failed to print frame");
        }
    }

    /// Print the final line of a completed run.
    pub fn print_done(&self, summary: &str, frames: usize) -> Result<()> {
        self.print_status(Colors::DONE, &format!("done: {} ({} frames)", summary, frames))
    }

    pub fn print_cancelled(&self, frames: usize) -> Result<()> {
        self.print_status(
            Colors::CANCELLED,
            &format!("cancelled after {} frames", frames),
        )
    }

    /// Print a transport notice such as `paused` or `speed 450 ms`.
    pub fn print_notice(&self, message: &str) -> Result<()> {
        self.print_status(Colors::DIM, message)
    }

    pub fn print_error(&self, message: &str) -> Result<()> {
        self.print_status(Colors::ERROR, &format!("error: {}", message))
    }

    fn print_status(&self, color: Color, message: &str) -> Result<()> {
        // Frames already carry the outcome for machine consumers.
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(color),
            Print(message),
            ResetColor,
            Print(self.eol()),
        )?;
        stdout.flush()?;
        Ok(())
    }
}

/// Keeps the terminal in raw mode for as long as it lives.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            debug!(error = %e, "failed to leave raw mode");
        }
    }
}
