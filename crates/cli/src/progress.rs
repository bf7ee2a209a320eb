//! Terminal rendering of the simulated export progress.
//!
//! The bar is redrawn in place on a single line. It is a cyclic indicator:
//! it starts over when it fills up, since the real runtime is only estimated.

use std::io::Write;

use crossterm::cursor;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use guetzli_export_core::progress::{ProgressSink, ProgressState};
use log::warn;

/// Number of cells in the drawn bar
const BAR_WIDTH: usize = 30;

/// Draws the bar for a progress fraction in `[0, 1)`.
#[must_use]
pub fn render_bar(fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);

    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        fraction * 100.0
    )
}

pub struct TerminalProgress<W: Write> {
    out: W,
    label: String,
}

impl<W: Write> TerminalProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            label: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn redraw(&mut self, line: &str) -> std::io::Result<()> {
        queue!(
            self.out,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(line)
        )?;
        self.out.flush()
    }

    fn draw(&mut self, line: &str) {
        if let Err(e) = self.redraw(line) {
            warn!("Could not draw progress: {e}");
        }
    }
}

impl<W: Write> ProgressSink for TerminalProgress<W> {
    fn begin(&mut self, label: &str) {
        self.label = label.to_string();
        let line = format!("{} {}", self.label, render_bar(0.0));
        self.draw(&line);
    }

    fn update(&mut self, state: &ProgressState) {
        let line = format!("{} {}", self.label, render_bar(state.fraction()));
        self.draw(&line);
    }

    fn finish(&mut self) {
        let line = format!("{}\n", self.label);
        self.draw(&line);
    }
}
