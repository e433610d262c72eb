//! Terminal-backed display surface.
//!
//! Measures the terminal with crossterm, turns `SIGWINCH` into resize
//! events, and provides a full-screen [`Pager`] that can be scrolled.

use crate::viewport::{Dimensions, DisplaySurface, ResizeBus, ScrollSurface};
use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The process's controlling terminal.
pub struct TerminalSurface;

impl TerminalSurface {
    /// Returns a surface when stdout is an interactive terminal.
    pub fn detect() -> Option<Arc<dyn DisplaySurface>> {
        if io::stdout().is_terminal() {
            Some(Arc::new(TerminalSurface))
        } else {
            debug!("stdout is not a terminal");
            None
        }
    }
}

impl DisplaySurface for TerminalSurface {
    fn measure(&self) -> Option<Dimensions> {
        match terminal::size() {
            Ok((width, height)) => Some(Dimensions::new(width, height)),
            Err(e) => {
                debug!("Could not read terminal size: {}", e);
                None
            }
        }
    }
}

/// Forward terminal resize signals to `bus` until the task is aborted.
#[cfg(unix)]
pub fn spawn_resize_feed(bus: Arc<ResizeBus>) -> Option<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut resizes = match signal(SignalKind::window_change()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Cannot listen for terminal resizes: {}", e);
            return None;
        }
    };

    Some(tokio::spawn(async move {
        while resizes.recv().await.is_some() {
            debug!("Terminal resized");
            bus.emit();
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_resize_feed(_bus: Arc<ResizeBus>) -> Option<JoinHandle<()>> {
    debug!("Terminal resize events are not supported on this platform");
    None
}

/// Switches to the alternate screen until dropped.
pub struct AlternateScreen;

impl AlternateScreen {
    pub fn enter() -> Result<Self> {
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)
            .context("Failed to enter the alternate screen")?;
        Ok(Self)
    }
}

impl Drop for AlternateScreen {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen) {
            warn!("Failed to restore the terminal: {}", e);
        }
    }
}

/// A window of `height` lines over a longer text.
pub struct Pager<W: Write> {
    out: W,
    lines: Vec<String>,
    height: usize,
    offset: usize,
}

impl<W: Write> Pager<W> {
    pub fn new(out: W, lines: Vec<String>, height: usize) -> Self {
        Self {
            out,
            lines,
            height: height.max(1),
            offset: 0,
        }
    }

    /// Replace the content and window height, keeping the offset in range.
    pub fn relayout(&mut self, lines: Vec<String>, height: usize) -> io::Result<()> {
        self.lines = lines;
        self.height = height.max(1);
        self.offset = self.offset.min(self.max_scroll_offset());
        self.draw()
    }

    /// Lines currently inside the window.
    #[cfg(test)]
    pub fn visible(&self) -> &[String] {
        let end = (self.offset + self.height).min(self.lines.len());
        &self.lines[self.offset.min(end)..end]
    }

    pub fn draw(&mut self) -> io::Result<()> {
        let end = (self.offset + self.height).min(self.lines.len());
        let start = self.offset.min(end);

        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::All)
        )?;
        for (row, line) in self.lines[start..end].iter().enumerate() {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(self.out, cursor::MoveTo(0, row), style::Print(line))?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ScrollSurface for Pager<W> {
    fn scroll_offset(&self) -> usize {
        self.offset
    }

    fn max_scroll_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    fn set_scroll_offset(&mut self, offset: usize) -> io::Result<()> {
        self.offset = offset.min(self.max_scroll_offset());
        self.draw()
    }
}
