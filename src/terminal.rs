//! Owns the terminal for the lifetime of the monitor: hides the cursor and
//! clears once, then overwrites each frame in place. The cursor is shown
//! again on every way out (drop, panic hook, signal flag in the main loop).

use std::io::{self, Write};
use std::panic;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crossterm::{
    cursor, execute, queue,
    style::ResetColor,
    terminal::{self, Clear, ClearType},
};
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};

pub struct TerminalSink<W: Write> {
    out: W,
    active: bool,
}

impl<W: Write> TerminalSink<W> {
    /// Hide the cursor and clear the screen.
    pub fn start(mut out: W) -> io::Result<Self> {
        queue!(out, cursor::Hide, Clear(ClearType::All))?;
        out.flush()?;
        Ok(Self { out, active: true })
    }

    /// Draw `frame` over the previous one. No clear: every line is full width
    /// and the frame is full height, so nothing from the last frame survives.
    pub fn present(&mut self, frame: &[String]) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(0, 0))?;
        self.out.write_all(frame.join("\n").as_bytes())?;
        self.out.flush()
    }

    /// Show the cursor and reset colors. Idempotent.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        queue!(self.out, ResetColor, cursor::Show)?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalSink<W> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Terminal size, read once at startup.
pub fn size() -> io::Result<(u16, u16)> {
    terminal::size()
}

/// Chain a panic hook that puts the cursor back before the panic message is
/// printed.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, ResetColor, cursor::Show);
        previous(info);
    }));
}

/// Signals that stop the monitor. Each one only raises the shutdown flag.
pub const SHUTDOWN_SIGNALS: [i32; 4] = [SIGINT, SIGTERM, SIGHUP, SIGQUIT];

/// Flag raised on any of [`SHUTDOWN_SIGNALS`]. The main loop polls it between
/// ticks and returns normally so `TerminalSink` is dropped.
pub fn shutdown_flag() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in SHUTDOWN_SIGNALS {
        signal_hook::flag::register(signal, Arc::clone(&flag))?;
    }
    Ok(flag)
}
