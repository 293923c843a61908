//! Terminal setup and teardown.
//!
//! Drawing goes to stderr. [`TerminalGuard`] owns raw mode and the alternate
//! screen for as long as it lives; dropping it (or panicking) puts the terminal
//! back the way the shell left it.

use std::io::{self, BufWriter, Stderr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;

pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

/// A terminal in raw mode on the alternate screen, plus the SIGTERM flag.
pub struct TerminalGuard {
    terminal: Tui,
    sigterm: Arc<AtomicBool>,
}

impl TerminalGuard {
    /// Installs the panic hook and SIGTERM flag, then switches the terminal over.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        let sigterm = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGTERM, Arc::clone(&sigterm))?;

        let mut out = BufWriter::new(io::stderr());
        enable_raw_mode()?;
        if let Err(e) = execute!(out, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(out))?;
        Ok(Self { terminal, sigterm })
    }

    pub fn terminal_mut(&mut self) -> &mut Tui {
        &mut self.terminal
    }

    /// True once SIGTERM has been received.
    pub fn terminated(&self) -> bool {
        self.sigterm.load(Ordering::Relaxed)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = leave() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

/// Leaves raw mode and the alternate screen. Safe to call more than once.
fn leave() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture)
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = leave();
        previous(info);
    }));
}
