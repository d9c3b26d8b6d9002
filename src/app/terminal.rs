use std::{
    io::{self, Stdout},
    sync::Once,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};

static RESTORE_ON_PANIC: Once = Once::new();

type Backend = CrosstermBackend<Stdout>;

/// Owns the alternate screen for the lifetime of an interactive session.
///
/// Raw mode and the cursor are restored when the screen is dropped, and also
/// from the panic hook so a crash never leaves the shell unusable.
pub(crate) struct FormScreen {
    terminal: Terminal<Backend>,
}

impl FormScreen {
    pub fn enter(title: &str) -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide, SetTitle(title))
            .context("failed to prepare the alternate screen")?;
        let terminal =
            Terminal::new(CrosstermBackend::new(stdout)).context("failed to initialize terminal")?;
        RESTORE_ON_PANIC.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                leave();
                previous(info);
            }));
        });
        Ok(Self { terminal })
    }

    pub fn render(&mut self, paint: impl FnOnce(&mut Frame<'_>)) -> Result<()> {
        self.terminal
            .draw(paint)
            .context("failed to draw the form")?;
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.terminal
            .resize(Rect::new(0, 0, width, height))
            .context("failed to resize the terminal")
    }
}

impl Drop for FormScreen {
    fn drop(&mut self) {
        leave();
    }
}

fn leave() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}
