//! Console runner — terminal lifecycle and the event loop.
//!
//! Owns the ratatui terminal, the core [`Console`], and the outcome
//! channel from the remote worker. Each tick: drain completed remote
//! calls into the output log, draw a frame, and poll for one keyboard
//! event. Submitting a line hands it to the dispatcher and returns
//! immediately; remote results appear on later ticks.

use std::io;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;

use pagemark_core::console::builtins;
use pagemark_core::console::Console;
use pagemark_core::remote::worker::CallOutcome;

use crate::input::InputLine;
use crate::render::{self, FrameState};
use crate::theme::Theme;

/// Lines jumped per PageUp/PageDown.
const SCROLL_PAGE: usize = 10;


/// The running console UI.
pub struct ConsoleApp {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    console: Console,
    outcomes: mpsc::Receiver<CallOutcome>,
    input: InputLine,
    theme: Theme,
    tick_rate: Duration,
}


impl ConsoleApp {
    /// Enter raw mode and the alternate screen, ready to run.
    pub fn new(
        console: Console,
        outcomes: mpsc::Receiver<CallOutcome>,
        theme: Theme,
    ) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(ConsoleApp {
            terminal,
            console,
            outcomes,
            input: InputLine::new(),
            theme,
            tick_rate: Duration::from_millis(100),
        })
    }

    /// Run until the user quits (Esc or Ctrl-C), then restore the
    /// terminal.
    pub fn run(&mut self) -> Result<(), io::Error> {
        loop {
            self.drain_outcomes();

            let state = FrameState {
                log: &self.console.session().output,
                input: &self.input,
                theme: &self.theme,
                page_url: &self.console.session().page_url,
                identity: self.console.session().installation_id.as_deref(),
            };
            self.terminal.draw(|frame| render::draw(frame, &state))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        self.restore()
    }

    /// Handle one key press. Returns true when the console should close.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return true,
                KeyCode::Char('u') => self.input.kill_line(),
                KeyCode::Char('w') => self.input.kill_word(),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Enter => {
                let line = self.input.submit();
                self.console.process_input(&line);
            }
            KeyCode::Char(ch) => self.input.insert(ch),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Up => self.input.history_prev(),
            KeyCode::Down => self.input.history_next(),
            KeyCode::PageUp => self.console.session_mut().output.scroll_up(SCROLL_PAGE),
            KeyCode::PageDown => self.console.session_mut().output.scroll_down(SCROLL_PAGE),
            _ => {}
        }
        false
    }

    /// Append every completed remote call to the output log.
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            let session = self.console.session_mut();
            let palette = session.palette;
            builtins::render_outcome(&mut session.output, &palette, outcome);
        }
    }

    /// Leave the alternate screen and raw mode.
    fn restore(&mut self) -> Result<(), io::Error> {
        terminal::disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
