use crate::config::Config;
use crate::error::{Result, RowEditError, UiError};
use crate::frontend::Session;
use crate::table::Record;
use crate::ui::{HitMap, TableRenderer, Theme};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

pub struct TuiApplication {
    session: Session,
    renderer: TableRenderer,
    hit_map: HitMap,
}

impl TuiApplication {
    pub fn new(config: &Config, seeds: &[Record]) -> Result<Self> {
        let mut session = Session::new(config.table_options(), config.double_click_interval());
        session.initialize(seeds)?;
        let renderer = TableRenderer::new(Theme::new(config.theme));
        Ok(Self {
            session,
            renderer,
            hit_map: HitMap::new(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn run(&mut self) -> Result<()> {
        enter_terminal()?;

        let backend = CrosstermBackend::new(stdout());
        let mut terminal = or_restore(Terminal::new(backend), restore_terminal).map_err(init_error)?;
        or_restore(terminal.hide_cursor(), restore_terminal)
            .map_err(|err| terminal_error("hide cursor", err))?;

        let loop_result = self.event_loop(&mut terminal);
        let show_cursor_result = terminal.show_cursor().map_err(|err| terminal_error("show cursor", err));
        drop(terminal);
        let cleanup_result = leave_terminal();

        loop_result.and(show_cursor_result).and(cleanup_result)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.session.is_running() {
            self.render(terminal)?;

            if event::poll(Duration::from_millis(16)).map_err(|err| terminal_error("event poll", err))? {
                match event::read().map_err(|err| terminal_error("event read", err))? {
                    Event::Key(key_event) => self.session.handle_key_event(key_event),
                    Event::Mouse(mouse_event) => self.session.handle_mouse_event(mouse_event, &self.hit_map),
                    // サイズ変更は次の描画で反映される
                    _ => {}
                }
            }
        }

        log::info!("exiting with {} rows", self.session.table().len());
        Ok(())
    }

    fn render<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let view = self.session.view(Instant::now());
        self.hit_map = self
            .renderer
            .draw(terminal, &view)
            .map_err(|err| terminal_error("render", err))?;
        Ok(())
    }
}

fn enter_terminal() -> Result<()> {
    enable_raw_mode().map_err(init_error)?;
    let mut out = stdout();
    or_restore(execute!(out, EnterAlternateScreen, EnableMouseCapture), restore_terminal).map_err(init_error)?;
    Ok(())
}

fn leave_terminal() -> Result<()> {
    let mut out = stdout();
    execute!(out, DisableMouseCapture, LeaveAlternateScreen)
        .map_err(|err| terminal_error("leave alternate screen", err))?;
    disable_raw_mode().map_err(|err| terminal_error("disable raw mode", err))?;
    Ok(())
}

/// 端末準備の途中で失敗したら端末を元に戻す
fn or_restore<T>(result: io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

fn restore_terminal() {
    let _ = leave_terminal();
}

fn init_error(err: std::io::Error) -> RowEditError {
    RowEditError::Ui(UiError::TerminalInit {
        reason: err.to_string(),
    })
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> RowEditError {
    RowEditError::Ui(UiError::RenderingFailed {
        component: format!("{}: {}", context, err),
    })
}
