//! Crossterm terminal driver: raw-mode setup, input decoding and drawing.
//!
//! Each board cell is drawn two columns wide so the grid looks square. The
//! status line sits one row below the board.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
    terminal::{self, ClearType},
};
use rand::Rng;

use pathviz_core::Pos;
use pathviz_mapgen::BoardConfig;

use crate::app::{App, Command, Flow, Glyph};

/// Terminal columns per board cell.
const CELL_WIDTH: u16 = 2;

/// How long to wait for input when no search step is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Maps a key to a [`Command`].
pub fn command_for_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            's' => Some(Command::PlaceStart),
            'e' => Some(Command::PlaceEnd),
            'r' => Some(Command::Reset),
            'g' => Some(Command::Scatter),
            ' ' => Some(Command::Run),
            'c' => Some(Command::Cancel),
            'q' => Some(Command::Quit),
            _ => None,
        },
        KeyCode::Esc => Some(Command::Cancel),
        KeyCode::Up => Some(Command::Faster),
        KeyCode::Down => Some(Command::Slower),
        _ => None,
    }
}

/// Maps a terminal cell (column, row) to the board position under it.
pub fn board_pos(column: u16, row: u16) -> Pos {
    Pos::new(row as i32, (column / CELL_WIDTH) as i32)
}

/// Maps a crossterm event to a [`Command`].
pub fn command_for_event(ev: &Event) -> Option<Command> {
    match ev {
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) => command_for_key(*code),
        Event::Mouse(me) => {
            let pos = board_pos(me.column, me.row);
            match me.kind {
                MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                    Some(Command::Paint(pos))
                }
                MouseEventKind::Down(MouseButton::Right)
                | MouseEventKind::Drag(MouseButton::Right) => Some(Command::Erase(pos)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn glyph_color(g: Glyph) -> Color {
    match g {
        Glyph::Empty => Color::Reset,
        Glyph::Obstacle => Color::DarkGrey,
        Glyph::Start => Color::Green,
        Glyph::End => Color::Red,
        Glyph::Visited => Color::DarkCyan,
        Glyph::Path => Color::Yellow,
    }
}

/// Raw-mode terminal session. Restores the terminal when dropped.
pub struct Terminal {
    out: io::Stdout,
}

impl Terminal {
    /// Enter raw mode and the alternate screen, with mouse capture.
    pub fn init() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture,
            terminal::Clear(ClearType::All)
        )?;
        Ok(Self { out })
    }

    /// Draw the whole board and the status line.
    pub fn draw<R: Rng>(&mut self, app: &App<R>) -> io::Result<()> {
        let grid = app.grid();
        for row in 0..grid.rows() {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            for col in 0..grid.cols() {
                let color = glyph_color(app.glyph(Pos::new(row, col)));
                queue!(self.out, SetBackgroundColor(color), Print("  "))?;
            }
            queue!(self.out, ResetColor)?;
        }
        let status = format!(
            "{}  [{} ms]",
            app.status(),
            app.engine().pacing().millis()
        );
        queue!(
            self.out,
            cursor::MoveTo(0, grid.rows() as u16 + 1),
            terminal::Clear(ClearType::CurrentLine),
            Print(status)
        )?;
        self.out.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the visualizer until the user quits.
pub fn run(config: BoardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config);
    let mut term = Terminal::init()?;
    term.draw(&app)?;

    loop {
        let timeout = app
            .engine()
            .next_due()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);

        let mut dirty = false;
        if event::poll(timeout)? {
            let ev = event::read()?;
            if matches!(ev, Event::Resize(..)) {
                execute!(term.out, terminal::Clear(ClearType::All))?;
                dirty = true;
            }
            if let Some(cmd) = command_for_event(&ev) {
                if app.apply(cmd) == Flow::Quit {
                    break;
                }
                dirty = true;
            }
        }
        dirty |= app.tick(Instant::now());

        if dirty {
            term.draw(&app)?;
        }
    }
    Ok(())
}
