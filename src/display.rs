use crate::snapshot::Snapshot;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use std::io;
use tui::backend::{Backend, CrosstermBackend};
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::Paragraph;
use tui::{Frame, Terminal};

/// Display is used by the driver to show machine state. It should abstract
/// the implementation details, so a variety of kinds of screen would work.
pub trait Display {
    /// draw a whole frame from a snapshot and flush it
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), io::Error>;

    /// put a one-word marker on screen while waiting for a key
    fn prompt(&mut self, prompt: Prompt) -> Result<(), io::Error>;

    /// wipe the screen
    fn clear(&mut self) -> Result<(), io::Error>;
}

/// why the driver is waiting for a keypress
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prompt {
    Input,
    Break,
    Step,
    Done,
}

impl Prompt {
    pub fn label(self) -> &'static str {
        match self {
            Prompt::Input => "input",
            Prompt::Break => "break",
            Prompt::Step => "step",
            Prompt::Done => "done",
        }
    }
}

// fixed screen rows
const STATUS_ROW: u16 = 0;
const PROMPT_ROW: u16 = 1;
const OUTPUT_RULE_ROW: u16 = 2;
const OUTPUT_ROW: u16 = 3;
const OUTPUT_ROWS: usize = 4;
const DUMP_RULE_ROW: u16 = 7;
const DUMP_ROW: u16 = 8;

/// output as it should appear on screen: the last few lines, with control
/// bytes that would upset the terminal shown as '.'
fn output_tail(output: &str) -> Vec<String> {
    let lines: Vec<String> = output
        .split('\n')
        .map(|l| l.chars().map(|c| if c.is_control() { '.' } else { c }).collect())
        .collect();
    let skip = lines.len().saturating_sub(OUTPUT_ROWS);
    lines.into_iter().skip(skip).collect()
}

/// paragraph at a fixed row, clipped to the screen
fn put_lines<B: Backend>(f: &mut Frame<B>, row: u16, lines: Vec<Spans>) {
    let area = f.size();
    if row >= area.height || lines.is_empty() {
        return;
    }
    let height = (lines.len() as u16).min(area.height - row);
    let rect = Rect::new(area.x, area.y + row, area.width, height);
    f.render_widget(Paragraph::new(lines), rect);
}

fn draw_frame<B: Backend>(f: &mut Frame<B>, snapshot: Option<&Snapshot>, prompt: Option<Prompt>) {
    if let Some(p) = prompt {
        put_lines(
            f,
            PROMPT_ROW,
            vec![Spans::from(Span::styled(
                p.label(),
                Style::default().fg(Color::Yellow),
            ))],
        );
    }
    let snapshot = match snapshot {
        Some(s) => s,
        None => return,
    };

    put_lines(
        f,
        STATUS_ROW,
        vec![Spans::from(Span::styled(
            snapshot.status_line(),
            Style::default().add_modifier(Modifier::BOLD),
        ))],
    );
    put_lines(f, OUTPUT_RULE_ROW, vec![Spans::from(Snapshot::separator())]);
    put_lines(
        f,
        OUTPUT_ROW,
        output_tail(&snapshot.output).into_iter().map(Spans::from).collect(),
    );
    put_lines(f, DUMP_RULE_ROW, vec![Spans::from(Snapshot::separator())]);

    let mut dump: Vec<Spans> = snapshot
        .hex_dump()
        .lines()
        .map(|line| Spans::from(line.to_string()))
        .collect();
    dump.push(Spans::from(Snapshot::separator()));
    put_lines(f, DUMP_ROW, dump);
}

/// machine state in a terminal, rendered using TUI and crossterm
pub struct TermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    last: Option<Snapshot>,
    prompt: Option<Prompt>,
}

impl TermDisplay {
    pub fn new() -> Result<TermDisplay, io::Error> {
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(TermDisplay {
            terminal,
            last: None,
            prompt: None,
        })
    }

    fn redraw(&mut self) -> Result<(), io::Error> {
        // NB. tui diffs whole frames, so the prompt and the last snapshot are
        //     both drawn every time or one would wipe the other
        let last = self.last.as_ref();
        let prompt = self.prompt;
        self.terminal.draw(|f| draw_frame(f, last, prompt))?;
        Ok(())
    }
}

impl Drop for TermDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
            log::warn!("couldn't leave the alternate screen: {}", e);
        }
    }
}

impl Display for TermDisplay {
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), io::Error> {
        self.last = Some(snapshot.clone());
        self.redraw()
    }

    fn prompt(&mut self, prompt: Prompt) -> Result<(), io::Error> {
        self.prompt = Some(prompt);
        self.redraw()
    }

    fn clear(&mut self) -> Result<(), io::Error> {
        self.last = None;
        self.prompt = None;
        self.terminal.clear()
    }
}

/// useful for testing non-display routines; remembers everything it's asked
/// to show
#[derive(Default)]
pub struct DummyDisplay {
    pub snapshots: Vec<Snapshot>,
    pub prompts: Vec<Prompt>,
    pub clears: usize,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        DummyDisplay::default()
    }
}

impl Display for DummyDisplay {
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), io::Error> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }

    fn prompt(&mut self, prompt: Prompt) -> Result<(), io::Error> {
        self.prompts.push(prompt);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), io::Error> {
        self.clears += 1;
        Ok(())
    }
}
