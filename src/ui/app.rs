//! Playground application state and event loop

use crate::pipeline::{compile, run};
use crate::samples::SAMPLES;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::debug;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Source,
        }
    }
}

/// What the output pane is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputView {
    Log,
    Listing,
}

/// The main application state
pub struct App {
    /// Name shown in the status bar (sample title or file name)
    pub label: String,

    /// The source code being run
    pub source_code: String,

    /// Index into [`SAMPLES`] when a sample is loaded
    pub sample_index: Option<usize>,

    /// Text of the output pane, exactly as the pipeline returned it
    pub output: String,
    pub view: OutputView,

    pub focused_pane: FocusedPane,
    pub source_scroll: usize,
    pub output_scroll: usize,

    /// Whether the last action produced diagnostics or a fault
    pub failed: bool,
    pub should_quit: bool,
    pub status_message: String,
}

impl App {
    /// Create an app showing `source_code` under `label`
    pub fn new(label: impl Into<String>, source_code: String) -> Self {
        App {
            label: label.into(),
            source_code,
            sample_index: None,
            output: String::new(),
            view: OutputView::Log,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            output_scroll: 0,
            failed: false,
            should_quit: false,
            status_message: String::from("Ready! Press r to run."),
        }
    }

    /// Create an app with the sample at `index` loaded
    pub fn with_sample(index: usize) -> Self {
        let mut app = App::new("", String::new());
        app.load_sample(index);
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        super::panes::render_source_pane(
            frame,
            columns[0],
            "Source",
            &self.source_code,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        let output_title = match self.view {
            OutputView::Log => "Output",
            OutputView::Listing => "Translated Listing",
        };
        super::panes::render_output_pane(
            frame,
            columns[1],
            output_title,
            &self.output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.label,
            &self.status_message,
            self.failed,
            self.view == OutputView::Listing,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => self.run_source(),
            KeyCode::Char('e') => self.toggle_listing(),
            KeyCode::Char('n') => self.cycle_sample(true),
            KeyCode::Char('p') => self.cycle_sample(false),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => self.source_scroll = self.source_scroll.saturating_sub(1),
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_sub(1),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => self.source_scroll = self.source_scroll.saturating_add(1),
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_add(1),
            },
            _ => {}
        }
    }

    /// Compile and run the loaded source, showing its log
    pub fn run_source(&mut self) {
        self.output = run(&self.source_code);
        self.view = OutputView::Log;
        self.output_scroll = 0;
        self.failed = self.output.lines().any(|line| {
            line.starts_with("Error:")
                || line.starts_with("Execution Error:")
                || line.starts_with("Tokenization Error:")
                || line.starts_with("Parse Error:")
        });
        let count = if self.output.is_empty() {
            0
        } else {
            self.output.lines().count()
        };
        self.status_message = if self.failed {
            format!("Finished with errors ({} line(s))", count)
        } else {
            format!("Finished ({} line(s))", count)
        };
    }

    /// Switch between the run log and the translated listing
    pub fn toggle_listing(&mut self) {
        if self.view == OutputView::Listing {
            self.run_source();
            return;
        }

        self.view = OutputView::Listing;
        self.output_scroll = 0;
        match compile(&self.source_code) {
            Ok(script) => {
                self.output = script.to_string();
                self.failed = false;
                self.status_message = "Showing translated listing".to_string();
            }
            Err(err) => {
                self.output = err.diagnostics();
                self.failed = true;
                self.status_message = format!("Compile failed: {}", err.tag());
            }
        }
    }

    /// Load the sample at `index`, clearing the output pane
    pub fn load_sample(&mut self, index: usize) {
        let Some(sample) = SAMPLES.get(index) else {
            return;
        };
        debug!("loading sample {}: {}", index + 1, sample.title);
        self.sample_index = Some(index);
        self.label = sample.title.to_string();
        self.source_code = sample.source.to_string();
        self.output.clear();
        self.view = OutputView::Log;
        self.source_scroll = 0;
        self.output_scroll = 0;
        self.failed = false;
        self.status_message = sample.description.to_string();
    }

    fn cycle_sample(&mut self, forward: bool) {
        let count = SAMPLES.len();
        if count == 0 {
            return;
        }
        let next = match (self.sample_index, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        self.load_sample(next);
    }
}
