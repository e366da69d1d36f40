use crate::assembler;
use crate::config::HEADER_WORDS;
use crate::image::MemoryImage;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tui_textarea::TextArea;

#[derive(Debug, PartialEq)]
pub enum Pane {
    Editor,
    Memory,
    Logs,
}

#[derive(Debug, PartialEq)]
pub enum NumFormat {
    Hex,
    Binary,
    Decimal,
}

pub struct App<'a> {
    pub editor: TextArea<'a>,
    pub image: Option<MemoryImage>,
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub active_pane: Pane,
    pub number_format: NumFormat,
    pub memory_scroll: u16,
    pub logs_scroll: u16,
    pub logs: Vec<String>,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(source: &str, source_path: &Path, output_path: &Path) -> App<'a> {
        let editor = TextArea::new(source.lines().map(String::from).collect());

        App {
            editor,
            image: None,
            source_path: source_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            active_pane: Pane::Editor,
            number_format: NumFormat::Hex,
            memory_scroll: 0,
            logs_scroll: 0,
            logs: vec![],
            should_quit: false,
        }
    }

    pub fn source(&self) -> String {
        self.editor.lines().join("\n")
    }

    /// Assembles the editor buffer. Errors go to the log pane and clear the image.
    pub fn assemble(&mut self) -> bool {
        match assembler::assemble_source(&self.source()) {
            Ok(image) => {
                self.logs.push(format!(
                    "Assembly successful: {} words including header.",
                    image.to_words().len()
                ));
                self.image = Some(image);
                self.memory_scroll = 0;
                true
            }
            Err(e) => {
                self.logs.push(format!("Assembly error: {}", e));
                self.image = None;
                false
            }
        }
    }

    /// Writes the artifact, assembling first if the buffer changed since the last run.
    pub fn write_image(&mut self) {
        if self.image.is_none() && !self.assemble() {
            return;
        }
        let Some(image) = &self.image else { return };
        match image.save(&self.output_path) {
            Ok(words) => self.logs.push(format!(
                "Wrote {} words to {}",
                words,
                self.output_path.display()
            )),
            Err(e) => self.logs.push(format!("Write error: {}", e)),
        }
    }

    pub fn save_source(&mut self) {
        let mut text = self.source();
        text.push('\n');
        match fs::write(&self.source_path, text) {
            Ok(()) => self.logs.push(format!("Saved {}", self.source_path.display())),
            Err(e) => self.logs.push(format!("Save error: {}", e)),
        }
    }

    /// One line per artifact word: header words first, then memory cells.
    pub fn memory_rows(&self) -> Vec<String> {
        let Some(image) = &self.image else {
            return vec![];
        };
        image
            .to_words()
            .iter()
            .enumerate()
            .map(|(offset, &word)| {
                let label = if offset < HEADER_WORDS {
                    "hdr".to_string()
                } else {
                    format!("{:03}", offset - HEADER_WORDS)
                };
                format!("{}: {}", label, format_word(word, &self.number_format))
            })
            .collect()
    }
}

pub fn format_word(word: u16, format: &NumFormat) -> String {
    match format {
        NumFormat::Hex => format!("0x{:04x}", word),
        NumFormat::Binary => format!("0b{:016b}", word),
        NumFormat::Decimal => format!("{:<5}", word),
    }
}

/// Opens the workbench on `source`. A missing file starts an empty buffer.
pub fn run(source: &Path, output: &Path) -> Result<(), io::Error> {
    let text = match fs::read_to_string(source) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(&text, source, output);
    let res = run_app(&mut terminal, app);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != event::KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Esc => app.should_quit = true,
                KeyCode::Tab => {
                    app.active_pane = match app.active_pane {
                        Pane::Editor => Pane::Memory,
                        Pane::Memory => Pane::Logs,
                        Pane::Logs => Pane::Editor,
                    };
                }
                KeyCode::F(2) => {
                    app.assemble();
                }
                KeyCode::F(3) => app.write_image(),
                KeyCode::F(4) => app.save_source(),
                KeyCode::F(9) => {
                    app.number_format = match app.number_format {
                        NumFormat::Hex => NumFormat::Binary,
                        NumFormat::Binary => NumFormat::Decimal,
                        NumFormat::Decimal => NumFormat::Hex,
                    };
                }
                _ => match app.active_pane {
                    Pane::Editor => {
                        if app.editor.input(key) {
                            // stale until the next F2
                            app.image = None;
                        }
                    }
                    Pane::Memory => match key.code {
                        KeyCode::Up => app.memory_scroll = app.memory_scroll.saturating_sub(1),
                        KeyCode::Down => app.memory_scroll = app.memory_scroll.saturating_add(1),
                        KeyCode::PageUp => app.memory_scroll = app.memory_scroll.saturating_sub(16),
                        KeyCode::PageDown => app.memory_scroll = app.memory_scroll.saturating_add(16),
                        _ => {}
                    },
                    Pane::Logs => match key.code {
                        KeyCode::Up => app.logs_scroll = app.logs_scroll.saturating_sub(1),
                        KeyCode::Down => app.logs_scroll = app.logs_scroll.saturating_add(1),
                        _ => {}
                    },
                },
            }

            if app.should_quit {
                return Ok(());
            }
        }
    }
}

mod ui {
    use super::*;
    use ratatui::{
        layout::{Constraint, Direction, Layout},
        style::{Color, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Paragraph},
        Frame,
    };

    fn pane_style(app: &App, pane: Pane) -> Style {
        if app.active_pane == pane { Style::default().fg(Color::Yellow) } else { Style::default() }
    }

    pub fn draw(f: &mut Frame, app: &mut App) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Top bar
                Constraint::Min(10),    // Middle section
                Constraint::Length(8),  // Bottom logs
            ])
            .split(f.area());

        // Top bar
        let status = match &app.image {
            Some(image) => format!("max address {}", image.max_address()),
            None => "not assembled".to_string(),
        };
        let top_msg = Paragraph::new(format!(
            "{} | {} | Format (F9): {:?} | Pane (Tab): {:?} | Press ESC to quit",
            app.source_path.display(), status, app.number_format, app.active_pane
        ))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(top_msg, chunks[0]);

        let middle_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(65), // Editor
                Constraint::Percentage(35), // Memory
            ])
            .split(chunks[1]);

        // Editor
        let editor_style = pane_style(app, Pane::Editor);
        app.editor.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(editor_style)
                .title("Source (F2: Assemble, F3: Write image, F4: Save source)"),
        );
        f.render_widget(&app.editor, middle_chunks[0]);

        // Memory: header words are highlighted so the image body stands out
        let mem_lines: Vec<Line> = app
            .memory_rows()
            .into_iter()
            .enumerate()
            .map(|(offset, row)| {
                if offset < HEADER_WORDS {
                    Line::from(Span::styled(row, Style::default().fg(Color::DarkGray)))
                } else {
                    Line::from(row)
                }
            })
            .collect();
        let mem_p = Paragraph::new(mem_lines)
            .scroll((app.memory_scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(pane_style(app, Pane::Memory))
                    .title(format!("Image -> {}", app.output_path.display())),
            );
        f.render_widget(mem_p, middle_chunks[1]);

        // Logs
        let logs = Paragraph::new(app.logs.join("\n"))
            .scroll((app.logs_scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(pane_style(app, Pane::Logs))
                    .title("Logs"),
            );
        f.render_widget(logs, chunks[2]);
    }
}
