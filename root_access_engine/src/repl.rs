//! REPL.
//!
//! Reads commands from the terminal (or a script), feeds them to the [`Session`],
//! and renders each [`TurnReport`](crate::session::TurnReport) through the [`View`].

use std::fmt::Write as _;
use std::io::{self, BufRead, IsTerminal, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use rand::Rng;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::session::Session;
use crate::style::GameStyle;
use crate::view::{View, ViewItem};

/// Outcome of reading a line from the REPL input.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

enum Backend {
    Rustyline {
        editor: Box<DefaultEditor>,
        history_path: Option<PathBuf>,
    },
    Plain,
}

/// Terminal input with rustyline when attached to a tty, plain stdin otherwise.
pub struct InputManager {
    backend: Backend,
}
impl InputManager {
    pub fn new(history_path: Option<PathBuf>) -> Self {
        let backend = if io::stdin().is_terminal() {
            match DefaultEditor::new() {
                Ok(mut editor) => {
                    if let Some(path) = history_path.as_ref() {
                        load_history(&mut editor, path);
                    }
                    info!("using rustyline-backed REPL input");
                    Backend::Rustyline {
                        editor: Box::new(editor),
                        history_path,
                    }
                },
                Err(err) => {
                    warn!("failed to start rustyline ({err}); using basic stdin");
                    Backend::Plain
                },
            }
        } else {
            info!("stdin is not a terminal; using basic stdin");
            Backend::Plain
        };
        Self { backend }
    }

    /// Read one line of input.
    ///
    /// # Errors
    /// - on an I/O failure reading stdin
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match &mut self.backend {
            Backend::Rustyline { editor, history_path } => match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(err) = editor.add_history_entry(line.as_str()) {
                            warn!("failed to append to history: {err}");
                        }
                        if let Some(path) = history_path.as_ref() {
                            if let Err(err) = editor.save_history(path) {
                                warn!("failed to persist history to {}: {err}", path.display());
                            }
                        }
                    }
                    Ok(InputEvent::Line(line))
                },
                Err(ReadlineError::Eof) => Ok(InputEvent::Eof),
                Err(ReadlineError::Interrupted) => Ok(InputEvent::Interrupted),
                Err(ReadlineError::Io(err)) => Err(err),
                Err(other) => Err(io::Error::other(other.to_string())),
            },
            Backend::Plain => {
                print!("{prompt}");
                io::stdout().flush()?;
                let mut buffer = String::new();
                if io::stdin().read_line(&mut buffer)? == 0 {
                    return Ok(InputEvent::Eof);
                }
                Ok(InputEvent::Line(buffer.trim_end().to_string()))
            },
        }
    }
}

fn load_history(editor: &mut DefaultEditor, path: &Path) {
    if let Err(err) = editor.load_history(path) {
        match err {
            ReadlineError::Io(ref io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                info!("no prior history found at {}, starting fresh", path.display());
            },
            other => warn!("failed to load history from {}: {other}", path.display()),
        }
    }
}

fn prompt<R: Rng>(session: &Session<R>) -> String {
    let mut status = String::new();
    if session.world.player.hidden {
        status.push_str(" [hidden]");
    }
    let unread = session.pipeline.notifications.unread_count();
    if unread > 0 {
        let _ = write!(status, " [{unread} unread]");
    }
    format!("\n[Turn: {}{status}]>> ", session.world.turn_count)
        .prompt_style()
        .to_string()
}

fn banner<R: Rng>(session: &Session<R>, view: &mut View) {
    view.push(ViewItem::Banner {
        title: session.world.title.clone(),
        intro: session.world.intro.clone(),
    });
}

/// Run the interactive loop until the player quits or input ends.
///
/// # Errors
/// - reserved for failures the session cannot turn into a response
pub fn run_repl<R: Rng>(session: &mut Session<R>, history_path: Option<PathBuf>) -> Result<()> {
    let mut view = View::new();
    let mut input = InputManager::new(history_path);
    banner(session, &mut view);
    view.flush();

    loop {
        let line = match input.read_line(&prompt(session)) {
            Ok(InputEvent::Line(line)) => line,
            Ok(InputEvent::Eof) => "quit".to_string(),
            Ok(InputEvent::Interrupted) => {
                view.push(ViewItem::Response("Command canceled.".to_string()));
                view.flush();
                continue;
            },
            Err(err) => {
                warn!("failed to read input: {err}");
                view.push(ViewItem::Error("Failed to read input. Try again.".to_string()));
                view.flush();
                continue;
            },
        };
        if line.trim().is_empty() {
            continue;
        }
        let report = session.handle_input(&line);
        view.push_report(&report);
        view.flush();
        if report.quit {
            break;
        }
    }
    Ok(())
}

/// Feed commands from a script file, one per line. Blank lines and `#` comments are skipped.
///
/// # Errors
/// - if the script cannot be opened or read
pub fn run_script<R: Rng>(session: &mut Session<R>, path: &Path) -> Result<()> {
    let file = std::fs::File::open(path).with_context(|| format!("opening script {}", path.display()))?;
    let mut view = View::new();
    banner(session, &mut view);
    view.flush();
    for line in io::BufReader::new(file).lines() {
        let line = line.with_context(|| format!("reading script {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        println!("{}", format!(">> {line}").prompt_style());
        let report = session.handle_input(line);
        view.push_report(&report);
        view.flush();
        if report.quit {
            break;
        }
    }
    Ok(())
}

/// Let `turns` turns pass with the player waiting, printing each turn.
pub fn run_unattended<R: Rng>(session: &mut Session<R>, turns: u32) {
    let mut view = View::new();
    banner(session, &mut view);
    view.flush();
    for _ in 0..turns {
        let report = session.handle_input("wait");
        if !report.turn_advanced {
            info!("unattended run stopped at turn {}", session.world.turn_count);
            view.push_report(&report);
            view.flush();
            break;
        }
        println!("{}", format!("-- turn {} --", session.world.turn_count).section_style());
        view.push_report(&report);
        view.flush();
    }
}
