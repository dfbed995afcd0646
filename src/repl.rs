//! Interactive read-eval-print loop
//!
//! Input lines accumulate until their parentheses balance, then the buffer is
//! evaluated as a program in the interpreter's global scope. Definitions
//! persist across entries until `:reset`.

use std::path::PathBuf;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::diagnostics::SourceFile;
use crate::interp::{Interpreter, Value};
use crate::lexer;

const PROMPT: &str = "eva> ";
const CONTINUATION_PROMPT: &str = "...> ";
const HISTORY_FILE: &str = ".eva_history";

/// What the loop should do after a line was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Keep reading
    Continue,
    /// Leave the loop
    Exit,
}

/// REPL session state
pub struct Repl {
    interpreter: Interpreter,
    /// Incomplete input waiting for closing parentheses
    buffer: String,
    entries: usize,
}

impl Repl {
    pub fn new(interpreter: Interpreter) -> Self {
        Repl {
            interpreter,
            buffer: String::new(),
            entries: 0,
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Whether a multi-line entry is in progress
    pub fn is_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Run the loop on the terminal until `:quit` or end of input
    pub fn run(&mut self) -> miette::Result<()> {
        println!("Eva REPL v{}", crate::VERSION);
        println!("Type :help for help, :quit to exit");
        println!();

        let mut editor =
            DefaultEditor::new().map_err(|e| miette::miette!("Failed to start line editor: {}", e))?;
        let history = history_path();
        if let Some(path) = &history {
            // A missing history file is normal on first start
            let _ = editor.load_history(path);
        }

        loop {
            let prompt = if self.is_pending() {
                CONTINUATION_PROMPT
            } else {
                PROMPT
            };
            match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if self.handle_line(&line) == Action::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    self.buffer.clear();
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(miette::miette!("REPL input error: {}", e)),
            }
        }

        if let Some(path) = &history {
            if let Err(e) = editor.save_history(path) {
                tracing::warn!("Could not save REPL history to {}: {}", path.display(), e);
            }
        }
        println!("Goodbye!");
        Ok(())
    }

    /// Handle one line of input: a meta command or (part of) a program
    pub fn handle_line(&mut self, line: &str) -> Action {
        let trimmed = line.trim();
        if !self.is_pending() && trimmed.starts_with(':') {
            return self.command(trimmed);
        }
        if trimmed.is_empty() && !self.is_pending() {
            return Action::Continue;
        }

        self.buffer.push_str(line);
        self.buffer.push('\n');
        if paren_depth(&self.buffer) > 0 {
            return Action::Continue;
        }

        let source = std::mem::take(&mut self.buffer);
        // Comment-only input has nothing to evaluate
        if lexer::lex(&source).is_ok_and(|tokens| tokens.len() == 1) {
            return Action::Continue;
        }
        self.entries += 1;
        let file = SourceFile::new(format!("<repl:{}>", self.entries), source);
        match self.interpreter.eval_file(&file) {
            Ok(Value::Null) => {}
            Ok(value @ Value::Str(_)) => println!("{:?}", value),
            Ok(value) => println!("{}", value),
            Err(report) => eprintln!("{:?}", report),
        }
        Action::Continue
    }

    fn command(&mut self, command: &str) -> Action {
        match command {
            ":quit" | ":q" => return Action::Exit,
            ":help" | ":h" => {
                println!("Commands:");
                println!("  :help, :h    Show this help");
                println!("  :quit, :q    Exit the REPL");
                println!("  :env         List global bindings");
                println!("  :reset       Discard all definitions");
                println!();
            }
            ":env" => {
                for name in self.interpreter.global().names() {
                    println!("  {}", name);
                }
            }
            ":reset" => {
                self.interpreter.reset();
                println!("Environment reset");
            }
            other => println!("Unknown command `{}`; try :help", other),
        }
        Action::Continue
    }
}

/// Count of unclosed parentheses, ignoring string literals and comments
pub fn paren_depth(source: &str) -> i64 {
    let mut depth = 0;
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '"' => {
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            ';' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    depth
}

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(HISTORY_FILE))
}
