//! Operator prompt session.
//!
//! One explicit object with a single blocking `ask`, passed down to
//! whatever needs a decision. No process-wide prompt state, and only
//! one prompt can be outstanding at a time because callers hold the
//! session exclusively.

use anyhow::{anyhow, Result};

pub trait PromptSession {
    /// Print the question and block until the operator answers.
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Line-edited terminal session.
pub struct RustylineSession {
    editor: rustyline::DefaultEditor,
}

impl RustylineSession {
    pub fn new() -> Result<Self> {
        let editor =
            rustyline::DefaultEditor::new().map_err(|e| anyhow!("failed to init rustyline: {e}"))?;
        Ok(RustylineSession { editor })
    }
}

impl PromptSession for RustylineSession {
    fn ask(&mut self, question: &str) -> Result<String> {
        use rustyline::error::ReadlineError;

        match self.editor.readline(question) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Eof) => Err(anyhow!("prompt closed")),
            Err(ReadlineError::Interrupted) => Err(anyhow!("prompt interrupted")),
            Err(e) => Err(anyhow!("readline error: {e}")),
        }
    }
}
