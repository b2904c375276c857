//! `quill render` command implementation.
//!
//! Renders a markdown file (or stdin) to HTML on stdout. Useful for
//! inspecting exactly what the display surface will inject for a draft.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::Term;

use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: read stdin).
    input: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markdown = match self.input {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        let html = quill_renderer::render(&markdown);
        let _ = Term::stdout().write_line(&html);
        Ok(())
    }
}
