use std::io::IsTerminal;

use dxf_flat::{Confirm, FlipError};

/// Returns true if running in an interactive terminal (both stdin and stdout are TTYs).
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Asks on the terminal, defaulting to "no".
///
/// Refuses to block when there is nobody to answer: outside a terminal, or in
/// CI, every confirmation fails instead.
#[derive(Debug, Clone)]
pub struct TerminalConfirm {
    /// Shown in front of the question, usually the view name
    pub context: Option<String>,
}

impl TerminalConfirm {
    pub fn new() -> Self {
        Self { context: None }
    }

    pub fn for_view(name: impl Into<String>) -> Self {
        Self {
            context: Some(name.into()),
        }
    }
}

impl Default for TerminalConfirm {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> dxf_flat::Result<bool> {
        if !is_interactive() || std::env::var("CI").is_ok() {
            return Err(FlipError::Confirmation(
                "not running in an interactive terminal; pass --answer yes|no".into(),
            ));
        }

        let question = match &self.context {
            Some(context) => format!("{context}: {prompt}"),
            None => prompt.to_string(),
        };

        inquire::Confirm::new(&question)
            .with_default(false)
            .prompt()
            .map_err(|e| FlipError::Confirmation(Box::new(e)))
    }
}

/// Answers every confirmation the same way, for unattended runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, prompt: &str) -> dxf_flat::Result<bool> {
        log::info!("{prompt} {}", if self.0 { "yes" } else { "no" });
        Ok(self.0)
    }
}
