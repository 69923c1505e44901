use crate::error::{ClonerError, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use std::io::ErrorKind;

/// Single-choice prompt.
///
/// `Ok(None)` means the user backed out (Esc, Ctrl-C or end of input).
pub trait Selector {
    fn select(&self, message: &str, options: &[String]) -> Result<Option<String>>;
}

/// Terminal prompt rendered with dialoguer
#[derive(Default)]
pub struct DialoguerSelector {
    theme: ColorfulTheme,
}

impl DialoguerSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector for DialoguerSelector {
    fn select(&self, message: &str, options: &[String]) -> Result<Option<String>> {
        if options.is_empty() {
            return Err(ClonerError::PromptError(format!("nothing to choose for '{}'", message)));
        }

        let choice = Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(options)
            .default(0)
            .interact_opt();

        match choice {
            Ok(index) => Ok(index.and_then(|i| options.get(i).cloned())),
            Err(dialoguer::Error::IO(e)) if is_cancellation(e.kind()) => Ok(None),
            Err(e) => Err(ClonerError::PromptError(e.to_string())),
        }
    }
}

fn is_cancellation(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::UnexpectedEof | ErrorKind::Interrupted)
}
