//! Subcommand handlers. Each prints its screen to stdout; failures bubble up to `main`.

pub mod comics;
pub mod customers;
pub mod pulls;
pub mod report;

use crate::app::toast::Toasts;
use crate::domain::ViewState;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Unwrap a finished view, turning the errored state into the command's error.
fn loaded<T>(state: ViewState<T>) -> Result<T, Box<dyn std::error::Error>> {
    match state {
        ViewState::Loaded(data) => Ok(data),
        ViewState::Errored(message) => Err(message.into()),
        other => Err(format!("view still {}", other.name()).into()),
    }
}

pub fn print_toasts(toasts: &Toasts) {
    for toast in toasts.drain() {
        eprintln!("[{}] {}", toast.kind.icon(), toast.text);
    }
}
