//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_changelog, display_dry_run_plan, display_error,
    display_manual_push_instruction, display_proposed_release, display_pull_requests,
    display_status, display_success,
};

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive) as confirmation.
/// Default is "no" if user presses Enter.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    confirm_action_from(prompt, &mut stdin.lock())
}

/// [confirm_action] reading the answer from any buffered reader.
pub fn confirm_action_from<R: BufRead>(prompt: &str, input: &mut R) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    let response = answer.trim().to_lowercase();
    response == "y" || response == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_confirm_yes() {
        assert!(confirm_action_from("Release?", &mut Cursor::new("y\n")).unwrap());
        assert!(confirm_action_from("Release?", &mut Cursor::new(" YES \n")).unwrap());
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        assert!(!confirm_action_from("Release?", &mut Cursor::new("\n")).unwrap());
        assert!(!confirm_action_from("Release?", &mut Cursor::new("")).unwrap());
        assert!(!confirm_action_from("Release?", &mut Cursor::new("nope\n")).unwrap());
    }
}
