//! Shell completions generation.
//!
//! Generates shell completion scripts for bash, zsh, fish, PowerShell and
//! elvish.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::TrackError;

const BIN_NAME: &str = "babytrack";

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, TrackError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut buf);
    String::from_utf8(buf)
        .map_err(|e| TrackError::InvalidArgument(format!("completion script is not UTF-8: {e}")))
}

/// Where to put the generated script.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => format!(
            "# Add to ~/.bashrc:\nsource <({BIN_NAME} completions bash)\n"
        ),
        Shell::Zsh => format!(
            "# Save to your fpath, then run compinit:\n\
             {BIN_NAME} completions zsh > ~/.zsh/completions/_{BIN_NAME}\n"
        ),
        Shell::Fish => format!(
            "{BIN_NAME} completions fish > ~/.config/fish/completions/{BIN_NAME}.fish\n"
        ),
        Shell::PowerShell => format!(
            "# Add to your PowerShell profile ($PROFILE):\n\
             {BIN_NAME} completions powershell | Out-String | Invoke-Expression\n"
        ),
        Shell::Elvish => format!(
            "{BIN_NAME} completions elvish > ~/.config/elvish/lib/{BIN_NAME}.elv\n"
        ),
        _ => format!("{BIN_NAME} completions <shell> > <completion file>\n"),
    }
}
