//! Command dispatch: bridges CLI args -> session loads -> output formatting.

pub mod config_cmd;
pub mod scales;
pub mod state;
pub mod toolbar;
pub mod tree;
pub mod util;

use geoclient_core::MapSession;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that needs an application context.
pub async fn dispatch(
    cmd: Command,
    session: &MapSession,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::State(args) => state::handle(session, &args, global).await,
        Command::Tree(args) => tree::handle(session, &args, global).await,
        Command::Toolbar(args) => toolbar::handle(session, &args, global).await,
        // Scales, Config and Completions are handled before a session exists
        Command::Scales(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
