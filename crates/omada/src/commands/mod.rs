//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod apps;
pub mod clients;
pub mod config_cmd;
pub mod devices;
pub mod poe;
pub mod sites;
pub mod ssids;
pub mod token;
pub mod traffic;
pub mod util;
pub mod wan;
pub mod watch;

use omada_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Sites => sites::handle(controller, global).await,
        Command::Devices => devices::list(controller, global).await,
        Command::Device(args) => devices::handle(controller, args, global).await,
        Command::Clients => clients::list(controller, global).await,
        Command::Client(args) => clients::handle(controller, args, global).await,
        Command::Apps => apps::handle(controller, global).await,
        Command::Traffic(args) => traffic::handle(controller, args, global).await,
        Command::Poe => poe::list(controller, global).await,
        Command::Port(args) => poe::handle(controller, args, global).await,
        Command::Wan => wan::handle(controller, global).await,
        Command::Ssids => ssids::list(controller, global).await,
        Command::Ssid(args) => ssids::handle(controller, args, global).await,
        Command::Watch => watch::handle(controller, global).await,
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Token(args) => token::handle(args, global),
        Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "completions are generated without a controller".into(),
        }),
    }
}
