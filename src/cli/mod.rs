mod args;
mod ask;
mod session;

pub use args::{Cli, Commands, ConfigSubcommands};
pub use ask::run_ask;
pub use session::{create_coordinator, resolve_settings};
