use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Download, launch and wait for the sidecar; publish its address
    Start,

    /// Report cache statistics and shut the sidecar down
    Stop,
}
