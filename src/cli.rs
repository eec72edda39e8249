// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the serve, check, and init subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dockward")]
#[command(about = "Docker-compatible container lifecycle API for Docker and Podman engines")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the container API
    Serve(ServeArgs),

    /// Check that the container runtime is reachable
    Check(ConfigArgs),

    /// Create a dockward.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration file (default: discover in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Engine socket to forward to (overrides config and detection)
    #[arg(long)]
    pub runtime_socket: Option<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Listen on this Unix socket
    #[arg(long, conflicts_with = "tcp")]
    pub socket: Option<PathBuf>,

    /// Listen on this TCP address instead of a Unix socket
    #[arg(long)]
    pub tcp: Option<SocketAddr>,
}
