// ABOUTME: Entry point for the dockward binary.
// ABOUTME: Loads configuration, connects to the runtime, and serves the API.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, ConfigArgs, ServeArgs};
use dockward::api;
use dockward::config::{self, Config, ListenConfig};
use dockward::error::{Error, Result};
use dockward::runtime::{
    BollardRuntime, RuntimeConfig, RuntimeError, RuntimeErrorKind, RuntimeInfo, resolve_runtime,
};
use dockward::server::ApiServer;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DOCKWARD_LOG";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Error::Runtime(runtime_err) = &e
            && runtime_err.kind() == RuntimeErrorKind::NoRuntimeFound
        {
            eprintln!("Hint: set runtime.socket in dockward.yml or pass --runtime-socket");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { force } => {
            let cwd = env::current_dir()?;
            let path = config::init_config(&cwd, force)?;
            println!("Created {}", path.display());
            Ok(())
        }
        Commands::Check(args) => {
            let config = load_config(&args)?;
            init_tracing(cli.verbose, &config.log)?;
            check(config).await
        }
        Commands::Serve(args) => {
            let mut config = load_config(&args.config)?;
            apply_listen_overrides(&mut config, &args);
            init_tracing(cli.verbose, &config.log)?;
            serve(config).await
        }
    }
}

fn load_config(args: &ConfigArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir()?)?,
    };

    if let Some(socket) = &args.runtime_socket {
        config.runtime.socket = Some(socket.clone());
    }

    Ok(config)
}

fn apply_listen_overrides(config: &mut Config, args: &ServeArgs) {
    if let Some(path) = &args.socket {
        config.listen = ListenConfig::Socket(path.clone());
    }
    if let Some(addr) = args.tcp {
        config.listen = ListenConfig::Tcp(addr);
    }
}

/// `--verbose` wins, then `DOCKWARD_LOG`, then the configured filter.
fn init_tracing(verbose: bool, configured: &str) -> Result<()> {
    let directives = if verbose {
        "debug".to_string()
    } else {
        env::var(LOG_ENV).unwrap_or_else(|_| configured.to_string())
    };

    let filter = EnvFilter::try_new(&directives)
        .map_err(|e| Error::InvalidConfig(format!("log filter '{}': {}", directives, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

async fn connect_runtime(config: &RuntimeConfig) -> Result<BollardRuntime> {
    let detected = resolve_runtime(config).map_err(RuntimeError::from)?;
    info!(
        runtime = %detected.runtime_type,
        socket = %detected.socket_path,
        "using container runtime"
    );

    let runtime = BollardRuntime::connect(&detected, config.default_stop_timeout)
        .map_err(RuntimeError::from)?;
    runtime.ping().await.map_err(RuntimeError::from)?;

    Ok(runtime)
}

async fn check(config: Config) -> Result<()> {
    let runtime = connect_runtime(&config.runtime).await?;
    let metadata = runtime.info().await.map_err(RuntimeError::from)?;

    println!("Runtime: {} {}", metadata.name, metadata.version);
    println!("API version: {}", metadata.api_version);
    println!("Platform: {}/{}", metadata.os, metadata.arch);
    println!("Listen: {}", config.listen);
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let runtime = connect_runtime(&config.runtime).await?;
    let app = api::create_router(Arc::new(runtime));

    ApiServer::new(config.listen, app)
        .run(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("unable to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
