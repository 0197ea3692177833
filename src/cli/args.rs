//! clap derive definitions for the command-line surface.

use clap::{Parser, Subcommand};

/// Multi-tenant identity and organisation-membership service.
#[derive(Parser, Debug)]
#[command(name = "tenancy-api", author, version, about, long_about = None)]
pub struct Cli {
    /// Force debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Manage the database schema
    Migrate(MigrateArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Bind port
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Apply pending migrations
    Up,
    /// Roll back the most recent migration
    Down,
    /// List migrations with applied/pending state
    Status,
    /// Drop everything and replay all migrations
    Fresh,
}
