use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "ETicaretAPI persistence host")]
pub struct Cli {
    #[arg(short = 'v', long, global = true, help = "Show debug messages")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        env = "ETICARET_CONTENT_ROOT",
        help = "Directory holding appsettings.json [default: ../ETicaretAPI.API]"
    )]
    pub content_root: Option<PathBuf>,

    #[arg(
        short = 'e',
        long,
        global = true,
        env = "ASPNETCORE_ENVIRONMENT",
        help = "Environment name, selects appsettings.<ENVIRONMENT>.json"
    )]
    pub environment: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register the persistence services and ping the database
    Check,
    /// Run schema migrations against the configured database
    Migrate {
        #[command(subcommand)]
        command: Option<MigrateCommand>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum MigrateCommand {
    /// Apply pending migrations
    Up {
        #[arg(short, long, help = "Number of pending migrations to apply")]
        num: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        #[arg(short, long, default_value_t = 1, help = "Number of migrations to roll back")]
        num: u32,
    },
    /// Drop all tables, then reapply all migrations
    Fresh,
    /// Roll back all applied migrations, then reapply all migrations
    Refresh,
    /// Roll back all applied migrations
    Reset,
    /// Check the status of all migrations
    Status,
}
