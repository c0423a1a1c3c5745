mod cli;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use migration::{Migrator, MigratorTrait};
use persistence::config::api_content_root;
use persistence::{
    Configuration, DbContext, DesignTimeDbContextFactory, ETicaretApiDbContext,
    ETicaretApiDesignTimeFactory, ServiceCollection, ServiceCollectionExt,
};

use cli::{Cli, Command, MigrateCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let content_root = match cli.content_root {
        Some(dir) => dir,
        None => api_content_root().context("cannot determine the working directory")?,
    };
    let configuration = Configuration::load(&content_root, cli.environment.as_deref());
    logging::init(cli.verbose, configuration.as_ref().ok());
    let configuration = configuration
        .with_context(|| format!("failed to load configuration from {}", content_root.display()))?;

    match cli.command {
        Command::Check => check(&configuration).await,
        Command::Migrate { command } => migrate(content_root, cli.environment, command).await,
    }
}

async fn check(configuration: &Configuration) -> anyhow::Result<()> {
    let mut services = ServiceCollection::new();
    services
        .add_persistence_services(configuration)
        .await
        .context("failed to register persistence services")?;

    let context = services.resolve::<ETicaretApiDbContext>()?;
    context
        .ping()
        .await
        .with_context(|| format!("database at {} is unreachable", context.options().redacted_url()))?;

    tracing::info!(services = ?services.registered(), "Persistence services ready");
    Ok(())
}

async fn migrate(
    content_root: PathBuf,
    environment: Option<String>,
    command: Option<MigrateCommand>,
) -> anyhow::Result<()> {
    let context = design_time_context(&content_root, environment).await?;
    let db = context.connection();

    match command.unwrap_or(MigrateCommand::Up { num: None }) {
        MigrateCommand::Up { num } => Migrator::up(db, num).await?,
        MigrateCommand::Down { num } => Migrator::down(db, Some(num)).await?,
        MigrateCommand::Fresh => Migrator::fresh(db).await?,
        MigrateCommand::Refresh => Migrator::refresh(db).await?,
        MigrateCommand::Reset => Migrator::reset(db).await?,
        MigrateCommand::Status => Migrator::status(db).await?,
    }

    Ok(())
}

async fn design_time_context(
    content_root: &Path,
    environment: Option<String>,
) -> anyhow::Result<ETicaretApiDbContext> {
    let factory = ETicaretApiDesignTimeFactory::new(content_root, environment);
    factory
        .create_db_context()
        .await
        .with_context(|| format!("failed to create db context from {}", content_root.display()))
}
