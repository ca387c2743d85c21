use clap::Parser;
use ledgerdesk::{
    api,
    config::{CliArgs, Command, Config},
    stores::{self, Stores},
    telemetry,
};
use ledgerdesk_memory::seed;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliArgs::parse();
    let config = Config::load(&cli);

    telemetry::init_tracing(&config.logging);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Seed => {
            for ledger in seed::ledgers() {
                println!("{}", ledger);
            }
            Ok(())
        }
        Command::Serve => serve(config).await,
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = telemetry::install_metrics();
    let stores = Stores::in_memory(&config);
    let workspace = stores::open_workspace(&config.workspace)?;

    let app = api::router(stores, workspace, metrics);
    let addr = config.listen_addr()?;

    tracing::info!(
        %addr,
        seed = config.store.seed,
        enforce_balance = config.ledger.enforce_balance,
        "API listening"
    );

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
