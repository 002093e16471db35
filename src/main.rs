use clap::Parser;
use meeting_rescheduler::commands::{self, Cli, CommandContext};
use meeting_rescheduler::startup;
use tracing::{error, info};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    startup::init_logging()?;

    // Load configuration
    let config = startup::load_config()?;
    info!("Using calendar {}", config.google_calendar_id);

    let ctx = CommandContext::new(config)?;
    let result = commands::run(&ctx, cli.command).await;

    if let Err(e) = ctx.shutdown().await {
        error!("Error shutting down Google Calendar actor: {:?}", e);
    }

    result.map_err(Into::into)
}
