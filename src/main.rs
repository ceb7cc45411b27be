use std::error::Error;
use std::sync::Arc;

use jsquizbot::commands::Command;
use jsquizbot::config::Config;
use jsquizbot::database::store::FileStore;
use jsquizbot::schema::schema;
use jsquizbot::state::QuizState;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use teloxide::utils::command::BotCommands;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = Config::from_env()?;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.log_level).into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_line_number(true)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;

    let store = Arc::new(FileStore::new(&config.state_path));
    tracing::info!(state_path = %store.state_dir().display(), "using per-user progress files");

    let bot = Bot::new(&config.token);
    bot.set_my_commands(Command::bot_commands()).await?;
    tracing::info!("Starting bot...");

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema::<FileStore>())
        .dependencies(dptree::deps![InMemStorage::<QuizState>::new(), store])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build();

    if let Some(webhook) = config.webhook {
        tracing::info!(url = %webhook.url, addr = %webhook.addr, "listening for webhook updates");
        let listener = webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await?;
        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        dispatcher.dispatch().await;
    }

    Ok(())
}
