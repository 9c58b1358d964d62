#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::Error;
use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tokio::task;
use triage_chat::application::cli;
use triage_chat::application::repl;
use triage_chat::configuration::Config;
use triage_chat::configuration::ConfigKey;
use triage_chat::domain::models::Action;
use triage_chat::domain::models::BackendName;
use triage_chat::domain::models::Event;
use triage_chat::domain::services::actions::ActionsService;
use triage_chat::domain::services::SessionStore;
use triage_chat::infrastructure::backends::BackendManager;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        format!(
            "Oh no! triage-chat has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        )
        .red()
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

async fn run() -> Result<()> {
    let backend_name = Config::get(ConfigKey::Backend);
    let backend = match BackendName::parse(backend_name.to_string()) {
        Some(name) => BackendManager::get(name),
        None => anyhow::bail!(format!("Unknown backend '{backend_name}'")),
    };

    if let Err(err) = backend.health_check().await {
        tracing::warn!(error = ?err, backend = backend_name, "Backend health check failed");
        eprintln!(
            "{}",
            format!("Warning: the {backend_name} backend is not reachable: {err}").yellow()
        );
    }

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return ActionsService::start(backend, event_tx, &mut action_rx).await;
    });

    let store = SessionStore::new(Arc::new(cli::session_storage()));
    let repl_future = repl::start(store, action_tx, event_rx);

    tokio::select!(
        res = background_futures.join_next() => {
            if let Some(joined) = res {
                joined??;
            }
        },
        res = repl_future => res?,
    );

    return Ok(());
}

#[tokio::main]
async fn main() {
    better_panic::Settings::auto().install();

    let debug_log_dir = env::var("TRIAGE_CHAT_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join("triage-chat")
            .to_string_lossy()
            .to_string();
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("triage_chat")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    match cli::parse().await {
        Ok(true) => {}
        Ok(false) => process::exit(0),
        Err(err) => handle_error(err),
    }

    if let Err(err) = run().await {
        handle_error(err);
    }

    process::exit(0);
}
