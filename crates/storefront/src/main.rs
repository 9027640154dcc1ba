//! Lustre Storefront - interactive session.
//!
//! Reads line commands from stdin (`help` lists them), applies them to the
//! storefront and rewrites the assembled page after every command. Pending
//! notices are printed as they appear.
//!
//! # Architecture
//!
//! - One event loop owns the [`Storefront`]
//! - Debounce, feedback and contact-send timers are tokio tasks posting
//!   events back to the loop
//! - The cart is persisted to `<data_dir>/storage.json`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::Path;

use lustre_storefront::config::StorefrontConfig;
use lustre_storefront::controller::{AppEvent, Storefront};
use lustre_storefront::error::Result;
use lustre_storefront::session::{self, Flow};
use sentry::integrations::tracing as sentry_tracing;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lustre_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(&config).await {
        e.capture();
        std::process::exit(1);
    }
}

async fn run(config: &StorefrontConfig) -> Result<()> {
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let mut shop = Storefront::from_config(config, events_tx)?;
    shop.start();
    publish(&mut shop, &config.page_path).await?;

    say(&format!(
        "{} is open. Page: {} (type `help` for commands)",
        config.store_name,
        config.page_path.display()
    ))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let flow = tokio::select! {
            line = lines.next_line() => match line? {
                None => break,
                Some(line) => match session::parse_line(&line) {
                    Ok(Some(command)) => session::apply(&mut shop, command),
                    Ok(None) => continue,
                    Err(e) => {
                        say(e.render().to_string().trim_end())?;
                        continue;
                    }
                },
            },
            Some(event) = events.recv() => {
                shop.handle_event(event);
                Flow::Continue
            }
        };

        match flow {
            Flow::Quit => break,
            Flow::ShowPage => say(&config.page_path.display().to_string())?,
            Flow::Wait(period) => {
                wait(&mut shop, &mut events, period, &config.page_path).await?;
            }
            Flow::Continue => {}
        }
        publish(&mut shop, &config.page_path).await?;
    }

    tracing::info!("Session ended");
    Ok(())
}

/// Process timer events for `period`.
async fn wait(
    shop: &mut Storefront,
    events: &mut UnboundedReceiver<AppEvent>,
    period: std::time::Duration,
    page_path: &Path,
) -> Result<()> {
    let deadline = tokio::time::sleep(period);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            () = &mut deadline => return Ok(()),
            Some(event) = events.recv() => {
                shop.handle_event(event);
                publish(shop, page_path).await?;
            }
        }
    }
}

/// Write the page and print pending notices.
async fn publish(shop: &mut Storefront, page_path: &Path) -> Result<()> {
    let page = shop.render_page()?;
    if let Some(parent) = page_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(page_path, page).await?;

    for notice in shop.take_notices() {
        say(&format!("[{}] {}", notice.level_class(), notice.message))?;
    }
    Ok(())
}

fn say(message: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{message}")?;
    Ok(())
}
