use anyhow::bail;
use dotenvy::dotenv;
use smsgate::config::Settings;
use smsgate::session::{parse_bulk_numbers, FormParameters, SmsSession};
use smsgate::workflow::{run_batch, Transport};
use std::io::Read;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenv().ok();

    init_logging();

    let settings = init_settings();

    let transport: Transport = settings.transport.parse()?;
    let numbers = collect_numbers()?;
    info!(
        count = numbers.len(),
        mode = transport.label(),
        "starting batch"
    );

    let params = FormParameters::from_settings(&settings, transport);
    let mut session = SmsSession::new(params, numbers, transport);

    let strategy = transport.strategy(&settings);
    let report = run_batch(&mut session, strategy.as_ref()).await?;

    for contact in &session.contacts {
        match &contact.error {
            Some(error) => println!("{}: {} ({})", contact.number, contact.status, error),
            None => println!("{}: {}", contact.number, contact.status),
        }
    }
    println!("{}", report.message);

    if report.succeeded == 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn init_settings() -> Arc<Settings> {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Recipient numbers come from argv, or newline-separated from stdin when no
/// arguments are given (bulk mode).
fn collect_numbers() -> anyhow::Result<Vec<String>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let numbers = if args.is_empty() {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        parse_bulk_numbers(&input)
    } else {
        args
    };

    if numbers.is_empty() {
        bail!("Please enter at least one phone number");
    }
    Ok(numbers)
}
