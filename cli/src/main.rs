//! Command-line entry point: send one SMS and print the service's answer.

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use sms_core::{Config, Response, SmsClient, SmsError};
use tracing::{debug, error};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sms-client")]
#[command(about = "Send an SMS through the SMS API", long_about = None)]
struct Cli {
    /// Sender's phone number
    #[arg(short, long)]
    sender: String,

    /// Recipient's phone number
    #[arg(short, long)]
    recipient: String,

    /// Message body
    #[arg(short, long)]
    message: String,

    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Print debug messages
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config, cli.debug);
    debug!(config = %cli.config, "Configuration loaded");

    match send(&config, &cli).await {
        Ok((response, body)) => {
            print_response(&response, body.as_ref());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Request failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// One connect/send/disconnect cycle. The connection is released whether or
/// not the send succeeded.
async fn send(config: &Config, cli: &Cli) -> Result<(Response, Option<Value>), SmsError> {
    let mut client: SmsClient = SmsClient::new(config);
    client.connect().await?;

    let result = client.send_sms(&cli.sender, &cli.recipient, &cli.message).await;
    let closed = client.disconnect().await;

    let exchange = result?;
    closed?;
    Ok(exchange)
}

fn print_response(response: &Response, body: Option<&Value>) {
    println!("{}", response.status_line());
    match body.map(serde_json::to_string_pretty) {
        Some(Ok(pretty)) => println!("{pretty}"),
        _ => println!("{}", response.body),
    }
}

fn init_logging(config: &Config, debug: bool) {
    let env_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_arguments() {
        let cli = Cli::try_parse_from([
            "sms-client",
            "-s",
            "+79123456789",
            "-r",
            "+79098765432",
            "-m",
            "Hello",
        ])
        .unwrap();
        assert_eq!(cli.sender, "+79123456789");
        assert_eq!(cli.recipient, "+79098765432");
        assert_eq!(cli.message, "Hello");
        assert_eq!(cli.config, "config.toml");
        assert!(!cli.debug);
    }

    #[test]
    fn rejects_missing_message() {
        let result = Cli::try_parse_from(["sms-client", "-s", "+7900", "-r", "+7901"]);
        assert!(result.is_err());
    }

    #[test]
    fn long_flags_and_debug() {
        let cli = Cli::try_parse_from([
            "sms-client",
            "--sender",
            "a",
            "--recipient",
            "b",
            "--message",
            "c",
            "--config",
            "/etc/sms.toml",
            "--debug",
        ])
        .unwrap();
        assert_eq!(cli.config, "/etc/sms.toml");
        assert!(cli.debug);
    }
}
