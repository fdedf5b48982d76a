//! yellowpay: command-line access to the Yellow invoice API.
//!
//! Credentials come from `YELLOW_*` environment variables (or a `.env` file).

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use yellowpay_sdk::config::YellowConfig;
use yellowpay_sdk::telemetry;
use yellowpay_sdk::{InvoiceGateway, InvoicePayload, InvoiceResponse, YellowClient};

/// Yellow Pay command-line client
#[derive(Parser, Debug)]
#[command(name = "yellowpay")]
#[command(version, about = "Create and inspect Yellow invoices, verify IPN callbacks")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an invoice from KEY=VALUE fields
    Create {
        /// Invoice fields, e.g. base_price=10 base_ccy=USD
        #[arg(required = true, value_parser = parse_key_val)]
        fields: Vec<(String, String)>,
    },

    /// Check the status of an invoice
    Status {
        /// Invoice id returned by `create`
        id: String,
    },

    /// Verify a received IPN callback
    VerifyIpn {
        /// Full callback URL the notification was delivered to
        #[arg(long)]
        url: String,

        /// Value of the API-Sign header
        #[arg(long)]
        signature: String,

        /// Value of the API-Nonce header
        #[arg(long)]
        nonce: String,

        /// Raw request body
        #[arg(long)]
        body: String,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match YellowConfig::load_validated() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init_tracing(&config.log_level, config.log_json) {
        eprintln!("Warning: {}", e);
    }

    let client = match YellowClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Command::Create { fields } => {
            let payload: InvoicePayload = fields.into_iter().collect();
            print_invoice(client.create_invoice(&payload).await)
        }
        Command::Status { id } => print_invoice(client.check_invoice_status(&id).await),
        Command::VerifyIpn {
            url,
            signature,
            nonce,
            body,
        } => {
            let verification = client.check_ipn(&url, &signature, &nonce, &body);
            if verification.is_valid() {
                println!("valid");
                ExitCode::SUCCESS
            } else {
                println!("invalid: {}", verification);
                ExitCode::FAILURE
            }
        }
    }
}

fn print_invoice(result: Result<InvoiceResponse, yellowpay_sdk::YellowError>) -> ExitCode {
    let invoice = match result {
        Ok(invoice) => invoice,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&invoice.into_inner()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
