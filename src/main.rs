use std::{env, process};

use tracing_subscriber::EnvFilter;

use venue_client::{DeleteButton, DeleteOutcome, LogNavigator, Timestamp, VenueClient};

mod cli;

use cli::Command;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(concat!(env!("CARGO_CRATE_NAME"), "=info")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_timestamps(inputs: &[String]) -> bool {
    let mut ok = true;

    for input in inputs {
        match input.parse::<Timestamp>() {
            Ok(timestamp) => println!("{timestamp}"),
            Err(err) => {
                eprintln!("Failed to parse `{input}`: {err}");
                ok = false;
            }
        }
    }

    ok
}

async fn delete_venue(client: VenueClient, venue_id: String) -> bool {
    let button = DeleteButton::new(client, venue_id, LogNavigator);

    match button.click().await {
        Ok(DeleteOutcome::Redirected(url)) => {
            println!("{url}");
            true
        }
        Ok(DeleteOutcome::Completed(status)) => {
            eprintln!("Server answered {status} without redirecting");
            true
        }
        Err(err) => {
            eprintln!("Failed to delete venue `{}`: {err}", button.venue_id());
            false
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = cli::parse(env::args().skip(1).collect());

    let ok = match args.command {
        Command::Parse(inputs) => parse_timestamps(&inputs),
        Command::Delete(venue_id) => delete_venue(VenueClient::new(args.base_url), venue_id).await,
    };

    if !ok {
        process::exit(1);
    }
}
