//! Terminal popup: shows the background's current state, and with `--follow`
//! keeps re-rendering on every broadcast.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use job_helper::popup::client::PopupClient;
use job_helper::popup::{render, resolve_pulled_state};

#[derive(Parser)]
#[command(name = "job-helper-popup")]
#[command(about = "Shows the job helper's current state in the terminal")]
struct Cli {
    /// Address of the running background process.
    #[arg(long, env = "BACKGROUND_URL", default_value = "http://localhost:8080")]
    background_url: String,

    /// Keep printing every broadcast after the first render.
    #[arg(long)]
    follow: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = PopupClient::new(cli.background_url);

    let state = resolve_pulled_state(client.last_known_state().await);
    println!("{}", render(&state).to_text());

    if cli.follow {
        client
            .follow(|state| {
                println!();
                println!("{}", render(&state).to_text());
            })
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_follow_flag_and_url() {
        let cli = Cli::try_parse_from([
            "job-helper-popup",
            "--follow",
            "--background-url",
            "http://127.0.0.1:9000",
        ])
        .unwrap();
        assert!(cli.follow);
        assert_eq!(cli.background_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["job-helper-popup", "--folow"]).is_err());
    }
}
