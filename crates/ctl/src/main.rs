use anyhow::Context;
use clap::{Parser, Subcommand};
use pitwall_core::ResolvedSession;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "pitwallctl", version, about = "Query a pitwall daemon")]
struct Args {
    /// Daemon base URL.
    #[arg(long, default_value = "http://127.0.0.1:4000")]
    daemon: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Nearest session that has not started yet.
    NextSession,
    /// Current season calendar.
    Schedule,
    /// Results of the most recent race this season.
    LastResults,
    DriverStandings {
        #[arg(long, default_value = "current")]
        season: String,
    },
    ConstructorStandings {
        #[arg(long, default_value = "current")]
        season: String,
    },
    Results {
        #[arg(long, default_value = "current")]
        season: String,
        #[arg(long, default_value = "last")]
        round: String,
    },
    Circuits {
        #[arg(long, default_value = "current")]
        season: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = reqwest::Client::new();
    let daemon = args.daemon.trim_end_matches('/');

    let path = match args.cmd {
        Cmd::NextSession => {
            let url = format!("{daemon}/api/next-session");
            let resp = client.get(&url).send().await.with_context(|| format!("GET {url}"))?;
            if resp.status() == reqwest::StatusCode::NOT_FOUND {
                println!("no upcoming session");
                return Ok(());
            }
            let next: ResolvedSession = resp.error_for_status()?.json().await?;
            println!(
                "{} (round {}): {} at {}",
                next.race_name,
                next.round,
                next.session_key,
                pitwall_core::to_iso_utc(&next.date_time_utc)
            );
            return Ok(());
        }
        Cmd::Schedule => "/api/schedule".to_string(),
        Cmd::LastResults => "/api/schedule/last-results".to_string(),
        Cmd::DriverStandings { season } => format!("/api/standings/drivers/{season}"),
        Cmd::ConstructorStandings { season } => format!("/api/standings/constructors/{season}"),
        Cmd::Results { season, round } => format!("/api/results/{season}/{round}"),
        Cmd::Circuits { season } => format!("/api/circuits/{season}"),
    };

    let url = format!("{daemon}{path}");
    let resp: Value = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?
        .error_for_status()?
        .json()
        .await?;
    println!("{}", serde_json::to_string_pretty(&resp)?);

    Ok(())
}
