use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use crate::config::Config;
use crate::emails::parse_emails;
use crate::services::upstream::{UpstreamClient, UpstreamError};

#[derive(Debug, Parser)]
#[command(version, about = "Invite gateway for a team subscription")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Send one invite call for the given addresses and print the raw upstream reply
    Invite {
        #[arg(required = true)]
        emails: Vec<String>,
    },
    /// Fetch subscription stats once and print them
    Status,
}

const EXIT_USAGE: u8 = 2;

fn client(config: &Config) -> Result<UpstreamClient, ExitCode> {
    UpstreamClient::new(&config.upstream_base_url, config.credentials.clone()).map_err(|e| {
        println!("{}", json!({ "error": e.to_string() }));
        ExitCode::FAILURE
    })
}

pub async fn invite(config: &Config, args: &[String]) -> ExitCode {
    if !config.credentials.is_complete() {
        println!("{}", json!({ "status": 0, "body": "ACCOUNT_ID/AUTHORIZATION_TOKEN missing" }));
        return ExitCode::from(EXIT_USAGE);
    }

    let emails = parse_emails(&args.join(","));
    if emails.valid.is_empty() {
        println!("{}", json!({ "status": 0, "body": "email required" }));
        return ExitCode::from(EXIT_USAGE);
    }

    let upstream = match client(config) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match upstream.send_invite(&emails.valid).await {
        Ok(outcome) => {
            println!("{}", json!({ "status": outcome.status, "body": outcome.body }));
            if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            println!("{}", json!({ "status": 0, "body": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}

pub async fn status(config: &Config) -> ExitCode {
    let upstream = match client(config) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match upstream.fetch_stats().await {
        Ok(stats) => {
            println!("{}", json!(stats));
            ExitCode::SUCCESS
        }
        Err(e) => {
            let report = match &e {
                UpstreamError::Status { status, body } => {
                    json!({ "error": e.to_string(), "status": status, "body": body })
                }
                _ => json!({ "error": e.to_string() }),
            };
            println!("{report}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn invite_requires_addresses() {
        assert!(Cli::try_parse_from(["gateway", "invite"]).is_err());

        let cli = Cli::try_parse_from(["gateway", "invite", "a@b.com", "c@d.com"]).unwrap();
        match cli.command {
            Some(Command::Invite { emails }) => assert_eq!(emails, vec!["a@b.com", "c@d.com"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["gateway"]).unwrap();
        assert!(cli.command.is_none());
    }
}
