use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Password, Select, Text};
use skylog_core::{ApiClient, Config, HistoryEntry, HttpTransport, MockServer};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skylog", version, about = "Weather lookup client with per-user query history")]
pub struct Cli {
    /// Backend base URL; overrides the configured one.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account on the backend.
    Register {
        /// Username; prompted for when absent.
        username: Option<String>,
    },

    /// Log in and keep the session for later commands.
    Login {
        /// Username; prompted for when absent.
        username: Option<String>,
    },

    /// Show current weather for a city.
    Weather {
        /// City name, e.g. "Paris".
        city: String,
    },

    /// List your past weather queries, most recent first.
    History,

    /// Forget the locally stored session.
    Logout,

    /// Check that the backend is reachable.
    Health,

    /// Interactive tour against an in-process mock backend.
    Demo,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        if let Some(base_url) = self.base_url {
            config.base_url = Some(base_url);
        }

        let client = ApiClient::new(HttpTransport::new(config.base_url()));

        match self.command {
            Command::Register { username } => {
                let (username, password) = ask_credentials(username, true)?;
                client.register(&username, &password).await?;
                println!("Registered '{username}'. You can now run `skylog login`.");
            }
            Command::Login { username } => {
                let (username, password) = ask_credentials(username, false)?;
                let session = client.login(&username, &password).await?;
                config.set_session(session.token, session.username.clone());
                config.save()?;
                println!("Logged in as '{}'.", session.username);
            }
            Command::Weather { city } => {
                let session = config.session()?;
                let report = client.weather(&city, &session.token).await?;
                println!("{}", report.summary.trim_end());
            }
            Command::History => {
                let session = config.session()?;
                let entries = client.history(&session.token).await?;
                print_history(&entries);
            }
            Command::Logout => {
                if config.clear_session() {
                    config.save()?;
                    println!("Logged out.");
                } else {
                    println!("No stored session.");
                }
            }
            Command::Health => {
                let health = client.health().await?;
                println!("Backend is {} at {}.", health.status, config.base_url());
            }
            Command::Demo => run_demo().await?,
        }

        Ok(())
    }
}

fn ask_credentials(username: Option<String>, confirm: bool) -> Result<(String, String)> {
    let username = match username {
        Some(name) => name,
        None => Text::new("Username:").prompt()?,
    };

    let mut password = Password::new("Password:");
    if !confirm {
        password = password.without_confirmation();
    }
    let password = password.prompt()?;

    Ok((username, password))
}

fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No queries yet.");
        return;
    }

    for entry in entries {
        let local = entry.timestamp.with_timezone(&Local);
        println!("{}  {}", local.format("%Y-%m-%d %H:%M"), entry.city);
        for line in entry.summary.lines() {
            println!("    {line}");
        }
    }
}

/// Full register/login/query loop against an in-process mock backend,
/// pre-seeded with the `demo`/`demo` account.
async fn run_demo() -> Result<()> {
    println!("Demo mode: in-memory backend, account 'demo'/'demo' is pre-registered.");

    let client = ApiClient::new(MockServer::seeded());

    let username = Text::new("Username:").with_default("demo").prompt()?;
    let password = Password::new("Password:").without_confirmation().prompt()?;
    let session = client.login(&username, &password).await?;
    println!("Logged in as '{}'.", session.username);

    loop {
        let action = Select::new("Action:", vec!["weather", "history", "quit"]).prompt()?;
        match action {
            "weather" => {
                let city = Text::new("City:").prompt()?;
                match client.weather(&city, &session.token).await {
                    Ok(report) => println!("{}", report.summary.trim_end()),
                    Err(err) => println!("Error: {err}"),
                }
            }
            "history" => {
                let entries = client.history(&session.token).await?;
                print_history(&entries);
            }
            _ => break,
        }
    }

    Ok(())
}
