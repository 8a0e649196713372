use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use schedule_validator::{
    parse_timezone, upcoming_within, Appointment, AppointmentDraft, ExistingAppointment,
    SchedulingPolicy, ValidationPipeline,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "schedval",
    version,
    about = "Validate appointment drafts and list upcoming appointments"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a draft against business hours and the customer's bookings
    Validate {
        /// Draft JSON file
        #[arg(long)]
        draft: PathBuf,

        /// JSON array of the customer's existing appointments ({id, start, end})
        #[arg(long)]
        existing: Option<PathBuf>,

        /// Operator's IANA timezone (defaults to $TZ)
        #[arg(long)]
        zone: Option<String>,

        /// Scheduling policy JSON file
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List appointments starting soon after a given instant
    Upcoming {
        /// JSON array of stored appointments
        #[arg(long)]
        appointments: PathBuf,

        /// Reference instant (RFC 3339)
        #[arg(long)]
        now: String,

        /// Lookahead in minutes (defaults to the policy's window)
        #[arg(long)]
        window_minutes: Option<i64>,

        /// Scheduling policy JSON file
        #[arg(long)]
        policy: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Validate {
            draft,
            existing,
            zone,
            policy,
            json,
        } => {
            let policy = load_policy(policy.as_deref())?;
            let zone_name = zone
                .or_else(|| std::env::var("TZ").ok())
                .context("no --zone given and TZ is not set")?;
            let local_zone = parse_timezone(&zone_name)?;

            let draft: AppointmentDraft = read_json(&draft)?;
            let existing: Vec<ExistingAppointment> = match existing {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            debug!(zone = %local_zone, existing = existing.len(), "validating draft");

            let result = ValidationPipeline::new(local_zone, &policy).validate(&draft, &existing);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{result}");
            }
            Ok(if result.ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }

        Command::Upcoming {
            appointments,
            now,
            window_minutes,
            policy,
        } => {
            let policy = load_policy(policy.as_deref())?;
            let now = DateTime::parse_from_rfc3339(&now)
                .with_context(|| format!("invalid --now '{now}'"))?
                .with_timezone(&Utc);
            let window = match window_minutes {
                Some(m) if m > 0 => Duration::try_minutes(m)
                    .with_context(|| format!("--window-minutes out of range, got {m}"))?,
                Some(m) => anyhow::bail!("--window-minutes must be positive, got {m}"),
                None => policy.upcoming_window,
            };

            let appointments: Vec<Appointment> = read_json(&appointments)?;
            let due = upcoming_within(&appointments, now, window);
            if due.is_empty() {
                println!("You have no upcoming appointments.");
            }
            for appt in due {
                println!(
                    "You have an upcoming appointment with ID {} at {}.",
                    appt.id,
                    appt.interval.start().to_rfc3339()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_policy(path: Option<&Path>) -> Result<SchedulingPolicy> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading policy {}", path.display()))?;
            SchedulingPolicy::from_json_str(&text)
                .with_context(|| format!("loading policy {}", path.display()))
        }
        None => Ok(SchedulingPolicy::default()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
