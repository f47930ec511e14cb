//! Command-line interface for voice-intake.
//!
//! Provides commands for submitting a recording, listing the configured
//! projects, inspecting the resolved configuration and previewing keys.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};

use crate::config::ResolvedConfig;
use crate::core::build_key;

pub mod prompt;
pub mod submit;

/// voice-intake - Record metadata and audio, upload to S3
#[derive(Parser, Debug)]
#[command(name = "voice-intake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Secrets document (defaults to .intake/secrets.yaml discovery)
    #[arg(long, global = true, env = "INTAKE_SECRETS")]
    pub secrets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill in the form and upload the recording
    Submit {
        /// Project mode (prompted for when several are configured)
        #[arg(short, long)]
        mode: Option<String>,

        /// Field selection as key=value (repeatable)
        #[arg(short, long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,

        /// Recording date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Recording time, HH:MM or HH:MM:SS (default: now in APP_TIMEZONE)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,

        /// WAV file holding the recording
        #[arg(short, long)]
        audio: Option<PathBuf>,

        /// Never prompt; unset fields stay unset
        #[arg(long)]
        no_input: bool,

        /// Validate and print the object key without uploading
        #[arg(long)]
        dry_run: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured projects
    Projects,

    /// Show resolved configuration (debug)
    Config,

    /// Print the object key for the given values
    Key {
        /// Storage prefix
        #[arg(long)]
        prefix: String,

        /// Field values in display order (repeatable)
        #[arg(long = "value")]
        values: Vec<String>,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Time (HH:MM or HH:MM:SS)
        #[arg(long, value_parser = parse_time)]
        time: NaiveTime,
    },
}

/// Parse `key=value`
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Parse `HH:MM:SS` or `HH:MM`
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| format!("invalid time '{}', expected HH:MM or HH:MM:SS", s))
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let secrets = self.secrets.as_deref();
        match self.command {
            Commands::Submit {
                mode,
                fields,
                date,
                time,
                audio,
                no_input,
                dry_run,
                json,
            } => {
                let args = submit::SubmitArgs {
                    mode,
                    fields,
                    date,
                    time,
                    audio,
                    no_input,
                    dry_run,
                    json,
                };
                submit::execute(secrets, args).await
            }
            Commands::Projects => list_projects(secrets),
            Commands::Config => show_config(secrets),
            Commands::Key {
                prefix,
                values,
                date,
                time,
            } => {
                println!("{}", build_key(&prefix, values.as_slice(), date, time));
                Ok(())
            }
        }
    }
}

/// List configured projects and their fields
fn list_projects(secrets: Option<&Path>) -> Result<()> {
    let config = ResolvedConfig::load(secrets).context("Configuration failed")?;

    for project in config.projects.iter() {
        println!("{} - {}", project.name, project.title);
        println!("  Prefix: {}/", project.storage_prefix);
        for field in &project.fields {
            println!(
                "  {:<12} {:<20} {}",
                field.key,
                field.label,
                field.options.join(", ")
            );
        }
        println!();
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(secrets: Option<&Path>) -> Result<()> {
    let cfg = ResolvedConfig::load(secrets).context("Configuration failed")?;
    let creds = &cfg.credentials;

    println!("voice-intake Configuration");
    println!("══════════════════════════════════════════════════════════════");
    println!();
    println!(
        "Secrets file: {}",
        cfg.secrets_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("Credentials from: {}", cfg.credential_source);
    println!();
    println!("Storage:");
    println!("  Bucket:        {}", creds.bucket);
    println!("  Region:        {}", creds.region);
    println!("  Access key:    {}", mask(&creds.access_key_id));
    println!(
        "  Endpoint:      {}",
        creds.endpoint.as_deref().unwrap_or("(AWS)")
    );
    println!();
    println!("Time zone: {}", cfg.settings.timezone_name);
    if cfg.settings.timezone.is_none() {
        println!("  (unknown zone, using system local time)");
    }
    println!();
    println!("Projects: {}", cfg.projects.modes().join(", "));

    Ok(())
}

/// Show only the first four characters of an identifier
fn mask(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{}…", visible)
}
