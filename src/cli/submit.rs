//! `voice-intake submit`: the form itself.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};

use super::prompt::{LinePrompter, NoPrompt, Prompter};
use crate::adapters::{ObjectStore, S3Store, WavFileCapture};
use crate::config::{ConfigError, ProjectCatalog, ResolvedConfig};
use crate::core::{FormCollector, FormDefaults, SubmitOutcome};
use crate::domain::ProjectConfig;

/// Arguments of `submit`
#[derive(Debug, Clone, Default)]
pub struct SubmitArgs {
    pub mode: Option<String>,
    pub fields: Vec<(String, String)>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub audio: Option<PathBuf>,
    pub no_input: bool,
    pub dry_run: bool,
    pub json: bool,
}

/// Pick the project: explicit mode, the only project, or an interactive choice.
///
/// A skipped choice is [`ConfigError::NoModeSelected`]; a failing prompt is
/// returned as is.
pub fn select_project<'a>(
    catalog: &'a ProjectCatalog,
    mode: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<&'a ProjectConfig> {
    match catalog.select(mode) {
        Err(ConfigError::NoModeSelected(modes)) => {
            let choice = prompter
                .choose("Project", &modes)?
                .ok_or(ConfigError::NoModeSelected(modes))?;
            Ok(catalog.select(Some(choice.as_str()))?)
        }
        result => Ok(result?),
    }
}

/// Fill a form from flags, then prompt for anything still unselected
pub fn fill_form(
    form: &mut FormCollector<'_>,
    args: &SubmitArgs,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    for (key, value) in &args.fields {
        form.select(key, value)?;
    }

    let project = form.project();
    for field in &project.fields {
        if form.selection(&field.key).is_some() {
            continue;
        }
        if let Some(choice) = prompter.choose(&field.label, &field.options)? {
            form.select(&field.key, &choice)?;
        }
    }

    if let Some(date) = args.date {
        form.set_date(date);
    }
    if let Some(time) = args.time {
        form.set_time(time);
    }

    if let Some(path) = &args.audio {
        let mut capture = WavFileCapture::open(path)?;
        form.capture(&mut capture);
    }

    Ok(())
}

/// Print the outcome; returns whether the submission succeeded
pub fn report(outcome: &SubmitOutcome, json: bool) -> Result<bool> {
    match outcome {
        SubmitOutcome::Invalid(e) => {
            eprintln!("🚫 {}", e);
            Ok(false)
        }
        SubmitOutcome::Uploaded(summary) => {
            eprintln!("✅ Submission received!");
            eprintln!("☁️ Uploaded to S3 as `{}`", summary.key);
            if let Some(location) = &summary.location {
                eprintln!("🔗 {}", location);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(summary)?);
            } else {
                println!("\nSubmission Summary");
                println!("{}", summary);
            }
            Ok(true)
        }
        SubmitOutcome::Failed { key, error } => {
            eprintln!("✅ Submission received!");
            eprintln!("❌ Upload failed: {}", error);
            eprintln!("   Key: {}", key);
            Ok(false)
        }
    }
}

/// Run one form submission against `store`
pub async fn run_form(
    project: &ProjectConfig,
    defaults: FormDefaults,
    args: &SubmitArgs,
    store: &dyn ObjectStore,
    prompter: &mut dyn Prompter,
) -> Result<SubmitOutcome> {
    let mut form = FormCollector::new(project, defaults);
    fill_form(&mut form, args, prompter)?;
    Ok(form.submit(store).await)
}

/// Execute `submit`
pub async fn execute(secrets: Option<&Path>, args: SubmitArgs) -> Result<()> {
    // Fatal before anything is shown
    let config = ResolvedConfig::load(secrets).context("Configuration failed")?;

    let interactive = !args.no_input && std::io::stdin().is_terminal();
    let mut stdio = LinePrompter::stdio();
    let mut silent = NoPrompt;
    let prompter: &mut dyn Prompter = if interactive {
        &mut stdio
    } else {
        &mut silent
    };

    let project = select_project(&config.projects, args.mode.as_deref(), prompter)?;

    eprintln!("🐾 {}", project.title);
    if !project.subtitle.is_empty() {
        eprintln!("   {}", project.subtitle);
    }
    if !project.audio_prompt.is_empty() {
        eprintln!("🎧 {}", project.audio_prompt);
    }

    let defaults = FormDefaults::now(&config.settings);

    if args.dry_run {
        let mut form = FormCollector::new(project, defaults);
        fill_form(&mut form, &args, prompter)?;
        match form.object_key() {
            Ok(key) => {
                println!("{}", key);
                return Ok(());
            }
            Err(e) => {
                eprintln!("🚫 {}", e);
                std::process::exit(1);
            }
        }
    }

    let store = S3Store::new(&config.credentials).context("Configuration failed")?;
    let outcome = run_form(project, defaults, &args, &store, prompter).await?;

    if !report(&outcome, args.json)? {
        std::process::exit(1);
    }
    Ok(())
}
