/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When WizardConfig schema changes
*/

use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};
use std::path::{Path, PathBuf};

use street_art_wizard::config::{StorageConfig, SupabaseConfig, WizardConfig};

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Welcome to Street Art Wizard Init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through connecting the wizard to your Supabase project.").dim()
    );

    let theme = ColorfulTheme::default();

    if output.exists() {
        let overwrite = Confirm::with_theme(&theme)
            .with_prompt(format!("{} already exists. Overwrite?", output.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            bail!("aborted; {} left untouched", output.display());
        }
    }

    println!("\n{}", style("--- Supabase ---").bold());
    let url: String = Input::with_theme(&theme)
        .with_prompt("Project URL (e.g., https://xyz.supabase.co)")
        .interact_text()?;

    let anon_key: String = Password::with_theme(&theme)
        .with_prompt("Anon key")
        .interact()?;

    let defaults = WizardConfig::default();

    println!("\n{}", style("--- Storage ---").bold());
    let table: String = Input::with_theme(&theme)
        .with_prompt("Submission table")
        .default(defaults.table.clone())
        .interact_text()?;

    let artist_bucket: String = Input::with_theme(&theme)
        .with_prompt("Artist photo bucket")
        .default(defaults.storage.artist_bucket.clone())
        .interact_text()?;

    let artwork_bucket: String = Input::with_theme(&theme)
        .with_prompt("Artwork image bucket")
        .default(defaults.storage.artwork_bucket.clone())
        .interact_text()?;

    let config = WizardConfig {
        supabase: SupabaseConfig {
            url: url.trim().to_string(),
            anon_key: anon_key.trim().to_string(),
            ..SupabaseConfig::default()
        },
        storage: StorageConfig {
            artist_bucket,
            artwork_bucket,
        },
        table,
        timing: defaults.timing,
    };
    config.validate(false).context("entered configuration is incomplete")?;

    write_config(&config, &output)?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!("Configuration written to: {}", style(output.display()).cyan());

    Ok(())
}

pub(crate) fn write_config(config: &WizardConfig, output: &Path) -> Result<()> {
    let yaml = config.to_yaml()?;
    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))
}
