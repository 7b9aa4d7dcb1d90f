use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};
use crate::scoring::Preset;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    Ok(parse_yes_no(&input, default_yes))
}

fn parse_yes_no(input: &str, default_yes: bool) -> bool {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        default_yes
    } else {
        input == "y" || input == "yes"
    }
}

/// Config with the preset's rules spelled out so they can be edited in place
pub fn default_config(preset: Preset) -> Config {
    Config {
        preset: Some(preset),
        rules: Some(preset.rules()),
        inputs: Vec::new(),
        output_dir: Some(PathBuf::from("reports")),
    }
}

/// Render a config as YAML. Strings are always quoted so padded keywords
/// such as `" vp "` keep their spaces when read back.
pub fn render_config(config: &Config) -> Result<String> {
    let options = serde_saphyr::ser_options! {
        quote_all: true,
    };
    serde_saphyr::to_string_with_options(config, options)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
}

/// Write a default config file.
///
/// If `path` is None the default config path is used. An existing file is
/// only replaced after confirmation, or unconditionally with `force`.
/// Returns the path written, or None when the user declined.
pub fn run_init(path: Option<PathBuf>, preset: Preset, force: bool) -> Result<Option<PathBuf>> {
    let config_path = match path {
        Some(path) => path,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            return Ok(None);
        }
    }

    write_config(&config_path, &default_config(preset))?;
    Ok(Some(config_path))
}

fn write_config(config_path: &Path, config: &Config) -> Result<()> {
    let yaml = render_config(config)?;

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    tracing::info!(path = %config_path.display(), "wrote config");
    Ok(())
}
