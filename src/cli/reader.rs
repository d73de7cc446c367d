use std::io::{Read, Write};
use std::path::Path;

use clap::ArgEnum;

use crate::error::Result;
use crate::ruleset::RulesetConfig;

const STDIO: &str = "-";

#[derive(ArgEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// An explicit format wins, then the file extension, then JSON.
    pub fn detect(path: Option<&Path>, explicit: Option<ConfigFormat>) -> Self {
        if let Some(format) = explicit {
            return format;
        }

        match path
            .and_then(|path| path.extension())
            .and_then(|extension| extension.to_str())
        {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

pub fn read_config(content: &str, format: ConfigFormat) -> Result<RulesetConfig> {
    let config: RulesetConfig = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
    };

    Ok(config)
}

pub fn write_config(config: &RulesetConfig, format: ConfigFormat) -> Result<String> {
    let mut content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    if !content.ends_with('\n') {
        content.push('\n');
    }

    Ok(content)
}

/// Reads a config from `input`, where `-` is stdin.
pub fn load_config(input: &Path, format: Option<ConfigFormat>) -> Result<RulesetConfig> {
    let content = if input == Path::new(STDIO) {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        content
    } else {
        std::fs::read_to_string(input)?
    };

    let format = ConfigFormat::detect(Some(input), format);
    read_config(&content, format)
}

/// Writes a config to `output`, or stdout when there is none or it is `-`.
pub fn save_config(
    config: &RulesetConfig,
    output: Option<&Path>,
    format: Option<ConfigFormat>,
) -> Result<()> {
    let output = output.filter(|path| *path != Path::new(STDIO));
    let content = write_config(config, ConfigFormat::detect(output, format))?;

    match output {
        Some(path) => std::fs::write(path, content)?,
        None => std::io::stdout().write_all(content.as_bytes())?,
    }

    Ok(())
}
