use anyhow::{Context, Result};
use ini::{Ini, ParseOption};
use std::fs;
use std::path::{Path, PathBuf};

/// Section headers carrying this prefix name a profile; everything after it is the profile name.
const PROFILE_PREFIX: &str = "profile ";

pub const CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";

#[cfg(windows)]
const HOME_ENV: &str = "USERPROFILE";
#[cfg(not(windows))]
const HOME_ENV: &str = "HOME";

/// Profiles read from the AWS CLI config file, in declaration order.
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    config_path: PathBuf,
    profiles: Vec<String>,
}

impl ProfileConfig {
    pub fn new() -> Result<Self> {
        let config_path = config_path_from(|key| std::env::var(key).ok())?;
        Self::load(config_path)
    }

    pub fn load(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();
        log::debug!("loading aws config from {}", config_path.display());

        let profiles = load_profiles(&config_path)?;
        log::debug!("found {} profile section(s)", profiles.len());

        Ok(Self {
            config_path,
            profiles,
        })
    }

    pub fn get_profiles(&self) -> &[String] {
        &self.profiles
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

fn load_profiles(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // Values are taken verbatim: quotes and backslashes mean nothing to the AWS CLI
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    };
    let ini = Ini::load_from_str_opt(&contents, options)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    // The general section (keys before any header) has no name and is not a profile.
    Ok(ini.sections().flatten().map(logical_name).collect())
}

/// Strips the `profile ` convention from a raw section header.
pub fn logical_name(section: &str) -> String {
    match section.strip_prefix(PROFILE_PREFIX) {
        Some(name) => name.trim().to_string(),
        None => section.to_string(),
    }
}

/// Resolves `<home>/.aws/config`, honouring `AWS_CONFIG_FILE` when it is set.
pub fn config_path_from<F>(lookup: F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(CONFIG_FILE_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let home = lookup(HOME_ENV)
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .context("Unable to determine home directory")?;

    Ok(home.join(".aws").join("config"))
}
