use std::env;
use std::io::Write;

use crate::config::ProfileConfig;
use crate::error::{Error, Result};
use crate::selector::{self, SelectError, SelectMode};

pub const PROFILE_ENV: &str = "AWS_PROFILE";

/// Picks a profile from the AWS config and exports it as `AWS_PROFILE`.
///
/// Only this process (and anything it spawns) sees the variable; the invoking
/// shell has to pick it up through a wrapper, see README.md.
pub fn execute(out: &mut impl Write) -> Result<String> {
    let config = ProfileConfig::new().map_err(Error::ConfigLoad)?;
    run(config, out, |profiles| {
        selector::select(profiles, SelectMode::Single)
    })
}

pub fn run<W, F>(config: ProfileConfig, out: &mut W, pick: F) -> Result<String>
where
    W: Write,
    F: FnOnce(&[String]) -> std::result::Result<Vec<usize>, SelectError>,
{
    let profiles = config.get_profiles();
    if profiles.is_empty() {
        return Err(Error::NoProfilesConfigured(
            config.config_path().display().to_string(),
        ));
    }

    let indices = pick(profiles)?;
    let selected = indices
        .first()
        .and_then(|&i| profiles.get(i))
        .ok_or(SelectError::NothingSelected)?;

    let current = set_profile(selected)?;
    log::debug!("{PROFILE_ENV} set to {current}");

    writeln!(out, "current profile {selected}")?;
    writeln!(out, "{PROFILE_ENV}: {current}")?;

    Ok(current)
}

fn set_profile(name: &str) -> Result<String> {
    if name.contains('\0') {
        return Err(Error::EnvironmentSet(format!(
            "profile name {name:?} contains a NUL byte"
        )));
    }

    env::set_var(PROFILE_ENV, name);

    let current = env::var(PROFILE_ENV).map_err(|e| Error::EnvironmentSet(e.to_string()))?;
    if current != name {
        return Err(Error::EnvironmentSet(format!(
            "{PROFILE_ENV} reads back as {current:?} instead of {name:?}"
        )));
    }

    Ok(current)
}
