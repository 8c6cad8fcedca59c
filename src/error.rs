use thiserror::Error;

use crate::selector::SelectError;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FLAG_PARSE: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

#[derive(Debug, Error)]
pub enum Error {
    #[error("flag parse error: {0}")]
    FlagParse(#[from] clap::Error),

    #[error("aws config load error: {0:#}")]
    ConfigLoad(anyhow::Error),

    #[error("no profiles configured in {0}")]
    NoProfilesConfigured(String),

    #[error("profile selection error: {0}")]
    Selector(#[from] SelectError),

    #[error("set environment variable error: {0}")]
    EnvironmentSet(String),

    #[error("write output error: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::FlagParse(_) => EXIT_FLAG_PARSE,
            _ => EXIT_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_errors_use_the_error_exit_code() {
        let errors = vec![
            Error::ConfigLoad(anyhow::anyhow!("missing")),
            Error::NoProfilesConfigured("/tmp/config".into()),
            Error::Selector(SelectError::Cancelled),
            Error::EnvironmentSet("bad value".into()),
        ];

        for err in errors {
            assert_eq!(err.exit_code(), EXIT_ERROR, "{err}");
        }
    }

    #[test]
    fn config_load_error_shows_the_whole_cause_chain() {
        let cause = anyhow::anyhow!("No such file or directory").context("Failed to read /x/config");
        let err = Error::ConfigLoad(cause);
        assert_eq!(
            err.to_string(),
            "aws config load error: Failed to read /x/config: No such file or directory"
        );
    }
}
