use clap::{error::Error as ClapError, error::ErrorKind};
use std::env;
use std::env::VarError;
use std::fs;
use std::path::{Path, PathBuf};

use crate::secret::Secret;

pub const SECRET_ENV_NAME: &str = "NR_JWT_SECRET";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("reading secret file `{0}`: `{1}`")]
    SecretFile(String, String),
    #[error("no secret provided: use `--secret`, `--secret-file` or `NR_JWT_SECRET`")]
    MissingSecret,
    #[error("secret must not be empty")]
    EmptySecret,
}

/// Where the signing secret comes from.
///
/// An explicit value has priority over a secret file, which has priority over the environment.
#[derive(Debug, Default, Clone)]
pub struct SecretConfig {
    value: Option<Secret>,
    file: Option<PathBuf>,
}

impl SecretConfig {
    pub fn new(value: Option<String>, file: Option<PathBuf>) -> Self {
        Self {
            value: value.map(Secret::from),
            file,
        }
    }

    /// Returns the configured secret, looking it up in the environment if needed.
    pub fn resolve(self) -> Result<Secret, ConfigError> {
        self.resolve_with(env::var)
    }

    /// Same as [SecretConfig::resolve] but using `env_var` to read the environment.
    fn resolve_with<F>(self, env_var: F) -> Result<Secret, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, VarError>,
    {
        let secret = match (self.value, self.file) {
            (Some(value), _) => value,
            (None, Some(path)) => read_secret_file(&path)?,
            (None, None) => env_var(SECRET_ENV_NAME)
                .map(Secret::from)
                .map_err(|_| ConfigError::MissingSecret)?,
        };

        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(secret)
    }
}

/// Reads a secret file, dropping a single trailing line break.
fn read_secret_file(path: &Path) -> Result<Secret, ConfigError> {
    let mut contents = fs::read(path)
        .map_err(|e| ConfigError::SecretFile(path.display().to_string(), e.to_string()))?;

    if contents.ends_with(b"\n") {
        contents.pop();
        if contents.ends_with(b"\r") {
            contents.pop();
        }
    }
    Ok(Secret::from(contents))
}

impl From<ConfigError> for ClapError {
    fn from(err: ConfigError) -> ClapError {
        ClapError::raw(ErrorKind::InvalidValue, err.to_string())
    }
}
