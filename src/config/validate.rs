// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{GuilaunchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::GuilaunchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.launch, raw.child, raw.display))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_launch(cfg)?;
    validate_child(cfg)?;
    validate_display(cfg)?;
    Ok(())
}

fn validate_launch(cfg: &RawConfigFile) -> Result<()> {
    if let Some(binary) = &cfg.launch.binary {
        if binary.as_os_str().is_empty() {
            return Err(GuilaunchError::ConfigError(
                "[launch].binary must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_child(cfg: &RawConfigFile) -> Result<()> {
    if !is_valid_env_key(&cfg.child.logging_env) {
        return Err(GuilaunchError::ConfigError(format!(
            "[child].logging_env is not a valid variable name: '{}'",
            cfg.child.logging_env
        )));
    }

    for key in cfg.child.env.keys() {
        if !is_valid_env_key(key) {
            return Err(GuilaunchError::ConfigError(format!(
                "[child.env] has an invalid variable name: '{key}'"
            )));
        }
    }
    Ok(())
}

fn validate_display(cfg: &RawConfigFile) -> Result<()> {
    if cfg.display.command.trim().is_empty() {
        return Err(GuilaunchError::ConfigError(
            "[display].command must not be empty".to_string(),
        ));
    }

    if cfg.display.startup_timeout_ms == 0 {
        return Err(GuilaunchError::ConfigError(
            "[display].startup_timeout_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn is_valid_env_key(key: &str) -> bool {
    !key.is_empty() && !key.contains('=') && !key.contains('\0')
}
