use std::path::PathBuf;

use logreap_core::{AppError, AppResult};
use logreap_domain::TaskTrigger;

const DEFAULT_RETENTION_DAYS: u32 = 3;
const DEFAULT_FILE_EXTENSIONS: &str = ".txt";

/// Runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub log_directory: PathBuf,
    pub retention_days: u32,
    pub file_extensions: Vec<String>,
    pub recursive: bool,
    pub dry_run: bool,
    pub run_once: bool,
    pub interval_override: Option<TaskTrigger>,
}

impl WorkerConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let log_directory = lookup("LOGREAP_LOG_DIRECTORY")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| AppError::Validation("LOGREAP_LOG_DIRECTORY is required".to_owned()))?;
        let retention_days = parse_u32(
            "LOGREAP_RETENTION_DAYS",
            lookup("LOGREAP_RETENTION_DAYS"),
            DEFAULT_RETENTION_DAYS,
        )?;
        let file_extensions = parse_extensions(
            lookup("LOGREAP_FILE_EXTENSIONS")
                .as_deref()
                .unwrap_or(DEFAULT_FILE_EXTENSIONS),
        );
        let recursive = parse_bool("LOGREAP_RECURSIVE", lookup("LOGREAP_RECURSIVE"), true)?;
        let dry_run = parse_bool("LOGREAP_DRY_RUN", lookup("LOGREAP_DRY_RUN"), false)?;
        let run_once = parse_bool("LOGREAP_RUN_ONCE", lookup("LOGREAP_RUN_ONCE"), false)?;
        let interval_override = lookup("LOGREAP_INTERVAL_SECONDS")
            .map(|value| parse_interval("LOGREAP_INTERVAL_SECONDS", &value))
            .transpose()?;

        if file_extensions.is_empty() {
            return Err(AppError::Validation(
                "LOGREAP_FILE_EXTENSIONS must list at least one extension".to_owned(),
            ));
        }

        Ok(Self {
            log_directory,
            retention_days,
            file_extensions,
            recursive,
            dry_run,
            run_once,
            interval_override,
        })
    }
}

fn parse_extensions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|extension| !extension.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_u32(name: &str, value: Option<String>, default: u32) -> AppResult<u32> {
    match value {
        Some(value) => value.trim().parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

fn parse_interval(name: &str, value: &str) -> AppResult<TaskTrigger> {
    let seconds = value.trim().parse::<u64>().map_err(|error| {
        AppError::Validation(format!("invalid {name} value '{value}': {error}"))
    })?;

    TaskTrigger::interval(seconds)
        .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}")))
}

fn parse_bool(name: &str, value: Option<String>, default: bool) -> AppResult<bool> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "invalid {name} value '{value}': expected true or false"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use logreap_domain::TaskTrigger;

    use super::WorkerConfig;

    fn config_from(pairs: &[(&str, &str)]) -> Result<WorkerConfig, logreap_core::AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        WorkerConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_directory_is_set() {
        let config = config_from(&[("LOGREAP_LOG_DIRECTORY", "/var/log/app")])
            .unwrap_or_else(|error| panic!("config should load: {error}"));

        assert_eq!(config.log_directory, PathBuf::from("/var/log/app"));
        assert_eq!(config.retention_days, 3);
        assert_eq!(config.file_extensions, vec![".txt"]);
        assert!(config.recursive);
        assert!(!config.dry_run);
        assert!(!config.run_once);
        assert_eq!(config.interval_override, None);
    }

    #[test]
    fn directory_is_required() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("LOGREAP_LOG_DIRECTORY", "  ")]).is_err());
    }

    #[test]
    fn extension_list_is_split_and_trimmed() {
        let config = config_from(&[
            ("LOGREAP_LOG_DIRECTORY", "/var/log/app"),
            ("LOGREAP_FILE_EXTENSIONS", " .txt, log ,,"),
        ])
        .unwrap_or_else(|error| panic!("config should load: {error}"));

        assert_eq!(config.file_extensions, vec![".txt", "log"]);
    }

    #[test]
    fn booleans_accept_common_spellings() {
        let config = config_from(&[
            ("LOGREAP_LOG_DIRECTORY", "/var/log/app"),
            ("LOGREAP_RECURSIVE", "No"),
            ("LOGREAP_DRY_RUN", "1"),
            ("LOGREAP_RUN_ONCE", "TRUE"),
        ])
        .unwrap_or_else(|error| panic!("config should load: {error}"));

        assert!(!config.recursive);
        assert!(config.dry_run);
        assert!(config.run_once);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(
            config_from(&[
                ("LOGREAP_LOG_DIRECTORY", "/var/log/app"),
                ("LOGREAP_RETENTION_DAYS", "-1"),
            ])
            .is_err()
        );
        assert!(
            config_from(&[
                ("LOGREAP_LOG_DIRECTORY", "/var/log/app"),
                ("LOGREAP_DRY_RUN", "maybe"),
            ])
            .is_err()
        );
        assert!(
            config_from(&[
                ("LOGREAP_LOG_DIRECTORY", "/var/log/app"),
                ("LOGREAP_INTERVAL_SECONDS", "0"),
            ])
            .is_err()
        );
    }

    #[test]
    fn interval_override_becomes_interval_trigger() {
        let config = config_from(&[
            ("LOGREAP_LOG_DIRECTORY", "/var/log/app"),
            ("LOGREAP_INTERVAL_SECONDS", " 600 "),
        ])
        .unwrap_or_else(|error| panic!("config should load: {error}"));

        assert_eq!(
            config.interval_override,
            Some(TaskTrigger::Interval {
                interval_seconds: 600
            })
        );
    }

    #[test]
    fn zero_interval_override_names_the_variable() {
        let error = config_from(&[
            ("LOGREAP_LOG_DIRECTORY", "/var/log/app"),
            ("LOGREAP_INTERVAL_SECONDS", "0"),
        ])
        .err()
        .unwrap_or_else(|| panic!("zero interval should be rejected"));

        assert!(error.to_string().contains("LOGREAP_INTERVAL_SECONDS"));
        assert!(error.to_string().contains("greater than zero"));
    }
}
