use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use logreap_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Validated retention rules for one log directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    retention_days: u32,
    file_extensions: BTreeSet<String>,
    directory_path: PathBuf,
    recursive: bool,
}

/// Input payload used to construct a validated retention policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicyInput {
    /// Files older than this many days are eligible for deletion.
    pub retention_days: u32,
    /// Extension allowlist such as `.txt`; the leading dot is optional.
    pub file_extensions: Vec<String>,
    /// Directory to sweep.
    pub directory_path: PathBuf,
    /// Whether subdirectories are included.
    pub recursive: bool,
}

impl RetentionPolicy {
    /// Creates a validated retention policy.
    pub fn new(input: RetentionPolicyInput) -> AppResult<Self> {
        let RetentionPolicyInput {
            retention_days,
            file_extensions,
            directory_path,
            recursive,
        } = input;

        if directory_path.as_os_str().is_empty() {
            return Err(AppError::Validation(
                "retention policy directory path must not be empty".to_owned(),
            ));
        }

        let mut normalized_extensions = BTreeSet::new();
        for extension in file_extensions {
            normalized_extensions.insert(normalize_extension(extension.as_str())?);
        }

        if normalized_extensions.is_empty() {
            return Err(AppError::Validation(
                "retention policy must include at least one file extension".to_owned(),
            ));
        }

        Ok(Self {
            retention_days,
            file_extensions: normalized_extensions,
            directory_path,
            recursive,
        })
    }

    /// Returns the retention window in days.
    #[must_use]
    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    /// Returns normalized extensions, each lowercase with a leading dot.
    #[must_use]
    pub fn file_extensions(&self) -> &BTreeSet<String> {
        &self.file_extensions
    }

    /// Returns the swept directory.
    #[must_use]
    pub fn directory_path(&self) -> &Path {
        self.directory_path.as_path()
    }

    /// Returns whether subdirectories are swept.
    #[must_use]
    pub fn recursive(&self) -> bool {
        self.recursive
    }

    /// Returns the instant below which files qualify for deletion.
    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        TimeDelta::try_days(i64::from(self.retention_days))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns whether the path carries one of the allowed extensions.
    #[must_use]
    pub fn matches_extension(&self, path: &Path) -> bool {
        extension_matches(&self.file_extensions, path)
    }
}

/// Returns whether the file name of `path` ends with one of the normalized `extensions`.
///
/// Matching is on the name suffix, so a dot-file such as `.txt` matches `.txt`.
#[must_use]
pub fn extension_matches(extensions: &BTreeSet<String>, path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    let file_name = file_name.to_ascii_lowercase();
    extensions
        .iter()
        .any(|extension| file_name.ends_with(extension.as_str()))
}

fn normalize_extension(value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);

    if bare.is_empty() {
        return Err(AppError::Validation(format!(
            "file extension '{value}' must not be empty"
        )));
    }

    if bare.contains(['.', '/', '\\']) || bare.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(format!(
            "file extension '{value}' must be a single extension such as '.txt'"
        )));
    }

    Ok(format!(".{}", bare.to_ascii_lowercase()))
}

/// One enumerated file, captured at listing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute or directory-relative file path.
    pub path: PathBuf,
    /// Last modification time in UTC.
    pub last_modified_utc: DateTime<Utc>,
    /// File size at listing time.
    pub size_bytes: u64,
}

impl FileRecord {
    /// Returns whether the file was last modified strictly before `cutoff`.
    #[must_use]
    pub fn is_older_than(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_modified_utc < cutoff
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use chrono::{TimeDelta, TimeZone, Utc};

    use super::{FileRecord, RetentionPolicy, RetentionPolicyInput};

    fn policy(retention_days: u32, extensions: &[&str]) -> RetentionPolicy {
        RetentionPolicy::new(RetentionPolicyInput {
            retention_days,
            file_extensions: extensions.iter().map(|value| (*value).to_owned()).collect(),
            directory_path: PathBuf::from("/var/log/app"),
            recursive: true,
        })
        .unwrap_or_else(|_| panic!("policy should be valid"))
    }

    #[test]
    fn extensions_are_normalized() {
        let policy = policy(3, &["txt", " .LOG ", ".txt"]);
        let extensions: Vec<&str> = policy.file_extensions().iter().map(String::as_str).collect();
        assert_eq!(extensions, vec![".log", ".txt"]);
    }

    #[test]
    fn empty_extension_set_is_rejected() {
        let result = RetentionPolicy::new(RetentionPolicyInput {
            retention_days: 3,
            file_extensions: Vec::new(),
            directory_path: PathBuf::from("/var/log/app"),
            recursive: false,
        });
        assert!(result.is_err());
    }

    #[test]
    fn compound_extension_is_rejected() {
        let result = RetentionPolicy::new(RetentionPolicyInput {
            retention_days: 3,
            file_extensions: vec![".tar.gz".to_owned()],
            directory_path: PathBuf::from("/var/log/app"),
            recursive: false,
        });
        assert!(result.is_err());
    }

    #[test]
    fn empty_directory_path_is_rejected() {
        let result = RetentionPolicy::new(RetentionPolicyInput {
            retention_days: 3,
            file_extensions: vec![".txt".to_owned()],
            directory_path: PathBuf::new(),
            recursive: false,
        });
        assert!(result.is_err());
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let policy = policy(3, &[".txt"]);
        assert!(policy.matches_extension(Path::new("/var/log/app/server.TXT")));
        assert!(!policy.matches_extension(Path::new("/var/log/app/server.log")));
        assert!(!policy.matches_extension(Path::new("/var/log/app/txt")));
        assert!(!policy.matches_extension(Path::new("/var/log/app/server.atxt")));
    }

    #[test]
    fn dot_file_matches_its_suffix() {
        let policy = policy(3, &[".txt"]);
        assert!(policy.matches_extension(Path::new("/var/log/app/.txt")));
        assert!(policy.matches_extension(Path::new("/var/log/app/rotated.1.txt")));
        assert!(!policy.matches_extension(Path::new("/var/log/app/.txt.bak")));
    }

    #[test]
    fn cutoff_subtracts_retention_days() {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 31, 12, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("valid timestamp"));
        assert_eq!(policy(30, &[".txt"]).cutoff(now), now - TimeDelta::days(30));
        assert_eq!(policy(0, &[".txt"]).cutoff(now), now);
    }

    #[test]
    fn cutoff_saturates_for_huge_windows() {
        let cutoff = policy(u32::MAX, &[".txt"]).cutoff(Utc::now());
        assert_eq!(cutoff, chrono::DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn record_at_cutoff_is_not_older() {
        let cutoff = Utc::now();
        let record = FileRecord {
            path: PathBuf::from("a.txt"),
            last_modified_utc: cutoff,
            size_bytes: 0,
        };
        assert!(!record.is_older_than(cutoff));
        assert!(record.is_older_than(cutoff + TimeDelta::seconds(1)));
    }
}
