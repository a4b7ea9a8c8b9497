use anyhow::{Context, Result};
use log::warn;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Pattern matching month file names, capturing year and month
const MONTH_FILE_PATTERN: &str = r"^data_(\d{4})_(\d{2})\.jsonl$";

/// A month file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthFile {
    pub path: PathBuf,
    pub year: i32,
    pub month: u32,
}

/// Expand a leading `~` to the user's home directory
///
/// Examples:
///   - "~/.local/share/mousestats/" -> "/home/user/.local/share/mousestats/"
///   - "/var/lib/mousestats" -> unchanged
pub fn expand_datapath(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match directories::BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}

/// Find all month files directly under `base_dir`, oldest first
///
/// The zero-padded naming makes lexicographic order chronological. A missing
/// directory yields no files.
pub fn find_month_files(base_dir: &Path) -> Result<Vec<MonthFile>> {
    let mut files = Vec::new();

    if !base_dir.exists() {
        return Ok(files);
    }

    if !base_dir.is_dir() {
        anyhow::bail!(
            "Path '{}' exists but is not a directory",
            base_dir.display()
        );
    }

    let name_re =
        Regex::new(MONTH_FILE_PATTERN).context("Failed to compile month file regex pattern")?;

    for entry in WalkDir::new(base_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Failed to read directory entry: {}", err);
                None
            }
        })
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(cap) = name_re.captures(name) else {
            continue;
        };

        let year: i32 = cap[1]
            .parse()
            .with_context(|| format!("Invalid year in file name: {}", name))?;
        let month: u32 = cap[2]
            .parse()
            .with_context(|| format!("Invalid month in file name: {}", name))?;

        files.push(MonthFile {
            path: entry.path().to_path_buf(),
            year,
            month,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Paths of all month files, oldest first
pub fn find_files(base_dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(find_month_files(base_dir)?
        .into_iter()
        .map(|f| f.path)
        .collect())
}

/// `(year, month)` pairs that have a file, oldest first
pub fn find_months(base_dir: &Path) -> Result<Vec<(i32, u32)>> {
    Ok(find_month_files(base_dir)?
        .into_iter()
        .map(|f| (f.year, f.month))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_months_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        for name in [
            "data_2025_02.jsonl",
            "data_2024_12.jsonl",
            "data_2025_01.jsonl",
            "data_2025_1.jsonl",
            "notes.txt",
            "data_2025_03.json",
        ] {
            fs::write(temp_dir.path().join(name), "").unwrap();
        }
        fs::create_dir(temp_dir.path().join("data_2023_01.jsonl")).unwrap();

        let months = find_months(temp_dir.path()).unwrap();
        assert_eq!(months, vec![(2024, 12), (2025, 1), (2025, 2)]);
    }

    #[test]
    fn test_find_files_ignores_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("old");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("data_2020_01.jsonl"), "").unwrap();
        fs::write(temp_dir.path().join("data_2021_05.jsonl"), "").unwrap();

        let files = find_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("data_2021_05.jsonl"));
    }

    #[test]
    fn test_missing_directory_has_no_files() {
        let files = find_files(Path::new("/nonexistent/mousestats/data")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_file_as_base_dir_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain");
        fs::write(&file, "x").unwrap();
        assert!(find_files(&file).is_err());
    }

    #[test]
    fn test_expand_datapath() {
        let absolute = Path::new("/var/lib/mousestats");
        assert_eq!(expand_datapath(absolute), absolute);

        let expanded = expand_datapath(Path::new("~/.local/share/mousestats/"));
        if directories::BaseDirs::new().is_some() {
            assert!(!expanded.starts_with("~"));
            assert!(expanded.ends_with(".local/share/mousestats"));
        }
    }
}
