//! Working directory: the config, the inventory CSV and the recorded scans.

use std::path::{Path, PathBuf};

use invmerge_inventory::diagnostics::INDENT;
use invmerge_inventory::{AppConfig, InventoryTable, LogDiagnostics, RecordedCounts};
use invmerge_io::csv;
use invmerge_io::detect_file_encoding;

use crate::exit_codes::EXIT_IO;
use crate::CliError;

pub struct Workspace {
    pub config_path: PathBuf,
    pub config: AppConfig,
}

impl Workspace {
    /// Load and validate the config, then settle the working directory.
    ///
    /// An empty `working_dir` means the directory of the executable; a
    /// relative one is taken relative to the config file.
    pub fn load(config_path: &Path) -> Result<Self, CliError> {
        let mut config = AppConfig::load(config_path).map_err(|e| {
            CliError::from(e).with_hint(format!(
                "config file: {} (use -c to pick another)",
                config_path.display()
            ))
        })?;

        config.working_dir = resolve_working_dir(config_path, &config.working_dir)?;
        log::debug!("working directory: {}", config.working_dir.display());

        Ok(Self { config_path: config_path.to_path_buf(), config })
    }

    pub fn working_dir(&self) -> &Path {
        &self.config.working_dir
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.config.inventory_csv_path()
    }

    /// Every `*.csv` file in the working directory except the inventory, by name.
    pub fn recorded_csv_files(&self) -> Result<Vec<PathBuf>, CliError> {
        let dir = self.working_dir();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            CliError::io(format!("cannot list working directory {}: {e}", dir.display()))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                CliError::io(format!("cannot list working directory {}: {e}", dir.display()))
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            let is_inventory = path
                .file_name()
                .is_some_and(|n| n == self.config.inventory_csv_file_name.as_str());
            if is_csv && !is_inventory {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            log::warn!("no files with recorded equipment in {}", dir.display());
            return Ok(files);
        }

        log::info!("files with recorded equipment:");
        log::info!("");
        for path in &files {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            log::info!("{INDENT}using '{name}'");
        }
        log::info!("");

        Ok(files)
    }

    /// Read every recorded scan and count identifier occurrences.
    pub fn recorded_counts(&self) -> Result<RecordedCounts, CliError> {
        let mut tables = Vec::new();
        for path in self.recorded_csv_files()? {
            let encoding = detect_file_encoding(&path).map_err(CliError::io)?;
            tables.push(csv::read_recorded_table(&path, encoding).map_err(CliError::io)?);
        }
        Ok(RecordedCounts::from_tables(&tables))
    }

    pub fn read_inventory(&self) -> Result<InventoryTable, CliError> {
        let path = self.inventory_path();
        let encoding = detect_file_encoding(&path).map_err(|e| {
            CliError::io(format!("failed to get encoding of file '{}': {e}", path.display()))
        })?;
        let rows = csv::read_table(&path, encoding).map_err(CliError::io)?;
        log::debug!("read {} row(s) from {}", rows.len(), path.display());
        Ok(InventoryTable::build(rows))
    }

    /// Log the recorded counts table.
    pub fn report_counts(&self, counts: &RecordedCounts) {
        counts.report(&mut LogDiagnostics);
    }
}

fn resolve_working_dir(config_path: &Path, configured: &Path) -> Result<PathBuf, CliError> {
    if configured.as_os_str().is_empty() {
        let exe = std::env::current_exe().map_err(|e| CliError {
            code: EXIT_IO,
            message: format!("failed to get executable path: {e}"),
            hint: Some("set working_dir in the config file".to_string()),
        })?;
        return Ok(exe.parent().map(Path::to_path_buf).unwrap_or_default());
    }

    if configured.is_absolute() {
        return Ok(configured.to_path_buf());
    }

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    Ok(base_dir.join(configured))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_working_dir_follows_the_config_file() {
        let dir = resolve_working_dir(Path::new("configs/config.json"), Path::new("data")).unwrap();
        assert_eq!(dir, Path::new("configs").join("data"));
    }

    #[test]
    fn absolute_working_dir_is_kept() {
        let absolute = std::env::temp_dir();
        let dir = resolve_working_dir(Path::new("config.json"), &absolute).unwrap();
        assert_eq!(dir, absolute);
    }

    #[test]
    fn empty_working_dir_is_the_executable_directory() {
        let dir = resolve_working_dir(Path::new("config.json"), Path::new("")).unwrap();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(Some(dir.as_path()), exe.parent());
    }
}
