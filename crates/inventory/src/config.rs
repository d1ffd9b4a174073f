use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::InventoryError;
use crate::table::ColumnIndex;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Directory holding the inventory CSV and the recorded CSVs.
    /// Empty means "decided by the caller" (the CLI uses the executable's directory).
    #[serde(default)]
    pub working_dir: PathBuf,
    #[serde(default)]
    pub inventory_csv_file_name: String,
    #[serde(default)]
    pub columns: ColumnRoles,
    #[serde(default)]
    pub excel: Option<ExcelConfig>,
}

// ---------------------------------------------------------------------------
// Column roles
// ---------------------------------------------------------------------------

/// Column names for each role, resolved against the table header at use time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnRoles {
    #[serde(default)]
    pub equipment_layer: String,
    #[serde(default)]
    pub equipment_part_number: String,
    #[serde(default)]
    pub equipment_id: String,
    #[serde(default)]
    pub equipment_count_actual: String,
    /// Optional; empty disables capping.
    #[serde(default)]
    pub equipment_count_target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Layer,
    PartNumber,
    Id,
    CountActual,
    CountTarget,
}

impl Role {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Layer => "equipment_layer",
            Self::PartNumber => "equipment_part_number",
            Self::Id => "equipment_id",
            Self::CountActual => "equipment_count_actual",
            Self::CountTarget => "equipment_count_target",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl ColumnRoles {
    pub fn column(&self, role: Role) -> &str {
        match role {
            Role::Layer => &self.equipment_layer,
            Role::PartNumber => &self.equipment_part_number,
            Role::Id => &self.equipment_id,
            Role::CountActual => &self.equipment_count_actual,
            Role::CountTarget => &self.equipment_count_target,
        }
    }

    /// Column name for `role`, which must be a column of `index`.
    pub fn require<'a>(&'a self, role: Role, index: &ColumnIndex) -> Result<&'a str, InventoryError> {
        let column = self.column(role);
        if index.contains(column) {
            Ok(column)
        } else {
            Err(InventoryError::MissingColumn {
                role: role.key().into(),
                column: column.into(),
            })
        }
    }

    pub fn target(&self) -> Option<&str> {
        if self.equipment_count_target.is_empty() {
            None
        } else {
            Some(&self.equipment_count_target)
        }
    }
}

// ---------------------------------------------------------------------------
// Excel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcelConfig {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub worksheet_name: String,
    #[serde(default)]
    pub equipment_id_column_name: String,
    #[serde(default)]
    pub equipment_available_column_name: String,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AppConfig {
    pub fn from_json(input: &str) -> Result<Self, InventoryError> {
        let config: AppConfig =
            serde_json::from_str(input).map_err(|e| InventoryError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(input: &str) -> Result<Self, InventoryError> {
        let config: AppConfig =
            toml::from_str(input).map_err(|e| InventoryError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.toml` files are TOML, everything else JSON.
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| InventoryError::Io(format!("cannot read {}: {e}", path.display())))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::from_toml(&input),
            _ => Self::from_json(&input),
        }
    }

    pub fn validate(&self) -> Result<(), InventoryError> {
        let required = |value: &str, property: &str| {
            if value.is_empty() {
                Err(InventoryError::ConfigValidation(format!(
                    "property {property} is required"
                )))
            } else {
                Ok(())
            }
        };

        required(&self.inventory_csv_file_name, "inventory_csv_file_name")?;
        for role in [Role::Layer, Role::PartNumber, Role::Id, Role::CountActual] {
            required(self.columns.column(role), &format!("columns.{role}"))?;
        }

        if let Some(ref excel) = self.excel {
            required(&excel.file_name, "excel.file_name")?;
            required(&excel.worksheet_name, "excel.worksheet_name")?;
            required(&excel.equipment_id_column_name, "excel.equipment_id_column_name")?;
            required(
                &excel.equipment_available_column_name,
                "excel.equipment_available_column_name",
            )?;
        }

        Ok(())
    }

    pub fn inventory_csv_path(&self) -> PathBuf {
        self.working_dir.join(&self.inventory_csv_file_name)
    }

    pub fn excel_path(&self) -> Option<PathBuf> {
        self.excel.as_ref().map(|e| self.working_dir.join(&e.file_name))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
