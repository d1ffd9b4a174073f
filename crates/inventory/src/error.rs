use std::fmt;

#[derive(Debug)]
pub enum InventoryError {
    /// JSON / TOML parse or deserialization error.
    ConfigParse(String),
    /// Config validation error (missing required property).
    ConfigValidation(String),
    /// A configured column role does not name a column of the table.
    MissingColumn { role: String, column: String },
    /// Target count cell that is not an integer. Aborts reconciliation.
    TargetParse {
        identifier: String,
        line: usize,
        column: String,
        value: String,
    },
    /// IO error (config file read, etc.).
    Io(String),
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "failed to load invalid config file, {msg}"),
            Self::ConfigValidation(msg) => write!(f, "failed to validate the config file, {msg}"),
            Self::MissingColumn { role, column } => {
                write!(f, "role '{role}': column '{column}' not found in header")
            }
            Self::TargetParse { identifier, line, column, value } => write!(
                f,
                "error converting target value to int: equipment '{identifier}', line {line}, column '{column}': '{value}'"
            ),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for InventoryError {}
