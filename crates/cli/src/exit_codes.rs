//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: batch files and schedulers rely on them.
//!
//! | Code | Meaning                                                        |
//! |------|----------------------------------------------------------------|
//! | 0    | Success                                                        |
//! | 1    | General error (unspecified)                                    |
//! | 2    | CLI usage error (bad args, command needs missing config data)  |
//! | 3    | Config invalid, or config columns absent from the inventory   |
//! | 4    | I/O failure (read, decode, write)                              |
//! | 5    | Reconciliation aborted (non-numeric target quantity)           |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError` or the relevant command

use invmerge_inventory::InventoryError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - a failure no specific code covers, such as JSON report
/// serialization.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, or the command needs config data that is absent.
pub const EXIT_USAGE: u8 = 2;

/// Config file could not be parsed or failed validation, or a configured
/// column does not exist in the inventory header.
pub const EXIT_CONFIG_INVALID: u8 = 3;

/// A file could not be read, decoded or written.
pub const EXIT_IO: u8 = 4;

/// Reconciliation stopped on a target quantity that is not an integer.
/// The result file is not written.
pub const EXIT_RECONCILE_ABORT: u8 = 5;

/// Map an engine error to its exit code.
pub fn inventory_exit_code(err: &InventoryError) -> u8 {
    match err {
        InventoryError::ConfigParse(_) => EXIT_CONFIG_INVALID,
        InventoryError::ConfigValidation(_) => EXIT_CONFIG_INVALID,
        InventoryError::MissingColumn { .. } => EXIT_CONFIG_INVALID,
        InventoryError::TargetParse { .. } => EXIT_RECONCILE_ABORT,
        InventoryError::Io(_) => EXIT_IO,
    }
}
