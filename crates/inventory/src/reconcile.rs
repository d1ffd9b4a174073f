use crate::aggregate::{fold_case, RecordedCounts};
use crate::config::{ColumnRoles, Role};
use crate::diagnostics::{format_count_line, Diagnostics};
use crate::error::InventoryError;
use crate::model::{ReconcileReport, UnmatchedEntry};
use crate::table::InventoryTable;

/// Write recorded counts into the actual-count column.
///
/// Identifiers are matched case-insensitively against the ID column of every
/// data row. With a target column, each matching row takes at most its target
/// and the remainder is carried to the next matching row of the same
/// identifier. Without one, every matching row takes the full amount.
///
/// A target cell that is not an integer aborts the whole call; rows already
/// written stay written.
pub fn reconcile(
    table: &mut InventoryTable,
    counts: &RecordedCounts,
    roles: &ColumnRoles,
    sink: &mut dyn Diagnostics,
) -> Result<ReconcileReport, InventoryError> {
    let id_col = roles.require(Role::Id, table.columns())?;
    let actual_col = roles.require(Role::CountActual, table.columns())?;

    let target_col = match roles.target() {
        Some(column) if table.columns().contains(column) => Some(column),
        Some(column) => {
            sink.warn(&format!(
                "column '{column}' not found, recorded counts are not capped"
            ));
            None
        }
        None => None,
    };

    let mut report = ReconcileReport::default();

    for (identifier, recorded) in counts.iter() {
        let mut amount = i64::try_from(recorded).unwrap_or(i64::MAX);
        let mut actual = amount;
        let mut found = false;
        let needle = fold_case(identifier);

        for (i, row) in table.rows_mut().iter_mut().enumerate().skip(1) {
            if fold_case(row.get(id_col)) != needle {
                continue;
            }
            found = true;

            if let Some(target_col) = target_col {
                let value = row.get(target_col);
                let target: i64 = value.parse().map_err(|_| InventoryError::TargetParse {
                    identifier: identifier.to_string(),
                    line: i + 1,
                    column: target_col.to_string(),
                    value: value.to_string(),
                })?;

                if amount >= target {
                    amount = amount.saturating_sub(target);
                    actual = target;
                    report.capped_rows += 1;
                }
            }

            row.set(actual_col, actual.to_string());
            report.updated_rows += 1;
            actual = amount;
        }

        if found {
            report.matched += 1;
            continue;
        }

        if report.unmatched.is_empty() {
            sink.info("recorded equipment not available in the inventory:");
            sink.info("");
            sink.warn_indented("equipment     : amount");
            sink.warn_indented("----------------------");
        }
        sink.warn_indented(&format_count_line(identifier, amount));
        report.unmatched.push(UnmatchedEntry {
            identifier: identifier.to_string(),
            amount,
        });
    }

    if !report.unmatched.is_empty() {
        sink.info("");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Level, RecordingDiagnostics};
    use crate::table::grid;

    fn roles(target: &str) -> ColumnRoles {
        ColumnRoles {
            equipment_id: "Inventar Nr".into(),
            equipment_count_actual: "Verfügbar".into(),
            equipment_count_target: target.into(),
            ..Default::default()
        }
    }

    fn counts(entries: &[(&str, u64)]) -> RecordedCounts {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn updates_matching_rows() {
        let mut table = InventoryTable::build(grid(&[
            &["Verfügbar", "Ausstattung", "Inventar Nr", "Status"],
            &["4", "Handlampe", "0591-S00001", "V"],
            &["1", "Fuchsschwanz", "1234", "V"],
            &["1", "Rettungsweste", "0591-S00002", "U"],
        ]));
        let mut sink = RecordingDiagnostics::new();

        let report = reconcile(
            &mut table,
            &counts(&[("0591-S00001", 100), ("1234", 101), ("0591-S00002", 0)]),
            &roles(""),
            &mut sink,
        )
        .unwrap();

        assert_eq!(
            table.flatten(),
            grid(&[
                &["Verfügbar", "Ausstattung", "Inventar Nr", "Status"],
                &["100", "Handlampe", "0591-S00001", "V"],
                &["101", "Fuchsschwanz", "1234", "V"],
                &["0", "Rettungsweste", "0591-S00002", "U"],
            ])
        );
        assert_eq!(report.matched, 3);
        assert_eq!(report.updated_rows, 3);
        assert!(report.unmatched.is_empty());
        assert!(sink.entries.is_empty());
    }

    #[test]
    fn caps_at_target() {
        let mut table = InventoryTable::build(grid(&[
            &["Verfügbar", "Menge", "Ausstattung", "Inventar Nr", "Status"],
            &["0", "50", "Handlampe", "0591-S00001", "V"],
        ]));
        let mut sink = RecordingDiagnostics::new();

        let report = reconcile(
            &mut table,
            &counts(&[("0591-s00001", 100)]),
            &roles("Menge"),
            &mut sink,
        )
        .unwrap();

        assert_eq!(
            table.flatten()[1],
            vec!["50", "50", "Handlampe", "0591-S00001", "V"]
        );
        assert_eq!(report.capped_rows, 1);
    }

    #[test]
    fn minimum_target_caps_without_overflow() {
        let mut table = InventoryTable::build(grid(&[
            &["Verfügbar", "Menge", "Inventar Nr"],
            &["", "-9223372036854775808", "x"],
            &["", "5", "x"],
        ]));

        let report = reconcile(
            &mut table,
            &counts(&[("x", 1)]),
            &roles("Menge"),
            &mut RecordingDiagnostics::new(),
        )
        .unwrap();

        assert_eq!(table.rows()[1].get("Verfügbar"), "-9223372036854775808");
        assert_eq!(table.rows()[2].get("Verfügbar"), "5");
        assert_eq!(report.capped_rows, 2);
    }

    #[test]
    fn final_sigma_matches_lowercase_row() {
        let mut table = InventoryTable::build(grid(&[
            &["Verfügbar", "Inventar Nr"],
            &["", "ασ"],
            &["", "ΑΣ"],
        ]));
        let mut sink = RecordingDiagnostics::new();

        let recorded = RecordedCounts::from_tables(&[grid(&[&["ΑΣ"]])]);
        let report = reconcile(&mut table, &recorded, &roles(""), &mut sink).unwrap();

        assert_eq!(table.rows()[1].get("Verfügbar"), "1");
        assert_eq!(table.rows()[2].get("Verfügbar"), "1");
        assert_eq!(report.matched, 1);
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn below_target_takes_the_full_amount() {
        let mut table = InventoryTable::build(grid(&[
            &["Verfügbar", "Menge", "Inventar Nr"],
            &["", "50", "X"],
        ]));

        let report = reconcile(
            &mut table,
            &counts(&[("x", 7)]),
            &roles("Menge"),
            &mut RecordingDiagnostics::new(),
        )
        .unwrap();

        assert_eq!(table.rows()[1].get("Verfügbar"), "7");
        assert_eq!(report.capped_rows, 0);
    }

    #[test]
    fn without_target_every_match_gets_the_full_amount() {
        let mut table = InventoryTable::build(grid(&[
            &["Verfügbar", "Inventar Nr"],
            &["", "x"],
            &["", "X"],
        ]));

        reconcile(
            &mut table,
            &counts(&[("x", 101)]),
            &roles(""),
            &mut RecordingDiagnostics::new(),
        )
        .unwrap();

        assert_eq!(table.rows()[1].get("Verfügbar"), "101");
        assert_eq!(table.rows()[2].get("Verfügbar"), "101");
    }

    #[test]
    fn remainder_carries_to_following_matches() {
        let mut table = InventoryTable::build(grid(&[
            &["Verfügbar", "Menge", "Inventar Nr"],
            &["", "3", "A"],
            &["", "5", "B"],
            &["", "4", "a"],
            &["", "10", "a"],
            &["", "2", "a"],
        ]));

        let report = reconcile(
            &mut table,
            &counts(&[("a", 9)]),
            &roles("Menge"),
            &mut RecordingDiagnostics::new(),
        )
        .unwrap();

        // 9 -> 3 (capped, 6 left) -> 4 (capped, 2 left) -> 2 (below target) -> 2 (capped, 0 left)
        let actual: Vec<_> = table.rows().iter().map(|r| r.get("Verfügbar")).collect();
        assert_eq!(actual, vec!["Verfügbar", "3", "", "4", "2", "2"]);
        assert_eq!(report.updated_rows, 4);
        assert_eq!(report.capped_rows, 3);
    }

    #[test]
    fn header_row_is_never_matched() {
        let mut table = InventoryTable::build(grid(&[&["Verfügbar", "Inventar Nr"], &["", "1"]]));
        let mut sink = RecordingDiagnostics::new();

        let report = reconcile(
            &mut table,
            &counts(&[("inventar nr", 1)]),
            &roles(""),
            &mut sink,
        )
        .unwrap();

        assert_eq!(table.rows()[0].get("Verfügbar"), "Verfügbar");
        assert_eq!(report.unmatched.len(), 1);
    }

    #[test]
    fn logs_unmatched_equipment() {
        let mut table = InventoryTable::build(grid(&[&[
            "Verfügbar",
            "Ausstattung",
            "Inventar Nr",
            "Status",
        ]]));
        let mut sink = RecordingDiagnostics::new();

        let report = reconcile(
            &mut table,
            &counts(&[("not_existing", 1), ("other", 12)]),
            &roles(""),
            &mut sink,
        )
        .unwrap();

        assert_eq!(
            sink.indented(Level::Warn),
            vec![
                "equipment     : amount",
                "----------------------",
                "not_existing  :     1",
                "other         :    12",
            ]
        );
        assert_eq!(
            sink.infos(),
            vec!["recorded equipment not available in the inventory:", "", ""]
        );
        assert_eq!(
            report.unmatched,
            vec![
                UnmatchedEntry { identifier: "not_existing".into(), amount: 1 },
                UnmatchedEntry { identifier: "other".into(), amount: 12 },
            ]
        );
    }

    #[test]
    fn invalid_target_aborts() {
        let mut table = InventoryTable::build(grid(&[
            &["Verfügbar", "Menge", "Inventar Nr"],
            &["", "viele", "0591-S00001"],
        ]));

        let err = reconcile(
            &mut table,
            &counts(&[("0591-s00001", 3)]),
            &roles("Menge"),
            &mut RecordingDiagnostics::new(),
        )
        .unwrap_err();

        match err {
            InventoryError::TargetParse { identifier, line, column, value } => {
                assert_eq!(identifier, "0591-s00001");
                assert_eq!(line, 2);
                assert_eq!(column, "Menge");
                assert_eq!(value, "viele");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absent_target_column_disables_capping() {
        let mut table = InventoryTable::build(grid(&[&["Verfügbar", "Inventar Nr"], &["", "x"]]));
        let mut sink = RecordingDiagnostics::new();

        reconcile(&mut table, &counts(&[("x", 101)]), &roles("Menge"), &mut sink).unwrap();

        assert_eq!(table.rows()[1].get("Verfügbar"), "101");
        assert_eq!(
            sink.warnings(),
            vec!["column 'Menge' not found, recorded counts are not capped"]
        );
    }

    #[test]
    fn missing_actual_column_is_fatal() {
        let mut table = InventoryTable::build(grid(&[&["Inventar Nr"], &["x"]]));
        let err = reconcile(
            &mut table,
            &counts(&[("x", 1)]),
            &roles(""),
            &mut RecordingDiagnostics::new(),
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::MissingColumn { ref role, .. } if role == "equipment_count_actual"));
    }
}
