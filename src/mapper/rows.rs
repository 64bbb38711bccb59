//! Field mapping between positional tables and records

use crate::config::ImportOptions;
use crate::types::{CellValue, FieldMap, RawTable, Record, RecordSet};
use tracing::debug;

/// Turn positional rows into records keyed through `field_map`.
///
/// - Rows shorter than the header are padded with empty cells, longer rows
///   are truncated.
/// - With `skip_empty_rows`, rows whose cells are all empty are skipped.
/// - Columns with an empty or unmapped header label are dropped.
/// - With `drop_unmapped_rows`, rows that map to no field are skipped.
pub fn map_rows(table: &RawTable, field_map: &FieldMap, options: &ImportOptions) -> RecordSet {
    let width = table.width();
    let mut records = RecordSet::new();

    for (idx, row) in table.rows.iter().enumerate() {
        // Sheet row number as a user sees it (header is row 1)
        let row_number = idx + 2;

        let cells = (0..width).map(|col| row.get(col).cloned().unwrap_or_default());

        if options.skip_empty_rows && cells.clone().all(|cell| cell.is_empty()) {
            debug!("Skipping empty row {}", row_number);
            continue;
        }

        let mut record = Record::new();
        for (label, value) in table.headers.iter().zip(cells) {
            if label.is_empty() {
                continue;
            }
            if let Some(key) = field_map.get(label) {
                record.insert(key.to_string(), value);
            }
        }

        if record.is_empty() && options.drop_unmapped_rows {
            debug!("Dropping row {}: no mapped fields", row_number);
            continue;
        }

        records.push(record);
    }

    records
}

/// Lay records out under `header_map`: header row of display names, then one
/// row per record in header-map key order. Missing fields become empty cells.
pub fn build_table(header_map: &FieldMap, records: &[Record]) -> RawTable {
    let mut table = RawTable::new(header_map.values().map(str::to_string).collect());

    for record in records {
        let row: Vec<CellValue> = header_map
            .keys()
            .map(|key| record.get(key).cloned().unwrap_or_default())
            .collect();
        table.push_row(row);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        let mut table = RawTable::new(headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|v| CellValue::from(*v)).collect());
        }
        table
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::from(*v)))
            .collect()
    }

    // =========================================================================
    // Import mapping
    // =========================================================================

    #[test]
    fn test_map_rows_drops_unmapped_columns() {
        let table = table(&["姓名", "年龄"], &[&["Alice", "30"]]);
        let field_map = FieldMap::from([("姓名", "name")]);

        let records = map_rows(&table, &field_map, &ImportOptions::default());
        assert_eq!(records, vec![record(&[("name", "Alice")])]);
    }

    #[test]
    fn test_map_rows_skips_empty_rows() {
        let table = table(&["姓名", "年龄"], &[&["Alice", "30"], &["", ""], &["Bob", "40"]]);
        let field_map = FieldMap::from([("姓名", "name"), ("年龄", "age")]);

        let records = map_rows(&table, &field_map, &ImportOptions::default());
        assert_eq!(
            records,
            vec![
                record(&[("name", "Alice"), ("age", "30")]),
                record(&[("name", "Bob"), ("age", "40")]),
            ]
        );
    }

    #[test]
    fn test_map_rows_keeps_empty_rows_when_not_skipping() {
        let table = table(&["姓名", "年龄"], &[&["", ""]]);
        let field_map = FieldMap::from([("姓名", "name")]);
        let options = ImportOptions {
            skip_empty_rows: false,
            ..ImportOptions::default()
        };

        let records = map_rows(&table, &field_map, &options);
        assert_eq!(records, vec![record(&[("name", "")])]);
    }

    #[test]
    fn test_map_rows_drops_rows_without_mapped_fields() {
        // Non-empty row, but only the unmapped column has data
        let table = table(&["姓名", "备注"], &[&["", "note"]]);
        let field_map = FieldMap::from([("年龄", "age")]);

        let records = map_rows(&table, &field_map, &ImportOptions::default());
        assert!(records.is_empty());
    }

    #[test]
    fn test_map_rows_can_keep_rows_without_mapped_fields() {
        let table = table(&["姓名", "备注"], &[&["", "note"]]);
        let field_map = FieldMap::from([("年龄", "age")]);
        let options = ImportOptions {
            skip_empty_rows: true,
            drop_unmapped_rows: false,
        };

        let records = map_rows(&table, &field_map, &options);
        assert_eq!(records, vec![Record::new()]);
    }

    #[test]
    fn test_map_rows_pads_short_rows() {
        let table = table(&["a", "b", "c"], &[&["1"]]);
        let field_map = FieldMap::from([("a", "x"), ("c", "z")]);

        let records = map_rows(&table, &field_map, &ImportOptions::default());
        assert_eq!(records, vec![record(&[("x", "1"), ("z", "")])]);
        assert_eq!(records[0].get("z"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_map_rows_truncates_long_rows() {
        let table = table(&["a"], &[&["1", "2", "3"]]);
        let field_map = FieldMap::from([("a", "x")]);

        let records = map_rows(&table, &field_map, &ImportOptions::default());
        assert_eq!(records, vec![record(&[("x", "1")])]);
    }

    #[test]
    fn test_map_rows_ignores_empty_header_labels() {
        let table = table(&["", "name"], &[&["orphan", "Alice"]]);
        let field_map = FieldMap::from([("", "blank"), ("name", "name")]);

        let records = map_rows(&table, &field_map, &ImportOptions::default());
        assert_eq!(records, vec![record(&[("name", "Alice")])]);
    }

    #[test]
    fn test_map_rows_duplicate_labels_last_wins() {
        let table = table(&["name", "name"], &[&["first", "second"]]);
        let field_map = FieldMap::from([("name", "name")]);

        let records = map_rows(&table, &field_map, &ImportOptions::default());
        assert_eq!(records, vec![record(&[("name", "second")])]);
    }

    #[test]
    fn test_map_rows_keeps_numbers() {
        let mut table = RawTable::new(vec!["qty".to_string()]);
        table.push_row(vec![CellValue::Number(3.0)]);
        let field_map = FieldMap::from([("qty", "quantity")]);

        let records = map_rows(&table, &field_map, &ImportOptions::default());
        assert_eq!(records[0].get("quantity"), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_map_rows_header_only() {
        let table = table(&["name"], &[]);
        let field_map = FieldMap::from([("name", "name")]);
        assert!(map_rows(&table, &field_map, &ImportOptions::default()).is_empty());
    }

    #[test]
    fn test_map_rows_output_key_order_follows_columns() {
        let table = table(&["年龄", "姓名"], &[&["30", "Alice"]]);
        let field_map = FieldMap::from([("姓名", "name"), ("年龄", "age")]);

        let records = map_rows(&table, &field_map, &ImportOptions::default());
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, vec!["age", "name"]);
    }

    // =========================================================================
    // Export layout
    // =========================================================================

    #[test]
    fn test_build_table_orders_columns_by_header_map() {
        let header_map = FieldMap::from([("name", "姓名"), ("age", "年龄")]);
        let records = vec![record(&[("age", "30"), ("name", "Alice")])];

        let table = build_table(&header_map, &records);
        assert_eq!(table.headers, vec!["姓名", "年龄"]);
        assert_eq!(
            table.rows,
            vec![vec![CellValue::from("Alice"), CellValue::from("30")]]
        );
    }

    #[test]
    fn test_build_table_missing_fields_are_empty() {
        let header_map = FieldMap::from([("name", "姓名"), ("mobile", "手机号")]);
        let records = vec![record(&[("name", "张三"), ("extra", "ignored")])];

        let table = build_table(&header_map, &records);
        assert_eq!(
            table.rows,
            vec![vec![CellValue::from("张三"), CellValue::Empty]]
        );
    }

    #[test]
    fn test_build_table_no_records() {
        let header_map = FieldMap::from([("name", "姓名")]);
        let table = build_table(&header_map, &[]);
        assert_eq!(table.headers, vec!["姓名"]);
        assert!(table.rows.is_empty());
    }
}
