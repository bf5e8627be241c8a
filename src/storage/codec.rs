//! CSV encoding for ledger tables.

use csv::{ReaderBuilder, WriterBuilder};

use crate::domain::LedgerRecord;

use super::Result;

/// Serializes rows under the kind's fixed header line. Empty collections still get headers.
pub fn encode<R: LedgerRecord>(rows: &[R]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(R::KIND.headers())?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner()?;
    String::from_utf8(bytes)
        .map_err(|err| crate::core::errors::BudgetError::SerializationError(err.to_string()))
}

/// Header-only table for a kind.
pub fn empty_table<R: LedgerRecord>() -> Result<String> {
    encode::<R>(&[])
}

/// Parses every row of a table. Any malformed row fails the whole table.
pub fn decode<R: LedgerRecord>(contents: &str) -> Result<Vec<R>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillEntry, BillStatus, NonEssentialEntry};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn empty_table_contains_only_headers() {
        let table = empty_table::<BillEntry>().unwrap();
        assert_eq!(table.trim_end(), "Id,Bill Name,Amount Due,Due Date,Status");
    }

    #[test]
    fn legacy_rows_without_id_column_decode_with_nil_ids() {
        let legacy = "Bill Name,Amount Due,Due Date,Status\nRent,900.0,2024-02-01,Paid\n";
        let rows = decode::<BillEntry>(legacy).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].id.is_nil());
        assert_eq!(rows[0].status, BillStatus::Paid);
    }

    #[test]
    fn blank_notes_decode_as_none() {
        let id = Uuid::new_v4();
        let table = format!(
            "Id,Expense,Amount,Date,Notes\n{},Cinema,12.5,2024-03-02,\n",
            id
        );
        let rows = decode::<NonEssentialEntry>(&table).unwrap();
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].notes, None);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn malformed_amount_fails_the_table() {
        let table = "Id,Expense,Amount,Date,Notes\n,Cinema,lots,2024-03-02,\n";
        assert!(decode::<NonEssentialEntry>(table).is_err());
    }
}
