//! The pipeline's tabular output: validated deliverable rows under a
//! fixed calendar-import header.

use serde::Serialize;

/// Column order and names, fixed for calendar import compatibility.
pub const COLUMNS: [&str; 8] = [
    "Subject",
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "All Day Event",
    "Description",
    "Location",
];

/// One validated deliverable. All fields are strings as extracted; the
/// start date has already passed the `YYYY-MM-DD` + target-year check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliverableRow {
    pub subject: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub all_day: String,
    pub description: String,
    pub location: String,
}

impl DeliverableRow {
    /// Build a row from exactly eight fields. Returns `None` otherwise —
    /// field-count validation is the reconciler's job, this just refuses
    /// to construct something malformed.
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        let [subject, start_date, start_time, end_date, end_time, all_day, description, location] =
            fields
        else {
            return None;
        };
        Some(Self {
            subject: subject.clone(),
            start_date: start_date.clone(),
            start_time: start_time.clone(),
            end_date: end_date.clone(),
            end_time: end_time.clone(),
            all_day: all_day.clone(),
            description: description.clone(),
            location: location.clone(),
        })
    }

    fn as_record(&self) -> [&str; 8] {
        [
            &self.subject,
            &self.start_date,
            &self.start_time,
            &self.end_date,
            &self.end_time,
            &self.all_day,
            &self.description,
            &self.location,
        ]
    }
}

/// Final ordered table of validated deliverables.
///
/// Always carries the fixed header, even with zero rows — an empty table
/// means "no assignments found", never an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultTable {
    rows: Vec<DeliverableRow>,
}

impl ResultTable {
    pub fn new(rows: Vec<DeliverableRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DeliverableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize as UTF-8 CSV text: header first, comma-separated, fields
    /// containing commas (or quotes) quoted.
    pub fn to_csv(&self) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        // Writing the header and rows into an in-memory Vec cannot fail.
        let _ = writer.write_record(COLUMNS);
        for row in &self.rows {
            let _ = writer.write_record(row.as_record());
        }
        let bytes = writer.into_inner().unwrap_or_default();
        String::from_utf8(bytes).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> DeliverableRow {
        DeliverableRow {
            subject: "HIST 101: Homework 1".into(),
            start_date: "2025-09-12".into(),
            start_time: String::new(),
            end_date: "2025-09-12".into(),
            end_time: String::new(),
            all_day: "True".into(),
            description: "Problem set, chapters 1-2".into(),
            location: String::new(),
        }
    }

    #[test]
    fn from_fields_requires_exactly_eight() {
        let seven: Vec<String> = (0..7).map(|i| i.to_string()).collect();
        let eight: Vec<String> = (0..8).map(|i| i.to_string()).collect();
        let nine: Vec<String> = (0..9).map(|i| i.to_string()).collect();

        assert!(DeliverableRow::from_fields(&seven).is_none());
        assert!(DeliverableRow::from_fields(&eight).is_some());
        assert!(DeliverableRow::from_fields(&nine).is_none());
    }

    #[test]
    fn empty_table_csv_is_header_only() {
        let table = ResultTable::default();
        let csv_text = table.to_csv();
        assert_eq!(
            csv_text.trim_end(),
            "Subject,Start Date,Start Time,End Date,End Time,All Day Event,Description,Location"
        );
    }

    #[test]
    fn csv_quotes_fields_containing_commas() {
        let table = ResultTable::new(vec![sample_row()]);
        let csv_text = table.to_csv();
        assert!(csv_text.contains("\"Problem set, chapters 1-2\""));
        assert!(csv_text.contains("HIST 101: Homework 1,2025-09-12"));
    }

    #[test]
    fn csv_row_count_matches_table() {
        let table = ResultTable::new(vec![sample_row(), sample_row()]);
        let csv_text = table.to_csv();
        assert_eq!(csv_text.trim_end().lines().count(), 3);
    }

    #[test]
    fn header_is_stable() {
        assert_eq!(COLUMNS[0], "Subject");
        assert_eq!(COLUMNS[5], "All Day Event");
        assert_eq!(COLUMNS.len(), 8);
    }
}
