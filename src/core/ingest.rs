use crate::domain::event::S3Event;
use crate::domain::model::ObjectRef;
use crate::utils::error::{EtlError, Result};

pub const NOT_CSV_MESSAGE: &str = "Not a CSV file";

/// Case-insensitive `.csv` extension check.
pub fn is_csv_key(key: &str) -> bool {
    key.to_lowercase().ends_with(".csv")
}

/// Picks the object to convert out of a notification.
///
/// Only the first record is processed; any further records in the same
/// notification are ignored (a warning reports how many).
pub fn select_object(event: &S3Event) -> Result<ObjectRef> {
    let object = event
        .first_object()
        .ok_or_else(|| EtlError::ProcessingError {
            message: "Notification contains no records".to_string(),
        })?;

    if event.records.len() > 1 {
        tracing::warn!(
            "Notification carries {} records, only the first one is processed ({} ignored)",
            event.records.len(),
            event.records.len() - 1
        );
    }

    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_csv_key() {
        assert!(is_csv_key("customer-dataCSV-incoming/a.csv"));
        assert!(is_csv_key("REPORT.CSV"));
        assert!(is_csv_key("mixed/Case.CsV"));
        assert!(!is_csv_key("data.parquet"));
        assert!(!is_csv_key("data.csv.gz"));
        assert!(!is_csv_key("csv"));
        assert!(!is_csv_key(""));
    }

    #[test]
    fn test_select_object_takes_first_record() {
        let mut event = S3Event::for_object("bucket", "in/first.csv");
        event
            .records
            .extend(S3Event::for_object("bucket", "in/second.csv").records);

        let object = select_object(&event).unwrap();

        assert_eq!(object.key, "in/first.csv");
    }

    #[test]
    fn test_select_object_without_records() {
        let event = S3Event { records: vec![] };
        let err = select_object(&event).unwrap_err();
        assert!(err.to_string().contains("no records"));
    }
}
