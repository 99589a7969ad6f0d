use crate::domain::model::ObjectRef;
use serde::{Deserialize, Serialize};

/// S3 object-created notification as delivered to the function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3Record>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Record {
    pub s3: S3Entity,
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl S3Event {
    /// Builds a single-record event, mostly for local runs and tests.
    pub fn for_object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            records: vec![S3Record {
                s3: S3Entity {
                    bucket: S3Bucket { name: bucket.into() },
                    object: S3Object {
                        key: key.into(),
                        size: None,
                    },
                },
                event_name: Some("ObjectCreated:Put".to_string()),
            }],
        }
    }

    /// Only the first record is ever looked at.
    pub fn first_object(&self) -> Option<ObjectRef> {
        self.records
            .first()
            .map(|r| ObjectRef::new(r.s3.bucket.name.clone(), r.s3.object.key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3_notification() {
        let payload = serde_json::json!({
            "Records": [
                {
                    "eventVersion": "2.1",
                    "eventSource": "aws:s3",
                    "eventName": "ObjectCreated:Put",
                    "s3": {
                        "s3SchemaVersion": "1.0",
                        "bucket": {"name": "bank-data", "arn": "arn:aws:s3:::bank-data"},
                        "object": {"key": "customer-dataCSV-incoming/2024/jan.csv", "size": 1024}
                    }
                },
                {
                    "s3": {
                        "bucket": {"name": "bank-data"},
                        "object": {"key": "customer-dataCSV-incoming/2024/feb.csv"}
                    }
                }
            ]
        });

        let event: S3Event = serde_json::from_value(payload).unwrap();

        assert_eq!(event.records.len(), 2);
        assert_eq!(event.records[0].s3.object.size, Some(1024));
        assert_eq!(event.records[1].event_name, None);
        assert_eq!(
            event.first_object().unwrap(),
            ObjectRef::new("bank-data", "customer-dataCSV-incoming/2024/jan.csv")
        );
    }

    #[test]
    fn test_key_is_not_url_decoded() {
        let payload = serde_json::json!({
            "Records": [{"s3": {"bucket": {"name": "b"}, "object": {"key": "in/my+file%281%29.csv"}}}]
        });
        let event: S3Event = serde_json::from_value(payload).unwrap();
        assert_eq!(event.first_object().unwrap().key, "in/my+file%281%29.csv");
    }

    #[test]
    fn test_missing_records_is_empty() {
        let event: S3Event = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(event.first_object().is_none());
    }
}
