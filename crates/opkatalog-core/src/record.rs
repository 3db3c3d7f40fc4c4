//! Operation record types and their JSON field mapping.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Fallback partition key when a request does not name a user.
pub const DEFAULT_USER_ID: &str = "default";

/// A client-submitted operation record, before the server assigns an id and
/// timestamps.
///
/// Used as the body of create, update, and bulk-import requests. Every field
/// is optional; the array fields default to empty sequences when absent.
/// Field names follow the external camelCase contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationDraft {
    /// Soft tenant partition key. Caller-supplied and unverified.
    pub user_id: Option<String>,
    #[serde(deserialize_with = "empty_as_none_date")]
    pub date: Option<NaiveDate>,
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    #[serde(deserialize_with = "empty_as_none_date")]
    pub patient_dob: Option<NaiveDate>,
    pub diagnosis: Option<String>,
    pub operation_raw: Option<String>,
    pub operation_short: Option<String>,
    pub role: Option<String>,
    pub anatomical_regions: Vec<String>,
    pub procedures: Vec<String>,
    pub implant_types: Vec<String>,
    pub notes: Option<String>,
    pub duration: Option<i32>,
    pub surgeon: Option<String>,
}

impl OperationDraft {
    /// Returns the partition key, falling back to [`DEFAULT_USER_ID`].
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(DEFAULT_USER_ID)
    }
}

/// A stored operation record as returned by the API.
///
/// Carries the server-assigned `id` and timestamps in addition to the draft
/// fields. The tenant key is deliberately absent from responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub id: i32,
    pub date: Option<NaiveDate>,
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub patient_dob: Option<NaiveDate>,
    pub diagnosis: Option<String>,
    pub operation_raw: Option<String>,
    pub operation_short: Option<String>,
    pub role: Option<String>,
    pub anatomical_regions: Vec<String>,
    pub procedures: Vec<String>,
    pub implant_types: Vec<String>,
    pub notes: Option<String>,
    pub duration: Option<i32>,
    pub surgeon: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl OperationRecord {
    /// Builds a record from a draft plus the server-assigned fields.
    #[must_use]
    pub fn from_draft(
        id: i32,
        draft: &OperationDraft,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            date: draft.date,
            patient_id: draft.patient_id.clone(),
            patient_name: draft.patient_name.clone(),
            patient_dob: draft.patient_dob,
            diagnosis: draft.diagnosis.clone(),
            operation_raw: draft.operation_raw.clone(),
            operation_short: draft.operation_short.clone(),
            role: draft.role.clone(),
            anatomical_regions: draft.anatomical_regions.clone(),
            procedures: draft.procedures.clone(),
            implant_types: draft.implant_types.clone(),
            notes: draft.notes.clone(),
            duration: draft.duration,
            surgeon: draft.surgeon.clone(),
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        }
    }
}

/// Deserializes an optional ISO-8601 date, treating the empty string as
/// absent. Frontends submit `""` for unfilled date inputs.
fn empty_as_none_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_camel_case_mapping() {
        let draft: OperationDraft = serde_json::from_value(json!({
            "userId": "u1",
            "date": "2024-05-01",
            "patientId": "P1",
            "patientName": "Doe, Jane",
            "patientDob": "1980-02-29",
            "operationRaw": "TKA right",
            "operationShort": "TKA",
            "anatomicalRegions": ["knee"],
            "implantTypes": ["prosthesis"],
            "duration": 95
        }))
        .expect("deserialize draft");

        assert_eq!(draft.user_id(), "u1");
        assert_eq!(draft.patient_id.as_deref(), Some("P1"));
        assert_eq!(draft.operation_raw.as_deref(), Some("TKA right"));
        assert_eq!(draft.anatomical_regions, vec!["knee"]);
        assert_eq!(draft.implant_types, vec!["prosthesis"]);
        assert_eq!(draft.duration, Some(95));
        // Absent array fields default to empty, never to null.
        assert!(draft.procedures.is_empty());
    }

    #[test]
    fn test_draft_defaults() {
        let draft: OperationDraft = serde_json::from_value(json!({})).expect("empty draft");
        assert_eq!(draft.user_id(), DEFAULT_USER_ID);
        assert!(draft.date.is_none());
        assert!(draft.anatomical_regions.is_empty());
        assert!(draft.procedures.is_empty());
        assert!(draft.implant_types.is_empty());
    }

    #[test]
    fn test_empty_string_date_is_none() {
        let draft: OperationDraft =
            serde_json::from_value(json!({ "date": "", "patientDob": "" })).expect("draft");
        assert!(draft.date.is_none());
        assert!(draft.patient_dob.is_none());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let result = serde_json::from_value::<OperationDraft>(json!({ "date": "not-a-date" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_record_serializes_camel_case_with_nulls() {
        let record = OperationRecord::from_draft(
            7,
            &OperationDraft {
                date: Some("2024-05-01".parse().expect("date")),
                anatomical_regions: vec!["knee".into()],
                ..Default::default()
            },
            "2024-05-01T10:00:00".parse().expect("timestamp"),
            "2024-05-01T10:00:00".parse().expect("timestamp"),
        );

        let value = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(value["id"], 7);
        assert_eq!(value["date"], "2024-05-01");
        assert_eq!(value["anatomicalRegions"], json!(["knee"]));
        assert_eq!(value["procedures"], json!([]));
        assert_eq!(value["implantTypes"], json!([]));
        // Nullable fields stay null, never empty strings.
        assert_eq!(value["patientId"], serde_json::Value::Null);
        assert_eq!(value["patientDob"], serde_json::Value::Null);
        assert_eq!(value["createdAt"], "2024-05-01T10:00:00");
        // The tenant key never leaves the server.
        assert!(value.get("userId").is_none());
    }

    #[test]
    fn test_record_round_trip() {
        let record = OperationRecord::from_draft(
            1,
            &OperationDraft {
                diagnosis: Some("gonarthrosis".into()),
                procedures: vec!["arthroplasty".into()],
                ..Default::default()
            },
            "2024-01-01T00:00:00".parse().expect("timestamp"),
            "2024-01-02T00:00:00".parse().expect("timestamp"),
        );
        let json = serde_json::to_string(&record).expect("serialize");
        let parsed: OperationRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(record, parsed);
    }
}
