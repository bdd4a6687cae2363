//! Clinical case record and its response schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A generated clinical case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: String,
    pub title: String,
    pub patient_demographics: String,
    pub chief_complaint: String,
    pub history: String,
    pub vitals: Vitals,
    pub physical_exam: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_labs: Option<String>,
}

/// Vital signs as free text, e.g. `"142/91"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Vitals {
    pub bp: String,
    pub hr: String,
    pub rr: String,
    pub temp: String,
}

/// Response schema for case generation, in Gemini's OpenAPI subset
///
/// Every field is a string except `vitals`. `initialLabs` is the only
/// optional field.
pub fn case_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "title": { "type": "STRING" },
            "patientDemographics": { "type": "STRING" },
            "chiefComplaint": { "type": "STRING" },
            "history": { "type": "STRING" },
            "vitals": {
                "type": "OBJECT",
                "properties": {
                    "bp": { "type": "STRING" },
                    "hr": { "type": "STRING" },
                    "rr": { "type": "STRING" },
                    "temp": { "type": "STRING" }
                },
                "required": ["bp", "hr", "rr", "temp"]
            },
            "physicalExam": { "type": "STRING" },
            "initialLabs": { "type": "STRING" }
        },
        "required": [
            "id",
            "title",
            "patientDemographics",
            "chiefComplaint",
            "history",
            "vitals",
            "physicalExam"
        ]
    })
}
