use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One labeled region of interest returned by the detector.
///
/// The field names are wire-exact with the inference service's `boxes`
/// array and with the JSON persisted on a scan result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Detection {
    pub cls: String,
    pub conf: f32,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Detection {
    pub fn new(cls: &str, conf: f32, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            cls: cls.to_string(),
            conf,
            x1,
            y1,
            x2,
            y2,
        }
    }
}

/// Patient metadata as submitted by clients, keyed by the external
/// business id (`patientID`), not the internal row id.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PatientUpload {
    #[serde(rename = "patientID")]
    pub patient_id: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, rename = "referringDoctor")]
    pub referring_doctor: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
