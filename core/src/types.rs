//! Request payloads and record helpers for the event-registration API.
//!
//! # Design
//! Records coming back from the server are opaque JSON: the client reads
//! fields for display but never validates their shape. Only the write
//! payloads are typed, with the exact field names the backend expects
//! (a mix of snake_case and camelCase, kept as-is through `serde(rename)`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Any server-side record (user, talent, event, ...).
pub type Record = Value;

/// Read the server-assigned id of a record (`_id`, falling back to `id`).
pub fn record_id(record: &Record) -> Option<&str> {
    record
        .get("_id")
        .or_else(|| record.get("id"))
        .and_then(Value::as_str)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
    pub no_telp: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTalent {
    pub name: String,
    pub email: String,
    pub no_telp: String,
}

/// One session of a schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSchedule {
    pub schedules: Vec<TimeSlot>,
    /// Registration deadline.
    pub batas_daftar: String,
    #[serde(rename = "talentID")]
    pub talent_id: String,
    #[serde(rename = "eventID")]
    pub event_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRegistration {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "documentID")]
    pub document_id: String,
    #[serde(rename = "eventID")]
    pub event_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub event_status: String,
    pub location: String,
    pub price: f64,
    #[serde(rename = "linkMeeting")]
    pub link_meeting: String,
    #[serde(rename = "imageID")]
    pub image_id: String,
    /// Seat quota.
    pub kuota: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPayment {
    #[serde(rename = "registrationID")]
    pub registration_id: String,
}

/// A single file inside a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart form for document and image uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub parts: Vec<FilePart>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
