//! Wire types for the Fieldlog REST backend.
//!
//! Every payload crossing the HTTP boundary is deserialized into one of
//! these types, so a malformed response fails fast as a decode error
//! instead of propagating missing fields into the views. Timestamps are
//! kept as the backend's ISO-8601 strings; the views only display them.

use serde::{Deserialize, Serialize};

/// Record type, single-valued in the backend's list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    FieldNote,
    Interview,
    Observation,
    Other,
}

impl RecordType {
    pub const ALL: [RecordType; 4] = [
        RecordType::FieldNote,
        RecordType::Interview,
        RecordType::Observation,
        RecordType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::FieldNote => "field_note",
            RecordType::Interview => "interview",
            RecordType::Observation => "observation",
            RecordType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordType::FieldNote => "Field note",
            RecordType::Interview => "Interview",
            RecordType::Observation => "Observation",
            RecordType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Record status, single-valued in the backend's list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Draft,
    Completed,
    Archived,
}

impl RecordStatus {
    pub const ALL: [RecordStatus; 3] = [
        RecordStatus::Draft,
        RecordStatus::Completed,
        RecordStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Draft => "draft",
            RecordStatus::Completed => "completed",
            RecordStatus::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Draft => "Draft",
            RecordStatus::Completed => "Completed",
            RecordStatus::Archived => "Archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Researcher,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Researcher => "researcher",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::Researcher => "Researcher",
        }
    }
}

/// The authenticated user's profile, as returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub last_login: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub name_or_code: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub data_sensitivity: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ParticipantPayload {
    pub name_or_code: String,
    pub gender: Option<String>,
    pub age_range: Option<String>,
    pub occupation: Option<String>,
    pub education: Option<String>,
    pub is_anonymous: bool,
    pub notes: Option<String>,
}

/// A research field/location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: i64,
    pub region: String,
    pub location: String,
    #[serde(default)]
    pub sub_field: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Field {
    /// "region - location[ - sub_field]", the display form used everywhere
    /// a field is shown inline.
    pub fn display(&self) -> String {
        match &self.sub_field {
            Some(sub) => format!("{} - {} - {}", self.region, self.location, sub),
            None => format!("{} - {}", self.region, self.location),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldPayload {
    pub region: String,
    pub location: String,
    pub sub_field: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagCategory {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: i64,
    #[serde(default)]
    pub category: Option<TagCategory>,
    #[serde(default)]
    pub usage_count: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TagPayload {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
}

/// Abbreviated tag shape embedded in a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Free-form record body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordContent {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reflection: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub record_date: String,
    #[serde(default)]
    pub time_range: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub field_id: Option<i64>,
    #[serde(default)]
    pub specific_location: Option<String>,
    #[serde(default)]
    pub content: RecordContent,
    pub status: RecordStatus,
    #[serde(default)]
    pub version: i64,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub field: Option<Field>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
}

impl Record {
    /// Field display falls back to the free-text location.
    pub fn location_display(&self) -> String {
        if let Some(field) = &self.field {
            field.display()
        } else {
            self.specific_location.clone().unwrap_or_else(|| "-".to_string())
        }
    }
}

/// Create/update payload for a record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordPayload {
    pub title: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub record_date: String,
    pub time_range: Option<String>,
    pub duration: Option<i64>,
    pub specific_location: Option<String>,
    pub content: RecordContent,
    pub status: RecordStatus,
    pub field_id: Option<i64>,
    pub participant_ids: Vec<i64>,
    pub tag_ids: Vec<i64>,
}

/// Self-service profile update for `PUT /users/{id}`; any signed-in user
/// may change their own contact details, no admin role required.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePayload {
    pub email: String,
    pub full_name: Option<String>,
}

/// Password change request for `PUT /users/{id}/password`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

impl PasswordChange {
    pub const MIN_LENGTH: usize = 6;

    /// Validate the password form. The confirmation field never leaves the
    /// client; only the old and new passwords are sent.
    pub fn validate(old: &str, new: &str, confirm: &str) -> Result<Self, String> {
        if old.is_empty() {
            return Err("Enter your current password".to_string());
        }
        if new.is_empty() {
            return Err("Enter a new password".to_string());
        }
        if new != confirm {
            return Err("The new passwords do not match".to_string());
        }
        if new.len() < Self::MIN_LENGTH {
            return Err(format!(
                "The new password must be at least {} characters",
                Self::MIN_LENGTH
            ));
        }
        Ok(Self {
            old_password: old.to_string(),
            new_password: new.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPayload {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// An image attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordImage {
    pub id: i64,
    pub record_id: i64,
    pub filename: String,
    pub original_filename: String,
    pub file_size: u64,
    pub mime_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    pub created_at: String,
    pub url: String,
}

/// Paginated list envelope: `{ items, total, skip, limit }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

/// `GET /stats/overview` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverviewStats {
    pub records_count: u64,
    pub participants_count: u64,
    pub fields_count: u64,
    pub tags_count: u64,
}

/// One entry of `GET /stats/recent-activities`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecentActivity {
    pub id: i64,
    #[serde(rename = "type")]
    pub entity: String,
    pub action: String,
    pub title: String,
    pub created_at: String,
    #[serde(default)]
    pub creator_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_decodes_from_backend_shape() {
        let json = r##"{
            "id": 7,
            "title": "Morning market visit",
            "type": "observation",
            "record_date": "2024-03-12T09:30:00",
            "time_range": "09:00-11:00",
            "duration": 120,
            "field_id": 2,
            "specific_location": null,
            "content": {"description": "crowded", "reflection": "", "notes": ""},
            "status": "draft",
            "version": 1,
            "created_by": 3,
            "created_at": "2024-03-12T12:00:00",
            "updated_at": "2024-03-12T12:00:00",
            "field": {"id": 2, "region": "North", "location": "Market"},
            "participants": [{"id": 1, "name_or_code": "P-01"}],
            "tags": [{"id": 4, "name": "ritual", "color": "#AA5500"}]
        }"##;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.record_type, RecordType::Observation);
        assert_eq!(record.status, RecordStatus::Draft);
        assert_eq!(record.location_display(), "North - Market");
        assert_eq!(record.participants.len(), 1);
        assert_eq!(record.tags[0].name, "ritual");
    }

    #[test]
    fn record_tolerates_missing_optional_blocks() {
        let json = r#"{
            "id": 1,
            "title": "t",
            "type": "field_note",
            "record_date": "2024-01-01T00:00:00",
            "status": "completed",
            "created_by": 1,
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-01T00:00:00"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert!(record.participants.is_empty());
        assert!(record.tags.is_empty());
        assert_eq!(record.content, RecordContent::default());
        assert_eq!(record.location_display(), "-");
    }

    #[test]
    fn enums_roundtrip_through_wire_names() {
        for t in RecordType::ALL {
            assert_eq!(RecordType::parse(t.as_str()), Some(t));
        }
        for s in RecordStatus::ALL {
            assert_eq!(RecordStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(
            serde_json::to_string(&RecordType::FieldNote).unwrap(),
            "\"field_note\""
        );
    }

    #[test]
    fn tag_hex_colors_survive_decoding() {
        let tag: TagRef =
            serde_json::from_str(r##"{"id": 1, "name": "kinship", "color": "#1B9E77"}"##).unwrap();
        assert_eq!(tag.color.as_deref(), Some("#1B9E77"));
    }

    #[test]
    fn user_payload_omits_password_when_unchanged() {
        let payload = UserPayload {
            username: "alice".to_string(),
            email: "alice@example.org".to_string(),
            full_name: None,
            role: UserRole::Researcher,
            is_active: true,
            password: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("password").is_none());

        let with_password = UserPayload {
            password: Some("s3cret".to_string()),
            ..payload
        };
        let json = serde_json::to_value(&with_password).unwrap();
        assert_eq!(json["password"], "s3cret");
    }

    #[test]
    fn password_change_enforces_the_form_rules() {
        assert!(PasswordChange::validate("", "newpass", "newpass").is_err());
        assert!(PasswordChange::validate("old", "", "").is_err());
        assert!(PasswordChange::validate("old", "newpass", "different").is_err());
        assert!(PasswordChange::validate("old", "short", "short").is_err());

        let change = PasswordChange::validate("old", "newpass", "newpass").unwrap();
        assert_eq!(change.old_password, "old");
        assert_eq!(change.new_password, "newpass");

        // The confirmation stays client-side.
        let json = serde_json::to_value(&change).unwrap();
        let body = json.as_object().unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body["old_password"], "old");
        assert_eq!(body["new_password"], "newpass");
    }

    #[test]
    fn page_defaults_skip_and_limit() {
        let json = r#"{"items": [], "total": 0}"#;
        let page: Page<Record> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.skip, 0);
    }
}
