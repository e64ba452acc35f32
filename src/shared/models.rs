/**
 * API Records
 *
 * Request and response bodies of the REST API, one struct per shape. Field names
 * match the wire format exactly.
 */

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access and refresh token issued at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Confirmation; must equal `password`
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Token refresh request body
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Token refresh response body
///
/// `refresh` is only present when the server rotates refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Kind of postal address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    #[default]
    Home,
    Work,
    Other,
}

/// Stored postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub address_type: AddressType,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

/// Address fields sent on create and update
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressInput {
    pub address_type: AddressType,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

/// Signed-in user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

/// Editable profile fields; unset fields are left untouched by the server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Password change request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Uploaded file as listed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub filename: String,
    /// Server URL of the stored file
    pub file: String,
    /// `pdf`, `excel`, `txt`, `word` or `other`
    pub file_type: String,
    pub file_type_display: String,
    /// ISO 8601 upload timestamp as sent by the server
    pub upload_date: String,
    /// Size in bytes
    pub size: u64,
    pub file_size_display: String,
}

impl FileRecord {
    /// Upload timestamp, when the server sent an offset-qualified value
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.upload_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Per-user upload summary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_files: u64,
    /// Count per file type display name
    #[serde(default)]
    pub file_type_breakdown: BTreeMap<String, u64>,
}

/// System-wide upload summary (administrators only)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalDashboard {
    pub total_files: u64,
    #[serde(default)]
    pub file_type_breakdown: BTreeMap<String, u64>,
    /// Count per user email
    #[serde(default)]
    pub files_per_user: BTreeMap<String, u64>,
}
