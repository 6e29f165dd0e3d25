use chrono::serde::{ts_milliseconds, ts_milliseconds_option};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use ulid::Ulid;

use crate::error::FieldErrors;

pub const NAME_MAX_CHARS: usize = 2048;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;

/// Banner row as stored and served. Timestamps go over the wire as Unix
/// milliseconds; `updatedAt` stays null until the first update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(with = "ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "ts_milliseconds_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Banner payload as the API accepts it: `expiresAt` in Unix seconds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerPayload {
    pub name: String,
    pub description: Option<String>,
    pub expires_at: i64,
    pub is_active: bool,
}

/// Validated banner fields, normalized for persistence.
#[derive(Debug, Clone)]
pub struct NewBanner {
    pub name: String,
    pub description: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl NewBanner {
    /// Validate a raw JSON payload. Every failing field is reported, keyed
    /// by its wire name.
    pub fn parse(payload: &Value) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = match payload.get("name") {
            Some(Value::String(s)) if s.is_empty() => {
                fail(&mut errors, "name", "Name is required");
                None
            }
            Some(Value::String(s)) if s.chars().count() > NAME_MAX_CHARS => {
                fail(
                    &mut errors,
                    "name",
                    "Name can at most contain 2048 character(s)",
                );
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            _ => {
                fail(&mut errors, "name", "Name is required");
                None
            }
        };

        let description = match payload.get("description") {
            None | Some(Value::Null) => Some(None),
            Some(Value::String(s)) if s.chars().count() > DESCRIPTION_MAX_CHARS => {
                fail(
                    &mut errors,
                    "description",
                    "Description can at most contain 5000 character(s)",
                );
                None
            }
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(_) => {
                fail(&mut errors, "description", "Description should be a string");
                None
            }
        };

        let expires_at = match payload.get("expiresAt") {
            None | Some(Value::Null) => {
                fail(&mut errors, "expiresAt", "Expiration time is required");
                None
            }
            Some(Value::Number(n)) => match n.as_i64() {
                // Seconds since epoch, normalized to a date-time.
                Some(secs) if secs >= 0 => match Utc.timestamp_opt(secs, 0).single() {
                    Some(dt) => Some(dt),
                    None => {
                        fail(&mut errors, "expiresAt", "Invalid Unix timestamp");
                        None
                    }
                },
                _ => {
                    fail(&mut errors, "expiresAt", "Invalid expiration time");
                    None
                }
            },
            Some(_) => {
                fail(
                    &mut errors,
                    "expiresAt",
                    "Expiration time should be a number",
                );
                None
            }
        };

        let is_active = match payload.get("isActive") {
            Some(Value::Bool(b)) => Some(*b),
            None | Some(Value::Null) => {
                fail(&mut errors, "isActive", "Is active is required");
                None
            }
            Some(_) => {
                fail(&mut errors, "isActive", "Is active should be a boolean");
                None
            }
        };

        match (name, description, expires_at, is_active) {
            (Some(name), Some(description), Some(expires_at), Some(is_active))
                if errors.is_empty() =>
            {
                Ok(Self {
                    name,
                    description,
                    expires_at,
                    is_active,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Path ids must be well-formed ULIDs; a malformed id is a validation
/// failure, not a missing row.
pub fn parse_banner_id(raw: &str) -> Result<String, FieldErrors> {
    match Ulid::from_string(raw) {
        Ok(_) => Ok(raw.to_string()),
        Err(_) => {
            let mut errors = FieldErrors::new();
            fail(&mut errors, "id", "Banner id should be a valid ULID");
            Err(errors)
        }
    }
}

fn fail(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BannersResponse {
    pub ok: bool,
    pub code: String,
    pub data: BannersData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BannersData {
    pub banners: Vec<Banner>,
}

impl BannersResponse {
    pub fn new(banners: Vec<Banner>) -> Self {
        Self {
            ok: true,
            code: "OK".into(),
            data: BannersData { banners },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BannerResponse {
    pub ok: bool,
    pub code: String,
    pub data: BannerData,
}

/// The `banner` key is omitted entirely when the row does not exist.
#[derive(Debug, Serialize, Deserialize)]
pub struct BannerData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
}

impl BannerResponse {
    pub fn new(banner: Option<Banner>) -> Self {
        Self {
            ok: true,
            code: "OK".into(),
            data: BannerData { banner },
        }
    }
}
