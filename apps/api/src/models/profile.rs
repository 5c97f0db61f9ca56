use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub resume_text: Option<String>,
    pub from_email: Option<String>,
    /// Sealed app password envelope, stored as JSON.
    pub mail_password: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    /// Applicant object handed to the drafting prompt. Only populated fields are included.
    pub fn applicant(&self) -> Value {
        let mut applicant = Map::new();
        let fields = [
            ("name", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("github", &self.github),
            ("linkedin", &self.linkedin),
            ("portfolio", &self.portfolio),
        ];
        for (key, value) in fields {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                applicant.insert(key.to_string(), Value::String(v.to_string()));
            }
        }
        Value::Object(applicant)
    }
}
