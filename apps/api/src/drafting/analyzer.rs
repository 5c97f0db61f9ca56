//! Recruiter email drafting. Turns a job description plus applicant details
//! into a short HTML application email and the recruiter/role facts the
//! model could find.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::drafting::prompts::{DRAFT_PROMPT_TEMPLATE, DRAFT_SYSTEM, NO_APPLICANT};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;

pub const DEFAULT_SUBJECT: &str = "Application for the role";

/// Normalized draft returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftedEmail {
    pub recruiter_email: Option<String>,
    pub recruiter_name: Option<String>,
    pub company_name: Option<String>,
    pub job_role: Option<String>,
    pub job_location: Option<String>,
    pub subject: String,
    pub body: String,
}

/// The model's reply before normalization. Any field may be missing or
/// carry an unexpected type.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawDraft {
    recruiter_email: Value,
    recruiter_name: Value,
    company_name: Value,
    job_role: Value,
    job_location: Value,
    subject: Value,
    body: Value,
}

impl From<RawDraft> for DraftedEmail {
    fn from(raw: RawDraft) -> Self {
        Self {
            recruiter_email: text_or_none(raw.recruiter_email),
            recruiter_name: text_or_none(raw.recruiter_name),
            company_name: text_or_none(raw.company_name),
            job_role: text_or_none(raw.job_role),
            job_location: text_or_none(raw.job_location),
            subject: text_or_none(raw.subject).unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            body: text_or_none(raw.body).unwrap_or_default(),
        }
    }
}

fn text_or_none(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        other => Some(other.to_string()),
    }
}

/// Fills the drafting template.
pub fn build_prompt(
    job_description: &str,
    applicant: Option<&Value>,
    resume_text: Option<&str>,
) -> String {
    let applicant_block = match applicant {
        Some(applicant) => format!("Applicant object (JSON): {applicant}"),
        None => NO_APPLICANT.to_string(),
    };

    DRAFT_PROMPT_TEMPLATE
        .replace("{applicant_block}", &applicant_block)
        .replace("{resume_text}", resume_text.unwrap_or_default())
        .replace("{job_description}", job_description)
}

/// Drafts an application email using the LLM.
pub async fn draft_email(
    llm: &LlmClient,
    job_description: &str,
    applicant: Option<&Value>,
    resume_text: Option<&str>,
) -> Result<DraftedEmail, AppError> {
    let prompt = build_prompt(job_description, applicant, resume_text);
    let system = format!("{DRAFT_SYSTEM} {JSON_ONLY_SYSTEM}");

    llm.call_json::<RawDraft>(&prompt, &system)
        .await
        .map(DraftedEmail::from)
        .map_err(|e| AppError::Llm(format!("Email drafting failed: {e}")))
}
