use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::profile::ProfileRow;

/// Fields written by a profile update. `None` keeps the stored value.
pub struct ProfileChanges<'a> {
    pub user_id: Uuid,
    pub full_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub github: Option<&'a str>,
    pub linkedin: Option<&'a str>,
    pub portfolio: Option<&'a str>,
    pub resume_text: Option<&'a str>,
    pub from_email: Option<&'a str>,
    /// Replaces the stored envelope wholesale when present.
    pub mail_password: Option<Value>,
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Inserts or updates a profile and returns the stored row.
pub async fn upsert_profile(
    pool: &PgPool,
    changes: ProfileChanges<'_>,
) -> Result<ProfileRow, sqlx::Error> {
    let ProfileChanges {
        user_id,
        full_name,
        phone,
        email,
        github,
        linkedin,
        portfolio,
        resume_text,
        from_email,
        mail_password,
    } = changes;
    let replaces_password = mail_password.is_some();

    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles
            (user_id, full_name, phone, email, github, linkedin, portfolio,
             resume_text, from_email, mail_password, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
        ON CONFLICT (user_id) DO UPDATE SET
            full_name     = COALESCE(EXCLUDED.full_name, profiles.full_name),
            phone         = COALESCE(EXCLUDED.phone, profiles.phone),
            email         = COALESCE(EXCLUDED.email, profiles.email),
            github        = COALESCE(EXCLUDED.github, profiles.github),
            linkedin      = COALESCE(EXCLUDED.linkedin, profiles.linkedin),
            portfolio     = COALESCE(EXCLUDED.portfolio, profiles.portfolio),
            resume_text   = COALESCE(EXCLUDED.resume_text, profiles.resume_text),
            from_email    = COALESCE(EXCLUDED.from_email, profiles.from_email),
            mail_password = COALESCE(EXCLUDED.mail_password, profiles.mail_password),
            updated_at    = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(full_name)
    .bind(phone)
    .bind(email)
    .bind(github)
    .bind(linkedin)
    .bind(portfolio)
    .bind(resume_text)
    .bind(from_email)
    .bind(mail_password)
    .fetch_one(pool)
    .await?;

    info!("Upserted profile for user {user_id} (mail password replaced: {replaces_password})");
    Ok(row)
}
