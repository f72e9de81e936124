//! Postgres persistence for resume profiles and per-user AI settings.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::ai_settings::{AiSettingsConfig, AiSettingsRow};
use crate::models::profile::ProfileRow;
use crate::models::resume::ResumeData;

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
    let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM resume_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Inserts or replaces the user's profile.
pub async fn save_profile(
    pool: &PgPool,
    user_id: Uuid,
    profile_data: &ResumeData,
    target_jd: &str,
) -> Result<(), AppError> {
    let data = serde_json::to_value(profile_data)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO resume_profiles (user_id, profile_data, target_jd)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE
            SET profile_data = EXCLUDED.profile_data,
                target_jd = EXCLUDED.target_jd,
                updated_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(&data)
    .bind(target_jd)
    .execute(pool)
    .await?;

    info!("Saved profile for user {user_id}");
    Ok(())
}

/// Deleting a missing profile is not an error.
pub async fn delete_profile(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM resume_profiles WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        info!("No profile to delete for user {user_id}");
    } else {
        info!("Deleted profile for user {user_id}");
    }
    Ok(())
}

pub async fn get_ai_settings(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<AiSettingsRow>, AppError> {
    let row = sqlx::query_as::<_, AiSettingsRow>("SELECT * FROM ai_settings WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Rejects settings that could never produce a working provider call.
pub fn validate_ai_settings(config: &AiSettingsConfig) -> Result<(), AppError> {
    if config.api_key.trim().is_empty() {
        return Err(AppError::Validation("apiKey cannot be empty".to_string()));
    }
    if config.model.trim().is_empty() {
        return Err(AppError::Validation("model cannot be empty".to_string()));
    }
    Ok(())
}

/// Inserts or replaces the user's provider settings and returns the stored row.
pub async fn save_ai_settings(
    pool: &PgPool,
    user_id: Uuid,
    config: &AiSettingsConfig,
) -> Result<AiSettingsRow, AppError> {
    validate_ai_settings(config)?;

    let row = sqlx::query_as::<_, AiSettingsRow>(
        r#"
        INSERT INTO ai_settings (user_id, provider, api_key, model, site_url, app_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE
            SET provider = EXCLUDED.provider,
                api_key = EXCLUDED.api_key,
                model = EXCLUDED.model,
                site_url = EXCLUDED.site_url,
                app_name = EXCLUDED.app_name,
                updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(config.provider.as_str())
    .bind(config.api_key.trim())
    .bind(config.model.trim())
    .bind(&config.site_url)
    .bind(&config.app_name)
    .fetch_one(pool)
    .await?;

    info!("Saved AI settings for user {user_id} (provider: {})", config.provider);
    Ok(row)
}

pub async fn delete_ai_settings(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM ai_settings WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        info!("No AI settings to delete for user {user_id}");
    } else {
        info!("Deleted AI settings for user {user_id}");
    }
    Ok(())
}
