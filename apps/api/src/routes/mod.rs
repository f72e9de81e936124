pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::ats::handlers as ats;
use crate::cache::handlers as cache;
use crate::profiles::handlers as profiles;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profiles
        .route("/api/profile", post(profiles::handle_save_profile))
        .route(
            "/api/profile/:user_id",
            get(profiles::handle_get_profile).delete(profiles::handle_delete_profile),
        )
        // AI settings (auth)
        .route(
            "/api/ai-settings",
            get(profiles::handle_get_ai_settings)
                .put(profiles::handle_save_ai_settings)
                .delete(profiles::handle_delete_ai_settings),
        )
        // Tailoring
        .route(
            "/api/ai/generate-summary",
            post(tailoring::handle_generate_summary),
        )
        .route("/api/ai/tailor-resume", post(tailoring::handle_tailor_resume))
        .route(
            "/api/ai/generate-cover-letter",
            post(tailoring::handle_generate_cover_letter),
        )
        .route("/api/ai/batch-tailor", post(tailoring::handle_batch_tailor))
        // Scoring and analysis
        .route("/api/ai/ats-score", post(ats::handle_ats_score))
        .route("/api/ai/rank-bullets", post(analysis::handle_rank_bullets))
        .route(
            "/api/ai/verify-accuracy",
            post(analysis::handle_verify_accuracy),
        )
        // Response cache (auth)
        .route("/api/ai/cache/stats", get(cache::handle_cache_stats))
        .route("/api/ai/cache/clear", post(cache::handle_cache_clear))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::tests::{token_for, TEST_SECRET};
    use crate::auth::JwtVerifier;
    use crate::cache::ResponseCache;
    use crate::config::Config;
    use crate::llm_client::LlmClient;

    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/resumyx_test".to_string(),
            supabase_jwt_secret: TEST_SECRET.to_string(),
            gemini_api_key: None,
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            cache_ttl_hours: 24,
        };
        // Never connects unless a handler touches the database.
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let llm = LlmClient::new(None, Arc::new(ResponseCache::default())).unwrap();

        AppState {
            db,
            llm,
            jwt: JwtVerifier::new(&config.supabase_jwt_secret),
            config,
        }
    }

    fn bearer() -> String {
        let token = token_for(&Uuid::new_v4().to_string(), "authenticated", 3600, TEST_SECRET);
        format!("Bearer {token}")
    }

    fn post_json(uri: &str, body: Value, auth: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn profile_json() -> Value {
        json!({
            "personalInfo": {
                "fullName": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "555-0100",
                "linkedin": "linkedin.com/in/ada"
            },
            "summary": "Backend engineer",
            "skills": {"languages": ["Python", "Rust"], "databases": ["PostgreSQL"]},
            "experience": [{
                "company": "Acme",
                "role": "Engineer",
                "startDate": "2020",
                "endDate": "2023",
                "description": [
                    "Wrote docs",
                    "Built Python services on PostgreSQL handling 5000 requests per second"
                ]
            }],
            "education": [{"institution": "State University", "degree": "BSc"}]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "resumyx-api");
    }

    #[tokio::test]
    async fn test_ats_score_returns_report() {
        let app = build_router(test_state());
        let request = post_json(
            "/api/ai/ats-score",
            json!({
                "profileData": profile_json(),
                "jobDescription": "Python engineer with PostgreSQL and Kubernetes"
            }),
            None,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let score = body["score"].as_u64().unwrap();
        assert!(score <= 100);
        assert!(body["breakdown"]["keyword_match"].is_u64());
        assert!(body["missing_keywords"].is_array());
        assert!(body["feedback"].as_str().unwrap().contains("ATS compatibility"));
    }

    #[tokio::test]
    async fn test_ats_score_rejects_blank_job_description() {
        let app = build_router(test_state());
        let request = post_json(
            "/api/ai/ats-score",
            json!({"profileData": profile_json(), "jobDescription": "   "}),
            None,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_ats_score_rejects_profile_without_skills() {
        let app = build_router(test_state());
        let request = post_json(
            "/api/ai/ats-score",
            json!({"profileData": {"experience": []}, "jobDescription": "Rust"}),
            None,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_generate_summary_requires_experience() {
        let app = build_router(test_state());
        let request = post_json("/api/ai/generate-summary", json!({"experience": ""}), None);
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Experience data is required");
    }

    #[tokio::test]
    async fn test_generate_summary_without_provider_key_is_428() {
        let app = build_router(test_state());
        let request = post_json(
            "/api/ai/generate-summary",
            json!({"experience": "Engineer at Acme"}),
            None,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);
    }

    #[tokio::test]
    async fn test_cache_stats_requires_auth() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ai/cache/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cache_stats_with_token() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ai/cache/stats")
                    .header(header::AUTHORIZATION, bearer())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["cache_stats"]["total_entries"], 0);
    }

    #[tokio::test]
    async fn test_delete_ai_settings_requires_auth() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/ai-settings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rank_bullets_keeps_best_first() {
        let app = build_router(test_state());
        let request = post_json(
            "/api/ai/rank-bullets",
            json!({
                "profileData": profile_json(),
                "jobDescription": "Python developer",
                "keep_top_n": 1
            }),
            Some(bearer()),
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let bullets = body["ranked_experience"][0]["description"].as_array().unwrap();
        assert_eq!(bullets.len(), 1);
        assert!(bullets[0].as_str().unwrap().starts_with("Built Python services"));
        assert_eq!(body["message"], "Ranked and kept top 1 bullets per role");
    }

    #[tokio::test]
    async fn test_verify_accuracy_flags_new_numbers() {
        let app = build_router(test_state());
        let mut tailored = profile_json();
        tailored["experience"][0]["description"][0] = json!("Wrote 40 docs");

        let request = post_json(
            "/api/ai/verify-accuracy",
            json!({"original": profile_json(), "tailored": tailored}),
            Some(bearer()),
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["verified"], false);
        assert_eq!(body["message"], "Issues detected");
        assert_eq!(body["issues"].as_array().unwrap().len(), 1);
    }
}
