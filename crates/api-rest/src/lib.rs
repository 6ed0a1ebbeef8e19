//! # API REST
//!
//! REST surface for the letter wizard.
//!
//! Handles:
//! - HTTP endpoints with axum, one in-memory [`lmn_core::WizardSession`] per wizard run,
//!   discarded when closed or left idle
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, PDF download headers)
//!
//! All wizard semantics live in `lmn-core`; handlers only parse requests and map errors.

#![warn(rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod sessions;

use axum::{
    routing::{get, post, put},
    Router,
};
use lmn_core::constants::DEFAULT_SESSION_TTL_SECS;
use lmn_core::{AuthProvider, CoreConfig, LetterBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::*;
use sessions::SessionStore;

/// Application state shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    backend: Arc<dyn LetterBackend>,
    auth: Option<Arc<dyn AuthProvider>>,
    sessions: Arc<Mutex<SessionStore>>,
}

impl AppState {
    pub fn new(
        cfg: Arc<CoreConfig>,
        backend: Arc<dyn LetterBackend>,
        auth: Option<Arc<dyn AuthProvider>>,
    ) -> Self {
        Self {
            cfg,
            backend,
            auth,
            sessions: Arc::new(Mutex::new(SessionStore::new(Duration::from_secs(
                DEFAULT_SESSION_TTL_SECS,
            )))),
        }
    }

    /// Discards sessions left idle for longer than `ttl`.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.sessions = Arc::new(Mutex::new(SessionStore::new(ttl)));
        self
    }

    /// A signed-in identity counts as authenticated. Without an identity provider, mock mode is
    /// treated as signed in so the profile banner stays meaningful in development.
    fn is_authenticated(&self) -> bool {
        match &self.auth {
            Some(auth) => auth.current_identity().is_some(),
            None => self.cfg.use_mock_data(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        create_session,
        get_session,
        reset_session,
        close_session,
        patch_letter,
        set_step,
        next_step,
        previous_step,
        select_template,
        select_provider,
        enter_manual_entry,
        set_manual_field,
        set_patient_field,
        set_insurance_field,
        set_diagnosis_field,
        set_history_field,
        add_lab_result,
        update_lab_result,
        remove_lab_result,
        add_treatment,
        update_treatment,
        remove_treatment,
        set_introduction,
        set_final_rationale,
        use_template_introduction,
        use_template_rationale,
        get_review,
        get_letter,
        export_pdf,
        dismiss_profile_notice,
    ),
    components(schemas(
        dto::HealthRes,
        dto::CreateSessionReq,
        dto::SetStepReq,
        dto::SelectTemplateReq,
        dto::SelectProviderReq,
        dto::FieldEditReq,
        dto::TextReq,
        dto::SessionView,
        dto::TransitionRes,
        dto::EntryCreatedRes,
        dto::AppliedRes,
        dto::ReviewRes,
        dto::LetterRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(reset_session))
        .route("/sessions/:id/close", post(close_session))
        .route("/sessions/:id/letter", get(get_letter).patch(patch_letter))
        .route("/sessions/:id/step", put(set_step))
        .route("/sessions/:id/next", post(next_step))
        .route("/sessions/:id/previous", post(previous_step))
        .route("/sessions/:id/template", post(select_template))
        .route("/sessions/:id/provider/select", post(select_provider))
        .route(
            "/sessions/:id/provider/manual",
            post(enter_manual_entry).put(set_manual_field),
        )
        .route("/sessions/:id/patient", put(set_patient_field))
        .route("/sessions/:id/insurance", put(set_insurance_field))
        .route("/sessions/:id/diagnosis", put(set_diagnosis_field))
        .route("/sessions/:id/treatment-history", put(set_history_field))
        .route("/sessions/:id/lab-results", post(add_lab_result))
        .route(
            "/sessions/:id/lab-results/:entry_id",
            put(update_lab_result).delete(remove_lab_result),
        )
        .route("/sessions/:id/treatments", post(add_treatment))
        .route(
            "/sessions/:id/treatments/:entry_id",
            put(update_treatment).delete(remove_treatment),
        )
        .route("/sessions/:id/review", get(get_review))
        .route("/sessions/:id/review/introduction", put(set_introduction))
        .route("/sessions/:id/review/rationale", put(set_final_rationale))
        .route(
            "/sessions/:id/review/introduction/template",
            post(use_template_introduction),
        )
        .route(
            "/sessions/:id/review/rationale/template",
            post(use_template_rationale),
        )
        .route("/sessions/:id/export", get(export_pdf))
        .route(
            "/sessions/:id/profile-notice/dismiss",
            post(dismiss_profile_notice),
        )
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use lmn_backend::MockBackend;
    use lmn_core::WizardPolicy;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::time::Duration;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(policy: WizardPolicy) -> Router {
        router(state(policy))
    }

    fn state(policy: WizardPolicy) -> AppState {
        let cfg = CoreConfig::new(
            "http://localhost:8080/api".into(),
            Duration::from_secs(5),
            true,
            policy,
            PathBuf::from("exports"),
        )
        .expect("valid config");
        AppState::new(Arc::new(cfg), Arc::new(MockBackend::new()), None)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, bytes.to_vec())
    }

    async fn call_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = call(app, method, uri, body).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn start_session(app: &Router) -> (String, Value) {
        let (status, view) = call_json(
            app,
            Method::POST,
            "/sessions",
            Some(json!({ "productId": "1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = view["id"].as_str().expect("session id").to_string();
        (id, view)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(WizardPolicy::Permissive);
        let (status, body) = call_json(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], json!(true));
    }

    #[tokio::test]
    async fn test_create_session_loads_templates_and_roster() {
        let app = app(WizardPolicy::Permissive);
        let (_, view) = start_session(&app).await;

        assert_eq!(view["step"], json!(1));
        assert!(!view["templates"].as_array().expect("templates").is_empty());
        assert_eq!(view["provider"]["state"], json!("hasOrganizationData"));
        assert_eq!(view["letter"]["provider"]["npiNumber"], json!("1234567890"));
    }

    #[tokio::test]
    async fn test_blank_product_id_is_rejected() {
        let app = app(WizardPolicy::Permissive);
        let (status, _) = call(
            &app,
            Method::POST,
            "/sessions",
            Some(json!({ "productId": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = app(WizardPolicy::Permissive);
        let uri = format!("/sessions/{}", Uuid::new_v4());
        let (status, _) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_closed_session_is_not_found() {
        let app = app(WizardPolicy::Permissive);
        let (id, _) = start_session(&app).await;

        let (status, _) = call(&app, Method::POST, &format!("/sessions/{id}/close"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, Method::GET, &format!("/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, Method::POST, &format!("/sessions/{id}/close"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_idle_session_is_evicted() {
        let app = router(state(WizardPolicy::Permissive).with_session_ttl(Duration::from_millis(20)));
        let (id, _) = start_session(&app).await;

        std::thread::sleep(Duration::from_millis(60));
        let (status, _) = call(&app, Method::GET, &format!("/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_navigation_and_out_of_range_step() {
        let app = app(WizardPolicy::Permissive);
        let (id, _) = start_session(&app).await;

        let (status, body) =
            call_json(&app, Method::POST, &format!("/sessions/{id}/previous"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["step"], json!(1));

        let (_, body) = call_json(&app, Method::POST, &format!("/sessions/{id}/next"), None).await;
        assert_eq!(body["step"], json!(2));

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/sessions/{id}/step"),
            Some(json!({ "step": 9 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call_json(
            &app,
            Method::PUT,
            &format!("/sessions/{id}/step"),
            Some(json!({ "step": 7 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["step"], json!(7));
    }

    #[tokio::test]
    async fn test_field_edits_reach_the_draft() {
        let app = app(WizardPolicy::Permissive);
        let (id, _) = start_session(&app).await;

        let (status, view) = call_json(
            &app,
            Method::PUT,
            &format!("/sessions/{id}/patient"),
            Some(json!({ "field": "firstName", "value": "Jane" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["letter"]["patient"]["firstName"], json!("Jane"));

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/sessions/{id}/patient"),
            Some(json!({ "field": "shoeSize", "value": "9" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lab_result_lifecycle() {
        let app = app(WizardPolicy::Permissive);
        let (id, _) = start_session(&app).await;

        let (status, created) =
            call_json(&app, Method::POST, &format!("/sessions/{id}/lab-results"), None).await;
        assert_eq!(status, StatusCode::CREATED);
        let entry = created["id"].as_str().expect("entry id").to_string();

        let (status, view) = call_json(
            &app,
            Method::PUT,
            &format!("/sessions/{id}/lab-results/{entry}"),
            Some(json!({ "field": "test", "value": "HbA1c" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            view["letter"]["diagnosis"]["labResults"][0]["test"],
            json!("HbA1c")
        );

        let (status, _) = call(
            &app,
            Method::DELETE,
            &format!("/sessions/{id}/lab-results/{entry}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(
            &app,
            Method::DELETE,
            &format!("/sessions/{id}/lab-results/{entry}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_manual_field_requires_manual_entry() {
        let app = app(WizardPolicy::Permissive);
        let (id, _) = start_session(&app).await;
        let uri = format!("/sessions/{id}/provider/manual");
        let edit = json!({ "field": "lastName", "value": "Smith" });

        let (status, _) = call(&app, Method::PUT, &uri, Some(edit.clone())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, view) = call_json(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["provider"]["state"], json!("manualEntry"));

        let (status, view) = call_json(&app, Method::PUT, &uri, Some(edit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["letter"]["provider"]["lastName"], json!("Smith"));
    }

    #[tokio::test]
    async fn test_letter_text_and_reset() {
        let app = app(WizardPolicy::Permissive);
        let (id, _) = start_session(&app).await;
        call(
            &app,
            Method::PUT,
            &format!("/sessions/{id}/review/introduction"),
            Some(json!({ "text": "I am writing on behalf of my patient." })),
        )
        .await;

        let (status, letter) =
            call_json(&app, Method::GET, &format!("/sessions/{id}/letter"), None).await;
        assert_eq!(status, StatusCode::OK);
        let text = letter["text"].as_str().expect("plain text");
        assert!(text.contains("I am writing on behalf of my patient."));
        assert!(text.contains("Sincerely,"));

        let (status, view) =
            call_json(&app, Method::DELETE, &format!("/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], json!(1));
        assert!(view["letter"]["introduction"].is_null());
    }

    #[tokio::test]
    async fn test_export_returns_pdf_attachment() {
        let app = app(WizardPolicy::Permissive);
        let (id, _) = start_session(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/sessions/{id}/export"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .expect("header")
            .contains("medical_necessity_letter.pdf"));
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_strict_policy_blocks_incomplete_export() {
        let app = app(WizardPolicy::RequireComplete);
        let (id, _) = start_session(&app).await;
        let (status, _) = call(&app, Method::GET, &format!("/sessions/{id}/export"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_openapi_lists_session_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/sessions"));
        assert!(doc.paths.paths.contains_key("/sessions/{id}/export"));
    }
}
