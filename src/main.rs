use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use lmn_backend::{HttpBackend, MockBackend, StaticTokenAuth};
use lmn_core::{
    request_timeout_from_env_value, session_ttl_from_env_value, use_mock_data_from_env_value,
    wizard_policy_from_env_value, AuthProvider, CoreConfig, LetterBackend, LetterResult,
};

/// Main entry point for the letter wizard service
///
/// Serves the REST API (with Swagger UI at `/swagger-ui`) on port 3000 by default.
///
/// # Environment Variables
/// - `LMN_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `LMN_API_BASE_URL`: Backend base URL (default: "http://localhost:5001/api")
/// - `LMN_USE_MOCK_DATA`: Use built-in demo data instead of the backend (default: true)
/// - `LMN_REQUEST_TIMEOUT_SECS`: Backend request timeout (default: 10)
/// - `LMN_WIZARD_POLICY`: `permissive` or `require-complete` (default: permissive)
/// - `LMN_SESSION_TTL_SECS`: Idle time before a wizard session is discarded (default: 3600)
/// - `LMN_ACCESS_TOKEN`: Bearer token sent to the backend
/// - `LMN_USER_EMAIL`: Identity reported for the signed-in user
///
/// Exports are streamed back to the REST caller, so the server never reads `LMN_EXPORT_DIR`;
/// that variable only applies to the `lmn` CLI.
///
/// # Errors
/// Returns an error if configuration is invalid, the address cannot be bound, or the server
/// fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("lmn=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("LMN_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let (cfg, session_ttl) = server_config_from(|name| std::env::var(name).ok())?;
    let cfg = Arc::new(cfg);

    let token = std::env::var("LMN_ACCESS_TOKEN").ok();
    let auth: Option<Arc<dyn AuthProvider>> = token.map(|token| {
        Arc::new(StaticTokenAuth::new(
            Some(token),
            std::env::var("LMN_USER_EMAIL").ok(),
        )) as Arc<dyn AuthProvider>
    });

    let backend: Arc<dyn LetterBackend> = if cfg.use_mock_data() && auth.is_none() {
        tracing::info!("-- No access token; using built-in demo data");
        Arc::new(MockBackend::new())
    } else {
        Arc::new(HttpBackend::new(&cfg, auth.clone())?)
    };

    tracing::info!(
        "++ Starting letter wizard REST on {} (backend {}, policy {:?}, session ttl {}s)",
        rest_addr,
        cfg.api_base_url(),
        cfg.wizard_policy(),
        session_ttl.as_secs()
    );

    let state = AppState::new(cfg, backend, auth).with_session_ttl(session_ttl);
    let app = api_rest::router(state);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Resolves the server's configuration from `lookup`, which maps a variable name to its value.
///
/// The export directory always takes its default here.
fn server_config_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> LetterResult<(CoreConfig, Duration)> {
    let defaults = CoreConfig::default();
    let cfg = CoreConfig::new(
        lookup("LMN_API_BASE_URL").unwrap_or_else(|| defaults.api_base_url().to_string()),
        request_timeout_from_env_value(lookup("LMN_REQUEST_TIMEOUT_SECS"))?,
        use_mock_data_from_env_value(lookup("LMN_USE_MOCK_DATA"))?,
        wizard_policy_from_env_value(lookup("LMN_WIZARD_POLICY"))?,
        defaults.export_dir().to_path_buf(),
    )?;
    let session_ttl = session_ttl_from_env_value(lookup("LMN_SESSION_TTL_SECS"))?;
    Ok((cfg, session_ttl))
}
