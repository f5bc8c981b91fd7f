use relay_service::config::RelayConfig;
use relay_service::services::init_metrics;
use relay_service::services::providers::TextProvider;
use relay_service::startup::Application;
use std::sync::Arc;
use std::sync::Once;

// Initialize metrics once for all tests
static INIT_METRICS: Once = Once::new();

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    /// Spawn the application on a random port with the given provider.
    pub async fn spawn(provider: Arc<dyn TextProvider>) -> Self {
        INIT_METRICS.call_once(init_metrics);

        std::env::set_var("APP__PORT", "0");
        std::env::set_var("GEMINI_API_KEY", "test-api-key");

        let config = RelayConfig::load().expect("Failed to load configuration");

        let app = Application::build_with_provider(config, provider)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp { address }
    }
}
