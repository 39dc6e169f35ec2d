//! One-button demo application
//!
//! A page titled `App Title` holding a single button with widget id
//! `myButton`. Every page load starts at `Before`; clicking asks the server
//! for the next label and the page swaps it in once the reply arrives, so
//! the label changes asynchronously after the click.
//!
//! ```text
//! ┌──────────────┐   GET /, /rap      ┌──────────────┐
//! │   Browser    │ ─────────────────► │   DemoApp    │
//! │  (driven by  │   POST /api/click  │   (axum)     │
//! │  RC server)  │ ◄───────────────── │  click count │
//! └──────────────┘   "After"          └──────────────┘
//! ```

use crate::error::{CliError, CliResult};
use tokio::net::TcpListener;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use rcprobe::scenario::{DEMO_BUTTON_ID, LABEL_AFTER, LABEL_BEFORE};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Window title of the demo page
pub const APP_TITLE: &str = "App Title";

/// Demo server settings
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Address to bind
    pub bind: String,
    /// HTTP port
    pub port: u16,
    /// Delay before `/api/click` answers
    pub click_delay: Duration,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 10080,
            click_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
struct DemoState {
    clicks: AtomicUsize,
    click_delay: Duration,
}

/// The demo application server
#[derive(Debug)]
pub struct DemoApp {
    config: DemoConfig,
    state: Arc<DemoState>,
}

impl DemoApp {
    /// Create the app
    #[must_use]
    pub fn new(config: DemoConfig) -> Self {
        let state = Arc::new(DemoState {
            clicks: AtomicUsize::new(0),
            click_delay: config.click_delay,
        });
        Self { config, state }
    }

    /// Clicks served so far
    #[must_use]
    pub fn clicks(&self) -> usize {
        self.state.clicks.load(Ordering::Relaxed)
    }

    /// Page URL the scenario should open
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}/rap", self.config.bind, self.config.port)
    }

    /// Build the router
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/rap", get(index))
            .route("/api/click", post(click))
            .route("/health", get(health))
            .with_state(self.state.clone())
    }

    /// Bind the listener; `bind` may be an IP address or a host name
    pub async fn bind(&self) -> CliResult<TcpListener> {
        let DemoConfig { bind, port, .. } = &self.config;
        TcpListener::bind((bind.as_str(), *port))
            .await
            .map_err(|e| CliError::server(format!("cannot use bind address {bind}:{port}: {e}")))
    }

    /// Serve until the process receives Ctrl+C
    pub async fn run(&self) -> CliResult<()> {
        let listener = self.bind().await?;
        let addr = listener.local_addr()?;

        tracing::info!(%addr, "demo application listening");
        println!("Demo application: {}", self.url());
        println!("Press Ctrl+C to stop");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .map_err(|e| CliError::server(e.to_string()))
    }
}

async fn index() -> Html<String> {
    Html(render_page(LABEL_BEFORE))
}

async fn click(State(state): State<Arc<DemoState>>) -> impl IntoResponse {
    if !state.click_delay.is_zero() {
        tokio::time::sleep(state.click_delay).await;
    }
    let clicks = state.clicks.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::debug!(clicks, "button clicked");
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], LABEL_AFTER)
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

fn render_page(label: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{APP_TITLE}</title>
</head>
<body>
  <button id="{DEMO_BUTTON_ID}" type="button">{label}</button>
  <script>
    const button = document.getElementById("{DEMO_BUTTON_ID}");
    button.addEventListener("click", async () => {{
      const reply = await fetch("/api/click", {{ method: "POST" }});
      button.textContent = await reply.text();
    }});
  </script>
</body>
</html>
"#
    )
}
