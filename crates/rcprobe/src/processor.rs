//! Command processors: the narrow seam between a driver and a browser.
//!
//! ```text
//! ┌──────────────┐  do_command(cmd, args)  ┌───────────────────────┐
//! │   RcDriver   │ ──────────────────────► │ CommandProcessor      │
//! │ (helpers,    │                          │  ├ HttpCommandProcessor│──► remote-control server
//! │  waits)      │ ◄────────────────────── │  └ MockProcessor       │    (in-memory page)
//! └──────────────┘        reply value       └───────────────────────┘
//! ```

use crate::protocol::{self, GET_TEXT, IS_ELEMENT_PRESENT, TEST_COMPLETE};
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
#[cfg(feature = "http")]
use std::time::Duration;

/// Default limit on one HTTP exchange with the remote-control server
#[cfg(feature = "http")]
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues remote-control commands against one browser session
#[async_trait]
pub trait CommandProcessor: Send + Sync {
    /// Open a browser session
    async fn start(&mut self) -> ProbeResult<()>;

    /// Close the browser session
    async fn stop(&mut self) -> ProbeResult<()>;

    /// Run a command, returning the reply value
    async fn do_command(&self, command: &str, args: &[&str]) -> ProbeResult<String>;

    /// Run a command whose reply is a string
    async fn get_string(&self, command: &str, args: &[&str]) -> ProbeResult<String> {
        self.do_command(command, args).await
    }

    /// Run a command whose reply is `true` or `false`
    async fn get_boolean(&self, command: &str, args: &[&str]) -> ProbeResult<bool> {
        let value = self.do_command(command, args).await?;
        protocol::parse_boolean(command, &value)
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// Remote-control client speaking the form-encoded HTTP protocol
#[cfg(feature = "http")]
#[derive(Debug)]
pub struct HttpCommandProcessor {
    client: reqwest::Client,
    url: String,
    browser: String,
    base_url: String,
    timeout: Duration,
    session_id: Option<String>,
}

#[cfg(feature = "http")]
impl HttpCommandProcessor {
    /// Create a processor for a server, browser start command and application URL
    #[must_use]
    pub fn new(
        host: &str,
        port: u16,
        browser: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: protocol::driver_url(host, port),
            browser: browser.into(),
            base_url: base_url.into(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
            session_id: None,
        }
    }

    /// Abandon any command the server has not answered within `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a processor from configuration
    #[must_use]
    pub fn from_config(config: &crate::config::RemoteConfig) -> Self {
        Self::new(
            &config.host,
            config.port,
            config.browser.clone(),
            config.base_url.clone(),
        )
        .with_timeout(config.command_timeout())
    }

    /// Current session id, if started
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Command endpoint URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Per-command time limit
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(
        &self,
        command: &str,
        args: &[&str],
        session_id: Option<&str>,
    ) -> ProbeResult<String> {
        let form = protocol::command_form(command, args, session_id);
        tracing::debug!(command, ?args, "sending command");
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProbeError::transport(format!(
                "{command}: HTTP {status}: {}",
                body.trim_end()
            )));
        }
        tracing::trace!(command, reply = %body, "reply");
        protocol::parse_reply(command, &body)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl CommandProcessor for HttpCommandProcessor {
    async fn start(&mut self) -> ProbeResult<()> {
        if let Some(id) = &self.session_id {
            return Err(ProbeError::SessionActive {
                session_id: id.clone(),
            });
        }
        let id = self
            .send(
                protocol::GET_NEW_BROWSER_SESSION,
                &[self.browser.as_str(), self.base_url.as_str()],
                None,
            )
            .await?;
        if id.is_empty() {
            return Err(ProbeError::protocol("server returned an empty session id"));
        }
        tracing::info!(session_id = %id, browser = %self.browser, "remote session started");
        self.session_id = Some(id);
        Ok(())
    }

    async fn stop(&mut self) -> ProbeResult<()> {
        let Some(id) = self.session_id.take() else {
            return Ok(());
        };
        self.send(TEST_COMPLETE, &[], Some(id.as_str())).await?;
        tracing::info!(session_id = %id, "remote session stopped");
        Ok(())
    }

    async fn do_command(&self, command: &str, args: &[&str]) -> ProbeResult<String> {
        let Some(id) = self.session_id.as_deref() else {
            return Err(ProbeError::NoSession {
                message: format!("{command} issued before start"),
            });
        };
        self.send(command, args, Some(id)).await
    }
}

// =============================================================================
// MOCK
// =============================================================================

/// A command received by [`MockProcessor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    /// Command name
    pub command: String,
    /// Arguments
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
struct MockElement {
    text: String,
    /// Presence queries answered "not found" before the element appears
    hidden_for: usize,
    /// Whether hidden answers are errors rather than `false`
    hidden_errors: bool,
    on_click: Option<String>,
    /// Text reads that still see the old text after a click
    read_lag: usize,
    pending: Option<(String, usize)>,
}

#[derive(Debug, Default)]
struct MockState {
    started: bool,
    url: Option<String>,
    elements: HashMap<String, MockElement>,
    history: Vec<RecordedCommand>,
}

/// In-memory page for unit tests and offline demos.
///
/// Elements are keyed by full query (`id=myButton`). Each can stay hidden
/// for a number of presence queries, change text on click, and lag a number
/// of text reads behind a click.
#[derive(Debug)]
pub struct MockProcessor {
    click_command: String,
    state: Mutex<MockState>,
}

impl Default for MockProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProcessor {
    /// Create an empty mock page
    #[must_use]
    pub fn new() -> Self {
        Self {
            click_command: protocol::DEFAULT_CLICK_COMMAND.to_string(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// The one-button demo page: `id=myButton` reading `Before`, `After` once clicked
    #[must_use]
    pub fn button_demo() -> Self {
        Self::new().with_element("id=myButton", "Before").on_click("id=myButton", "After")
    }

    /// Accept a different click command name
    #[must_use]
    pub fn with_click_command(mut self, command: impl Into<String>) -> Self {
        self.click_command = command.into();
        self
    }

    /// Add an element with initial text
    #[must_use]
    pub fn with_element(self, query: impl Into<String>, text: impl Into<String>) -> Self {
        self.lock().elements.insert(
            query.into(),
            MockElement {
                text: text.into(),
                hidden_for: 0,
                hidden_errors: false,
                on_click: None,
                read_lag: 0,
                pending: None,
            },
        );
        self
    }

    /// Report the element absent for the next `queries` presence queries
    #[must_use]
    pub fn appears_after(self, query: &str, queries: usize) -> Self {
        self.update(query, |e| e.hidden_for = queries);
        self
    }

    /// Like [`Self::appears_after`], but hidden answers are command errors
    #[must_use]
    pub fn fails_until(self, query: &str, queries: usize) -> Self {
        self.update(query, |e| {
            e.hidden_for = queries;
            e.hidden_errors = true;
        });
        self
    }

    /// Change the element's text when clicked
    #[must_use]
    pub fn on_click(self, query: &str, text: impl Into<String>) -> Self {
        let text = text.into();
        self.update(query, |e| e.on_click = Some(text));
        self
    }

    /// Keep serving the old text for `reads` reads after a click
    #[must_use]
    pub fn with_read_lag(self, query: &str, reads: usize) -> Self {
        self.update(query, |e| e.read_lag = reads);
        self
    }

    /// Every command received, in order
    #[must_use]
    pub fn history(&self) -> Vec<RecordedCommand> {
        self.lock().history.clone()
    }

    /// Names of commands received, in order
    #[must_use]
    pub fn command_names(&self) -> Vec<String> {
        self.lock()
            .history
            .iter()
            .map(|c| c.command.clone())
            .collect()
    }

    /// Whether a command was received
    #[must_use]
    pub fn was_called(&self, command: &str) -> bool {
        self.lock().history.iter().any(|c| c.command == command)
    }

    /// Whether a session is open
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.lock().started
    }

    /// Last URL opened
    #[must_use]
    pub fn current_url(&self) -> Option<String> {
        self.lock().url.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the history from later assertions
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn update(&self, query: &str, f: impl FnOnce(&mut MockElement)) {
        if let Some(element) = self.lock().elements.get_mut(query) {
            f(element);
        }
    }

    fn not_found(query: &str) -> String {
        format!("ERROR: Element {query} not found")
    }
}

#[async_trait]
impl CommandProcessor for MockProcessor {
    async fn start(&mut self) -> ProbeResult<()> {
        let mut state = self.lock();
        state.history.push(RecordedCommand {
            command: protocol::GET_NEW_BROWSER_SESSION.to_string(),
            args: Vec::new(),
        });
        state.started = true;
        Ok(())
    }

    async fn stop(&mut self) -> ProbeResult<()> {
        let mut state = self.lock();
        if state.started {
            state.history.push(RecordedCommand {
                command: TEST_COMPLETE.to_string(),
                args: Vec::new(),
            });
            state.started = false;
        }
        Ok(())
    }

    async fn do_command(&self, command: &str, args: &[&str]) -> ProbeResult<String> {
        let mut state = self.lock();
        if !state.started {
            return Err(ProbeError::NoSession {
                message: format!("{command} issued before start"),
            });
        }
        state.history.push(RecordedCommand {
            command: command.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        });

        let query = args.first().copied().unwrap_or_default();
        match command {
            protocol::OPEN => {
                state.url = Some(query.to_string());
                Ok(String::new())
            }
            IS_ELEMENT_PRESENT => match state.elements.get_mut(query) {
                None => Ok("false".to_string()),
                Some(element) if element.hidden_for > 0 => {
                    element.hidden_for -= 1;
                    if element.hidden_errors {
                        Err(ProbeError::command(command, Self::not_found(query)))
                    } else {
                        Ok("false".to_string())
                    }
                }
                Some(_) => Ok("true".to_string()),
            },
            GET_TEXT => {
                let element = state
                    .elements
                    .get_mut(query)
                    .ok_or_else(|| ProbeError::command(command, Self::not_found(query)))?;
                if let Some((next, remaining)) = element.pending.take() {
                    if remaining == 0 {
                        element.text = next;
                    } else {
                        element.pending = Some((next, remaining - 1));
                    }
                }
                Ok(element.text.clone())
            }
            c if c == self.click_command => {
                let element = state
                    .elements
                    .get_mut(query)
                    .ok_or_else(|| ProbeError::command(command, Self::not_found(query)))?;
                if let Some(next) = element.on_click.clone() {
                    if element.read_lag == 0 {
                        element.text = next;
                    } else {
                        element.pending = Some((next, element.read_lag));
                    }
                }
                Ok(String::new())
            }
            other => Err(ProbeError::command(
                other,
                format!("ERROR: Unknown command: '{other}'"),
            )),
        }
    }
}
