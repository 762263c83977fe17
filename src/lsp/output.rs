//! Log lines shown to the user through `window/logMessage`

use std::time::{SystemTime, UNIX_EPOCH};
use tower_lsp::Client;
use tower_lsp::lsp_types::MessageType;

/// Append-only output channel backed by the LSP client
///
/// Every line is also sent to the `log` facade, so it shows up on stderr
/// when the client does not display log messages.
#[derive(Clone)]
pub struct OutputChannel {
    client: Client,
}

impl OutputChannel {
    /// Create a channel writing to `client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Write an informational line
    pub async fn info(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        log::info!("{}", message);
        self.client
            .log_message(MessageType::INFO, format_line("Info", &timestamp(), message))
            .await;
    }

    /// Write an error line
    pub async fn error(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        log::error!("{}", message);
        self.client
            .log_message(MessageType::ERROR, format_line("Error", &timestamp(), message))
            .await;
    }
}

fn format_line(level: &str, time: &str, message: &str) -> String {
    format!("[{} - {}] {}", level, time, message)
}

/// Wall-clock time of day (UTC) as `HH:MM:SS`
fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}
