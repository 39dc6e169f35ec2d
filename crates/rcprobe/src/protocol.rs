//! Remote-control wire format.
//!
//! Commands travel as form fields: `cmd=<name>`, positional arguments as
//! `1`, `2`, … and `sessionId` once a browser session exists. Replies are
//! plain text: `OK`, `OK,<value>`, or an error line such as
//! `ERROR: Element id=foo not found`.

use crate::result::{ProbeError, ProbeResult};

/// Path of the command endpoint on a remote-control server
pub const DRIVER_PATH: &str = "/selenium-server/driver/";

/// Opens a browser and returns a session id
pub const GET_NEW_BROWSER_SESSION: &str = "getNewBrowserSession";
/// Closes the browser and ends the session
pub const TEST_COMPLETE: &str = "testComplete";
/// Navigates to a URL
pub const OPEN: &str = "open";
/// Asks whether a locator matches an element
pub const IS_ELEMENT_PRESENT: &str = "isElementPresent";
/// Reads the visible text of an element
pub const GET_TEXT: &str = "getText";
/// Click command understood by rich-client widget toolkits
pub const DEFAULT_CLICK_COMMAND: &str = "qxClickAt";

/// Build the command endpoint URL for a server
#[must_use]
pub fn driver_url(host: &str, port: u16) -> String {
    format!("http://{host}:{port}{DRIVER_PATH}")
}

/// Encode a command as form fields
#[must_use]
pub fn command_form(command: &str, args: &[&str], session_id: Option<&str>) -> Vec<(String, String)> {
    let mut form = Vec::with_capacity(args.len() + 2);
    form.push(("cmd".to_string(), command.to_string()));
    form.extend(
        args.iter()
            .enumerate()
            .map(|(i, arg)| ((i + 1).to_string(), (*arg).to_string())),
    );
    if let Some(id) = session_id {
        form.push(("sessionId".to_string(), id.to_string()));
    }
    form
}

/// Decode a reply body, returning the value after `OK,`
pub fn parse_reply(command: &str, body: &str) -> ProbeResult<String> {
    if body == "OK" {
        return Ok(String::new());
    }
    if let Some(value) = body.strip_prefix("OK,") {
        return Ok(value.to_string());
    }
    if body.is_empty() {
        return Err(ProbeError::protocol(format!("empty reply to {command}")));
    }
    Err(ProbeError::command(command, body.trim_end()))
}

/// Decode a boolean reply value
pub fn parse_boolean(command: &str, value: &str) -> ProbeResult<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ProbeError::protocol(format!(
            "{command} returned non-boolean value '{other}'"
        ))),
    }
}
