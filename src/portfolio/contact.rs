//! Contact form hand-off to a mail client.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::links::encode_component;

/// Subject line of messages sent from the contact form.
pub const CONTACT_SUBJECT: &str = "Portfolio Contact Message";

static MOBILE_AGENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Android|iPhone|iPad|iPod").expect("user agent pattern is valid"));

/// Whether a user agent belongs to a phone or tablet.
pub fn is_mobile_agent(user_agent: &str) -> bool {
    MOBILE_AGENT.is_match(user_agent)
}

/// Fields of the contact form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Where the composed message is handed off.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "url", rename_all = "camelCase")]
pub enum ComposeAction {
    /// Platform mail app via `mailto:`
    MailApp(String),
    /// Webmail compose window
    Webmail(String),
}

impl ComposeAction {
    pub fn url(&self) -> &str {
        match self {
            ComposeAction::MailApp(url) | ComposeAction::Webmail(url) => url,
        }
    }
}

impl ContactMessage {
    /// Message body with the sender's details on top.
    pub fn body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\n\nMessage:\n{}",
            self.name.trim(),
            self.email.trim(),
            self.message.trim()
        )
    }

    /// Build the compose action for `recipient`, choosing the mail app on
    /// mobile user agents and webmail everywhere else.
    pub fn compose(&self, recipient: &str, user_agent: Option<&str>) -> ComposeAction {
        let subject = encode_component(CONTACT_SUBJECT);
        let body = encode_component(&self.body());

        if user_agent.is_some_and(is_mobile_agent) {
            ComposeAction::MailApp(format!("mailto:{recipient}?subject={subject}&body={body}"))
        } else {
            ComposeAction::Webmail(format!(
                "https://mail.google.com/mail/?view=cm&fs=1&to={}&su={subject}&body={body}",
                encode_component(recipient)
            ))
        }
    }
}
