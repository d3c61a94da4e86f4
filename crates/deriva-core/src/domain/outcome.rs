//! Outcome model: the structured result of one derivative run.
//!
//! The host decides how to surface each message: `User` messages go to the
//! person who triggered the run, `Log` messages go to the site log. Message
//! text is a template with `@name` placeholders so the host can translate it
//! before substituting values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::{DatastreamId, Pid};

/// A unified classification of a derivative run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    /// The derivative already existed and regeneration was not forced.
    Skipped,
    NoSourceDatastream,
    ScaleFailure,
    WriteFailure,
    Success,
}

/// Where a message should be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    User,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Status,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub substitutions: BTreeMap<String, String>,

    pub channel: Channel,
    pub severity: Severity,
}

impl Message {
    pub fn new(text: impl Into<String>, channel: Channel, severity: Severity) -> Self {
        Self {
            text: text.into(),
            substitutions: BTreeMap::new(),
            channel,
            severity,
        }
    }

    pub fn with_substitution(mut self, placeholder: &str, value: impl Into<String>) -> Self {
        self.substitutions.insert(placeholder.to_string(), value.into());
        self
    }

    /// The text with every placeholder replaced by its value.
    pub fn render(&self) -> String {
        // Longest placeholder first so `@pid` never eats the head of `@pidx`.
        let mut placeholders: Vec<_> = self.substitutions.iter().collect();
        placeholders.sort_by_key(|(key, _)| std::cmp::Reverse(key.len()));
        placeholders
            .into_iter()
            .fold(self.text.clone(), |text, (key, value)| text.replace(key.as_str(), value))
    }
}

/// Result of a derivative run, as handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    kind: OutcomeKind,
    success: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    messages: Vec<Message>,
}

impl OutcomeRecord {
    pub fn skipped() -> Self {
        Self {
            kind: OutcomeKind::Skipped,
            success: true,
            messages: Vec::new(),
        }
    }

    pub fn no_source(pid: &Pid) -> Self {
        let user = Message::new(
            "Could not create image derivatives for @pid. No image file was uploaded.",
            Channel::User,
            Severity::Error,
        )
        .with_substitution("@pid", pid.as_str());
        let log = Message::new(
            "Could not create image derivatives for @pid: no @dsid datastream present.",
            Channel::Log,
            Severity::Error,
        )
        .with_substitution("@pid", pid.as_str())
        .with_substitution("@dsid", DatastreamId::OBJ.as_str());

        Self {
            kind: OutcomeKind::NoSourceDatastream,
            success: false,
            messages: vec![user, log],
        }
    }

    /// `OBJ` may exist but could not be read or copied out. Same kind as
    /// [`no_source`](Self::no_source); `reason` goes to the Log channel.
    pub fn source_unreadable(pid: &Pid, reason: impl Into<String>) -> Self {
        let user = Message::new(
            "Could not create image derivatives for @pid. The original image could not be read.",
            Channel::User,
            Severity::Error,
        )
        .with_substitution("@pid", pid.as_str());
        let log = Message::new(reason, Channel::Log, Severity::Error);

        Self {
            kind: OutcomeKind::NoSourceDatastream,
            success: false,
            messages: vec![user, log],
        }
    }

    pub fn scale_failure(pid: &Pid, dsid: &DatastreamId) -> Self {
        let message = Message::new(
            "Unable to scale the image for the @dsid derivative of @pid.",
            Channel::User,
            Severity::Warning,
        )
        .with_substitution("@pid", pid.as_str())
        .with_substitution("@dsid", dsid.as_str());

        Self {
            kind: OutcomeKind::ScaleFailure,
            success: false,
            messages: vec![message],
        }
    }

    /// `message` is the underlying error text, logged verbatim.
    pub fn write_failure(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::WriteFailure,
            success: false,
            messages: vec![Message::new(message, Channel::Log, Severity::Error)],
        }
    }

    pub fn success(pid: &Pid, dsid: &DatastreamId) -> Self {
        let message = Message::new(
            "Created @dsid derivative for @pid.",
            Channel::User,
            Severity::Status,
        )
        .with_substitution("@pid", pid.as_str())
        .with_substitution("@dsid", dsid.as_str());

        Self {
            kind: OutcomeKind::Success,
            success: true,
            messages: vec![message],
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn messages_for(&self, channel: Channel) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.channel == channel)
    }
}
