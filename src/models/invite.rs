use serde::{Deserialize, Serialize};

pub const INVITE_ROLE: &str = "standard-user";

/// Form posted by the entry page.
#[derive(Debug, Default, Deserialize)]
pub struct InviteRequest {
    #[serde(default)]
    pub emails: String,
    #[serde(rename = "cf-turnstile-response")]
    pub turnstile_token: Option<String>,
}

/// Body of the upstream invite creation call.
#[derive(Debug, Serialize)]
pub struct CreateInvitesPayload<'a> {
    pub email_addresses: &'a [String],
    pub role: &'static str,
    pub resend_emails: bool,
}

impl<'a> CreateInvitesPayload<'a> {
    pub fn new(email_addresses: &'a [String]) -> Self {
        Self {
            email_addresses,
            role: INVITE_ROLE,
            resend_emails: true,
        }
    }
}

/// Raw outcome of an invite call; non-2xx statuses are not errors here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteOutcome {
    pub status: u16,
    pub body: String,
}

impl InviteOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InviteFailureDetails {
    pub status_code: u16,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InviteResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<InviteFailureDetails>,
}

impl InviteResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            details: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn rejected(outcome: InviteOutcome) -> Self {
        Self {
            success: false,
            message: "Failed to send invitations.".into(),
            details: Some(InviteFailureDetails {
                status_code: outcome.status,
                body: outcome.body,
            }),
        }
    }
}
