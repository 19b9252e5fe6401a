use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::routing::post;
use axum::{Json, Router};

use crate::AppState;
use crate::client_ip::ClientIp;
use crate::emails::parse_emails;
use crate::models::invite::{InviteRequest, InviteResult};

const CAPTCHA_FAILED: &str = "CAPTCHA verification failed. Please try again.";
const NO_EMAILS: &str = "Please enter at least one email address.";
const INVALID_EMAILS: &str = "Email addresses are not valid. Please check and try again.";

pub fn router() -> Router<AppState> {
    Router::new().route("/send-invites", post(send_invites))
}

async fn send_invites(
    State(state): State<AppState>,
    client_ip: ClientIp,
    form: Result<Form<InviteRequest>, FormRejection>,
) -> Json<InviteResult> {
    tracing::info!("Invitation request received from IP: {client_ip}");

    // An unreadable form carries no token, so it fails the CAPTCHA gate below.
    let request = match form {
        Ok(Form(request)) => request,
        Err(rejection) => {
            tracing::debug!("Unreadable invite form: {rejection}");
            InviteRequest::default()
        }
    };

    Json(process_invites(&state, &client_ip, request).await)
}

async fn process_invites(
    state: &AppState,
    client_ip: &ClientIp,
    request: InviteRequest,
) -> InviteResult {
    let human = state
        .captcha
        .verify(request.turnstile_token.as_deref(), client_ip.as_str())
        .await;

    if !human {
        tracing::warn!("CAPTCHA verification failed for IP: {client_ip}");
        return InviteResult::failed(CAPTCHA_FAILED);
    }

    let emails = parse_emails(&request.emails);
    if emails.is_empty() {
        return InviteResult::failed(NO_EMAILS);
    }
    if emails.valid.is_empty() {
        return InviteResult::failed(INVALID_EMAILS);
    }

    match state.upstream.send_invite(&emails.valid).await {
        Ok(outcome) if outcome.is_success() => {
            tracing::info!(
                "Successfully sent invitations to {} emails from IP: {client_ip}",
                emails.valid.len()
            );
            InviteResult::ok(format!(
                "Successfully sent invitations for: {}",
                emails.valid.join(", ")
            ))
        }
        Ok(outcome) => {
            tracing::error!(
                status = outcome.status,
                "Failed to send invitations from IP: {client_ip}"
            );
            InviteResult::rejected(outcome)
        }
        Err(e) => {
            tracing::error!("Error sending invitations from IP: {client_ip}. Error: {e}");
            InviteResult::failed(format!("Error: {e}"))
        }
    }
}
