//! Live notification channel
//!
//! GET /ws?token=<access token>
//! Browsers cannot set headers on a websocket handshake, so the access token
//! travels in the query string. Each pushed notification is sent as one JSON
//! text frame. A newer connection for the same account replaces this one.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::{CloseCode, CloseReason, Message, MessageStream, Session};
use futures_util::StreamExt;
use serde::Deserialize;
use uuid::Uuid;

use mp_core::services::{HubConnection, NotificationHub};

use crate::handlers::{extract_language, handle_domain_error_with_lang, unauthorized};
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    token: Option<String>,
}

/// Handler for GET /ws
pub async fn notifications_ws(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
    query: web::Query<WsAuthQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    let lang = extract_language(&req);

    let Some(token) = query.token.as_deref().filter(|t| !t.is_empty()) else {
        return Ok(unauthorized(lang));
    };

    let auth = match state
        .token_service
        .verify_access_token(token)
        .await
        .and_then(AuthContext::from_claims)
    {
        Ok(auth) => auth,
        Err(error) => {
            log::debug!("Websocket token rejected: {}", error);
            return Ok(handle_domain_error_with_lang(&error, lang));
        }
    };

    let (response, session, stream) = actix_ws::handle(&req, body)?;

    let user_id = auth.principal.id;
    let hub = state.notification_service.hub();
    let connection = hub.connect(user_id).await;
    log::info!("Notification socket opened for {}", user_id);

    actix_web::rt::spawn(run_session(hub, user_id, connection, session, stream));

    Ok(response)
}

async fn run_session(
    hub: Arc<NotificationHub>,
    user_id: Uuid,
    connection: HubConnection,
    mut session: Session,
    mut stream: MessageStream,
) {
    let HubConnection {
        connection_id,
        mut receiver,
    } = connection;

    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.tick().await;

    let close_reason = loop {
        tokio::select! {
            _ = ping.tick() => {
                if session.ping(b"").await.is_err() {
                    break None;
                }
            }

            pushed = receiver.recv() => match pushed {
                Some(notification) => {
                    let text = match serde_json::to_string(&notification) {
                        Ok(text) => text,
                        Err(e) => {
                            log::error!("Failed to encode notification {}: {}", notification.id, e);
                            continue;
                        }
                    };
                    if session.text(text).await.is_err() {
                        break None;
                    }
                }
                // Sender dropped: a newer connection took over
                None => break Some(CloseReason {
                    code: CloseCode::Policy,
                    description: Some("replaced by a newer connection".to_string()),
                }),
            },

            msg = stream.next() => match msg {
                Some(Ok(Message::Ping(bytes))) => {
                    if session.pong(&bytes).await.is_err() {
                        break None;
                    }
                }
                Some(Ok(Message::Close(reason))) => break reason,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::debug!("Websocket protocol error for {}: {}", user_id, e);
                    break None;
                }
                None => break None,
            },
        }
    };

    hub.disconnect(user_id, connection_id).await;
    let _ = session.close(close_reason).await;
    log::info!("Notification socket closed for {}", user_id);
}
