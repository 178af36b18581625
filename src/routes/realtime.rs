use actix_web::{HttpRequest, HttpResponse, get, rt, web};
use actix_ws::{Message, MessageStream, Session};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::events::{Broadcaster, ProductEvent};

#[get("/ws")]
/// Upgrade to a WebSocket that streams product change events as JSON text frames.
///
/// Frames sent by the client are ignored apart from ping and close.
pub async fn product_events(
    req: HttpRequest,
    body: web::Payload,
    broadcaster: web::Data<Broadcaster>,
) -> actix_web::Result<HttpResponse> {
    let (response, session, messages) = actix_ws::handle(&req, body)?;
    let events = broadcaster.subscribe();

    log::info!("Real-time client connected");
    rt::spawn(forward_events(session, messages, events));

    Ok(response)
}

async fn forward_events(
    mut session: Session,
    mut messages: MessageStream,
    mut events: broadcast::Receiver<ProductEvent>,
) {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let frame = match serde_json::to_string(&event) {
                        Ok(frame) => frame,
                        Err(err) => {
                            log::error!("Failed to encode {} event: {err}", event.name());
                            continue;
                        }
                    };
                    if session.text(frame).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Real-time client lagged behind, skipped {skipped} event(s)");
                }
                Err(RecvError::Closed) => break,
            },
            message = messages.recv() => match message {
                Some(Ok(Message::Ping(bytes))) => {
                    if session.pong(&bytes).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(reason))) => {
                    log::info!("Real-time client disconnected");
                    let _ = session.close(reason).await;
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    log::warn!("Real-time client protocol error: {err}");
                    break;
                }
                None => break,
            },
        }
    }

    log::info!("Real-time client disconnected");
    let _ = session.close(None).await;
}
