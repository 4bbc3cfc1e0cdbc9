use crate::{RoomCommand, SignalingService};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tandem_core::ConnectionId;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let conn = ConnectionId::new();
    info!("New WebSocket connection: {}", conn);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_connection(conn, tx);
    if service
        .room_cmd_tx
        .send(RoomCommand::Connect { conn })
        .await
        .is_err()
    {
        error!("Room died; refusing {}", conn);
        service.remove_connection(&conn);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sender.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                let text = match msg {
                    Message::Text(text) => text.to_string(),
                    Message::Binary(data) => match String::from_utf8(data.to_vec()) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("Non UTF-8 binary frame from {}: {}", conn, e);
                            continue;
                        }
                    },
                    Message::Close(_) => break,
                    _ => continue,
                };

                let cmd = RoomCommand::Inbound { conn, text };
                if let Err(e) = service.room_cmd_tx.send(cmd).await {
                    error!("Room died: {}", e);
                    break;
                }
            }
            debug!("Reader for {} finished", conn);
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_connection(&conn);
    let _ = service
        .room_cmd_tx
        .send(RoomCommand::Disconnect { conn })
        .await;
    info!("WebSocket disconnected: {}", conn);
}
