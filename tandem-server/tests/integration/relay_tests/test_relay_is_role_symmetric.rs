use serde_json::json;
use tandem_core::SignalMessage;

use crate::integration::{create_test_room, init_tracing};
use crate::utils::{Outbound, pair, send_signal, send_text, settle_and_drain};

#[tokio::test]
async fn test_relay_is_role_symmetric() {
    init_tracing();

    let (room_cmd_tx, mut outbound_rx, _signaling) = create_test_room();
    let (initiator, responder) = pair(&room_cmd_tx, &mut outbound_rx).await;

    let offer = send_signal(
        &room_cmd_tx,
        initiator,
        &SignalMessage::Offer {
            sdp: "v=0 from-initiator".to_owned(),
        },
    )
    .await;
    let out = settle_and_drain(&room_cmd_tx, &mut outbound_rx).await;
    assert_eq!(
        out,
        vec![Outbound::Text {
            conn: responder,
            text: offer
        }]
    );

    let answer = send_signal(
        &room_cmd_tx,
        responder,
        &SignalMessage::Answer {
            sdp: "v=0 from-responder".to_owned(),
        },
    )
    .await;
    let out = settle_and_drain(&room_cmd_tx, &mut outbound_rx).await;
    assert_eq!(
        out,
        vec![Outbound::Text {
            conn: initiator,
            text: answer
        }]
    );
}

#[tokio::test]
async fn test_relay_preserves_text_byte_for_byte() {
    init_tracing();

    let (room_cmd_tx, mut outbound_rx, signaling) = create_test_room();
    let (initiator, responder) = pair(&room_cmd_tx, &mut outbound_rx).await;

    // Key order, spacing and extra fields are the sender's business.
    let raw = r#"{ "candidate": {"sdpMLineIndex":0,"candidate":"candidate:842163049 1 udp 1677729535 203.0.113.7 54400 typ srflx","sdpMid":"0","extra":[1,2]}, "type": "candidate" }"#;
    send_text(&room_cmd_tx, responder, raw).await;
    settle_and_drain(&room_cmd_tx, &mut outbound_rx).await;

    assert_eq!(signaling.texts_for(&initiator).last().map(String::as_str), Some(raw));
    assert!(signaling.texts_for(&responder).is_empty());
}

#[tokio::test]
async fn test_message_never_returns_to_sender() {
    init_tracing();

    let (room_cmd_tx, mut outbound_rx, signaling) = create_test_room();
    let (initiator, responder) = pair(&room_cmd_tx, &mut outbound_rx).await;

    for i in 0..10 {
        let candidate = SignalMessage::Candidate {
            candidate: json!({ "candidate": format!("candidate:{i}"), "sdpMid": "0" }),
        };
        let from = if i % 2 == 0 { initiator } else { responder };
        send_signal(&room_cmd_tx, from, &candidate).await;
    }

    let out = settle_and_drain(&room_cmd_tx, &mut outbound_rx).await;
    assert_eq!(out.len(), 10);
    assert_eq!(signaling.texts_for(&responder).len(), 5);
    // The initiator also holds its initiate notification.
    assert_eq!(signaling.texts_for(&initiator).len(), 6);
}
