use tandem_core::{Role, SignalMessage};

use crate::integration::{create_test_room, init_tracing};
use crate::utils::{INITIATE, Outbound, connect, join, send_signal, settle_and_drain};

#[tokio::test]
async fn test_initiate_goes_to_initiator_when_responder_fills_room() {
    init_tracing();

    let (room_cmd_tx, mut outbound_rx, _signaling) = create_test_room();

    let initiator = connect(&room_cmd_tx).await;
    let responder = connect(&room_cmd_tx).await;

    join(&room_cmd_tx, initiator, Role::Initiator).await;
    let out = settle_and_drain(&room_cmd_tx, &mut outbound_rx).await;
    assert!(out.is_empty(), "initiate must wait for the responder");

    join(&room_cmd_tx, responder, Role::Responder).await;
    let out = settle_and_drain(&room_cmd_tx, &mut outbound_rx).await;
    assert_eq!(
        out,
        vec![Outbound::Text {
            conn: initiator,
            text: INITIATE.to_owned()
        }]
    );
}

#[tokio::test]
async fn test_initiate_goes_to_initiator_even_if_it_joined_last() {
    init_tracing();

    let (room_cmd_tx, mut outbound_rx, signaling) = create_test_room();

    let responder = connect(&room_cmd_tx).await;
    let initiator = connect(&room_cmd_tx).await;
    join(&room_cmd_tx, responder, Role::Responder).await;
    join(&room_cmd_tx, initiator, Role::Initiator).await;
    settle_and_drain(&room_cmd_tx, &mut outbound_rx).await;

    assert_eq!(signaling.texts_for(&initiator), vec![INITIATE]);
    assert!(signaling.texts_for(&responder).is_empty());
}

#[tokio::test]
async fn test_traffic_in_full_room_never_reinitiates() {
    init_tracing();

    let (room_cmd_tx, mut outbound_rx, signaling) = create_test_room();

    let initiator = connect(&room_cmd_tx).await;
    let responder = connect(&room_cmd_tx).await;
    join(&room_cmd_tx, initiator, Role::Initiator).await;
    join(&room_cmd_tx, responder, Role::Responder).await;

    // A rejected third join against a full room must not re-fire initiate.
    let late = connect(&room_cmd_tx).await;
    join(&room_cmd_tx, late, Role::Responder).await;
    send_signal(
        &room_cmd_tx,
        responder,
        &SignalMessage::Answer {
            sdp: "v=0".to_owned(),
        },
    )
    .await;
    settle_and_drain(&room_cmd_tx, &mut outbound_rx).await;

    let initiates = signaling
        .texts_for(&initiator)
        .into_iter()
        .filter(|t| t == INITIATE)
        .count();
    assert_eq!(initiates, 1);
    assert!(signaling.was_closed(&late));
}

#[tokio::test]
async fn test_initiate_not_sent_to_closed_initiator() {
    init_tracing();

    let (room_cmd_tx, mut outbound_rx, signaling) = create_test_room();

    let initiator = connect(&room_cmd_tx).await;
    let responder = connect(&room_cmd_tx).await;
    join(&room_cmd_tx, initiator, Role::Initiator).await;
    signaling.mark_closed(initiator);
    join(&room_cmd_tx, responder, Role::Responder).await;

    let out = settle_and_drain(&room_cmd_tx, &mut outbound_rx).await;
    assert!(out.is_empty(), "unexpected output: {:?}", out);
}
