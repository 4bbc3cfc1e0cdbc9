use tandem_client::{AgentPhase, SessionDescription};
use tandem_core::{Role, SignalMessage};

use crate::agent::{answer, create_test_agent, drain, offer};
use crate::utils::{EngineCall, LOCAL_ANSWER, LOCAL_OFFER};

#[tokio::test]
async fn test_initiate_sends_offer_then_answer_applies() {
    let (mut agent, engine, mut outbound) = create_test_agent(Role::Initiator);
    assert_eq!(agent.phase(), AgentPhase::Idle);

    agent.handle_signal(SignalMessage::Initiate).await;

    assert_eq!(agent.phase(), AgentPhase::AwaitingRemoteDescription);
    assert_eq!(drain(&mut outbound), vec![offer(LOCAL_OFFER)]);

    agent.handle_signal(answer(LOCAL_ANSWER)).await;

    assert_eq!(agent.phase(), AgentPhase::HaveRemoteDescription);
    assert!(drain(&mut outbound).is_empty());
    assert_eq!(
        engine.calls(),
        vec![
            EngineCall::CreateOffer,
            EngineCall::SetLocal(SessionDescription::offer(LOCAL_OFFER)),
            EngineCall::SetRemote(SessionDescription::answer(LOCAL_ANSWER)),
        ]
    );
}

#[tokio::test]
async fn test_second_initiate_is_ignored() {
    let (mut agent, engine, mut outbound) = create_test_agent(Role::Initiator);

    agent.handle_signal(SignalMessage::Initiate).await;
    agent.handle_signal(SignalMessage::Initiate).await;

    assert_eq!(agent.phase(), AgentPhase::AwaitingRemoteDescription);
    assert_eq!(drain(&mut outbound).len(), 1);
    assert_eq!(
        engine
            .calls()
            .iter()
            .filter(|c| **c == EngineCall::CreateOffer)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_initiator_ignores_offer_and_early_answer() {
    let (mut agent, engine, mut outbound) = create_test_agent(Role::Initiator);

    agent.handle_signal(offer(LOCAL_OFFER)).await;
    agent.handle_signal(answer(LOCAL_ANSWER)).await;

    assert_eq!(agent.phase(), AgentPhase::Idle);
    assert!(drain(&mut outbound).is_empty());
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_rejected_answer_stalls_in_place() {
    let (mut agent, engine, _outbound) = create_test_agent(Role::Initiator);

    agent.handle_signal(SignalMessage::Initiate).await;
    agent.handle_signal(answer("garbage")).await;

    assert_eq!(agent.phase(), AgentPhase::AwaitingRemoteDescription);
    assert!(
        !engine
            .calls()
            .iter()
            .any(|c| matches!(c, EngineCall::SetRemote(_)))
    );

    // A well-formed answer afterwards still completes the exchange.
    agent.handle_signal(answer(LOCAL_ANSWER)).await;
    assert_eq!(agent.phase(), AgentPhase::HaveRemoteDescription);
}
