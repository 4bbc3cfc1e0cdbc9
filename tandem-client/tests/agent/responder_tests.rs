use tandem_client::{AgentPhase, SessionDescription};
use tandem_core::{Role, SignalMessage};

use crate::agent::{answer, create_test_agent, drain, offer};
use crate::utils::{EngineCall, LOCAL_ANSWER, LOCAL_OFFER};

#[tokio::test]
async fn test_offer_is_answered() {
    let (mut agent, engine, mut outbound) = create_test_agent(Role::Responder);

    agent.handle_signal(offer(LOCAL_OFFER)).await;

    assert_eq!(agent.phase(), AgentPhase::HaveRemoteDescription);
    assert_eq!(drain(&mut outbound), vec![answer(LOCAL_ANSWER)]);
    assert_eq!(
        engine.calls(),
        vec![
            EngineCall::SetRemote(SessionDescription::offer(LOCAL_OFFER)),
            EngineCall::CreateAnswer,
            EngineCall::SetLocal(SessionDescription::answer(LOCAL_ANSWER)),
        ]
    );
}

#[tokio::test]
async fn test_answer_before_offer_is_ignored() {
    let (mut agent, engine, mut outbound) = create_test_agent(Role::Responder);

    agent.handle_signal(answer(LOCAL_ANSWER)).await;

    assert_eq!(agent.phase(), AgentPhase::Idle);
    assert!(drain(&mut outbound).is_empty());
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_responder_ignores_initiate_and_second_offer() {
    let (mut agent, engine, mut outbound) = create_test_agent(Role::Responder);

    agent.handle_signal(SignalMessage::Initiate).await;
    assert_eq!(agent.phase(), AgentPhase::Idle);

    agent.handle_signal(offer(LOCAL_OFFER)).await;
    agent.handle_signal(offer(LOCAL_OFFER)).await;

    assert_eq!(agent.phase(), AgentPhase::HaveRemoteDescription);
    assert_eq!(drain(&mut outbound).len(), 1);
    assert_eq!(engine.calls().len(), 3);
}

#[tokio::test]
async fn test_malformed_offer_leaves_agent_idle() {
    let (mut agent, engine, mut outbound) = create_test_agent(Role::Responder);

    agent.handle_signal(offer("not an sdp")).await;

    assert_eq!(agent.phase(), AgentPhase::Idle);
    assert!(drain(&mut outbound).is_empty());
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_join_is_never_acted_on() {
    let (mut agent, engine, mut outbound) = create_test_agent(Role::Responder);

    agent
        .handle_signal(SignalMessage::Join {
            role: Role::Initiator,
        })
        .await;

    assert_eq!(agent.phase(), AgentPhase::Idle);
    assert!(drain(&mut outbound).is_empty());
    assert!(engine.calls().is_empty());
}
