use std::sync::Arc;

use anyhow::Result;
use test_utils::patient_fixture;
use tokio::sync::mpsc;

use super::Flow;
use super::Repl;
use crate::domain::models::Action;
use crate::domain::models::AssessmentStep;
use crate::domain::models::BackendResponse;
use crate::domain::models::Event;
use crate::domain::models::Page;
use crate::domain::models::Role;
use crate::domain::services::SessionStore;
use crate::infrastructure::storage::MemoryStorage;

fn new_repl() -> (Repl, mpsc::UnboundedReceiver<Action>) {
    let (tx, rx) = mpsc::unbounded_channel::<Action>();
    let store = SessionStore::new(Arc::new(MemoryStorage::default()));
    return (Repl::new(store, tx), rx);
}

async fn input(repl: &mut Repl, text: &str) -> Result<Flow> {
    return repl.handle_event(Event::UserInput(text.to_string())).await;
}

fn output(repl: &mut Repl) -> String {
    return repl.drain_output().join("\n");
}

#[tokio::test]
async fn it_sends_user_text_to_the_backend() -> Result<()> {
    let (mut repl, mut rx) = new_repl();

    assert_eq!(input(&mut repl, "  How do I splint a wrist?  ").await?, Flow::Continue);

    match rx.try_recv()? {
        Action::BackendRequest(request) => {
            assert_eq!(request.ticket, 1);
            assert_eq!(request.prompt.text, "How do I splint a wrist?");
            assert!(request.prompt.history.is_empty());
        }
        action => panic!("unexpected action {action:?}"),
    }
    assert!(repl.store().is_loading());
    assert!(output(&mut repl).contains("Thinking..."));

    return Ok(());
}

#[tokio::test]
async fn it_prints_the_reply() -> Result<()> {
    let (mut repl, _rx) = new_repl();
    input(&mut repl, "hello").await?;
    repl.drain_output();

    repl.handle_event(Event::BackendResponse(BackendResponse {
        ticket: 1,
        result: Ok("Hi, how can I help?".to_string()),
    }))
    .await?;

    assert!(!repl.store().is_loading());
    assert!(output(&mut repl).contains("Hi, how can I help?"));
    assert_eq!(repl.store().messages()[1].role, Role::Assistant);

    return Ok(());
}

#[tokio::test]
async fn it_prints_backend_errors() -> Result<()> {
    let (mut repl, _rx) = new_repl();
    input(&mut repl, "hello").await?;
    repl.drain_output();

    repl.handle_event(Event::BackendResponse(BackendResponse {
        ticket: 1,
        result: Err("The assistant is unavailable: timeout".to_string()),
    }))
    .await?;

    assert!(output(&mut repl).contains("The assistant is unavailable: timeout"));
    assert_eq!(repl.store().messages().len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_refuses_to_send_while_waiting() -> Result<()> {
    let (mut repl, mut rx) = new_repl();
    input(&mut repl, "first").await?;
    rx.try_recv()?;
    repl.drain_output();

    input(&mut repl, "second").await?;

    assert!(rx.try_recv().is_err());
    assert!(output(&mut repl).contains("Still waiting"));
    assert_eq!(repl.store().messages().len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_cancels_on_ctrl_c_then_quits() -> Result<()> {
    let (mut repl, mut rx) = new_repl();
    input(&mut repl, "hello").await?;
    rx.try_recv()?;

    assert_eq!(
        repl.handle_event(Event::KeyboardCTRLC()).await?,
        Flow::Continue
    );
    assert!(matches!(rx.try_recv()?, Action::BackendAbort()));
    assert!(!repl.store().is_loading());

    // A reply that arrives after cancelling is dropped.
    repl.handle_event(Event::BackendResponse(BackendResponse {
        ticket: 1,
        result: Ok("late".to_string()),
    }))
    .await?;
    assert_eq!(repl.store().messages().len(), 1);

    assert_eq!(repl.handle_event(Event::KeyboardCTRLC()).await?, Flow::Quit);

    return Ok(());
}

#[tokio::test]
async fn it_waits_for_pending_reply_when_input_closes() -> Result<()> {
    let (mut repl, _rx) = new_repl();
    input(&mut repl, "hello").await?;

    assert_eq!(
        repl.handle_event(Event::InputClosed()).await?,
        Flow::Continue
    );

    let flow = repl
        .handle_event(Event::BackendResponse(BackendResponse {
            ticket: 1,
            result: Ok("bye".to_string()),
        }))
        .await?;
    assert_eq!(flow, Flow::Quit);

    return Ok(());
}

#[tokio::test]
async fn it_updates_context_from_commands() -> Result<()> {
    let (mut repl, _rx) = new_repl();

    input(&mut repl, "/page assessment").await?;
    input(&mut repl, "/step xray").await?;

    assert_eq!(repl.store().context().page, Page::Assessment);
    assert_eq!(repl.store().context().step, Some(AssessmentStep::Xray));
    let text = output(&mut repl);
    assert!(text.contains("Context: Assessment · X-Ray"));
    assert!(text.contains("Ask about the image (free-form)"));

    input(&mut repl, "/step none").await?;
    assert_eq!(repl.store().context().step, None);

    input(&mut repl, "/page nowhere").await?;
    assert_eq!(repl.store().context().page, Page::Assessment);
    assert!(output(&mut repl).contains("Usage: /page"));

    return Ok(());
}

#[tokio::test]
async fn it_loads_and_clears_patients() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let patient_path = dir.path().join("patient.json");
    std::fs::write(&patient_path, patient_fixture())?;

    let (mut repl, _rx) = new_repl();
    input(&mut repl, "/page patient-detail").await?;
    input(
        &mut repl,
        &format!("/patient {}", patient_path.to_string_lossy()),
    )
    .await?;

    assert!(repl.store().context().has_patient());
    assert!(output(&mut repl).contains("Context: Patient: Maria Lopez"));

    input(&mut repl, "/patient none").await?;
    assert!(!repl.store().context().has_patient());

    input(&mut repl, "/patient ./does-not-exist.json").await?;
    assert!(output(&mut repl).contains("Failed to load patient"));

    return Ok(());
}

#[tokio::test]
async fn it_sends_numbered_suggestions() -> Result<()> {
    let (mut repl, mut rx) = new_repl();
    input(&mut repl, "/page queue").await?;

    input(&mut repl, "/suggest 1").await?;

    match rx.try_recv()? {
        Action::BackendRequest(request) => {
            assert_eq!(
                request.prompt.text,
                "How should I prioritize the patients in the queue?"
            );
        }
        action => panic!("unexpected action {action:?}"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_does_not_send_free_form_suggestions() -> Result<()> {
    let (mut repl, mut rx) = new_repl();
    input(&mut repl, "/page assessment").await?;
    input(&mut repl, "/step xray").await?;
    repl.drain_output();

    input(&mut repl, "/suggest 4").await?;
    assert!(rx.try_recv().is_err());
    assert!(output(&mut repl).contains("Ask about the image: type your question."));

    input(&mut repl, "/suggest 9").await?;
    assert!(output(&mut repl).contains("Pick a suggestion between 1 and 4."));

    return Ok(());
}

#[tokio::test]
async fn it_clears_and_aborts() -> Result<()> {
    let (mut repl, mut rx) = new_repl();
    input(&mut repl, "hello").await?;
    rx.try_recv()?;

    input(&mut repl, "/clear").await?;

    assert!(matches!(rx.try_recv()?, Action::BackendAbort()));
    assert!(repl.store().messages().is_empty());
    assert!(!repl.store().is_loading());

    return Ok(());
}

#[tokio::test]
async fn it_handles_unknown_commands_and_quit() -> Result<()> {
    let (mut repl, mut rx) = new_repl();

    input(&mut repl, "/unknown").await?;
    assert!(output(&mut repl).contains("Unknown command /unknown"));
    assert!(rx.try_recv().is_err());

    input(&mut repl, "/cancel").await?;
    assert!(output(&mut repl).contains("Nothing to cancel."));

    assert_eq!(input(&mut repl, "/quit").await?, Flow::Quit);

    return Ok(());
}

#[tokio::test]
async fn it_prints_prompt_for_context() -> Result<()> {
    let (mut repl, _rx) = new_repl();
    input(&mut repl, "/page queue").await?;
    repl.drain_output();

    input(&mut repl, "/prompt").await?;

    assert_eq!(output(&mut repl), repl.store().system_prompt());

    return Ok(());
}
