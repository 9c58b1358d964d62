#[cfg(test)]
#[path = "repl_test.rs"]
mod tests;

use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::fs;
use tokio::sync::mpsc;

use super::cli::format_suggestions;
use crate::domain::models::Action;
use crate::domain::models::AssessmentStep;
use crate::domain::models::BackendResponse;
use crate::domain::models::ContextUpdate;
use crate::domain::models::Event;
use crate::domain::models::Page;
use crate::domain::models::PatientSnapshot;
use crate::domain::models::SlashCommand;
use crate::domain::services::events::EventsService;
use crate::domain::services::PromptDeriver;
use crate::domain::services::SessionStore;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /page (/p) [PAGE] - Sets the page the user is on: home, assessment, queue, patient-detail, imaging, settings.
- /step (/st) [STEP,none] - Sets or clears the assessment step: patient-info, vitals, symptoms, imaging-decision, xray, voice, review.
- /patient (/pt) [FILE,none] - Loads a JSON patient snapshot into the context, or clears it.
- /context (/ctx) - Shows the current context.
- /prompt - Prints the system prompt the assistant receives.
- /suggest (/s) [NUMBER?] - Lists quick suggestions, or sends the numbered one.
- /cancel - Stops waiting for the pending reply.
- /clear - Deletes all messages in the session.
- /quit /exit (/q) - Exit.
- /help (/h) - Provides this help menu.

HOTKEYS:
- CTRL+C - Interrupt waiting for a response if in progress, otherwise exit.
        "#;

    return text.trim().to_string();
}

pub async fn read_patient_file(file_path: &str) -> Result<PatientSnapshot> {
    let payload = fs::read_to_string(file_path).await?;
    let patient = serde_json::from_str::<PatientSnapshot>(&payload)?;
    return Ok(patient);
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line based chat host around a [`SessionStore`]. Output is buffered so
/// the caller decides where it goes.
pub struct Repl {
    store: SessionStore,
    action_tx: mpsc::UnboundedSender<Action>,
    output: Vec<String>,
    quit_when_idle: bool,
}

impl Repl {
    pub fn new(store: SessionStore, action_tx: mpsc::UnboundedSender<Action>) -> Repl {
        return Repl {
            store,
            action_tx,
            output: vec![],
            quit_when_idle: false,
        };
    }

    pub fn store(&self) -> &SessionStore {
        return &self.store;
    }

    pub fn drain_output(&mut self) -> Vec<String> {
        return self.output.drain(..).collect();
    }

    fn print(&mut self, line: String) {
        self.output.push(line);
    }

    pub fn welcome(&mut self) {
        self.store.open();
        self.print(
            format!("Triage assistant ({})", self.store.context().label())
                .bold()
                .to_string(),
        );

        let history = self
            .store
            .messages()
            .iter()
            .map(|e| return format!("{}: {}", e.role, e.content).dimmed().to_string())
            .collect::<Vec<String>>();
        for line in history {
            self.print(line);
        }

        self.print_suggestions();
        self.print("Type a question, or /help for commands.".dimmed().to_string());
    }

    pub async fn handle_event(&mut self, event: Event) -> Result<Flow> {
        match event {
            Event::UserInput(text) => {
                return self.handle_input(&text).await;
            }
            Event::BackendResponse(response) => {
                self.handle_response(response);
            }
            Event::KeyboardCTRLC() => {
                if !self.cancel()? {
                    return Ok(Flow::Quit);
                }
            }
            Event::InputClosed() => {
                self.quit_when_idle = true;
            }
        }

        if self.quit_when_idle && !self.store.is_loading() {
            return Ok(Flow::Quit);
        }

        return Ok(Flow::Continue);
    }

    async fn handle_input(&mut self, text: &str) -> Result<Flow> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Flow::Continue);
        }

        if text.starts_with('/') {
            if let Some(cmd) = SlashCommand::parse(text) {
                return self.handle_command(cmd).await;
            }
            self.print(
                format!("Unknown command {text}, try /help.")
                    .red()
                    .to_string(),
            );
            return Ok(Flow::Continue);
        }

        self.send(text)?;
        return Ok(Flow::Continue);
    }

    async fn handle_command(&mut self, cmd: SlashCommand) -> Result<Flow> {
        if cmd.is_quit() {
            return Ok(Flow::Quit);
        }

        if cmd.is_help() {
            self.print(help_text());
        } else if cmd.is_page() {
            match cmd.arg().and_then(Page::parse) {
                Some(page) => {
                    self.store.merge_context(ContextUpdate::page(page));
                    self.print_context();
                    self.print_suggestions();
                }
                None => self.print("Usage: /page [PAGE]".red().to_string()),
            }
        } else if cmd.is_step() {
            match cmd.arg() {
                Some("none") => {
                    self.store.merge_context(ContextUpdate::step(None));
                    self.print_context();
                }
                Some(arg) => match AssessmentStep::parse(arg) {
                    Some(step) => {
                        self.store.merge_context(ContextUpdate::step(Some(step)));
                        self.print_context();
                        self.print_suggestions();
                    }
                    None => self.print(format!("Unknown step {arg}").red().to_string()),
                },
                None => self.print("Usage: /step [STEP,none]".red().to_string()),
            }
        } else if cmd.is_patient() {
            match cmd.arg() {
                Some("none") => {
                    self.store.merge_context(ContextUpdate::patient(None));
                    self.print_context();
                }
                Some(file_path) => match read_patient_file(file_path).await {
                    Ok(patient) => {
                        self.store
                            .merge_context(ContextUpdate::patient(Some(patient)));
                        self.print_context();
                        self.print_suggestions();
                    }
                    Err(err) => {
                        self.print(
                            format!("Failed to load patient from {file_path}: {err}")
                                .red()
                                .to_string(),
                        );
                    }
                },
                None => self.print("Usage: /patient [FILE,none]".red().to_string()),
            }
        } else if cmd.is_context() {
            self.print_context();
        } else if cmd.is_prompt() {
            let prompt = self.store.system_prompt();
            self.print(prompt);
        } else if cmd.is_suggest() {
            self.suggest(cmd.arg())?;
        } else if cmd.is_cancel() {
            if !self.cancel()? {
                self.print("Nothing to cancel.".dimmed().to_string());
            }
        } else if cmd.is_clear() {
            if self.store.is_loading() {
                self.action_tx.send(Action::BackendAbort())?;
            }
            self.store.clear_messages();
            self.print("Cleared the conversation.".dimmed().to_string());
        }

        return Ok(Flow::Continue);
    }

    fn suggest(&mut self, arg: Option<&str>) -> Result<()> {
        let arg = match arg {
            Some(arg) => arg,
            None => {
                self.print_suggestions();
                return Ok(());
            }
        };

        let suggestions = PromptDeriver::visible_suggestions(self.store.quick_suggestions());
        let idx = match arg.parse::<usize>() {
            Ok(idx) if idx >= 1 && idx <= suggestions.len() => idx - 1,
            _ => {
                self.print(
                    format!("Pick a suggestion between 1 and {}.", suggestions.len())
                        .red()
                        .to_string(),
                );
                return Ok(());
            }
        };

        let suggestion = suggestions[idx];
        if suggestion.is_free_form() {
            self.print(format!("{}: type your question.", suggestion.display_text));
            return Ok(());
        }

        return self.send(suggestion.query);
    }

    fn send(&mut self, text: &str) -> Result<()> {
        if self.store.is_loading() {
            self.print(
                "Still waiting for the assistant. Use /cancel or Ctrl-C to stop waiting."
                    .yellow()
                    .to_string(),
            );
            return Ok(());
        }

        if let Some(request) = self.store.begin_request(text) {
            self.action_tx.send(Action::BackendRequest(request))?;
            self.print("Thinking...".dimmed().to_string());
        }

        return Ok(());
    }

    fn cancel(&mut self) -> Result<bool> {
        if !self.store.cancel_request() {
            return Ok(false);
        }

        self.action_tx.send(Action::BackendAbort())?;
        self.print("Cancelled.".dimmed().to_string());
        return Ok(true);
    }

    fn handle_response(&mut self, response: BackendResponse) {
        if !self.store.complete_request(response) {
            return;
        }

        if let Some(err) = self.store.error() {
            let line = err.red().to_string();
            self.print(line);
            return;
        }

        if let Some(message) = self.store.messages().last() {
            let line = message.content.cyan().to_string();
            self.print(line);
        }
    }

    fn print_context(&mut self) {
        let context = self.store.context();
        let mut line = format!("Context: {}", context.label());
        if let Some(patient) = &context.patient_snapshot {
            if context.page != Page::PatientDetail {
                line = format!("{line} (patient: {})", patient.display_name());
            }
        }
        self.print(line.bold().to_string());
    }

    fn print_suggestions(&mut self) {
        let suggestions = PromptDeriver::visible_suggestions(self.store.quick_suggestions());
        self.print(format_suggestions(suggestions));
    }
}

/// Runs the chat loop until the user quits or input ends.
pub async fn start(
    store: SessionStore,
    action_tx: mpsc::UnboundedSender<Action>,
    event_rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(event_rx);
    let mut repl = Repl::new(store, action_tx);

    repl.welcome();
    for line in repl.drain_output() {
        println!("{line}");
    }

    loop {
        let event = events.next().await?;
        let flow = repl.handle_event(event).await;

        for line in repl.drain_output() {
            println!("{line}");
        }

        if flow? == Flow::Quit {
            break;
        }
    }

    repl.store.close();
    return Ok(());
}
