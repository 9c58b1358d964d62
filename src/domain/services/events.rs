use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::io::Lines;
use tokio::io::Stdin;
use tokio::sync::mpsc;

use crate::domain::models::Event;

/// Merges terminal input, Ctrl-C and backend responses into a single stream
/// for the chat loop.
pub struct EventsService {
    input: Lines<BufReader<Stdin>>,
    input_closed: bool,
    events_closed: bool,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            input: BufReader::new(tokio::io::stdin()).lines(),
            input_closed: false,
            events_closed: false,
            events,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv(), if !self.events_closed => {
                    if event.is_none() {
                        self.events_closed = true;
                    }
                    event
                },
                line = self.input.next_line(), if !self.input_closed => match line? {
                    Some(text) => Some(Event::UserInput(text)),
                    None => {
                        self.input_closed = true;
                        Some(Event::InputClosed())
                    }
                },
                res = tokio::signal::ctrl_c() => {
                    res?;
                    Some(Event::KeyboardCTRLC())
                }
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
