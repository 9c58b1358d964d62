use super::BackendResponse;

#[derive(Debug)]
pub enum Event {
    BackendResponse(BackendResponse),
    InputClosed(),
    KeyboardCTRLC(),
    UserInput(String),
}
