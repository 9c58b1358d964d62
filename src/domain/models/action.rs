use super::PendingRequest;

#[derive(Debug)]
pub enum Action {
    BackendAbort(),
    BackendRequest(PendingRequest),
}
