pub mod ollama;
pub mod openai;

use std::sync::Arc;

use crate::domain::models::BackendBox;
use crate::domain::models::BackendName;

pub struct BackendManager {}

impl BackendManager {
    pub fn get(name: BackendName) -> BackendBox {
        match name {
            BackendName::Ollama => return Arc::<ollama::Ollama>::default(),
            BackendName::OpenAI => return Arc::<openai::OpenAI>::default(),
        }
    }
}
