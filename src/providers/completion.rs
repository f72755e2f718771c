use std::cell::RefCell;

use super::ProviderError;

/// Completion provider abstraction: prompt in, raw model text out.
///
/// One call per batch, synchronous, no conversation memory — the pipeline
/// deliberately gives the model no state across batches, which is why the
/// reconciler dedupes again downstream.
pub trait CompletionModel {
    fn complete(&self, model: &str, system: &str, prompt: &str) -> Result<String, ProviderError>;
}

impl CompletionModel for Box<dyn CompletionModel> {
    fn complete(&self, model: &str, system: &str, prompt: &str) -> Result<String, ProviderError> {
        (**self).complete(model, system, prompt)
    }
}

/// Mock completion model for testing — returns one configured response.
pub struct MockCompletionModel {
    response: String,
}

impl MockCompletionModel {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl CompletionModel for MockCompletionModel {
    fn complete(
        &self,
        _model: &str,
        _system: &str,
        _prompt: &str,
    ) -> Result<String, ProviderError> {
        Ok(self.response.clone())
    }
}

/// Mock completion model that replays a fixed sequence of responses, one
/// per call — lets a test hand each batch a different output. Calls past
/// the end of the script repeat the last response.
pub struct ScriptedCompletionModel {
    responses: Vec<String>,
    cursor: RefCell<usize>,
}

impl ScriptedCompletionModel {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: responses.into_iter().map(str::to_string).collect(),
            cursor: RefCell::new(0),
        }
    }

    /// Number of completion calls made so far.
    pub fn calls(&self) -> usize {
        *self.cursor.borrow()
    }
}

impl CompletionModel for ScriptedCompletionModel {
    fn complete(
        &self,
        _model: &str,
        _system: &str,
        _prompt: &str,
    ) -> Result<String, ProviderError> {
        let mut cursor = self.cursor.borrow_mut();
        let idx = (*cursor).min(self.responses.len().saturating_sub(1));
        *cursor += 1;
        self.responses
            .get(idx)
            .cloned()
            .ok_or_else(|| ProviderError::ResponseParsing("scripted model has no responses".into()))
    }
}
