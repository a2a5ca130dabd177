//! The text service seam.

use std::sync::Arc;

use crate::error::GenerationResult;

/// What a prompt is for; services may route purposes to different models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    /// Narrative and hostname generation.
    Narrative,
    /// Answering a player command.
    Command,
}

/// A generative text service: one prompt in, one text out.
pub trait TextService {
    /// Generate a completion for `prompt`.
    fn generate(&self, purpose: Purpose, prompt: &str) -> GenerationResult<String>;
}

impl<S: TextService + ?Sized> TextService for Arc<S> {
    fn generate(&self, purpose: Purpose, prompt: &str) -> GenerationResult<String> {
        (**self).generate(purpose, prompt)
    }
}

impl<S: TextService + ?Sized> TextService for Box<S> {
    fn generate(&self, purpose: Purpose, prompt: &str) -> GenerationResult<String> {
        (**self).generate(purpose, prompt)
    }
}
