use std::fmt;

use crate::error::HighlightError;

/// Output of one highlighter call.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlighted<S> {
    /// Span-tagged markup for the input text.
    pub value: String,
    /// Lexer context still open at the end of the input.
    pub top: S,
}

/// A syntax highlighter that can resume from where a previous call stopped.
///
/// `State` is opaque to the harness: it is only ever handed back, unchanged,
/// as the `continuation` of the next call. Auto-detection of the language is
/// never requested.
#[allow(async_fn_in_trait)]
pub trait Highlighter {
    type State: Clone + PartialEq + fmt::Debug;

    async fn highlight(
        &mut self,
        language: &str,
        code: &str,
        continuation: Option<&Self::State>,
    ) -> Result<Highlighted<Self::State>, HighlightError>;
}
