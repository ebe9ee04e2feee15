use crate::error::HighlightError;
use crate::highlighter::{Highlighted, Highlighter};

/// Highlight `code` in a single call.
pub async fn highlight_document<H: Highlighter>(
    highlighter: &mut H,
    language: &str,
    code: &str,
) -> Result<String, HighlightError> {
    let highlighted = highlighter.highlight(language, code, None).await?;
    Ok(highlighted.value)
}

/// Highlight a sequence of fragments, threading the continuation state of
/// each call into the next, and concatenate the markup.
///
/// The first call gets no continuation. A highlighter error ends the sequence
/// and is returned as is.
pub async fn highlight_fragments<'a, H, I>(
    highlighter: &mut H,
    language: &str,
    fragments: I,
) -> Result<String, HighlightError>
where
    H: Highlighter,
    I: IntoIterator<Item = &'a str>,
{
    let mut rendered = String::new();
    let mut state: Option<H::State> = None;
    for fragment in fragments {
        let Highlighted { value, top } = highlighter
            .highlight(language, fragment, state.as_ref())
            .await?;
        rendered.push_str(&value);
        state = Some(top);
    }
    Ok(rendered)
}

/// Highlight `code` one line at a time, the way an editor feeds a highlighter.
pub async fn highlight_lines<H: Highlighter>(
    highlighter: &mut H,
    language: &str,
    code: &str,
) -> Result<String, HighlightError> {
    highlight_fragments(highlighter, language, markup::lines(code)).await
}
