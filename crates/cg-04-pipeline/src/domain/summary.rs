//! Action-log summary of an event: command name, callback payload or text
//! snippet.

use shared_types::InboundEvent;

/// Summary of a message without text (media, service messages).
pub const NON_TEXT: &str = "<non-text>";

const ELLIPSIS: char = '…';

/// Summarize `event`, keeping at most `max_chars` characters of free text.
pub fn summarize(event: &InboundEvent, max_chars: usize) -> String {
    match event {
        InboundEvent::Message(message) => match message.text.as_deref().map(str::trim) {
            None | Some("") => NON_TEXT.to_string(),
            Some(text) if text.starts_with('/') => command_name(text).to_string(),
            Some(text) => truncate(text, max_chars),
        },
        InboundEvent::Callback(callback) => match callback.data.as_deref() {
            Some(data) => format!("callback:{}", truncate(data, max_chars)),
            None => "callback:".to_string(),
        },
    }
}

/// `/start@my_bot arg` → `/start`
fn command_name(text: &str) -> &str {
    let token = text.split_whitespace().next().unwrap_or(text);
    token.split('@').next().unwrap_or(token)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let mut out = text[..cut].to_string();
            out.push(ELLIPSIS);
            out
        }
    }
}
