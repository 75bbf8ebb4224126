use crate::models::raw::RawMessage;

/// Whether a raw message was written by the assistant.
///
/// Relies only on the kind the producer set on the message, never on how the value
/// happens to be represented.
pub fn is_assistant_message(message: &RawMessage) -> bool {
    message.kind.is_assistant()
}
