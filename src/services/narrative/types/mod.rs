pub mod chat_completion;
pub mod narrative_error;
pub mod narrative_payload;
