pub mod chat;
pub mod gemini;
pub mod keyword_responder;
pub mod token_service;
pub mod transcription;
