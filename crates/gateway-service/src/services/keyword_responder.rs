//! Rule-based canned replies.
//!
//! Rules are checked in order against the lower-cased words of the prompt;
//! the first rule with a matching phrase wins. Prompts matching no rule are
//! echoed back inside a randomly chosen template. The random source is
//! injectable so a seeded generator gives a reproducible reply.

use crate::config::ChatBackend;
use crate::observability::metrics::record_chat_reply;
use crate::services::chat::ChatResponder;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Mutex;
use std::time::Instant;

enum RuleReply {
    Fixed(&'static str),
    CurrentRoom,
}

struct KeywordRule {
    /// Each phrase is a sequence of whole words.
    phrases: &'static [&'static [&'static str]],
    reply: RuleReply,
}

const RULES: &[KeywordRule] = &[
    KeywordRule {
        phrases: &[&["hello"], &["hi"]],
        reply: RuleReply::Fixed(
            "Hello! I'm your LiveKit AI assistant. How can I help you today?",
        ),
    },
    KeywordRule {
        phrases: &[&["how", "are", "you"]],
        reply: RuleReply::Fixed(
            "I'm functioning well! Ready to help you with LiveKit integration and real-time communication.",
        ),
    },
    KeywordRule {
        phrases: &[&["livekit"]],
        reply: RuleReply::Fixed(
            "LiveKit is an open-source WebRTC platform for real-time audio and video. I can generate access tokens and help you manage rooms.",
        ),
    },
    KeywordRule {
        phrases: &[&["token"], &["tokens"]],
        reply: RuleReply::Fixed(
            "I can generate LiveKit access tokens for you. Call the /get-token endpoint with your identity.",
        ),
    },
    KeywordRule {
        phrases: &[&["room"], &["rooms"]],
        reply: RuleReply::CurrentRoom,
    },
];

/// Number of fallback templates.
pub const FALLBACK_TEMPLATE_COUNT: usize = 3;

fn fallback_reply(index: usize, prompt: &str) -> String {
    match index {
        0 => format!(
            "Thanks for your message: '{}'. I'm here to help with LiveKit integration and real-time communication features.",
            prompt
        ),
        1 => format!(
            "You said: '{}'. Ask me about tokens, rooms or LiveKit and I'll point you in the right direction.",
            prompt
        ),
        _ => format!(
            "I heard '{}'. I can issue room tokens and explain how LiveKit rooms work.",
            prompt
        ),
    }
}

/// Split text into lower-cased alphanumeric words.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_phrase(words: &[String], phrase: &[&str]) -> bool {
    if phrase.is_empty() {
        return false;
    }
    words
        .windows(phrase.len())
        .any(|window| window.iter().zip(phrase).all(|(w, p)| w == p))
}

/// Deterministic keyword lookup with a randomized echo fallback.
pub struct KeywordResponder {
    room_name: String,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl KeywordResponder {
    /// Responder with an OS-seeded random source.
    pub fn new(room_name: String) -> Self {
        Self::with_rng(room_name, StdRng::from_entropy())
    }

    /// Responder with a caller-supplied random source.
    pub fn with_rng<R: RngCore + Send + 'static>(room_name: String, rng: R) -> Self {
        Self {
            room_name,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// The rule reply for `prompt`, if any rule matches.
    pub fn match_rule(&self, prompt: &str) -> Option<String> {
        let words = words(prompt);
        RULES
            .iter()
            .find(|rule| rule.phrases.iter().any(|p| contains_phrase(&words, p)))
            .map(|rule| match rule.reply {
                RuleReply::Fixed(text) => text.to_string(),
                RuleReply::CurrentRoom => format!(
                    "I can help you create and manage LiveKit rooms. Your current room is '{}'.",
                    self.room_name
                ),
            })
    }

    fn pick_template(&self) -> usize {
        // A poisoned lock only means another reply panicked mid-draw; the
        // generator state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..FALLBACK_TEMPLATE_COUNT)
    }

    fn reply_sync(&self, prompt: &str) -> String {
        self.match_rule(prompt)
            .unwrap_or_else(|| fallback_reply(self.pick_template(), prompt))
    }
}

#[async_trait]
impl ChatResponder for KeywordResponder {
    fn backend(&self) -> ChatBackend {
        ChatBackend::Keyword
    }

    async fn reply(&self, prompt: &str) -> String {
        let start = Instant::now();
        let reply = self.reply_sync(prompt);
        record_chat_reply(self.backend().as_str(), "success", start.elapsed());
        reply
    }
}
