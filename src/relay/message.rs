use serde::{Deserialize, Serialize};

use crate::input::KeyInput;

/// Message type the game listens for; anything else on the channel is ignored
pub const KEYDOWN: &str = "keydown";

/// Structured cross-frame message carrying one key press.
///
/// `press` identifies the logical key press so the receiving side can drop
/// a second delivery of the same press through another channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub key: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub press: Option<u64>,
}

impl KeyMessage {
    pub fn keydown(input: &KeyInput, press: u64) -> Self {
        Self {
            kind: KEYDOWN.to_string(),
            key: input.key.clone(),
            code: input.code.clone(),
            press: Some(press),
        }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a raw message, keeping only well-formed keydown messages
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str::<Self>(raw)
            .ok()
            .filter(|message| message.kind == KEYDOWN)
    }

    pub fn input(&self) -> KeyInput {
        KeyInput::new(self.key.clone(), self.code.clone())
    }
}
