//! The embedded frame a hosted game runs in
//!
//! [`EmbeddedFrame`] is the host's handle on the frame and [`FrameInbox`] is
//! the game's end. Both ends share one queue, so every delivery path reaches
//! the game in the order the host produced it.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::{debug, trace};

use super::message::KeyMessage;
use super::{FrameTarget, RelayError};
use crate::input::KeyInput;

/// What the host is allowed to do with the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePolicy {
    /// Same-origin frames allow direct event dispatch into their document
    pub same_origin: bool,
    /// Whether the game exposes its key handler to the host
    pub exposes_game: bool,
}

impl Default for FramePolicy {
    fn default() -> Self {
        Self {
            same_origin: true,
            exposes_game: true,
        }
    }
}

impl FramePolicy {
    pub fn cross_origin() -> Self {
        Self {
            same_origin: false,
            exposes_game: false,
        }
    }
}

/// A single delivery arriving in the frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameInput {
    /// Structured message, still in wire form
    Message(String),
    /// Key event in the frame's document: native, or dispatched by the host
    KeyEvent { input: KeyInput, press: Option<u64> },
    /// Host called the game's exposed key handler
    DirectCall { input: KeyInput, press: u64 },
}

/// Host-side handle on an embedded frame
#[derive(Debug, Clone)]
pub struct EmbeddedFrame {
    tx: UnboundedSender<FrameInput>,
    policy: FramePolicy,
}

/// Game-side end: decodes deliveries and drops duplicates
#[derive(Debug)]
pub struct FrameInbox {
    rx: UnboundedReceiver<FrameInput>,
    last_press: Option<u64>,
}

/// Create a frame with the given policy
pub fn embedded_frame(policy: FramePolicy) -> (EmbeddedFrame, FrameInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        EmbeddedFrame { tx, policy },
        FrameInbox {
            rx,
            last_press: None,
        },
    )
}

impl EmbeddedFrame {
    pub fn policy(&self) -> FramePolicy {
        self.policy
    }

    /// Whether the game side has detached its listeners
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, input: FrameInput) -> Result<(), RelayError> {
        self.tx.send(input).map_err(|_| RelayError::FrameDetached)
    }
}

impl FrameTarget for EmbeddedFrame {
    fn post_message(&self, message: &str) -> Result<(), RelayError> {
        self.send(FrameInput::Message(message.to_string()))
    }

    fn dispatch_key_event(&self, input: &KeyInput, press: u64) -> Result<(), RelayError> {
        if !self.policy.same_origin {
            return Err(RelayError::CrossOrigin);
        }
        self.send(FrameInput::KeyEvent {
            input: input.clone(),
            press: Some(press),
        })
    }

    fn call_game_method(&self, input: &KeyInput, press: u64) -> Result<(), RelayError> {
        if !self.policy.same_origin {
            return Err(RelayError::CrossOrigin);
        }
        if !self.policy.exposes_game {
            return Err(RelayError::MissingMethod);
        }
        self.send(FrameInput::DirectCall {
            input: input.clone(),
            press,
        })
    }
}

impl FrameInbox {
    /// Wait for the next key press. Returns `None` once the host side is gone
    /// or the inbox was detached and drained.
    pub async fn recv(&mut self) -> Option<KeyInput> {
        while let Some(input) = self.rx.recv().await {
            if let Some(key) = self.accept(input) {
                return Some(key);
            }
        }
        None
    }

    /// Next already-queued key press, without waiting
    pub fn try_next(&mut self) -> Option<KeyInput> {
        loop {
            match self.rx.try_recv() {
                Ok(input) => {
                    if let Some(key) = self.accept(input) {
                        return Some(key);
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Stop listening. Later deliveries fail on the host side.
    pub fn detach(&mut self) {
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
        debug!("frame inbox detached");
    }

    /// Decode one delivery. Returns `None` for anything that is not a new
    /// key press.
    pub fn accept(&mut self, input: FrameInput) -> Option<KeyInput> {
        let (key, press) = match input {
            FrameInput::Message(raw) => {
                let Some(message) = KeyMessage::decode(&raw) else {
                    trace!(%raw, "ignoring non-key message");
                    return None;
                };
                (message.input(), message.press)
            }
            FrameInput::KeyEvent { input, press } => (input, press),
            FrameInput::DirectCall { input, press } => (input, Some(press)),
        };

        if let Some(press) = press {
            if self.last_press.is_some_and(|last| press <= last) {
                trace!(press, key = %key.key, "dropping duplicate delivery");
                return None;
            }
            self.last_press = Some(press);
        }
        Some(key)
    }
}
