//! Key forwarding from the arcade host into an embedded game frame
//!
//! The host cannot know which delivery path a frame accepts, so every key
//! press goes out as a structured message and as a dispatched key event.
//! When neither gets through, the relay falls back to calling the game's
//! exposed key handler. Failures are logged and swallowed: input that does
//! not arrive degrades the game, it never breaks the host.

pub mod frame;
pub mod message;

pub use frame::{EmbeddedFrame, FrameInbox, FrameInput, FramePolicy, embedded_frame};
pub use message::KeyMessage;

use thiserror::Error;
use tracing::debug;

use crate::input::KeyInput;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The game removed its listeners or the frame is gone
    #[error("frame no longer accepts input")]
    FrameDetached,

    /// Direct access to the frame's document is blocked
    #[error("frame is cross-origin; direct access refused")]
    CrossOrigin,

    #[error("frame exposes no game key handler")]
    MissingMethod,

    #[error("failed to encode key message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The three ways a key press can be handed to a frame
pub trait FrameTarget {
    /// Post a structured message (wire form) to the frame's message channel
    fn post_message(&self, message: &str) -> Result<(), RelayError>;

    /// Dispatch an equivalent key event inside the frame's document
    fn dispatch_key_event(&self, input: &KeyInput, press: u64) -> Result<(), RelayError>;

    /// Call the game's exposed key handler directly
    fn call_game_method(&self, input: &KeyInput, press: u64) -> Result<(), RelayError>;
}

/// Which deliveries of one key press succeeded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    pub message: bool,
    pub dispatched: bool,
    pub direct_call: bool,
    /// The host should not act on this key itself
    pub consumed: bool,
}

impl RelayReport {
    pub fn delivered(&self) -> bool {
        self.message || self.dispatched || self.direct_call
    }
}

/// Host-side forwarder bound to at most one frame at a time
#[derive(Debug)]
pub struct InputRelay<T: FrameTarget> {
    target: Option<T>,
    next_press: u64,
}

impl<T: FrameTarget> Default for InputRelay<T> {
    fn default() -> Self {
        Self {
            target: None,
            next_press: 1,
        }
    }
}

impl<T: FrameTarget> InputRelay<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start forwarding into `target`, replacing any previous frame
    pub fn attach(&mut self, target: T) {
        if self.target.replace(target).is_some() {
            debug!("relay re-attached; previous frame dropped");
        }
    }

    /// Stop forwarding. Returns the frame that was attached, if any.
    pub fn detach(&mut self) -> Option<T> {
        self.target.take()
    }

    pub fn is_attached(&self) -> bool {
        self.target.is_some()
    }

    /// Forward one key press observed by the host. Never fails.
    pub fn forward(&mut self, input: &KeyInput) -> RelayReport {
        let mut report = RelayReport {
            consumed: input.is_game_key(),
            ..RelayReport::default()
        };
        let Some(target) = &self.target else {
            return report;
        };

        let press = self.next_press;
        self.next_press += 1;

        report.message = Self::attempt("message", &input.key, || {
            let raw = KeyMessage::keydown(input, press).encode()?;
            target.post_message(&raw)
        });
        report.dispatched = Self::attempt("dispatch", &input.key, || {
            target.dispatch_key_event(input, press)
        });
        if !report.message && !report.dispatched {
            report.direct_call = Self::attempt("direct call", &input.key, || {
                target.call_game_method(input, press)
            });
        }

        report
    }

    fn attempt(channel: &str, key: &str, deliver: impl FnOnce() -> Result<(), RelayError>) -> bool {
        match deliver() {
            Ok(()) => true,
            Err(err) => {
                debug!(channel, key, error = %err, "key delivery failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records what reached it; each path can be switched off
    #[derive(Default)]
    struct RecordingFrame {
        refuse_message: bool,
        refuse_dispatch: bool,
        refuse_call: bool,
        log: RefCell<Vec<String>>,
    }

    impl FrameTarget for RecordingFrame {
        fn post_message(&self, message: &str) -> Result<(), RelayError> {
            if self.refuse_message {
                return Err(RelayError::FrameDetached);
            }
            self.log.borrow_mut().push(format!("message {message}"));
            Ok(())
        }

        fn dispatch_key_event(&self, input: &KeyInput, press: u64) -> Result<(), RelayError> {
            if self.refuse_dispatch {
                return Err(RelayError::CrossOrigin);
            }
            self.log
                .borrow_mut()
                .push(format!("dispatch {} #{press}", input.key));
            Ok(())
        }

        fn call_game_method(&self, input: &KeyInput, press: u64) -> Result<(), RelayError> {
            if self.refuse_call {
                return Err(RelayError::MissingMethod);
            }
            self.log.borrow_mut().push(format!("call {} #{press}", input.key));
            Ok(())
        }
    }

    fn space() -> KeyInput {
        KeyInput::new(" ", "Space")
    }

    #[test]
    fn test_unattached_relay_does_nothing() {
        let mut relay = InputRelay::<RecordingFrame>::new();
        let report = relay.forward(&space());

        assert!(!report.delivered());
        assert!(report.consumed);
    }

    #[test]
    fn test_message_and_dispatch_both_attempted() {
        let mut relay = InputRelay::new();
        relay.attach(RecordingFrame::default());

        let report = relay.forward(&space());
        assert!(report.message && report.dispatched);
        assert!(!report.direct_call);

        let frame = relay.detach().unwrap();
        let log = frame.log.borrow();
        assert_eq!(log.len(), 2);
        assert!(log[0].starts_with("message "));
        assert!(log[0].contains(r#""type":"keydown""#));
        assert_eq!(log[1], "dispatch   #1");
    }

    #[test]
    fn test_cross_origin_falls_back_to_message_only() {
        let mut relay = InputRelay::new();
        relay.attach(RecordingFrame {
            refuse_dispatch: true,
            refuse_call: true,
            ..Default::default()
        });

        let report = relay.forward(&KeyInput::new("w", "KeyW"));
        assert!(report.message);
        assert!(!report.dispatched);
        assert!(!report.direct_call);
        assert!(!report.consumed);
    }

    #[test]
    fn test_direct_call_when_events_unavailable() {
        let mut relay = InputRelay::new();
        relay.attach(RecordingFrame {
            refuse_message: true,
            refuse_dispatch: true,
            ..Default::default()
        });

        let report = relay.forward(&space());
        assert!(report.direct_call);

        let frame = relay.detach().unwrap();
        assert_eq!(frame.log.borrow().as_slice(), ["call   #1"]);
    }

    #[test]
    fn test_every_channel_failing_is_silent() {
        let mut relay = InputRelay::new();
        relay.attach(RecordingFrame {
            refuse_message: true,
            refuse_dispatch: true,
            refuse_call: true,
            ..Default::default()
        });

        let report = relay.forward(&space());
        assert!(!report.delivered());
    }

    #[test]
    fn test_press_ids_increase() {
        let mut relay = InputRelay::new();
        relay.attach(RecordingFrame {
            refuse_message: true,
            ..Default::default()
        });

        relay.forward(&space());
        relay.forward(&space());

        let frame = relay.detach().unwrap();
        assert_eq!(
            frame.log.borrow().as_slice(),
            ["dispatch   #1", "dispatch   #2"]
        );
    }
}
