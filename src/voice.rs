//! Voice control as an explicit state machine.
//!
//! ```text
//!            start()                Result / Ended / Error
//!   Idle ─────────────► Listening ─────────────────────────► Idle
//!     ▲                     │
//!     └──── cancel() ───────┘   (in-flight session discarded)
//!
//!   Unavailable { reason }      (no recognizer; every call is inert)
//! ```
//!
//! The recognizer pushes [`SpeechEvent`]s into one crossbeam channel tagged
//! with the session id it was started with. [`VoiceControl::poll`] is the
//! single place those events are consumed; events from a session that is no
//! longer current are dropped.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;
use terminal_types::NodeId;
use tracing::{debug, info, warn};

/// Lifecycle signal from a speech recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Started,
    /// Single best-guess transcript for the session
    Result(String),
    Ended,
    Error(String),
}

/// Handle given to a recognizer for one listening session.
#[derive(Debug, Clone)]
pub struct SpeechSession {
    id: u64,
    events: Sender<(u64, SpeechEvent)>,
}

impl SpeechSession {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Send an event for this session. Delivery after the controller is gone
    /// is silently dropped.
    pub fn emit(&self, event: SpeechEvent) {
        let _ = self.events.send((self.id, event));
    }
}

/// Speech-recognition capability.
pub trait SpeechRecognizer {
    /// Begin listening. Events go through `session`.
    fn start(&mut self, session: SpeechSession) -> Result<(), String>;

    /// Stop the current session without delivering a result.
    fn abort(&mut self);

    /// Keyword to node pairs the recognizer should listen for.
    fn register_commands(&mut self, _commands: &[(String, NodeId)]) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceState {
    Unavailable { reason: String },
    Idle,
    Listening,
}

pub struct VoiceControl {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    state: VoiceState,
    session: u64,
    tx: Sender<(u64, SpeechEvent)>,
    rx: Receiver<(u64, SpeechEvent)>,
    last_transcript: Option<String>,
    last_error: Option<String>,
}

impl VoiceControl {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            recognizer: Some(recognizer),
            state: VoiceState::Idle,
            session: 0,
            tx,
            rx,
            last_transcript: None,
            last_error: None,
        }
    }

    /// Inert controller for hosts without speech support.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let (tx, rx) = unbounded();
        let reason = reason.into();
        info!(%reason, "voice control unavailable");
        Self {
            recognizer: None,
            state: VoiceState::Unavailable { reason },
            session: 0,
            tx,
            rx,
            last_transcript: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &VoiceState {
        &self.state
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.state == VoiceState::Listening
    }

    pub fn last_transcript(&self) -> Option<&str> {
        self.last_transcript.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Idle → Listening. Returns whether a session is now listening.
    pub fn start(&mut self) -> bool {
        if self.state == VoiceState::Listening {
            return true;
        }
        let Some(recognizer) = self.recognizer.as_mut() else {
            return false;
        };

        self.session += 1;
        let session = SpeechSession {
            id: self.session,
            events: self.tx.clone(),
        };
        match recognizer.start(session) {
            Ok(()) => {
                self.state = VoiceState::Listening;
                self.last_error = None;
                debug!(session = self.session, "listening");
                true
            }
            Err(e) => {
                warn!(error = %e, "speech recognizer failed to start");
                self.last_error = Some(e);
                self.state = VoiceState::Idle;
                false
            }
        }
    }

    /// Back to Idle; anything the in-flight session still sends is ignored.
    pub fn cancel(&mut self) {
        if self.state != VoiceState::Listening {
            return;
        }
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.abort();
        }
        // Retire the session id so late events no longer match
        self.session += 1;
        self.state = VoiceState::Idle;
        debug!("listening cancelled");
    }

    /// Drain pending events, applying transitions. Returns lower-cased
    /// transcripts delivered by the current session.
    pub fn poll(&mut self) -> Vec<String> {
        let mut transcripts = Vec::new();
        while let Ok((session, event)) = self.rx.try_recv() {
            if session != self.session || !self.is_available() {
                debug!(session, ?event, "stale speech event dropped");
                continue;
            }
            match event {
                SpeechEvent::Started => {
                    self.state = VoiceState::Listening;
                }
                SpeechEvent::Result(transcript) => {
                    let transcript = transcript.trim().to_lowercase();
                    debug!(%transcript, "speech result");
                    self.last_transcript = Some(transcript.clone());
                    self.state = VoiceState::Idle;
                    transcripts.push(transcript);
                }
                SpeechEvent::Ended => {
                    self.state = VoiceState::Idle;
                }
                SpeechEvent::Error(e) => {
                    warn!(error = %e, "speech recognition error");
                    self.last_error = Some(e);
                    self.state = VoiceState::Idle;
                }
            }
        }
        transcripts
    }

    /// Re-register the recognizer's keyword to node table.
    pub fn register_commands(&mut self, commands: &[(String, NodeId)]) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.register_commands(commands);
            debug!(count = commands.len(), "voice commands registered");
        }
    }
}

impl fmt::Debug for VoiceControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceControl")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("last_transcript", &self.last_transcript)
            .finish()
    }
}
