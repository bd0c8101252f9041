//! Autoplay-unlock state machine for the background track.
//!
//! The machine never touches media itself: it turns events into commands,
//! and the overlay reports each command's outcome back as an event.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioState {
    /// Nothing attempted yet; first pointer movement will try to play.
    Locked,
    /// A play request is in flight.
    Unlocking,
    /// Playback succeeded at least once.
    Unlocked,
    /// The last play request was rejected.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    PointerMoved,
    PlayResolved,
    PlayRejected,
    ManualToggle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    Play { volume: f32 },
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOrigin {
    Pointer,
    Toggle,
}

#[derive(Debug, Clone)]
pub struct TransitionError {
    pub msg: String,
}

#[derive(Debug, Clone)]
pub struct AudioMachine {
    state: AudioState,
    playing: bool,
    pending: Option<PlayOrigin>,
    volume: f32,
}

impl AudioMachine {
    pub fn new(volume: f32) -> Self {
        Self {
            state: AudioState::Locked,
            playing: false,
            pending: None,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Origin of the in-flight play request.
    pub fn pending(&self) -> Option<PlayOrigin> {
        self.pending
    }

    /// Whether pointer movement should still attempt playback.
    pub fn pointer_armed(&self) -> bool {
        matches!(self.state, AudioState::Locked | AudioState::Failed)
    }

    fn request_play(&mut self, origin: PlayOrigin) -> Option<AudioCommand> {
        self.state = AudioState::Unlocking;
        self.playing = false;
        self.pending = Some(origin);
        Some(AudioCommand::Play { volume: self.volume })
    }

    pub fn apply(&mut self, event: AudioEvent) -> Result<Option<AudioCommand>, TransitionError> {
        match (self.state, event) {
            (AudioState::Locked | AudioState::Failed, AudioEvent::PointerMoved) => {
                Ok(self.request_play(PlayOrigin::Pointer))
            }
            (AudioState::Locked | AudioState::Failed, AudioEvent::ManualToggle) => {
                Ok(self.request_play(PlayOrigin::Toggle))
            }
            (AudioState::Unlocking, AudioEvent::PlayResolved) => {
                self.state = AudioState::Unlocked;
                self.playing = true;
                self.pending = None;
                Ok(None)
            }
            (AudioState::Unlocking, AudioEvent::PlayRejected) => {
                self.state = AudioState::Failed;
                self.playing = false;
                self.pending = None;
                Ok(None)
            }
            (AudioState::Unlocking, AudioEvent::PointerMoved | AudioEvent::ManualToggle) => Ok(None),
            (AudioState::Unlocked, AudioEvent::ManualToggle) => {
                if self.playing {
                    self.playing = false;
                    Ok(Some(AudioCommand::Pause))
                } else {
                    Ok(self.request_play(PlayOrigin::Toggle))
                }
            }
            (AudioState::Unlocked, AudioEvent::PointerMoved) => Ok(None),
            (state, AudioEvent::PlayResolved | AudioEvent::PlayRejected) => Err(TransitionError {
                msg: format!("play outcome {:?} with no request in flight ({:?})", event, state),
            }),
        }
    }
}
