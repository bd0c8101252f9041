use std::collections::VecDeque;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// Platform audio: one context and one background track.
#[async_trait]
pub trait MediaBackend: Send {
    /// Create the audio context if needed and resume it when suspended.
    async fn resume_context(&mut self) -> Result<()>;
    async fn play(&mut self, volume: f32) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn close_context(&mut self);
}

// Headless stand-in: every call succeeds.
#[derive(Debug, Default)]
pub struct NullMedia {
    pub playing: bool,
    pub volume: f32,
}

#[async_trait]
impl MediaBackend for NullMedia {
    async fn resume_context(&mut self) -> Result<()> {
        Ok(())
    }

    async fn play(&mut self, volume: f32) -> Result<()> {
        self.volume = volume;
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.playing = false;
        Ok(())
    }

    fn close_context(&mut self) {}
}

/// Backend with scripted outcomes and call counters, for driving the
/// overlay through failure paths.
#[derive(Debug, Default)]
pub struct ScriptedMedia {
    play_outcomes: VecDeque<bool>,
    /// Outcome once the script runs out.
    pub play_default: bool,
    pub context_fails: bool,
    pub pause_fails: bool,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub context_resumed: bool,
    pub context_closed: bool,
    pub playing: bool,
    pub last_volume: Option<f32>,
}

impl ScriptedMedia {
    pub fn accepting() -> Self {
        Self { play_default: true, ..Self::default() }
    }

    /// Autoplay blocked: every play is rejected.
    pub fn rejecting() -> Self {
        Self { play_default: false, ..Self::default() }
    }

    pub fn with_outcomes(outcomes: &[bool]) -> Self {
        Self { play_outcomes: outcomes.iter().copied().collect(), ..Self::accepting() }
    }
}

#[async_trait]
impl MediaBackend for ScriptedMedia {
    async fn resume_context(&mut self) -> Result<()> {
        if self.context_fails {
            return Err(anyhow!("AudioContext unavailable"));
        }
        self.context_resumed = true;
        Ok(())
    }

    async fn play(&mut self, volume: f32) -> Result<()> {
        self.play_calls += 1;
        self.last_volume = Some(volume);
        let ok = self.play_outcomes.pop_front().unwrap_or(self.play_default);
        if ok {
            self.playing = true;
            Ok(())
        } else {
            self.playing = false;
            Err(anyhow!("NotAllowedError: play() failed because the user didn't interact with the document first"))
        }
    }

    fn pause(&mut self) -> Result<()> {
        self.pause_calls += 1;
        if self.pause_fails {
            return Err(anyhow!("pause failed"));
        }
        self.playing = false;
        Ok(())
    }

    fn close_context(&mut self) {
        self.context_closed = true;
    }
}
