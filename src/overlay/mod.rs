//! Full-screen loading overlay.
//!
//! Reveals its enter control after a fixed delay and owns the single
//! background track. Media failures only ever degrade to "not playing";
//! they never reach the caller and never affect the reveal.

pub mod audio;
pub mod media;

use serde::Serialize;
use serde_json::json;

use crate::config::{Assets, Config};
use crate::logging::{log, log_media_failure, obj, v_str, Domain, Level};
use crate::scheduler::Scheduler;

use audio::{AudioCommand, AudioEvent, AudioMachine, AudioState};
use media::MediaBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayTimer {
    Reveal,
}

/// Host setter; the overlay calls it with `false` to ask for dismissal.
pub type DismissFn = Box<dyn FnMut(bool) + Send>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayView {
    pub show_enter: bool,
    pub is_playing: bool,
    pub audio: AudioState,
    pub assets: Assets,
}

pub struct LoadingOverlay<M: MediaBackend> {
    assets: Assets,
    reveal_delay_ms: u64,
    scheduler: Scheduler<OverlayTimer>,
    show_enter: bool,
    audio: AudioMachine,
    media: M,
    on_dismiss: DismissFn,
    mounted: bool,
    dismissed: bool,
}

impl<M: MediaBackend> LoadingOverlay<M> {
    pub fn new(cfg: &Config, media: M, on_dismiss: DismissFn) -> Self {
        Self {
            assets: cfg.assets.clone(),
            reveal_delay_ms: cfg.reveal_delay_ms,
            scheduler: Scheduler::new(0),
            show_enter: false,
            audio: AudioMachine::new(cfg.audio_volume),
            media,
            on_dismiss,
            mounted: false,
            dismissed: false,
        }
    }

    /// Schedule the reveal and try to unlock the audio context.
    pub async fn mount(&mut self, now_ms: u64) {
        if self.mounted {
            return;
        }
        self.scheduler = Scheduler::new(now_ms);
        self.scheduler.once(self.reveal_delay_ms, OverlayTimer::Reveal);
        self.mounted = true;
        log(
            Level::Info,
            Domain::Overlay,
            "mounted",
            obj(&[("now_ms", json!(now_ms)), ("reveal_at_ms", json!(now_ms.saturating_add(self.reveal_delay_ms)))]),
        );

        if let Err(err) = self.media.resume_context().await {
            log_media_failure("resume_context", &err);
        }
    }

    /// Fire timers due up to `now_ms`. Returns whether the enter control
    /// became visible during this call.
    pub fn advance_to(&mut self, now_ms: u64) -> bool {
        if !self.mounted {
            return false;
        }
        let mut revealed = false;
        while let Some(fired) = self.scheduler.pop_due(now_ms) {
            match fired.key {
                OverlayTimer::Reveal => {
                    self.show_enter = true;
                    revealed = true;
                    log(Level::Info, Domain::Overlay, "revealed", obj(&[("at_ms", json!(fired.due))]));
                }
            }
        }
        revealed
    }

    pub async fn on_pointer_move(&mut self) {
        if !self.mounted || !self.audio.pointer_armed() {
            return;
        }
        self.dispatch(AudioEvent::PointerMoved).await;
    }

    /// Play/mute button.
    pub async fn toggle_audio(&mut self) {
        if !self.mounted {
            return;
        }
        self.dispatch(AudioEvent::ManualToggle).await;
    }

    async fn dispatch(&mut self, event: AudioEvent) {
        match self.audio.apply(event) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => {}
            Err(err) => log(
                Level::Debug,
                Domain::Audio,
                "transition_ignored",
                obj(&[("msg", v_str(&err.msg))]),
            ),
        }
    }

    async fn execute(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Play { volume } => {
                let origin = self.audio.pending();
                let outcome = match self.media.play(volume).await {
                    Ok(()) => AudioEvent::PlayResolved,
                    Err(err) => {
                        log_media_failure("play", &err);
                        AudioEvent::PlayRejected
                    }
                };
                if let Err(err) = self.audio.apply(outcome) {
                    log(Level::Debug, Domain::Audio, "transition_ignored", obj(&[("msg", v_str(&err.msg))]));
                }
                log(
                    Level::Info,
                    Domain::Audio,
                    "play_settled",
                    obj(&[
                        ("origin", v_str(&format!("{:?}", origin))),
                        ("playing", json!(self.audio.is_playing())),
                        ("state", v_str(&format!("{:?}", self.audio.state()))),
                    ]),
                );
            }
            AudioCommand::Pause => {
                if let Err(err) = self.media.pause() {
                    log_media_failure("pause", &err);
                }
                log(Level::Info, Domain::Audio, "paused", obj(&[]));
            }
        }
    }

    /// Enter button. Honored once, and only after the reveal.
    pub fn enter(&mut self) -> bool {
        if !self.mounted || !self.show_enter || self.dismissed {
            log(
                Level::Debug,
                Domain::Overlay,
                "enter_ignored",
                obj(&[("show_enter", json!(self.show_enter)), ("dismissed", json!(self.dismissed))]),
            );
            return false;
        }
        self.dismissed = true;
        (self.on_dismiss)(false);
        log(Level::Info, Domain::Overlay, "dismissed", obj(&[("at_ms", json!(self.scheduler.now()))]));
        true
    }

    /// Cancel the pending reveal and release the audio context.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.scheduler.cancel_all();
        if self.audio.is_playing() {
            if let Err(err) = self.media.pause() {
                log_media_failure("pause", &err);
            }
        }
        self.media.close_context();
        self.mounted = false;
        log(Level::Info, Domain::Overlay, "unmounted", obj(&[("revealed", json!(self.show_enter))]));
    }

    pub fn show_enter(&self) -> bool {
        self.show_enter
    }

    pub fn is_playing(&self) -> bool {
        self.audio.is_playing()
    }

    pub fn audio_state(&self) -> AudioState {
        self.audio.state()
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn view(&self) -> OverlayView {
        OverlayView {
            show_enter: self.show_enter,
            is_playing: self.audio.is_playing(),
            audio: self.audio.state(),
            assets: self.assets.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::media::ScriptedMedia;
    use std::sync::{Arc, Mutex};

    fn overlay(media: ScriptedMedia) -> (LoadingOverlay<ScriptedMedia>, Arc<Mutex<Vec<bool>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let o = LoadingOverlay::new(
            &Config::default(),
            media,
            Box::new(move |v| sink.lock().unwrap().push(v)),
        );
        (o, calls)
    }

    #[tokio::test]
    async fn reveal_waits_for_the_delay() {
        let (mut o, _) = overlay(ScriptedMedia::accepting());
        o.mount(1_000).await;
        assert!(!o.advance_to(5_999));
        assert!(!o.show_enter());
        assert!(o.advance_to(6_000));
        assert!(o.show_enter());
        assert!(!o.advance_to(60_000));
    }

    #[tokio::test]
    async fn enter_before_reveal_is_ignored() {
        let (mut o, calls) = overlay(ScriptedMedia::accepting());
        o.mount(0).await;
        assert!(!o.enter());
        o.advance_to(5_000);
        assert!(o.enter());
        assert!(!o.enter());
        assert_eq!(*calls.lock().unwrap(), vec![false]);
    }

    #[tokio::test]
    async fn blocked_autoplay_degrades_silently() {
        let (mut o, _) = overlay(ScriptedMedia::rejecting());
        o.mount(0).await;
        o.on_pointer_move().await;
        assert!(!o.is_playing());
        assert_eq!(o.audio_state(), AudioState::Failed);
        o.toggle_audio().await;
        assert!(!o.is_playing());
        assert_eq!(o.media().play_calls, 2);
    }

    #[tokio::test]
    async fn pointer_unlock_plays_once() {
        let (mut o, _) = overlay(ScriptedMedia::accepting());
        o.mount(0).await;
        o.on_pointer_move().await;
        o.on_pointer_move().await;
        assert!(o.is_playing());
        assert_eq!(o.media().play_calls, 1);
        assert_eq!(o.media().last_volume, Some(0.5));
    }

    #[tokio::test]
    async fn context_failure_does_not_block_mount() {
        let mut media = ScriptedMedia::accepting();
        media.context_fails = true;
        let (mut o, _) = overlay(media);
        o.mount(0).await;
        assert!(!o.media().context_resumed);
        assert!(o.advance_to(5_000));
    }

    #[tokio::test]
    async fn unmount_cancels_reveal_and_closes_context() {
        let (mut o, calls) = overlay(ScriptedMedia::accepting());
        o.mount(0).await;
        o.on_pointer_move().await;
        o.unmount();
        assert!(!o.advance_to(10_000));
        assert!(!o.show_enter());
        assert!(!o.enter());
        assert!(o.media().context_closed);
        assert_eq!(o.media().pause_calls, 1);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn huge_reveal_delay_never_reveals() {
        let mut c = Config::default();
        c.reveal_delay_ms = u64::MAX;
        let mut o = LoadingOverlay::new(&c, ScriptedMedia::accepting(), Box::new(|_| {}));
        o.mount(1_700_000_000_000).await;
        assert!(!o.advance_to(u64::MAX - 1));
        assert!(!o.show_enter());
    }
}
