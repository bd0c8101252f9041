//! Page shell: the overlay first, then the metrics panel once the host
//! setter has been called with `false`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::json;

use crate::config::Config;
use crate::logging::{log, obj, Domain, Level};
use crate::overlay::media::MediaBackend;
use crate::overlay::LoadingOverlay;
use crate::panel::Panel;
use crate::random::RandomSource;
use crate::render::{render_overlay, render_panel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Live,
}

pub struct Page<M: MediaBackend, R: RandomSource> {
    overlay: Option<LoadingOverlay<M>>,
    panel: Panel<R>,
    is_loading: Arc<AtomicBool>,
    live_since_ms: Option<u64>,
}

impl<M: MediaBackend, R: RandomSource> Page<M, R> {
    pub fn new(cfg: &Config, media: M, rng: R) -> Self {
        let is_loading = Arc::new(AtomicBool::new(true));
        let setter = is_loading.clone();
        let overlay = LoadingOverlay::new(cfg, media, Box::new(move |v| setter.store(v, Ordering::SeqCst)));
        Self {
            overlay: Some(overlay),
            panel: Panel::with_default_feeds(cfg, rng),
            is_loading,
            live_since_ms: None,
        }
    }

    pub fn stage(&self) -> Stage {
        if self.overlay.is_some() {
            Stage::Loading
        } else {
            Stage::Live
        }
    }

    pub fn live_since_ms(&self) -> Option<u64> {
        self.live_since_ms
    }

    pub async fn mount(&mut self, now_ms: u64) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.mount(now_ms).await;
        }
    }

    pub fn advance_to(&mut self, now_ms: u64) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.advance_to(now_ms);
        }
        self.settle(now_ms);
        self.panel.advance_to(now_ms);
    }

    pub async fn pointer_moved(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.on_pointer_move().await;
        }
    }

    pub async fn toggle_audio(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.toggle_audio().await;
        }
    }

    pub fn can_enter(&self) -> bool {
        self.overlay.as_ref().map(|o| o.show_enter()).unwrap_or(false)
    }

    /// Press the overlay's enter control. Swaps to the panel when honored.
    pub fn enter(&mut self, now_ms: u64) -> bool {
        let honored = self.overlay.as_mut().map(|o| o.enter()).unwrap_or(false);
        self.settle(now_ms);
        honored
    }

    fn settle(&mut self, now_ms: u64) {
        if self.is_loading.load(Ordering::SeqCst) {
            return;
        }
        if let Some(mut overlay) = self.overlay.take() {
            overlay.unmount();
            self.panel.mount(now_ms);
            self.live_since_ms = Some(now_ms);
            log(Level::Info, Domain::System, "stage_live", obj(&[("at_ms", json!(now_ms))]));
        }
    }

    pub fn unmount(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.unmount();
        }
        self.panel.unmount();
    }

    pub fn panel(&self) -> &Panel<R> {
        &self.panel
    }

    pub fn overlay(&self) -> Option<&LoadingOverlay<M>> {
        self.overlay.as_ref()
    }

    pub fn render(&self) -> String {
        match &self.overlay {
            Some(overlay) => render_overlay(&overlay.view()),
            None => render_panel(&self.panel.snapshot()),
        }
    }
}
