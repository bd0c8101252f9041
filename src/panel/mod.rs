//! Live metrics panel.
//!
//! ```text
//! ┌──────────────┐   pop_due    ┌──────────────┐   tick(rng)   ┌─────────┐
//! │  Scheduler   │─────────────►│    Panel     │──────────────►│  Feeds  │
//! │ (one wheel)  │              │  (dispatch)  │──────────────►│Countdown│
//! └──────────────┘              └──────────────┘               └─────────┘
//!                                      │
//!                                      ▼
//!                               PanelSnapshot ──► render / fingerprint
//! ```
//!
//! Feeds never see each other. Unmount cancels every task, after which
//! `advance_to` is a no-op.

pub mod countdown;
pub mod feeds;

use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::logging::{log, obj, Domain, Level};
use crate::random::RandomSource;
use crate::scheduler::{Scheduler, TaskId};

use countdown::{Countdown, CountdownTick, TimeLeft};
use feeds::{default_feeds, Feed, Reading};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelTask {
    Feed(usize),
    Countdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSnapshot {
    pub feed: String,
    pub readings: Vec<Reading>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownSnapshot {
    pub left: TimeLeft,
    pub display: String,
    pub expired: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub now_ms: u64,
    pub cards: Vec<CardSnapshot>,
    pub countdown: CountdownSnapshot,
}

impl PanelSnapshot {
    /// SHA-256 of the serialized snapshot, hex encoded.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&bytes))
    }

    pub fn reading(&self, feed: &str, label: &str) -> Option<&Reading> {
        self.cards
            .iter()
            .find(|c| c.feed == feed)
            .and_then(|c| c.readings.iter().find(|r| r.label == label))
    }
}

pub struct Panel<R: RandomSource> {
    feeds: Vec<Box<dyn Feed>>,
    countdown: Countdown,
    countdown_days: u64,
    countdown_period_ms: u64,
    countdown_task: Option<TaskId>,
    scheduler: Scheduler<PanelTask>,
    rng: R,
    mounted: bool,
    callbacks: u64,
}

impl<R: RandomSource> Panel<R> {
    /// Empty panel; add feeds before mounting.
    pub fn new(cfg: &Config, rng: R) -> Self {
        Self {
            feeds: Vec::new(),
            countdown: Countdown::new(0, cfg.countdown_days),
            countdown_days: cfg.countdown_days,
            countdown_period_ms: cfg.countdown_period_ms,
            countdown_task: None,
            scheduler: Scheduler::new(0),
            rng,
            mounted: false,
            callbacks: 0,
        }
    }

    pub fn with_default_feeds(cfg: &Config, rng: R) -> Self {
        let mut panel = Self::new(cfg, rng);
        for feed in default_feeds() {
            panel.add_feed(feed);
        }
        panel
    }

    pub fn add_feed(&mut self, feed: Box<dyn Feed>) {
        self.feeds.push(feed);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Update callbacks handled since construction.
    pub fn callbacks(&self) -> u64 {
        self.callbacks
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Start every animated feed and the countdown. Remounting resets the
    /// deadline but keeps feed values.
    pub fn mount(&mut self, now_ms: u64) {
        if self.mounted {
            return;
        }
        self.scheduler = Scheduler::new(now_ms);
        for (idx, feed) in self.feeds.iter().enumerate() {
            if let Some(period) = feed.period_ms() {
                self.scheduler.every(period, PanelTask::Feed(idx));
            }
        }
        self.countdown = Countdown::new(now_ms, self.countdown_days);
        self.countdown_task = Some(self.scheduler.every(self.countdown_period_ms, PanelTask::Countdown));
        self.mounted = true;
        log(
            Level::Info,
            Domain::Metrics,
            "panel_mounted",
            obj(&[
                ("now_ms", json!(now_ms)),
                ("feeds", json!(self.feeds.len())),
                ("tasks", json!(self.scheduler.len())),
                ("deadline_ms", json!(self.countdown.deadline_ms())),
            ]),
        );
    }

    /// Run every callback due up to `now_ms`. Returns how many fired.
    pub fn advance_to(&mut self, now_ms: u64) -> usize {
        if !self.mounted {
            return 0;
        }
        let mut fired = 0;
        while let Some(task) = self.scheduler.pop_due(now_ms) {
            fired += 1;
            self.callbacks += 1;
            match task.key {
                PanelTask::Feed(idx) => {
                    if let Some(feed) = self.feeds.get_mut(idx) {
                        feed.tick(&mut self.rng);
                    }
                }
                PanelTask::Countdown => {
                    if self.countdown.tick(task.due) == CountdownTick::Expired {
                        if let Some(id) = self.countdown_task.take() {
                            self.scheduler.cancel(id);
                        }
                        log(
                            Level::Info,
                            Domain::Countdown,
                            "expired",
                            obj(&[("at_ms", json!(task.due))]),
                        );
                    }
                }
            }
        }
        fired
    }

    /// Cancel every task. Values freeze where they are.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.scheduler.cancel_all();
        self.countdown_task = None;
        self.mounted = false;
        log(
            Level::Info,
            Domain::Metrics,
            "panel_unmounted",
            obj(&[("callbacks", json!(self.callbacks)), ("at_ms", json!(self.scheduler.now()))]),
        );
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        let left = self.countdown.left();
        PanelSnapshot {
            now_ms: self.scheduler.now(),
            cards: self
                .feeds
                .iter()
                .map(|f| CardSnapshot { feed: f.name().to_string(), readings: f.readings() })
                .collect(),
            countdown: CountdownSnapshot {
                left,
                display: left.display(),
                expired: self.countdown.is_expired(),
            },
        }
    }

    pub fn feed_names(&self) -> Vec<String> {
        self.feeds.iter().map(|f| f.name().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jitter::fluctuate;
    use crate::random::{ScriptedRandom, SeededRandom};
    use super::feeds::{HeadlineFeed, TokenFeed, HEADLINE_PRICE};

    fn cfg() -> Config {
        Config::default()
    }

    #[test]
    fn nothing_moves_before_mount() {
        let mut panel = Panel::with_default_feeds(&cfg(), ScriptedRandom::constant(0.9));
        assert_eq!(panel.advance_to(60_000), 0);
        assert_eq!(panel.rng().taken(), 0);
    }

    #[test]
    fn feeds_tick_on_their_own_periods() {
        let mut panel = Panel::new(&cfg(), ScriptedRandom::constant(0.75));
        panel.add_feed(Box::new(TokenFeed::default()));
        panel.mount(0);
        panel.advance_to(4_999);
        assert_eq!(panel.rng().taken(), 0);
        panel.advance_to(15_000);
        // three token cycles, eight draws each
        assert_eq!(panel.rng().taken(), 24);
        let mut expected = 1.247;
        for _ in 0..3 {
            expected = fluctuate(expected, 2.0, 0.75);
        }
        assert_eq!(panel.snapshot().reading("token", "PRICE").unwrap().value, expected);
    }

    #[test]
    fn headline_after_many_cycles_is_one_step_from_baseline() {
        let mut panel = Panel::new(&cfg(), ScriptedRandom::constant(0.1));
        panel.add_feed(Box::new(HeadlineFeed::default()));
        panel.mount(0);
        panel.advance_to(5_000 * 20);
        let price = panel.snapshot().reading("headline", "PRICE").unwrap().value;
        assert_eq!(price, fluctuate(HEADLINE_PRICE, 2.0, 0.1));
    }

    #[test]
    fn countdown_runs_and_stops_itself() {
        let mut c = cfg();
        c.countdown_days = 1;
        let mut panel = Panel::new(&c, ScriptedRandom::constant(0.5));
        panel.mount(0);
        panel.advance_to(41);
        assert_eq!(panel.snapshot().countdown.display, "0:23:59:59.959");
        panel.advance_to(86_400_000 + 100);
        let snap = panel.snapshot();
        assert!(snap.countdown.expired);
        assert_eq!(snap.countdown.display, "0:00:00:00.000");
        let before = panel.callbacks();
        panel.advance_to(90_000_000);
        assert_eq!(panel.callbacks(), before);
    }

    #[test]
    fn unmount_stops_all_callbacks() {
        let mut panel = Panel::with_default_feeds(&cfg(), ScriptedRandom::constant(0.3));
        panel.mount(0);
        panel.advance_to(10_000);
        panel.unmount();
        let callbacks = panel.callbacks();
        let draws = panel.rng().taken();
        let snap = panel.snapshot();
        assert_eq!(panel.advance_to(1_000_000), 0);
        assert_eq!(panel.callbacks(), callbacks);
        assert_eq!(panel.rng().taken(), draws);
        assert_eq!(panel.snapshot().cards, snap.cards);
    }

    #[test]
    fn seeded_panels_agree() {
        let run = || {
            let mut panel = Panel::with_default_feeds(&cfg(), SeededRandom::from_seed(9));
            panel.mount(1_000);
            panel.advance_to(61_000);
            panel.snapshot().fingerprint()
        };
        assert_eq!(run(), run());
        assert_eq!(run().len(), 64);
    }
}
