//! Metric feeds. Each feed owns its values and mutates them on its own
//! period; the panel's scheduler decides when.

use serde::Serialize;

use crate::jitter::{clamped_fluctuation, drift, floor_range, fluctuate, parse_baseline, to_fixed};
use crate::random::RandomSource;

/// One displayed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub label: String,
    pub value: f64,
    pub display: String,
    /// Percent change badge.
    pub change: Option<f64>,
    /// Drawn with a progress bar.
    pub gauge: bool,
}

impl Reading {
    fn plain(label: &str, value: f64, display: String) -> Self {
        Self { label: label.to_string(), value, display, change: None, gauge: false }
    }

    fn with_change(label: &str, value: f64, display: String, change: f64) -> Self {
        Self { change: Some(change), ..Self::plain(label, value, display) }
    }

    fn gauge(label: &str, value: f64) -> Self {
        Self { gauge: true, ..Self::plain(label, value, format!("{:.1}%", value)) }
    }
}

pub trait Feed: Send {
    fn name(&self) -> &str;

    /// `None` for feeds that never animate.
    fn period_ms(&self) -> Option<u64>;

    /// Apply one update cycle.
    fn tick(&mut self, rng: &mut dyn RandomSource);

    fn readings(&self) -> Vec<Reading>;
}

fn holders(r: f64) -> f64 {
    (1247.0 + r * 10.0).floor()
}

// =============================================================================
// Headline: reseeded from fixed baselines every cycle
// =============================================================================

pub const HEADLINE_PRICE: f64 = 1.247;
pub const HEADLINE_MARKET_CAP: f64 = 12.4;
pub const HEADLINE_HOLDERS: f64 = 1247.0;
pub const HEADLINE_VOLUME: f64 = 847.2;

#[derive(Debug, Clone)]
pub struct HeadlineFeed {
    pub price: f64,
    pub market_cap: f64,
    pub holders: f64,
    pub volume: f64,
}

impl Default for HeadlineFeed {
    fn default() -> Self {
        Self {
            price: HEADLINE_PRICE,
            market_cap: HEADLINE_MARKET_CAP,
            holders: HEADLINE_HOLDERS,
            volume: HEADLINE_VOLUME,
        }
    }
}

impl Feed for HeadlineFeed {
    fn name(&self) -> &str {
        "headline"
    }

    fn period_ms(&self) -> Option<u64> {
        Some(5_000)
    }

    fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.price = fluctuate(HEADLINE_PRICE, 2.0, rng.next_f64());
        self.market_cap = fluctuate(HEADLINE_MARKET_CAP, 1.0, rng.next_f64());
        self.holders = holders(rng.next_f64());
        self.volume = fluctuate(HEADLINE_VOLUME, 3.0, rng.next_f64());
    }

    fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::plain("PRICE", self.price, format!("${:.3}", self.price)),
            Reading::plain("MARKET_CAP", self.market_cap, format!("${:.3}M", self.market_cap)),
            Reading::plain("HOLDERS", self.holders, format!("{}", self.holders)),
            Reading::plain("VOLUME", self.volume, format!("${:.3}K", self.volume)),
        ]
    }
}

// =============================================================================
// Token metrics: compounds on its own output, never clamped
// =============================================================================

#[derive(Debug, Clone)]
pub struct TokenFeed {
    pub price: f64,
    pub price_change: f64,
    pub market_cap: f64,
    pub market_cap_change: f64,
    pub holders: f64,
    pub holders_change: f64,
    pub volume: f64,
    pub volume_change: f64,
}

impl Default for TokenFeed {
    fn default() -> Self {
        Self {
            price: 1.247,
            price_change: 2.5,
            market_cap: 12.4,
            market_cap_change: 1.8,
            holders: 1247.0,
            holders_change: 3.2,
            volume: 847.2,
            volume_change: -0.7,
        }
    }
}

impl Feed for TokenFeed {
    fn name(&self) -> &str {
        "token"
    }

    fn period_ms(&self) -> Option<u64> {
        Some(5_000)
    }

    fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.price = fluctuate(self.price, 2.0, rng.next_f64());
        self.price_change = fluctuate(self.price_change, 10.0, rng.next_f64());
        self.market_cap = fluctuate(self.market_cap, 1.0, rng.next_f64());
        self.market_cap_change = fluctuate(self.market_cap_change, 5.0, rng.next_f64());
        self.holders = holders(rng.next_f64());
        self.holders_change = fluctuate(self.holders_change, 3.0, rng.next_f64());
        self.volume = fluctuate(self.volume, 3.0, rng.next_f64());
        self.volume_change = fluctuate(self.volume_change, 8.0, rng.next_f64());
    }

    fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::with_change("PRICE", self.price, format!("${:.3}", self.price), self.price_change),
            Reading::with_change(
                "MARKET_CAP",
                self.market_cap,
                format!("${:.1}M", self.market_cap),
                self.market_cap_change,
            ),
            Reading::with_change("HOLDERS", self.holders, format!("{}", self.holders), self.holders_change),
            Reading::with_change("VOLUME", self.volume, format!("${:.1}K", self.volume), self.volume_change),
        ]
    }
}

// =============================================================================
// Ticker card: reseeded around the number inside a display string
// =============================================================================

#[derive(Debug, Clone)]
pub struct TickerFeed {
    label: String,
    baseline_display: String,
    baseline: f64,
    current: String,
    trend: Option<f64>,
    animated: bool,
}

impl TickerFeed {
    pub fn new(label: &str, display: &str) -> Self {
        Self {
            label: label.to_string(),
            baseline_display: display.to_string(),
            baseline: parse_baseline(display).unwrap_or(0.0),
            current: display.to_string(),
            trend: None,
            animated: true,
        }
    }

    pub fn with_trend(mut self, trend: f64) -> Self {
        self.trend = Some(trend);
        self
    }

    pub fn frozen(mut self) -> Self {
        self.animated = false;
        self
    }

    pub fn current(&self) -> &str {
        &self.current
    }
}

impl Feed for TickerFeed {
    fn name(&self) -> &str {
        &self.label
    }

    fn period_ms(&self) -> Option<u64> {
        self.animated.then_some(2_000)
    }

    fn tick(&mut self, rng: &mut dyn RandomSource) {
        let next = drift(self.baseline, 0.1, 3, rng.next_f64());
        self.current = if self.baseline_display.starts_with('$') {
            format!("${:.3}", next)
        } else {
            format!("{:.3}", next)
        };
    }

    fn readings(&self) -> Vec<Reading> {
        let value = parse_baseline(&self.current).unwrap_or(self.baseline);
        vec![Reading {
            change: self.trend,
            ..Reading::plain(&self.label, value, self.current.clone())
        }]
    }
}

// =============================================================================
// System load: drawn fresh from a fixed band each cycle
// =============================================================================

#[derive(Debug, Clone)]
pub struct SystemFeed {
    pub cpu: f64,
    pub memory: f64,
}

impl Default for SystemFeed {
    fn default() -> Self {
        Self { cpu: 39.2, memory: 64.9 }
    }
}

impl Feed for SystemFeed {
    fn name(&self) -> &str {
        "system"
    }

    fn period_ms(&self) -> Option<u64> {
        Some(2_000)
    }

    fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.cpu = 35.0 + rng.next_f64() * 10.0;
        self.memory = 60.0 + rng.next_f64() * 10.0;
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::gauge("CPU_LOAD", self.cpu), Reading::gauge("MEMORY", self.memory)]
    }
}

// =============================================================================
// Stat bar: compounding random walk at one decimal, unclamped
// =============================================================================

#[derive(Debug, Clone)]
pub struct StatBarFeed {
    label: String,
    pub value: f64,
}

impl StatBarFeed {
    pub fn new(label: &str, value: f64) -> Self {
        Self { label: label.to_string(), value }
    }
}

impl Feed for StatBarFeed {
    fn name(&self) -> &str {
        &self.label
    }

    fn period_ms(&self) -> Option<u64> {
        Some(2_000)
    }

    fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.value = drift(self.value, 0.4, 1, rng.next_f64());
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::gauge(&self.label, self.value)]
    }
}

// =============================================================================
// Gauges: compounding, clamped to [0, 100]
// =============================================================================

#[derive(Debug, Clone)]
pub struct GaugeFeed {
    name: String,
    period_ms: u64,
    range: f64,
    pub gauges: Vec<(String, f64)>,
}

impl GaugeFeed {
    pub fn new(name: &str, period_ms: u64, range: f64, gauges: &[(&str, f64)]) -> Self {
        Self {
            name: name.to_string(),
            period_ms,
            range,
            gauges: gauges.iter().map(|(l, v)| (l.to_string(), v.clamp(0.0, 100.0))).collect(),
        }
    }

    pub fn neural() -> Self {
        Self::new(
            "neural",
            3_000,
            3.0,
            &[("NEURAL_HARMONY", 93.3), ("BEATS_ANALYZED", 67.7), ("AI_FLOW", 96.9)],
        )
    }

    pub fn load() -> Self {
        Self::new("load", 2_000, 2.0, &[("SYSTEM_LOAD", 72.4)])
    }
}

impl Feed for GaugeFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn period_ms(&self) -> Option<u64> {
        Some(self.period_ms)
    }

    fn tick(&mut self, rng: &mut dyn RandomSource) {
        for (_, value) in self.gauges.iter_mut() {
            *value = clamped_fluctuation(*value, self.range, rng.next_f64());
        }
    }

    fn readings(&self) -> Vec<Reading> {
        self.gauges.iter().map(|(l, v)| Reading::gauge(l, to_fixed(*v, 1))).collect()
    }
}

// =============================================================================
// Heat: integer draws from narrow bands
// =============================================================================

#[derive(Debug, Clone)]
pub struct HeatFeed {
    pub bpm: f64,
    pub peak: f64,
}

impl Default for HeatFeed {
    fn default() -> Self {
        Self { bpm: 138.0, peak: 95.0 }
    }
}

impl Feed for HeatFeed {
    fn name(&self) -> &str {
        "heat"
    }

    fn period_ms(&self) -> Option<u64> {
        Some(1_000)
    }

    fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.bpm = floor_range(135.0, 140.0, rng.next_f64());
        self.peak = floor_range(93.0, 98.0, rng.next_f64());
    }

    fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::plain("BPM", self.bpm, format!("{}", self.bpm)),
            Reading::plain("PEAK", self.peak, format!("{}%", self.peak)),
        ]
    }
}

/// The sidebar's standard set, in display order.
pub fn default_feeds() -> Vec<Box<dyn Feed>> {
    vec![
        Box::new(HeadlineFeed::default()),
        Box::new(TokenFeed::default()),
        Box::new(TickerFeed::new("TOKEN_PRICE", "$1.247").with_trend(2.5)),
        Box::new(SystemFeed::default()),
        Box::new(StatBarFeed::new("NETWORK_SYNC", 87.4)),
        Box::new(GaugeFeed::load()),
        Box::new(GaugeFeed::neural()),
        Box::new(HeatFeed::default()),
    ]
}
