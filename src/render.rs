//! Plain-text frames for the terminal driver.

use std::fmt::Write;

use crate::overlay::audio::AudioState;
use crate::overlay::OverlayView;
use crate::panel::feeds::Reading;
use crate::panel::PanelSnapshot;

pub const BAR_WIDTH: usize = 20;

/// Percent bar; the value is clamped for drawing only.
pub fn bar(value: f64, width: usize) -> String {
    let filled = ((value.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// `+2.5%` / `-0.7%`
pub fn change_badge(change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, change)
}

fn reading_line(r: &Reading) -> String {
    let mut line = format!("  {:<16} {:>12}", r.label, r.display);
    if let Some(change) = r.change {
        let _ = write!(line, "  ({})", change_badge(change));
    }
    if r.gauge {
        let _ = write!(line, "  {}", bar(r.value, BAR_WIDTH));
    }
    line
}

pub fn render_panel(snap: &PanelSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== LIVE ==  T-{}", snap.countdown.display);
    if snap.countdown.expired {
        let _ = writeln!(out, "  (launched)");
    }
    for card in &snap.cards {
        let _ = writeln!(out, "-- {} --", card.feed.to_uppercase());
        for r in &card.readings {
            let _ = writeln!(out, "{}", reading_line(r));
        }
    }
    out
}

pub fn render_overlay(view: &OverlayView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "~~ {} ~~", view.assets.video);
    let _ = writeln!(out, "   {}  {}", view.assets.logo, view.assets.avatar);
    let _ = writeln!(out, "   link: {}", view.assets.link);
    let audio = match (view.audio, view.is_playing) {
        (_, true) => "playing",
        (AudioState::Unlocking, _) => "starting",
        (AudioState::Unlocked, false) => "muted",
        _ => "silent",
    };
    let _ = writeln!(out, "   audio: {} ({})", audio, view.assets.audio);
    if view.show_enter {
        let _ = writeln!(out, "   [ ENTER ]");
    } else {
        let _ = writeln!(out, "   loading...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Assets;
    use crate::panel::{CardSnapshot, CountdownSnapshot};
    use crate::panel::countdown::TimeLeft;

    #[test]
    fn bars_clamp_for_drawing() {
        assert_eq!(bar(50.0, 4), "[##..]");
        assert_eq!(bar(140.0, 4), "[####]");
        assert_eq!(bar(-3.0, 4), "[....]");
    }

    #[test]
    fn badges_sign_non_negative() {
        assert_eq!(change_badge(2.5), "+2.5%");
        assert_eq!(change_badge(0.0), "+0.0%");
        assert_eq!(change_badge(-0.7), "-0.7%");
    }

    #[test]
    fn panel_frame_lists_cards() {
        let snap = PanelSnapshot {
            now_ms: 0,
            cards: vec![CardSnapshot {
                feed: "system".to_string(),
                readings: vec![Reading {
                    label: "CPU_LOAD".to_string(),
                    value: 39.2,
                    display: "39.2%".to_string(),
                    change: None,
                    gauge: true,
                }],
            }],
            countdown: CountdownSnapshot {
                left: TimeLeft { days: 10, ..TimeLeft::default() },
                display: "10:00:00:00.000".to_string(),
                expired: false,
            },
        };
        let frame = render_panel(&snap);
        assert!(frame.contains("T-10:00:00:00.000"));
        assert!(frame.contains("-- SYSTEM --"));
        assert!(frame.contains("39.2%"));
        assert!(frame.contains("[########"));
    }

    #[test]
    fn overlay_frame_shows_enter_only_when_revealed() {
        let mut view = OverlayView {
            show_enter: false,
            is_playing: false,
            audio: AudioState::Failed,
            assets: Assets::default(),
        };
        assert!(render_overlay(&view).contains("loading..."));
        view.show_enter = true;
        view.is_playing = true;
        let frame = render_overlay(&view);
        assert!(frame.contains("[ ENTER ]"));
        assert!(frame.contains("audio: playing"));
    }
}
