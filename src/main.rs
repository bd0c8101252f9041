use anyhow::Result;
use serde_json::json;
use tokio::time::{interval, Duration};

use splashfeed::clock::{Clock, SystemClock};
use splashfeed::config::Config;
use splashfeed::logging::{log, log_frame, obj, v_str, Domain, Level};
use splashfeed::overlay::media::NullMedia;
use splashfeed::page::{Page, Stage};
use splashfeed::random::SeededRandom;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::load()?;
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("seed", json!(cfg.seed)),
            ("reveal_delay_ms", json!(cfg.reveal_delay_ms)),
            ("frame_ms", json!(cfg.frame_ms)),
            ("run_secs", json!(cfg.run_secs)),
        ]),
    );

    let clock = SystemClock;
    let start = clock.now_ms();
    let elapsed = || clock.now_ms().saturating_sub(start);

    let mut page = Page::new(&cfg, NullMedia::default(), SeededRandom::from_config(cfg.seed));
    page.mount(0).await;
    // no pointer in a terminal; treat startup as the first movement
    page.pointer_moved().await;

    let mut ticker = interval(Duration::from_millis(cfg.frame_ms.max(1)));
    loop {
        ticker.tick().await;
        let now = elapsed();
        page.advance_to(now);

        if cfg.auto_enter && page.can_enter() {
            page.enter(now);
        }

        print!("\x1b[2J\x1b[H{}", page.render());
        if page.stage() == Stage::Live {
            log_frame(now, page.panel().callbacks(), &page.panel().snapshot().fingerprint());
        }

        if let Some(since) = page.live_since_ms() {
            if cfg.run_secs > 0 && now >= since.saturating_add(cfg.run_secs.saturating_mul(1_000)) {
                break;
            }
        }
    }

    page.unmount();
    log(Level::Info, Domain::System, "shutdown", obj(&[("msg", v_str("run complete"))]));
    Ok(())
}
