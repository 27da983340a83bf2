use std::time::Duration;

use gardenstream_core::types::StreamRecord;
use gardenstream_core::window::WindowedAggregator;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    // (user, value) at ts_ms, with a two second grace period.
    let mut agg = WindowedAggregator::with_grace_period(Duration::from_secs(2));
    agg.configure(
        Duration::from_secs(10),
        |r: &StreamRecord<(String, i32)>| r.value.0.clone(),
        || 0i32,
        |sum: &i32, r: &StreamRecord<(String, i32)>| sum + r.value.1,
    )?;

    let events = [
        ("u1", 1, 1_000),
        ("u1", 2, 9_000),
        // Next window, but within grace: [0, 10s) stays open.
        ("u1", 10, 11_000),
        // Out of order, still accepted.
        ("u1", 3, 8_000),
        // Reaches 10s + 2s grace and closes [0, 10s).
        ("u2", 5, 12_000),
    ];

    let mut out = Vec::new();
    for (user, value, ts) in events {
        out.extend(agg.process(&StreamRecord::new((user.to_string(), value), ts))?);
    }
    out.extend(agg.flush()?);

    for emission in out {
        println!("{} key={} sum={}", emission.window, emission.key, emission.accumulator);
    }

    Ok(())
}
