use super::Connection;
use eyre::WrapErr;

pub fn execute(connection: &Connection, hrefs: &[String], repeat: usize) -> eyre::Result<()> {
    let store = connection.data_store()?;

    for href in hrefs {
        for _ in 0..repeat {
            store
                .fetch(href, &[])
                .wrap_err_with(|| format!("failed to fetch {href}"))?;
        }
    }

    let stats = store.cache_stats();
    if stats.is_empty() {
        tracing::info!("No cache regions in use");
        return Ok(());
    }

    println!(
        "{:<24} {:>8} {:>8} {:>8} {:>12} {:>8} {:>9}",
        "REGION", "PUTS", "HITS", "MISSES", "EXPIRATIONS", "SIZE", "HIT RATE"
    );
    for (region, stats) in &stats {
        let [puts, hits, misses, expirations, size] = stats.summary();
        println!(
            "{region:<24} {puts:>8} {hits:>8} {misses:>8} {expirations:>12} {size:>8} {:>8.1}%",
            stats.hit_rate()
        );
    }

    Ok(())
}
