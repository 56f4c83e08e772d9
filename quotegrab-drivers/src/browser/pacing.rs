use rand::rngs::OsRng;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Produces settle pauses between navigation steps so the scraper does not
/// hammer the target server in lockstep.
#[derive(Debug, Clone, Default)]
pub struct Pacer {}

impl Pacer {
    pub fn new() -> Self {
        Self {}
    }

    /// Sleep for `base_ms` plus up to 25% jitter.
    pub async fn settle(&self, base_ms: u64) {
        let mut rng = OsRng;
        let ms = rng.gen_range(base_ms..=base_ms + base_ms / 4 + 1);
        sleep(Duration::from_millis(ms)).await;
    }
}
