//! Candle keep-alive scheduler
//!
//! Downstream candle builders need to close empty bars. On a fixed
//! schedule, every tracked symbol gets a candle update carrying the "-1"
//! price sentinel meaning "no trade this period".

use chrono::Utc;
use hermes_gateway::messages::CandleUpdate;
use hermes_gateway::transport::{Publisher, Subjects, channel::ChannelPublisher};
use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

/// Keep-alive schedule
#[derive(Debug, Clone)]
pub struct CandleConfig {
    /// Symbols to emit keep-alives for
    pub symbols: Vec<String>,
    /// How often to emit (one bar width)
    pub interval: Duration,
}

impl Default for CandleConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            interval: Duration::from_secs(60),
        }
    }
}

/// Start the keep-alive task
pub fn spawn_keep_alive(
    publisher: ChannelPublisher<CandleUpdate>,
    config: CandleConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "candle keep-alive started for {} symbol(s) every {:?}",
            config.symbols.len(),
            config.interval
        );
        let mut ticker = interval(config.interval);
        // The immediate first tick seeds a bar for every symbol at startup
        loop {
            ticker.tick().await;
            let now = Utc::now();
            for symbol in &config.symbols {
                let update = CandleUpdate::keep_alive(symbol.clone(), now);
                if let Err(e) = publisher.publish(&update).await {
                    debug!("no consumer on {}: {}", Subjects::KLINE_UPDATES, e);
                }
            }
        }
    })
}
