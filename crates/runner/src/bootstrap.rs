//! System wiring
//!
//! Builds the full matching core: book store, sequence source, matching
//! engine, per-symbol router, outbound channels, candle keep-alive, and
//! the persistence pipeline over an in-memory store.

use std::sync::Arc;

use hermes_engine::{
    CandleConfig, MatchingEngine, Notifier, OrderBookStore, OrderRouter, OutboundChannels,
    SnowflakeSequence, spawn_keep_alive,
};
use hermes_persistence::{BatchConfig, MemoryTradeStore, PersistencePipeline, PipelineStats};
use tokio::time::Duration;

pub struct SystemConfig {
    /// Symbols tracked by the candle keep-alive
    pub symbols: Vec<String>,
    /// Capacity of outbound broadcast channels and symbol workers
    pub channel_capacity: usize,
    pub batch: BatchConfig,
    pub candle_interval: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()],
            channel_capacity: 1024,
            batch: BatchConfig::default(),
            candle_interval: Duration::from_secs(60),
        }
    }
}

pub struct System {
    pub router: Arc<OrderRouter>,
    pub store: Arc<MemoryTradeStore>,
    pub stats: Arc<PipelineStats>,
    /// Subscriber ends of the outbound streams; hand these to consumers
    pub channels: OutboundChannels,
}

/// Start every component and return the running system
pub fn start(config: SystemConfig) -> System {
    let book = Arc::new(OrderBookStore::new());
    let (notifier, channels, matched_rx) = Notifier::channel(config.channel_capacity);
    let candle_publisher = notifier.candle_publisher();

    let engine = Arc::new(MatchingEngine::new(
        book,
        Arc::new(SnowflakeSequence::new(1)),
        notifier,
    ));
    let router = Arc::new(OrderRouter::new(engine, config.channel_capacity));

    let store = Arc::new(MemoryTradeStore::new());
    let (pipeline, stats) = PersistencePipeline::new(store.clone(), config.batch, matched_rx);
    tokio::spawn(pipeline.run());

    spawn_keep_alive(
        candle_publisher,
        CandleConfig {
            symbols: config.symbols,
            interval: config.candle_interval,
        },
    );

    System {
        router,
        store,
        stats,
        channels,
    }
}
