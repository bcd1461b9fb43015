use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task;
use tokio::time::{sleep, Duration};

use inmo_agenda::Snapshot;

pub struct Config {
    pub enabled: bool,
    pub ttl: Duration,
}

/// Single-slot TTL cache for the backend snapshot.
///
/// Every insert bumps a generation counter so that the eviction task of an
/// older snapshot cannot clear a newer one.
pub struct SnapshotCache {
    enabled: bool,
    ttl: Duration,
    slot: RwLock<(u64, Option<Arc<Snapshot>>)>,
}

impl SnapshotCache {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            enabled: config.enabled,
            ttl: config.ttl,
            slot: RwLock::new((0, None)),
        })
    }

    pub async fn insert(self: &Arc<Self>, snapshot: Snapshot) -> Arc<Snapshot> {
        let arcd = Arc::new(snapshot);
        if !self.enabled {
            return arcd;
        }

        let generation = {
            let mut slot = self.slot.write().await;
            slot.0 += 1;
            slot.1 = Some(Arc::clone(&arcd));
            slot.0
        };

        let cache = Arc::clone(self);
        task::spawn(async move {
            sleep(cache.ttl).await;
            let mut slot = cache.slot.write().await;
            if slot.0 == generation {
                slot.1 = None;
            }
        });

        arcd
    }

    pub async fn get(&self) -> Option<Arc<Snapshot>> {
        if !self.enabled {
            return None;
        }

        self.slot.read().await.1.clone()
    }
}
