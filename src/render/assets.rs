//! Decoded image cache keyed by map or (avatar, facing, frame)

use std::collections::HashMap;

use tracing::debug;

use crate::ws::protocol::Direction;

/// A decoded image and its intrinsic size
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResource {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Map,
    Frame {
        avatar: String,
        facing: Direction,
        frame: usize,
    },
}

/// A load the host should start; the result comes back via `AssetCache::insert_loaded`
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    pub key: AssetKey,
    pub url: String,
}

#[derive(Debug)]
enum Slot {
    Pending { url: String },
    Ready(ImageResource),
}

impl Slot {
    fn url(&self) -> &str {
        match self {
            Slot::Pending { url } => url,
            Slot::Ready(image) => &image.url,
        }
    }
}

/// Each key is requested once per URL. A key whose URL changes (an avatar
/// template replaced with new frames) is requested again.
#[derive(Debug, Default)]
pub struct AssetCache {
    slots: HashMap<AssetKey, Slot>,
    requests: Vec<AssetRequest>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ready image for `key`, or `None` while it is loading.
    /// Unknown keys are queued for loading on first sight.
    pub fn resolve(&mut self, key: &AssetKey, url: &str) -> Option<&ImageResource> {
        let known = self.slots.get(key).is_some_and(|slot| slot.url() == url);
        if !known {
            self.slots.insert(
                key.clone(),
                Slot::Pending {
                    url: url.to_string(),
                },
            );
            self.requests.push(AssetRequest {
                key: key.clone(),
                url: url.to_string(),
            });
            return None;
        }

        match self.slots.get(key) {
            Some(Slot::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// Store a finished load. Completions for a URL the key no longer
    /// points at are dropped. Returns whether the image was stored.
    pub fn insert_loaded(&mut self, key: AssetKey, image: ImageResource) -> bool {
        let awaited = matches!(
            self.slots.get(&key),
            Some(Slot::Pending { url }) if *url == image.url
        );
        if !awaited {
            debug!(?key, url = %image.url, "Dropping stale asset load");
            return false;
        }
        self.slots.insert(key, Slot::Ready(image));
        true
    }

    /// Loads queued since the last call
    pub fn take_requests(&mut self) -> Vec<AssetRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn ready_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }
}
