//! One repository per persisted collection.
//!
//! The four collections share one contract — load never fails on missing
//! data, writes replace the whole document — so a single generic
//! repository covers them. No cross-collection logic lives here; that is
//! the session store's job.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::codec;
use crate::error::Result;
use crate::kv::BlobStore;

pub struct DocRepo<T> {
    key: &'static str,
    store: Arc<BlobStore>,
    tx: watch::Sender<T>,
}

impl<T> DocRepo<T>
where
    T: Clone + Default + Serialize + DeserializeOwned,
{
    pub fn open(store: Arc<BlobStore>, key: &'static str) -> Result<Self> {
        let initial: T = codec::decode_or_default(key, store.get(key)?.as_deref());
        let (tx, _rx) = watch::channel(initial);
        Ok(DocRepo { key, store, tx })
    }

    /// Fresh read from the blob store. Missing or corrupt documents decode
    /// as the empty collection.
    pub fn load(&self) -> Result<T> {
        let blob = self.store.get(self.key)?;
        Ok(codec::decode_or_default(self.key, blob.as_deref()))
    }

    /// Last published value, no I/O. Inputs for derived views.
    pub fn current(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Current-value stream; receivers see every post-write value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Atomic read-modify-write of this collection. The closure mutates the
    /// freshly-decoded current value; on success the full document is
    /// written back in the same transaction and the new value published to
    /// watch subscribers. A closure error writes and publishes nothing.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let (value, out) = self.store.update(self.key, |blob| {
            let mut value: T = codec::decode_or_default(self.key, blob.as_deref());
            let out = f(&mut value)?;
            Ok((codec::encode(&value)?, (value, out)))
        })?;
        self.tx.send_replace(value);
        Ok(out)
    }

    /// Reset the published value without touching storage. Used after a
    /// session-wide clear, which drops every key in one transaction.
    pub(crate) fn publish(&self, value: T) {
        self.tx.send_replace(value);
    }
}
