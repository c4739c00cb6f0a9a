//! Table of open streams, keyed by the handles given to hosts.
//!
//! Streams stay here until a host closes them or a slot consumes them.
//! Dropping the registry drops (and closes) whatever is left.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use crate::errors::{Result, SlotIoError};
use crate::node::StreamId;
use crate::services::Stream;

#[derive(Debug, Default)]
pub struct StreamRegistry {
    next_id: AtomicU64,
    streams: Mutex<HashMap<StreamId, Stream>>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `stream` and hand back a fresh handle.
    pub fn insert(&self, stream: Stream) -> StreamId {
        let id = StreamId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.lock().insert(id, stream);
        debug!(stream = %id, "registered stream");
        id
    }

    /// Remove the stream for ownership transfer or disposal.
    pub fn take(&self, id: StreamId) -> Result<Stream> {
        self.lock().remove(&id).ok_or(SlotIoError::UnknownStream(id))
    }

    /// Put a stream taken with `take` back under its old handle.
    pub fn restore(&self, id: StreamId, stream: Stream) {
        self.lock().insert(id, stream);
    }

    /// Run `f` against a stream that stays registered afterwards.
    pub fn with_stream<T>(&self, id: StreamId, f: impl FnOnce(&mut Stream) -> Result<T>) -> Result<T> {
        let mut streams = self.lock();
        let stream = streams.get_mut(&id).ok_or(SlotIoError::UnknownStream(id))?;
        f(stream)
    }

    pub fn contains(&self, id: StreamId) -> bool {
        self.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StreamId, Stream>> {
        self.streams.lock().unwrap_or_else(|poisoned| {
            warn!("stream registry lock was poisoned; recovering");
            poisoned.into_inner()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::io::Read;

    #[test]
    fn handles_are_unique_and_take_removes() {
        let reg = StreamRegistry::new();
        let a = reg.insert(Stream::memory(b"a".to_vec()));
        let b = reg.insert(Stream::memory(b"b".to_vec()));
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);

        let mut s = reg.take(a).unwrap();
        let mut out = String::new();
        s.read_to_string(&mut out).unwrap();
        assert_eq!(out, "a");
        assert!(!reg.contains(a));
        assert_eq!(reg.take(a).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn with_stream_keeps_it_registered() {
        let reg = StreamRegistry::new();
        let id = reg.insert(Stream::memory(b"xyz".to_vec()));
        let bytes = reg
            .with_stream(id, |s| Ok(s.read_remaining().unwrap()))
            .unwrap();
        assert_eq!(bytes, b"xyz");
        assert!(reg.contains(id));
    }
}
