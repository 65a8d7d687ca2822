use common::transport::{TransmitStatus, Transport};

use std::{
  collections::VecDeque,
  io,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing_subscriber::fmt::MakeWriter;

pub const DEFAULT_RING_SIZE: usize = 4096;
pub const DEFAULT_DROP_CHUNK: usize = 256;

/// Bounded outbound byte queue.
///
/// Writing never fails: when the ring is full the oldest `drop_chunk` bytes
/// are discarded to make room.
#[derive(Debug, Clone)]
pub struct LogRing {
  buffer: VecDeque<u8>,
  capacity: usize,
  drop_chunk: usize,
  dropped: usize,
}

impl Default for LogRing {
  fn default() -> Self {
    Self::new(DEFAULT_RING_SIZE, DEFAULT_DROP_CHUNK)
  }
}

impl LogRing {
  pub fn new(capacity: usize, drop_chunk: usize) -> Self {
    let capacity = capacity.max(1);
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
      drop_chunk: drop_chunk.clamp(1, capacity),
      dropped: 0,
    }
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }
  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }
  pub fn capacity(&self) -> usize {
    self.capacity
  }
  /// Bytes discarded so far to make room.
  pub fn dropped(&self) -> usize {
    self.dropped
  }

  pub fn push(&mut self, bytes: &[u8]) {
    for &byte in bytes {
      if self.buffer.len() >= self.capacity {
        let n = self.drop_chunk.min(self.buffer.len());
        self.buffer.drain(..n);
        self.dropped += n;
      }
      self.buffer.push_back(byte);
    }
  }

  pub fn push_str(&mut self, text: &str) {
    self.push(text.as_bytes());
  }

  /// Queues `line` followed by a newline.
  pub fn push_line(&mut self, line: &str) {
    self.push_str(line);
    self.push(b"\n");
  }

  /// Hands one contiguous chunk of at most `max_chunk` bytes to `link`.
  /// Returns the number of bytes consumed, zero if empty or the link is busy.
  pub fn drain(&mut self, link: &mut impl Transport, max_chunk: usize) -> usize {
    let (front, back) = self.buffer.as_slices();
    let contiguous = if front.is_empty() { back } else { front };
    let chunk = &contiguous[..contiguous.len().min(max_chunk)];
    if chunk.is_empty() {
      return 0;
    }
    let n = chunk.len();
    if link.transmit(chunk) == TransmitStatus::Busy {
      return 0;
    }
    self.buffer.drain(..n);
    n
  }

  /// Drains until the ring is empty or `link` is busy.
  pub fn drain_all(&mut self, link: &mut impl Transport, max_chunk: usize) -> usize {
    let mut total = 0;
    loop {
      match self.drain(link, max_chunk) {
        0 => return total,
        n => total += n,
      }
    }
  }

  /// Copy of the queued bytes, oldest first.
  pub fn to_bytes(&self) -> Vec<u8> {
    self.buffer.iter().copied().collect()
  }
  pub fn to_string_lossy(&self) -> String {
    String::from_utf8_lossy(&self.to_bytes()).into_owned()
  }
}

impl io::Write for LogRing {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.push(buf);
    Ok(buf.len())
  }
  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

/// A [`LogRing`] shared between the sculpture and the `tracing` subscriber.
#[derive(Debug, Clone, Default)]
pub struct SharedLogRing(Arc<Mutex<LogRing>>);

impl SharedLogRing {
  pub fn new(ring: LogRing) -> Self {
    Self(Arc::new(Mutex::new(ring)))
  }

  /// Must not be held while emitting `tracing` events routed into this ring.
  pub fn lock(&self) -> MutexGuard<'_, LogRing> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

pub struct RingWriter<'a>(MutexGuard<'a, LogRing>);

impl io::Write for RingWriter<'_> {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.push(buf);
    Ok(buf.len())
  }
  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl<'a> MakeWriter<'a> for SharedLogRing {
  type Writer = RingWriter<'a>;
  fn make_writer(&'a self) -> Self::Writer {
    RingWriter(self.lock())
  }
}
