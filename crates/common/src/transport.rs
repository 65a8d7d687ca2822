//! Non-blocking byte channels.
//!
//! A transport is one independent output (a DMA-driven strip output, a serial
//! link to the host). `transmit` either hands the bytes off or reports that the
//! channel is still occupied with an earlier transfer; it never waits.

use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitStatus {
  Issued,
  Busy,
}

pub trait Transport {
  /// Whether the previous transfer has finished.
  fn is_ready(&self) -> bool;
  fn transmit(&mut self, bytes: &[u8]) -> TransmitStatus;
}

impl<T: Transport + ?Sized> Transport for &mut T {
  fn is_ready(&self) -> bool {
    (**self).is_ready()
  }
  fn transmit(&mut self, bytes: &[u8]) -> TransmitStatus {
    (**self).transmit(bytes)
  }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
  fn is_ready(&self) -> bool {
    (**self).is_ready()
  }
  fn transmit(&mut self, bytes: &[u8]) -> TransmitStatus {
    (**self).transmit(bytes)
  }
}

/// Keeps every issued transfer in memory.
///
/// Can simulate a slow channel: it reports not-ready for a number of polls,
/// and it can be forced to reject transfers.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
  frames: Vec<Vec<u8>>,
  pending_polls: Cell<usize>,
  not_ready_polls: Cell<usize>,
  rejecting: bool,
}

impl MemoryTransport {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reports not-ready for the next `polls` calls to [`Transport::is_ready`].
  pub fn with_pending_polls(self, polls: usize) -> Self {
    self.pending_polls.set(polls);
    self
  }

  pub fn set_rejecting(&mut self, rejecting: bool) {
    self.rejecting = rejecting;
  }

  pub fn frames(&self) -> &[Vec<u8>] {
    &self.frames
  }
  pub fn last_frame(&self) -> Option<&[u8]> {
    self.frames.last().map(Vec::as_slice)
  }
  pub fn take_frames(&mut self) -> Vec<Vec<u8>> {
    std::mem::take(&mut self.frames)
  }
  /// Everything ever issued, concatenated.
  pub fn bytes(&self) -> Vec<u8> {
    self.frames.concat()
  }
  /// How many times `is_ready` answered no.
  pub fn not_ready_polls(&self) -> usize {
    self.not_ready_polls.get()
  }
}

impl Transport for MemoryTransport {
  fn is_ready(&self) -> bool {
    let pending = self.pending_polls.get();
    if pending > 0 {
      self.pending_polls.set(pending - 1);
      self.not_ready_polls.set(self.not_ready_polls.get() + 1);
      false
    } else {
      true
    }
  }

  fn transmit(&mut self, bytes: &[u8]) -> TransmitStatus {
    if self.rejecting || self.pending_polls.get() > 0 {
      return TransmitStatus::Busy;
    }
    self.frames.push(bytes.to_vec());
    TransmitStatus::Issued
  }
}
