use tracing::debug;

pub const MAILBOX_CAPACITY: usize = 256;

/// Single-slot inbound message buffer.
///
/// Holds at most `MAILBOX_CAPACITY - 1` bytes. A message deposited before the
/// previous one was taken replaces it.
#[derive(Debug, Clone)]
pub struct Mailbox {
  buffer: [u8; MAILBOX_CAPACITY],
  len: usize,
  ready: bool,
}

impl Default for Mailbox {
  fn default() -> Self {
    Self {
      buffer: [0; MAILBOX_CAPACITY],
      len: 0,
      ready: false,
    }
  }
}

impl Mailbox {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn deposit(&mut self, bytes: &[u8]) {
    if self.ready {
      debug!("unread command overwritten");
    }
    let len = bytes.len().min(MAILBOX_CAPACITY - 1);
    self.buffer[..len].copy_from_slice(&bytes[..len]);
    self.len = len;
    self.ready = true;
  }

  pub fn is_ready(&self) -> bool {
    self.ready
  }

  /// Removes the pending message, if any.
  pub fn take(&mut self) -> Option<String> {
    if !self.ready {
      return None;
    }
    self.ready = false;
    Some(String::from_utf8_lossy(&self.buffer[..self.len]).into_owned())
  }
}
