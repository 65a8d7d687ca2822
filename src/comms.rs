//! Host communication buffers.
//!
//! Inbound commands arrive through a last-write-wins [`Mailbox`]; outbound
//! text is queued in a [`LogRing`] that drops its oldest bytes when full.
//! Neither ever blocks the producer.

mod mailbox;
mod ring;

pub use mailbox::{Mailbox, MAILBOX_CAPACITY};
pub use ring::{LogRing, RingWriter, SharedLogRing, DEFAULT_DROP_CHUNK, DEFAULT_RING_SIZE};
