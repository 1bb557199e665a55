//! Startup readiness accounting.
//!
//! # Responsibilities
//! - Count listeners that were requested but have not yet confirmed
//! - Fire the ready signal exactly once when the armed count reaches zero
//!
//! # Design Decisions
//! - Each registered listener gets a single-use [`ListenerAck`]; consuming
//!   it is the only way to decrement, so the counter cannot go negative
//! - The latch stays disarmed while start calls are still being issued;
//!   acknowledgments arriving early are counted but cannot fire readiness

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

struct LatchInner {
    remaining: AtomicUsize,
    armed: AtomicBool,
    signal: Mutex<Option<oneshot::Sender<()>>>,
}

impl LatchInner {
    fn try_fire(&self) {
        if !self.armed.load(Ordering::SeqCst) {
            return;
        }
        if self.remaining.load(Ordering::SeqCst) != 0 {
            return;
        }
        if let Some(signal) = self.signal.lock().unwrap().take() {
            let _ = signal.send(());
        }
    }
}

/// Countdown latch over in-flight listener starts.
pub struct ReadyLatch {
    inner: Arc<LatchInner>,
}

impl ReadyLatch {
    /// Create a latch and the one-shot receiver its ready signal fires.
    pub fn new() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let latch = Self {
            inner: Arc::new(LatchInner {
                remaining: AtomicUsize::new(0),
                armed: AtomicBool::new(false),
                signal: Mutex::new(Some(tx)),
            }),
        };
        (latch, rx)
    }

    /// Count one more listener and hand back its acknowledgment token.
    /// Called before the listener's start call is issued.
    pub fn register(&self) -> ListenerAck {
        self.inner.remaining.fetch_add(1, Ordering::SeqCst);
        ListenerAck {
            inner: self.inner.clone(),
        }
    }

    /// Arm the latch once every start call has been issued. If everything
    /// already acknowledged, readiness fires here.
    pub fn arm(&self) {
        self.inner.armed.store(true, Ordering::SeqCst);
        self.inner.try_fire();
    }

    /// Listeners still awaited.
    pub fn remaining(&self) -> usize {
        self.inner.remaining.load(Ordering::SeqCst)
    }
}

/// Single-use acknowledgment token for one listener.
pub struct ListenerAck {
    inner: Arc<LatchInner>,
}

impl ListenerAck {
    /// Report the listener as listening. Consumes the token, so a listener
    /// can only ever be counted down once.
    pub fn listening(self) {
        let previous = self.inner.remaining.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "more acknowledgments than registrations");
        self.inner.try_fire();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fired(rx: &mut oneshot::Receiver<()>) -> bool {
        rx.try_recv().is_ok()
    }

    #[test]
    fn test_ready_fires_only_after_all_acks() {
        let (latch, mut rx) = ReadyLatch::new();
        let first = latch.register();
        let second = latch.register();
        latch.arm();

        first.listening();
        assert!(!fired(&mut rx));
        assert_eq!(latch.remaining(), 1);

        second.listening();
        assert!(fired(&mut rx));
        assert_eq!(latch.remaining(), 0);
    }

    #[test]
    fn test_acks_before_arming_do_not_fire() {
        let (latch, mut rx) = ReadyLatch::new();
        let only = latch.register();
        only.listening();
        assert!(!fired(&mut rx));

        latch.arm();
        assert!(fired(&mut rx));
    }

    #[test]
    fn test_acks_may_arrive_in_any_order() {
        let (latch, mut rx) = ReadyLatch::new();
        let acks: Vec<_> = (0..4).map(|_| latch.register()).collect();
        latch.arm();

        let mut acks = acks;
        acks.reverse();
        for (index, ack) in acks.into_iter().enumerate() {
            assert_eq!(fired(&mut rx), false, "fired after {} of 4", index);
            ack.listening();
        }
        assert!(fired(&mut rx));
    }

    #[test]
    fn test_zero_listeners_fire_on_arm() {
        let (latch, mut rx) = ReadyLatch::new();
        latch.arm();
        assert!(fired(&mut rx));
    }
}
