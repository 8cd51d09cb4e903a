//! Bounded event queues for discovery and summary notifications.
//!
//! Built on `critical-section` and `heapless::Deque`, so producers may run
//! on interrupt or watcher contexts while consumers drain on the main loop.
//! Two delivery flavors exist: strict (`try_send`, fails when full) for
//! discovery events where losing an add/remove would corrupt the registry,
//! and lossy (`send_latest`, drops the oldest entry) for summary updates
//! where only the most recent state matters.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{Deque, Vec};

use crate::device::{DeviceId, DeviceInfo, DeviceName};
use crate::registry::MAX_DEVICES;

/// Error returned when a strict send finds the queue full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull<T>(pub T);

/// Error returned when receiving from an empty queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEmpty;

/// A bounded, critical-section guarded event queue.
pub struct EventQueue<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> EventQueue<T, SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Enqueue an event, failing when the queue is full.
    pub fn try_send(&self, event: T) -> Result<(), QueueFull<T>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(event).map_err(QueueFull)
        })
    }

    /// Enqueue an event, evicting the oldest entry when full. Used where
    /// only the latest state matters, e.g. summary notifications.
    pub fn send_latest(&self, event: T) {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            if queue.is_full() {
                let _ = queue.pop_front();
            }
            // A slot is guaranteed free after the eviction above.
            let _ = queue.push_back(event);
        });
    }

    /// Dequeue the oldest pending event.
    pub fn try_receive(&self) -> Result<T, QueueEmpty> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(QueueEmpty)
        })
    }

    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().is_empty())
    }
}

impl<T, const SIZE: usize> Default for EventQueue<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Hot-plug notification from the platform device watcher.
#[derive(Debug, Clone)]
pub enum DiscoveryEvent {
    /// A lamp array was connected.
    Added(DeviceInfo),
    /// The lamp array with this id was disconnected.
    Removed(DeviceId),
}

/// Presentation-facing "connected devices changed" notification.
///
/// Dispatched on every registry mutation; delivery is asynchronous and
/// latest-wins, so the sink eventually converges on the registry state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryUpdate {
    pub count: usize,
    pub names: Vec<DeviceName, MAX_DEVICES>,
}

/// Queue depth for discovery events.
pub const DISCOVERY_QUEUE_DEPTH: usize = 16;
/// Queue depth for summary updates; shallow on purpose, it is lossy.
pub const SUMMARY_QUEUE_DEPTH: usize = 4;

/// Discovery event queue type, shared between the platform watcher callback
/// and [`crate::watcher::DiscoveryWatcher`].
pub type DiscoveryQueue = EventQueue<DiscoveryEvent, DISCOVERY_QUEUE_DEPTH>;
/// Summary update queue type, drained by the presentation layer.
pub type SummaryQueue = EventQueue<SummaryUpdate, SUMMARY_QUEUE_DEPTH>;
