//! Discovery event intake.
//!
//! The platform device watcher pushes [`DiscoveryEvent`]s onto a shared
//! queue from its own context; the application subscribes once at startup
//! and keeps draining for the process lifetime. Draining is non-blocking and
//! applies each event to the registry in arrival order, so adds and removes
//! for the same id cannot interleave badly.

use crate::device::Brightness;
use crate::events::{DiscoveryEvent, DiscoveryQueue};
use crate::registry::DeviceRegistry;

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Drains discovery events into the registry.
pub struct DiscoveryWatcher<'a> {
    events: &'a DiscoveryQueue,
}

impl<'a> DiscoveryWatcher<'a> {
    pub const fn new(events: &'a DiscoveryQueue) -> Self {
        Self { events }
    }

    /// Apply all pending discovery events.
    ///
    /// Newly added devices start at the current global `brightness`, the
    /// same value the brightness slider last set. Returns the number of
    /// events processed.
    pub fn process_pending(&mut self, registry: &DeviceRegistry, brightness: Brightness) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.events.try_receive() {
            match event {
                DiscoveryEvent::Added(info) => {
                    if registry.add(info, brightness).is_err() {
                        #[cfg(feature = "esp32-log")]
                        println!("[watcher] registry full, device dropped");
                    }
                }
                DiscoveryEvent::Removed(id) => {
                    registry.remove(&id);
                }
            }
            processed += 1;
        }
        processed
    }
}
