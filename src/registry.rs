//! Concurrency-safe device registry.
//!
//! One record per connected lamp array, keyed by device id, guarded by a
//! single critical section. Discovery events mutate the map from the watcher
//! context while hardware update callbacks resolve effect tokens on their
//! own cadence; both paths serialize on the same section so a callback can
//! never observe a half-removed device.
//!
//! Every structural change pushes a [`SummaryUpdate`] onto a lossy queue for
//! the presentation layer; delivery is eventual, not synchronous.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{FnvIndexMap, Vec};

use crate::device::{Brightness, DeviceId, DeviceInfo, DeviceName, LampArrayDevice};
use crate::events::{SummaryQueue, SummaryUpdate};
use crate::playlist::TokenAllocator;

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Maximum simultaneously connected devices (map capacity must be a power
/// of two).
pub const MAX_DEVICES: usize = 8;
/// Maximum live callback-effect tokens across all devices.
pub const MAX_CALLBACK_TOKENS: usize = 16;

/// Error returned when the registry has no room for another device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryFull;

/// Map state behind the critical section.
pub(crate) struct RegistryInner {
    pub(crate) devices: FnvIndexMap<DeviceId, LampArrayDevice, MAX_DEVICES>,
    /// Callback-effect token -> owning device id. Populated during session
    /// build, cleared at cleanup and on device removal, so a stale token
    /// resolves to nothing instead of a dangling record.
    pub(crate) tokens: FnvIndexMap<u32, DeviceId, MAX_CALLBACK_TOKENS>,
    pub(crate) allocator: TokenAllocator,
}

/// The registry.
pub struct DeviceRegistry {
    inner: Mutex<RefCell<RegistryInner>>,
    summary: SummaryQueue,
}

impl DeviceRegistry {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(RegistryInner {
                devices: FnvIndexMap::new(),
                tokens: FnvIndexMap::new(),
                allocator: TokenAllocator::new(),
            })),
            summary: SummaryQueue::new(),
        }
    }

    /// Register a newly discovered device.
    ///
    /// A second add for an id that is already present keeps the existing
    /// record untouched (the watcher may replay events); it still succeeds.
    pub fn add(&self, info: DeviceInfo, brightness: Brightness) -> Result<(), RegistryFull> {
        let summary = self.with_inner_mut(|inner| {
            if inner.devices.contains_key(&info.id) {
                return Ok(None);
            }
            #[cfg(feature = "esp32-log")]
            println!("[registry] add {} ({})", info.id.as_str(), info.name.as_str());
            let playlist_token = inner.allocator.playlist();
            let device = LampArrayDevice::new(info, brightness, playlist_token);
            let id = device.id.clone();
            inner
                .devices
                .insert(id, device)
                .map_err(|_| RegistryFull)?;
            Ok(Some(summarize(inner)))
        })?;
        if let Some(update) = summary {
            self.summary.send_latest(update);
        }
        Ok(())
    }

    /// Drop a device on a removal notification. Removing an id that is not
    /// present is a no-op, not an error.
    pub fn remove(&self, id: &DeviceId) {
        let summary = self.with_inner_mut(|inner| {
            let removed = inner.devices.remove(id);
            if removed.is_none() {
                return None;
            }
            #[cfg(feature = "esp32-log")]
            println!("[registry] remove {}", id.as_str());
            // Forget any callback tokens that still pointed at the device.
            retain_tokens(inner, |owner| owner != id);
            Some(summarize(inner))
        });
        if let Some(update) = summary {
            self.summary.send_latest(update);
        }
    }

    /// Number of currently registered devices.
    pub fn len(&self) -> usize {
        self.with_inner_mut(|inner| inner.devices.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `f` to every device under the critical section.
    pub fn for_each(&self, mut f: impl FnMut(&LampArrayDevice)) {
        self.with_inner_mut(|inner| {
            for device in inner.devices.values() {
                f(device);
            }
        });
    }

    /// Run `f` against one device's mutable record, if present.
    pub fn with_device_mut<R>(
        &self,
        id: &DeviceId,
        f: impl FnOnce(&mut LampArrayDevice) -> R,
    ) -> Option<R> {
        self.with_inner_mut(|inner| inner.devices.get_mut(id).map(f))
    }

    /// Set every device's brightness. Touches only the brightness field;
    /// animation state is never disturbed.
    pub fn set_brightness_all(&self, brightness: Brightness) {
        self.with_inner_mut(|inner| {
            for device in inner.devices.values_mut() {
                device.brightness = brightness;
            }
        });
    }

    /// Drain the next pending summary notification, if any.
    pub fn try_take_summary(&self) -> Option<SummaryUpdate> {
        self.summary.try_receive().ok()
    }

    pub(crate) fn with_inner_mut<R>(&self, f: impl FnOnce(&mut RegistryInner) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the "connected devices changed" payload from the current map.
fn summarize(inner: &RegistryInner) -> SummaryUpdate {
    let mut names: Vec<DeviceName, MAX_DEVICES> = Vec::new();
    for device in inner.devices.values() {
        let _ = names.push(device.display_name.clone());
    }
    SummaryUpdate {
        count: inner.devices.len(),
        names,
    }
}

/// Keep only the token entries whose owner satisfies the predicate.
fn retain_tokens(inner: &mut RegistryInner, keep: impl Fn(&DeviceId) -> bool) {
    let mut stale: Vec<u32, MAX_CALLBACK_TOKENS> = Vec::new();
    for (token, owner) in &inner.tokens {
        if !keep(owner) {
            let _ = stale.push(*token);
        }
    }
    for token in stale {
        inner.tokens.remove(&token);
    }
}
