//! Vendor-defined message exchange.
//!
//! Lamp arrays accept opaque vendor command payloads alongside the effect
//! pipeline. This is fire-and-report: outcomes go back to the caller as
//! diagnostics and never touch effect playback state.

use crate::device::DeviceId;
use crate::error::{TransportError, VendorError};
use crate::registry::DeviceRegistry;

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Message id used by the demo ping exchange.
pub const PING_MESSAGE_ID: u8 = 0x07;
/// Payload of the demo ping.
pub const PING_PAYLOAD: [u8; 2] = [0x01, 0x02];

/// Byte-level message channel to a specific device. Implemented by the
/// platform transport; internals are out of scope here.
pub trait VendorTransport {
    /// Send `payload` as vendor message `message_id` to the device.
    fn send(&mut self, device: &DeviceId, message_id: u8, payload: &[u8])
    -> Result<(), TransportError>;

    /// Request a vendor message from the device, writing the reply into
    /// `reply` and returning the number of bytes received.
    fn request(
        &mut self,
        device: &DeviceId,
        message_id: u8,
        reply: &mut [u8],
    ) -> Result<usize, TransportError>;
}

/// Send `payload` to the first registered device and read back its reply.
///
/// Returns the reply length. With no devices connected the command reports
/// [`VendorError::NoDevices`]; transport failures are forwarded verbatim.
pub fn exchange_with_first<T: VendorTransport>(
    registry: &DeviceRegistry,
    transport: &mut T,
    message_id: u8,
    payload: &[u8],
    reply: &mut [u8],
) -> Result<usize, VendorError> {
    let mut first: Option<DeviceId> = None;
    registry.for_each(|device| {
        if first.is_none() {
            first = Some(device.id.clone());
        }
    });
    let Some(id) = first else {
        return Err(VendorError::NoDevices);
    };

    transport.send(&id, message_id, payload)?;
    #[cfg(feature = "esp32-log")]
    println!("[vendor] message sent to {}", id.as_str());

    let len = transport.request(&id, message_id, reply)?;
    #[cfg(feature = "esp32-log")]
    println!("[vendor] message received ({} bytes)", len);

    Ok(len)
}
