//! TinyUSB audio glue.
//!
//! TinyUSB calls the weak `tud_audio_tx_done_*` hooks from its device
//! task once per isochronous IN frame. They forward to the configured
//! [`Provider`]. Descriptors and class enablement come from the
//! TinyUSB component configuration.
//!
//! The split contract maps directly onto the two hooks. TinyUSB has no
//! single fill callback, so the pull contract runs
//! [`FrameProvider::fill`] from the pre-load hook and writes the result;
//! the post-load hook then only checks the copied length.

use core::cell::UnsafeCell;
use core::ffi::c_void;

use esp_idf_svc::sys::tinyusb::{tinyusb_config_t, tinyusb_driver_install};
use esp_idf_svc::sys::EspError;

use crate::audio::{FrameProvider, Provider, MAX_FRAME_BYTES};

/// Audio function index on the USB device
const AUDIO_FUNC: u8 = 0;

extern "C" {
    // `tud_audio_write` is a static inline wrapper around this
    fn tud_audio_n_write(func_id: u8, data: *const c_void, len: u16) -> u16;
}

// Wrapper to make UnsafeCell Sync for the provider slot.
// SAFETY: written once by `start` before the driver is installed;
// afterwards only the TinyUSB device task touches it.
struct ProviderSlot(UnsafeCell<Option<Provider<'static>>>);
unsafe impl Sync for ProviderSlot {}

static PROVIDER: ProviderSlot = ProviderSlot(UnsafeCell::new(None));

/// Hand the provider to the callbacks and install the USB driver.
///
/// Call once, from the main task, before anything else touches USB.
pub fn start(provider: Provider<'static>) -> Result<(), EspError> {
    // SAFETY: driver not installed yet, callbacks cannot run
    unsafe {
        *PROVIDER.0.get() = Some(provider);
    }

    let config = tinyusb_config_t {
        external_phy: false,
        ..Default::default()
    };
    esp_idf_svc::sys::esp!(unsafe { tinyusb_driver_install(&config) })
}

/// SAFETY: caller must be the TinyUSB device task.
unsafe fn provider() -> Option<&'static mut Provider<'static>> {
    (*PROVIDER.0.get()).as_mut()
}

#[no_mangle]
pub extern "C" fn tud_audio_tx_done_pre_load_cb(
    _rhport: u8,
    _itf: u8,
    _ep_in: u8,
    _cur_alt_setting: u8,
) -> bool {
    // SAFETY: invoked by the TinyUSB device task only
    let Some(provider) = (unsafe { provider() }) else {
        return false;
    };

    match provider {
        Provider::Split(_) => write_frame(provider.pre_load()),
        Provider::Pull(_) => {
            let mut dst = [0u8; MAX_FRAME_BYTES];
            match provider.fill(&mut dst) {
                Some(len) => write_frame(&dst[..len]),
                None => false,
            }
        }
    }
}

fn write_frame(frame: &[u8]) -> bool {
    // SAFETY: TinyUSB copies the frame into its FIFO before returning
    unsafe {
        tud_audio_n_write(AUDIO_FUNC, frame.as_ptr().cast(), frame.len() as u16);
    }
    true
}

#[no_mangle]
pub extern "C" fn tud_audio_tx_done_post_load_cb(
    _rhport: u8,
    n_bytes_copied: u16,
    _itf: u8,
    _ep_in: u8,
    _cur_alt_setting: u8,
) -> bool {
    // SAFETY: invoked by the TinyUSB device task only
    let Some(provider) = (unsafe { provider() }) else {
        return false;
    };

    provider.post_load(n_bytes_copied as usize);
    true
}
