use tracing::debug;

use crate::host::Host;
use crate::slide::Manifest;

/// Fill the mobile strip with one static image per slide.
///
/// Only touches a strip that exists and is still empty, so repeated calls
/// never duplicate content. Returns the number of items appended.
pub fn populate<H: Host>(host: &mut H, manifest: &Manifest) -> usize {
    match host.mobile_strip_len() {
        None => {
            debug!("no mobile strip on page");
            0
        }
        Some(len) if len > 0 => {
            debug!(len, "mobile strip already populated");
            0
        }
        Some(_) => {
            for slide in manifest.iter() {
                host.append_strip_item(slide.src());
            }
            debug!(count = manifest.len(), "mobile strip populated");
            manifest.len()
        }
    }
}
