use log::{Level, debug, error, trace, warn};
use std::ffi::CStr;
use std::os::raw::c_void;
use vulkanalia_sys as vksys;

/// Routes diagnostic-messenger output into the `log` facade by severity.
pub extern "system" fn debug_callback(
    severity: vksys::DebugUtilsMessageSeverityFlagsEXT,
    type_: vksys::DebugUtilsMessageTypeFlagsEXT,
    data: *const vksys::DebugUtilsMessengerCallbackDataEXT,
    _: *mut c_void,
) -> vksys::Bool32 {
    if data.is_null() {
        return vksys::FALSE;
    }

    let data = unsafe { *data };
    if data.message.is_null() {
        return vksys::FALSE;
    }
    let message = unsafe { CStr::from_ptr(data.message) }.to_string_lossy();

    match severity_level(severity) {
        Level::Error => error!("({type_:?}) {message}"),
        Level::Warn => warn!("({type_:?}) {message}"),
        Level::Debug => debug!("({type_:?}) {message}"),
        _ => trace!("({type_:?}) {message}"),
    }

    vksys::FALSE
}

pub fn severity_level(severity: vksys::DebugUtilsMessageSeverityFlagsEXT) -> Level {
    if severity >= vksys::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        Level::Error
    } else if severity >= vksys::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        Level::Warn
    } else if severity >= vksys::DebugUtilsMessageSeverityFlagsEXT::INFO {
        Level::Debug
    } else {
        Level::Trace
    }
}
