use std::ffi::{CStr, c_void};
use std::mem;
use std::sync::OnceLock;

use tracing::debug;

use crate::RuntimeStatus;
use crate::pal::unix::ffi::{
    hipDeviceGetAttribute_fn, hipGetDevice_fn, hipGetDevicePropertiesR0000_fn,
    hipGetDevicePropertiesR0600_fn, hipRuntimeGetVersion_fn,
};

/// Names under which the HIP runtime is installed, in order of preference.
const LIBRARY_NAMES: [&CStr; 3] = [
    c"libamdhip64.so",
    c"libamdhip64.so.6",
    c"libamdhip64.so.5",
];

static LIBRARY: OnceLock<Result<HipLibrary, RuntimeStatus>> = OnceLock::new();

/// The entry point that reads the device property block, with the layout it writes.
#[derive(Clone, Copy, Debug)]
pub(crate) enum DevicePropertiesFn {
    /// `hipGetDevicePropertiesR0600()`, exported from release 6 onwards.
    R0600(hipGetDevicePropertiesR0600_fn),

    /// `hipGetDeviceProperties()` of runtimes that predate the R0600 layout.
    R0000(hipGetDevicePropertiesR0000_fn),
}

/// Entry points of the HIP runtime, resolved from the shared library on first use.
///
/// The library is loaded at runtime instead of linked so that the package works on machines
/// without the HIP runtime installed, where every query reports that there is no device. Once
/// loaded, the library stays loaded for the life of the process.
#[derive(Debug)]
pub(crate) struct HipLibrary {
    pub(crate) get_device: hipGetDevice_fn,
    pub(crate) get_device_properties: DevicePropertiesFn,
    pub(crate) runtime_get_version: hipRuntimeGetVersion_fn,
    pub(crate) device_get_attribute: hipDeviceGetAttribute_fn,
}

impl HipLibrary {
    /// Returns the loaded library, loading it on first call.
    ///
    /// Fails with `hipErrorNoDevice` if the runtime is not installed and with
    /// `hipErrorNotSupported` if it does not export the entry points we need.
    pub(crate) fn get() -> Result<&'static Self, RuntimeStatus> {
        LIBRARY
            .get_or_init(Self::load)
            .as_ref()
            .map_err(|status| *status)
    }

    #[cfg_attr(test, mutants::skip)] // Outcome depends on what is installed on the machine.
    fn load() -> Result<Self, RuntimeStatus> {
        let Some(handle) = LIBRARY_NAMES.iter().find_map(|name| open(name)) else {
            debug!("HIP runtime library not found");
            return Err(RuntimeStatus::NO_DEVICE);
        };

        // SAFETY: The handle was just returned by `dlopen()`.
        let library = unsafe { Self::resolve(handle) };

        let Some(library) = library else {
            debug!("HIP runtime library does not export the expected entry points");
            return Err(RuntimeStatus::NOT_SUPPORTED);
        };

        debug!(
            get_device_properties = ?library.get_device_properties,
            "HIP runtime library loaded"
        );

        Ok(library)
    }

    /// Resolves every entry point we call, or returns `None` if any of them is missing.
    ///
    /// # Safety
    ///
    /// `handle` must be a live handle returned by `dlopen()` for the HIP runtime library.
    unsafe fn resolve(handle: *mut c_void) -> Option<Self> {
        // SAFETY: Forwarding the caller's guarantee that the handle is live. The type is the one
        // the HIP headers declare for this name, as for every symbol below.
        let get_device = unsafe { symbol::<hipGetDevice_fn>(handle, c"hipGetDevice") }?;

        // SAFETY: As above.
        let properties_r0600 = unsafe {
            symbol::<hipGetDevicePropertiesR0600_fn>(handle, c"hipGetDevicePropertiesR0600")
        };

        // SAFETY: As above. Only used when the R0600 entry point is absent, in which case the
        // runtime predates the R0600 layout and this name refers to the R0000 layout.
        let properties_r0000 =
            unsafe { symbol::<hipGetDevicePropertiesR0000_fn>(handle, c"hipGetDeviceProperties") };

        // SAFETY: As above.
        let runtime_get_version =
            unsafe { symbol::<hipRuntimeGetVersion_fn>(handle, c"hipRuntimeGetVersion") }?;

        // SAFETY: As above.
        let device_get_attribute =
            unsafe { symbol::<hipDeviceGetAttribute_fn>(handle, c"hipDeviceGetAttribute") }?;

        let get_device_properties =
            select_device_properties_fn(properties_r0600, properties_r0000)?;

        Some(Self {
            get_device,
            get_device_properties,
            runtime_get_version,
            device_get_attribute,
        })
    }
}

/// Prefers the R0600 layout, falling back to the layout of older runtimes.
fn select_device_properties_fn(
    r0600: Option<hipGetDevicePropertiesR0600_fn>,
    r0000: Option<hipGetDevicePropertiesR0000_fn>,
) -> Option<DevicePropertiesFn> {
    r0600
        .map(DevicePropertiesFn::R0600)
        .or_else(|| r0000.map(DevicePropertiesFn::R0000))
}

fn open(name: &CStr) -> Option<*mut c_void> {
    // SAFETY: The name is NUL-terminated, no other safety requirements.
    let handle = unsafe { libc::dlopen(name.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };

    (!handle.is_null()).then_some(handle)
}

/// Resolves a symbol from a loaded library as a function pointer of type `F`.
///
/// # Safety
///
/// `handle` must be a live handle returned by `dlopen()` and `F` must be the function pointer
/// type matching the C declaration of the symbol.
unsafe fn symbol<F: Copy>(handle: *mut c_void, name: &CStr) -> Option<F> {
    debug_assert_eq!(size_of::<F>(), size_of::<*mut c_void>());

    // SAFETY: Forwarding the caller's guarantee that the handle is live.
    let address = unsafe { libc::dlsym(handle, name.as_ptr()) };

    if address.is_null() {
        return None;
    }

    // SAFETY: Forwarding the caller's guarantee that `F` matches the symbol.
    Some(unsafe { mem::transmute_copy::<*mut c_void, F>(&address) })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::ffi::c_int;

    use super::*;
    use crate::pal::unix::ffi::{hipDeviceProp_tR0000, hipDeviceProp_tR0600, hipError_t};

    unsafe extern "C" fn r0600_stub(_: *mut hipDeviceProp_tR0600, _: c_int) -> hipError_t {
        0
    }

    unsafe extern "C" fn r0000_stub(_: *mut hipDeviceProp_tR0000, _: c_int) -> hipError_t {
        0
    }

    #[test]
    fn r0600_entry_point_is_preferred() {
        let r0600: hipGetDevicePropertiesR0600_fn = r0600_stub;
        let r0000: hipGetDevicePropertiesR0000_fn = r0000_stub;

        assert!(matches!(
            select_device_properties_fn(Some(r0600), Some(r0000)),
            Some(DevicePropertiesFn::R0600(_))
        ));
    }

    #[test]
    fn older_runtime_falls_back_to_r0000_layout() {
        let r0000: hipGetDevicePropertiesR0000_fn = r0000_stub;

        assert!(matches!(
            select_device_properties_fn(None, Some(r0000)),
            Some(DevicePropertiesFn::R0000(_))
        ));
    }

    #[test]
    fn no_properties_entry_point_is_unsupported() {
        assert!(select_device_properties_fn(None, None).is_none());
    }
}
