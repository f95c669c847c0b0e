use std::ffi::{c_char, c_int};
use std::mem;

use crate::pal::Bindings;
use crate::pal::unix::ffi::{
    NAME_BUFFER_LEN, hipDeviceAttributePhysicalMultiProcessorCount, hipDeviceProp_tR0000,
    hipDeviceProp_tR0600, hipError_t, hipSuccess,
};
use crate::pal::unix::library::{DevicePropertiesFn, HipLibrary};
use crate::{BoundedName, DeviceIndex, RawDeviceProperties, RuntimeStatus, RuntimeVersion};

/// Singleton instance of `BuildTargetBindings`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_BINDINGS: BuildTargetBindings = BuildTargetBindings;

/// Bindings that call into the HIP runtime installed on the machine.
///
/// You would only use different bindings in unit tests that need mock bindings or in
/// integration tests that simulate a runtime via the `fake` module.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

/// Room for the runtime to write a property block larger than the layout we declare, so a
/// runtime with a grown struct cannot write past our allocation.
const PROPERTY_BLOCK_SLACK: usize = 1024;

#[repr(C)]
struct PropertyBlockBuffer<T> {
    properties: T,
    _slack: [u8; PROPERTY_BLOCK_SLACK],
}

// Real runtime bindings are excluded from coverage measurement because they are only
// exercised on machines with an AMD GPU and ROCm installed.
#[cfg_attr(coverage_nightly, coverage(off))]
impl Bindings for BuildTargetBindings {
    fn get_device(&self) -> Result<i32, RuntimeStatus> {
        let library = HipLibrary::get()?;

        let mut device: c_int = 0;

        // SAFETY: We are passing a valid pointer to an int, no other safety requirements.
        check(unsafe { (library.get_device)(&raw mut device) })?;

        Ok(device)
    }

    fn get_device_properties(
        &self,
        device: DeviceIndex,
    ) -> Result<RawDeviceProperties, RuntimeStatus> {
        let library = HipLibrary::get()?;
        let device = to_c_device(device)?;

        match library.get_device_properties {
            DevicePropertiesFn::R0600(get_device_properties) => {
                // SAFETY: All-zero is a valid value for this plain-data type.
                let mut buffer: PropertyBlockBuffer<hipDeviceProp_tR0600> =
                    unsafe { mem::zeroed() };

                // SAFETY: We are passing a valid pointer to a buffer at least as large as the
                // property block, no other safety requirements.
                check(unsafe { get_device_properties(&raw mut buffer.properties, device) })?;

                Ok(translate_r0600(&buffer.properties))
            }
            DevicePropertiesFn::R0000(get_device_properties) => {
                // SAFETY: All-zero is a valid value for this plain-data type.
                let mut buffer: PropertyBlockBuffer<hipDeviceProp_tR0000> =
                    unsafe { mem::zeroed() };

                // SAFETY: We are passing a valid pointer to a buffer at least as large as the
                // property block, no other safety requirements.
                check(unsafe { get_device_properties(&raw mut buffer.properties, device) })?;

                Ok(translate_r0000(&buffer.properties))
            }
        }
    }

    fn runtime_get_version(&self) -> Result<RuntimeVersion, RuntimeStatus> {
        let library = HipLibrary::get()?;

        let mut version: c_int = 0;

        // SAFETY: We are passing a valid pointer to an int, no other safety requirements.
        check(unsafe { (library.runtime_get_version)(&raw mut version) })?;

        Ok(RuntimeVersion::new(version))
    }

    fn physical_multiprocessor_count(&self, device: DeviceIndex) -> Result<i32, RuntimeStatus> {
        let library = HipLibrary::get()?;
        let device = to_c_device(device)?;

        let mut count: c_int = 0;

        // SAFETY: We are passing a valid pointer to an int, no other safety requirements.
        check(unsafe {
            (library.device_get_attribute)(
                &raw mut count,
                hipDeviceAttributePhysicalMultiProcessorCount,
                device,
            )
        })?;

        Ok(count)
    }
}

fn check(status: hipError_t) -> Result<(), RuntimeStatus> {
    if status == hipSuccess {
        Ok(())
    } else {
        Err(RuntimeStatus::new(status))
    }
}

fn to_c_device(device: DeviceIndex) -> Result<c_int, RuntimeStatus> {
    c_int::try_from(device)
        .ok()
        .ok_or(RuntimeStatus::INVALID_DEVICE)
}

// Both layouts name the fields we read identically.
macro_rules! translate_property_block {
    ($properties:ident) => {
        RawDeviceProperties::builder()
            .multiprocessor_count(non_negative($properties.multiProcessorCount))
            .total_global_mem(widen($properties.totalGlobalMem))
            .shared_mem_per_block(widen($properties.sharedMemPerBlock))
            .warp_size(non_negative($properties.warpSize))
            .max_threads_per_block(non_negative($properties.maxThreadsPerBlock))
            .clock_rate_khz(non_negative($properties.clockRate))
            .compute_capability(
                non_negative($properties.major),
                non_negative($properties.minor),
            )
            .l2_cache_size(non_negative($properties.l2CacheSize))
            .max_shared_memory_per_multiprocessor(widen(
                $properties.maxSharedMemoryPerMultiProcessor,
            ))
            .pci_location(
                non_negative($properties.pciDomainID),
                non_negative($properties.pciBusID),
                non_negative($properties.pciDeviceID),
            )
            .build_with_names(
                BoundedName::from_nul_terminated(&to_bytes(&$properties.name)),
                BoundedName::from_nul_terminated(&to_bytes(&$properties.gcnArchName)),
            )
    };
}

fn translate_r0600(properties: &hipDeviceProp_tR0600) -> RawDeviceProperties {
    translate_property_block!(properties)
}

fn translate_r0000(properties: &hipDeviceProp_tR0000) -> RawDeviceProperties {
    translate_property_block!(properties)
}

fn to_bytes(chars: &[c_char; NAME_BUFFER_LEN]) -> [u8; NAME_BUFFER_LEN] {
    #[allow(
        clippy::cast_sign_loss,
        clippy::unnecessary_cast,
        reason = "c_char is signed on some targets and unsigned on others"
    )]
    let bytes = chars.map(|c| c as u8);

    bytes
}

// The runtime reports counts and sizes as C ints; a negative value carries no information.
fn non_negative(value: c_int) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

fn widen(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn c_name(value: &str) -> [c_char; NAME_BUFFER_LEN] {
        let mut buffer = [0 as c_char; NAME_BUFFER_LEN];

        for (slot, byte) in buffer.iter_mut().zip(value.bytes()) {
            #[allow(
                clippy::cast_possible_wrap,
                clippy::unnecessary_cast,
                reason = "c_char is signed on some targets and unsigned on others"
            )]
            let byte = byte as c_char;

            *slot = byte;
        }

        buffer
    }

    #[test]
    fn translate_r0600_reads_interpreted_fields() {
        // SAFETY: All-zero is a valid value for this plain-data type.
        let mut raw: hipDeviceProp_tR0600 = unsafe { mem::zeroed() };
        raw.name = c_name("AMD Radeon RX 6700 XT");
        raw.gcnArchName = c_name("gfx1031");
        raw.multiProcessorCount = 40;
        raw.warpSize = 32;
        raw.totalGlobalMem = 12 << 30;
        raw.pciBusID = 3;

        let properties = translate_r0600(&raw);

        assert_eq!(properties.name(), "AMD Radeon RX 6700 XT");
        assert_eq!(properties.arch_name(), "gfx1031");
        assert_eq!(properties.multiprocessor_count(), 40);
        assert_eq!(properties.warp_size(), 32);
        assert_eq!(properties.total_global_mem(), 12 << 30);
        assert_eq!(properties.pci_location(), (0, 3, 0));
    }

    #[test]
    fn translate_r0000_reads_interpreted_fields() {
        // SAFETY: All-zero is a valid value for this plain-data type.
        let mut raw: hipDeviceProp_tR0000 = unsafe { mem::zeroed() };
        raw.name = c_name("AMD Instinct MI100");
        raw.gcnArchName = c_name("gfx908:sramecc+:xnack-");
        raw.multiProcessorCount = 120;
        raw.maxSharedMemoryPerMultiProcessor = 64 << 10;
        raw.pciDomainID = 1;
        raw.pciDeviceID = 2;

        let properties = translate_r0000(&raw);

        assert_eq!(properties.name(), "AMD Instinct MI100");
        assert_eq!(properties.arch_name(), "gfx908:sramecc+:xnack-");
        assert_eq!(properties.multiprocessor_count(), 120);
        assert_eq!(properties.max_shared_memory_per_multiprocessor(), 64 << 10);
        assert_eq!(properties.pci_location(), (1, 0, 2));
    }

    #[test]
    fn negative_counts_read_as_zero() {
        assert_eq!(non_negative(-1), 0);
        assert_eq!(non_negative(60), 60);
    }

    #[test]
    fn oversized_device_index_is_invalid_device() {
        assert_eq!(
            to_c_device(DeviceIndex::MAX),
            Err(RuntimeStatus::INVALID_DEVICE)
        );
    }

    #[test]
    fn nonzero_status_is_error() {
        assert_eq!(check(hipSuccess), Ok(()));
        assert_eq!(check(101), Err(RuntimeStatus::INVALID_DEVICE));
    }
}
