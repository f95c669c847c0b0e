use crate::pal::Bindings;
use crate::{DeviceIndex, RawDeviceProperties, RuntimeStatus, RuntimeVersion};

/// Singleton instance of `BuildTargetBindings`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_BINDINGS: BuildTargetBindings = BuildTargetBindings;

/// Bindings for build targets that cannot load the HIP runtime. Every query reports that
/// there is no device.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

impl Bindings for BuildTargetBindings {
    fn get_device(&self) -> Result<i32, RuntimeStatus> {
        Err(RuntimeStatus::NO_DEVICE)
    }

    fn get_device_properties(
        &self,
        _device: DeviceIndex,
    ) -> Result<RawDeviceProperties, RuntimeStatus> {
        Err(RuntimeStatus::NO_DEVICE)
    }

    fn runtime_get_version(&self) -> Result<RuntimeVersion, RuntimeStatus> {
        Err(RuntimeStatus::NO_DEVICE)
    }

    fn physical_multiprocessor_count(&self, _device: DeviceIndex) -> Result<i32, RuntimeStatus> {
        Err(RuntimeStatus::NO_DEVICE)
    }
}
