use std::fmt::Debug;

use crate::{DeviceIndex, RawDeviceProperties, RuntimeStatus, RuntimeVersion};

/// Bindings for the HIP runtime calls this package issues.
///
/// All HIP runtime calls must go through this trait, enabling them to be mocked.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Bindings: Debug + Send + Sync + 'static {
    // hipGetDevice()
    fn get_device(&self) -> Result<i32, RuntimeStatus>;

    // hipGetDeviceProperties()
    fn get_device_properties(
        &self,
        device: DeviceIndex,
    ) -> Result<RawDeviceProperties, RuntimeStatus>;

    // hipRuntimeGetVersion()
    fn runtime_get_version(&self) -> Result<RuntimeVersion, RuntimeStatus>;

    // hipDeviceGetAttribute(hipDeviceAttributePhysicalMultiProcessorCount)
    fn physical_multiprocessor_count(&self, device: DeviceIndex) -> Result<i32, RuntimeStatus>;
}
