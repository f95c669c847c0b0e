//! Builders for configuring a fake HIP runtime.

use crate::{DeviceIndex, RawDeviceProperties, RuntimeOperation, RuntimeStatus, RuntimeVersion};

/// Version reported by a fake runtime unless configured otherwise: HIP 6.0.32830, recent enough
/// to report the physical multiprocessor count.
pub const DEFAULT_FAKE_RUNTIME_VERSION: RuntimeVersion = RuntimeVersion::new(60_032_830);

/// Builder for configuring a fake HIP runtime.
///
/// Devices are indexed in the order they are added, starting from 0. Unless configured
/// otherwise, the current device is device 0 if any device was added; a runtime without devices
/// has no current device.
///
/// The fake runtime reports status codes the way the real runtime does:
///
/// * `hipGetDevice` fails with `hipErrorNoDevice` if there is no current device.
/// * `hipGetDeviceProperties` and `hipDeviceGetAttribute` fail with `hipErrorInvalidDevice` for
///   device indexes that were not added.
/// * `hipDeviceGetAttribute` fails with `hipErrorNotSupported` for devices that were not given
///   a physical multiprocessor count.
///
/// Any call can additionally be made to fail via [`fail()`][Self::fail].
///
/// # Example
///
/// ```
/// use hip_hardware::fake::{DeviceBuilder, RuntimeBuilder};
/// use hip_hardware::{HipRuntime, RawDeviceProperties, RuntimeOperation, RuntimeStatus};
///
/// let runtime = HipRuntime::fake(
///     RuntimeBuilder::new()
///         .device(
///             DeviceBuilder::new(
///                 RawDeviceProperties::builder()
///                     .arch_name("gfx906")
///                     .multiprocessor_count(60)
///                     .build()
///                     .unwrap(),
///             )
///             .physical_multiprocessor_count(60),
///         )
///         .fail(RuntimeOperation::GetDevice, RuntimeStatus::INVALID_CONTEXT),
/// );
///
/// // Resolving the current device fails but explicitly indexed devices are still reachable.
/// assert!(runtime.descriptor_for_current_device().is_err());
/// assert!(runtime.descriptor_for_device(0).is_ok());
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct RuntimeBuilder {
    pub(crate) devices: Vec<DeviceBuilder>,
    pub(crate) current_device: Option<DeviceIndex>,
    pub(crate) version: RuntimeVersion,
    pub(crate) failures: Vec<(RuntimeOperation, RuntimeStatus)>,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    /// Creates a builder for a runtime without devices, reporting
    /// [`DEFAULT_FAKE_RUNTIME_VERSION`].
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            current_device: None,
            version: DEFAULT_FAKE_RUNTIME_VERSION,
            failures: Vec::new(),
        }
    }

    /// Adds a device. The device gets the next free index.
    pub fn device(mut self, device: DeviceBuilder) -> Self {
        self.devices.push(device);
        self
    }

    /// Sets the index reported as the current device.
    ///
    /// The index does not need to refer to an added device; properties of a nonexistent
    /// current device fail to resolve, just like with the real runtime.
    pub fn current_device(mut self, index: DeviceIndex) -> Self {
        self.current_device = Some(index);
        self
    }

    /// Sets the version reported by `hipRuntimeGetVersion`.
    pub fn version(mut self, version: RuntimeVersion) -> Self {
        self.version = version;
        self
    }

    /// Makes every call of the given runtime operation fail with the given status.
    ///
    /// If the same operation is configured to fail more than once, the last status wins.
    pub fn fail(mut self, operation: RuntimeOperation, status: RuntimeStatus) -> Self {
        self.failures.push((operation, status));
        self
    }
}

/// Builder for one device of a fake HIP runtime.
#[derive(Clone, Debug)]
#[must_use]
pub struct DeviceBuilder {
    pub(crate) properties: RawDeviceProperties,
    pub(crate) physical_multiprocessor_count: Option<i32>,
}

impl DeviceBuilder {
    /// Creates a device that reports the given property block.
    pub fn new(properties: RawDeviceProperties) -> Self {
        Self {
            properties,
            physical_multiprocessor_count: None,
        }
    }

    /// Sets the value of the physical multiprocessor count attribute.
    ///
    /// Negative values are allowed so tests can simulate a misbehaving runtime.
    pub fn physical_multiprocessor_count(mut self, count: i32) -> Self {
        self.physical_multiprocessor_count = Some(count);
        self
    }
}
