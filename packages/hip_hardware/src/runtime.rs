//! Public handle to the HIP runtime, supporting both the real runtime and a fake one.

#[cfg(any(test, feature = "test-util"))]
use std::borrow::Borrow;
use std::sync::Arc;

use tracing::{debug, warn};

#[cfg(any(test, feature = "test-util"))]
use crate::fake::{FakeRuntime, RuntimeBuilder};
use crate::pal::{Bindings, BindingsFacade};
use crate::{
    CorrectionPolicy, DeviceIndex, DeviceSelector, Error, HardwareDescriptor, RawDeviceProperties,
    Result, RuntimeOperation, RuntimeStatus,
};

/// Handle to the HIP runtime, the source of [`HardwareDescriptor`]s for devices.
///
/// A `HipRuntime` can represent either the real runtime installed on the machine (via
/// [`HipRuntime::new()`]) or a simulated runtime for testing (via `HipRuntime::fake()` when the
/// `test-util` feature is enabled). Clones are cheap and equivalent.
///
/// Every query goes to the runtime; nothing is cached between calls. No locking is performed,
/// so any number of threads may query through the same handle concurrently.
///
/// # Example
///
/// ```
/// use hip_hardware::HipRuntime;
///
/// let runtime = HipRuntime::new();
///
/// match runtime.descriptor_for_current_device() {
///     Ok(descriptor) => println!(
///         "Selecting kernels for {} with {} compute units",
///         descriptor.arch_name(),
///         descriptor.processor_count()
///     ),
///     Err(e) => println!("No usable GPU: {e}"),
/// }
/// ```
#[derive(Clone, Debug)]
pub struct HipRuntime {
    bindings: BindingsFacade,
    correction_policy: CorrectionPolicy,
}

impl HipRuntime {
    /// Returns a handle to the HIP runtime installed on the machine.
    ///
    /// The runtime library is loaded on first query. If it is not installed, every query fails
    /// with `hipErrorNoDevice`.
    #[must_use]
    pub fn new() -> Self {
        Self::from_bindings(BindingsFacade::real())
    }

    /// Creates a handle to a fake HIP runtime for testing purposes.
    ///
    /// This method is only available when the `test-util` feature is enabled. Each fake
    /// runtime is independent of every other, so fake runtimes can be used in parallel tests.
    #[cfg(any(test, feature = "test-util"))]
    #[must_use]
    pub fn fake(builder: impl Borrow<RuntimeBuilder>) -> Self {
        Self::from_bindings(BindingsFacade::from_fake(FakeRuntime::from_builder(
            builder.borrow(),
        )))
    }

    pub(crate) fn from_bindings(bindings: BindingsFacade) -> Self {
        Self {
            bindings,
            correction_policy: CorrectionPolicy::default(),
        }
    }

    /// Returns a handle that applies the given policy when the physical multiprocessor count
    /// cannot be read.
    #[must_use]
    pub fn with_correction_policy(self, policy: CorrectionPolicy) -> Self {
        Self {
            correction_policy: policy,
            ..self
        }
    }

    /// The policy applied when the physical multiprocessor count cannot be read.
    #[must_use]
    pub fn correction_policy(&self) -> CorrectionPolicy {
        self.correction_policy
    }

    /// Creates a descriptor for the device that is active for the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuntimeQuery`] if any runtime call fails, e.g. because there is no
    /// active device.
    pub fn descriptor_for_current_device(&self) -> Result<Arc<HardwareDescriptor>> {
        self.descriptor(DeviceSelector::Current)
    }

    /// Creates a descriptor for the device with the given index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuntimeQuery`] if any runtime call fails, e.g. because the index does
    /// not refer to a device.
    pub fn descriptor_for_device(&self, index: DeviceIndex) -> Result<Arc<HardwareDescriptor>> {
        self.descriptor(DeviceSelector::Index(index))
    }

    /// Creates a descriptor for the selected device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuntimeQuery`] if any runtime call fails.
    pub fn descriptor(&self, selector: DeviceSelector) -> Result<Arc<HardwareDescriptor>> {
        let properties = self.device_properties(selector)?;

        Ok(Arc::new(HardwareDescriptor::from_properties(properties)))
    }

    /// Reads the raw property block of the selected device.
    ///
    /// If the runtime can report the physical multiprocessor count, the multiprocessor count in
    /// the returned block is the physical count. The architecture name is as reported by the
    /// runtime, not yet normalized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuntimeQuery`] if any runtime call fails. Whether a failure to read the
    /// physical multiprocessor count is an error depends on the [`CorrectionPolicy`].
    pub fn device_properties(&self, selector: DeviceSelector) -> Result<RawDeviceProperties> {
        let device = self.resolve(selector)?;

        let mut properties = self
            .bindings
            .get_device_properties(device)
            .map_err(|status| Error::runtime(RuntimeOperation::GetDeviceProperties, status))?;

        self.correct_multiprocessor_count(device, &mut properties)?;

        Ok(properties)
    }

    fn resolve(&self, selector: DeviceSelector) -> Result<DeviceIndex> {
        match selector {
            DeviceSelector::Index(index) => Ok(index),
            DeviceSelector::Current => {
                let device = self
                    .bindings
                    .get_device()
                    .map_err(|status| Error::runtime(RuntimeOperation::GetDevice, status))?;

                DeviceIndex::try_from(device).ok().ok_or_else(|| {
                    Error::runtime(RuntimeOperation::GetDevice, RuntimeStatus::INVALID_DEVICE)
                })
            }
        }
    }

    fn correct_multiprocessor_count(
        &self,
        device: DeviceIndex,
        properties: &mut RawDeviceProperties,
    ) -> Result<()> {
        match self.physical_multiprocessor_count(device) {
            Ok(Some(count)) => {
                if count != properties.multiprocessor_count() {
                    debug!(
                        device,
                        reported = properties.multiprocessor_count(),
                        physical = count,
                        "replacing reported multiprocessor count with physical count"
                    );
                }

                properties.set_multiprocessor_count(count);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => match self.correction_policy {
                CorrectionPolicy::Required => Err(e),
                CorrectionPolicy::BestEffort => {
                    warn!(
                        device,
                        error = %e,
                        reported = properties.multiprocessor_count(),
                        "physical multiprocessor count unavailable; keeping reported count"
                    );
                    Ok(())
                }
            },
        }
    }

    /// The physical multiprocessor count, or `None` if the runtime is too old to report it.
    fn physical_multiprocessor_count(&self, device: DeviceIndex) -> Result<Option<u32>> {
        let version = self
            .bindings
            .runtime_get_version()
            .map_err(|status| Error::runtime(RuntimeOperation::RuntimeGetVersion, status))?;

        if !version.supports_physical_multiprocessor_count() {
            debug!(%version, "runtime does not report physical multiprocessor count");
            return Ok(None);
        }

        let count = self
            .bindings
            .physical_multiprocessor_count(device)
            .map_err(|status| Error::runtime(RuntimeOperation::DeviceGetAttribute, status))?;

        let count = u32::try_from(count).ok().ok_or_else(|| {
            Error::runtime(
                RuntimeOperation::DeviceGetAttribute,
                RuntimeStatus::INVALID_VALUE,
            )
        })?;

        Ok(Some(count))
    }
}

impl Default for HipRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use mockall::predicate::eq;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::pal::MockBindings;
    use crate::{PHYSICAL_MULTIPROCESSOR_COUNT_MIN_VERSION, RuntimeVersion};

    assert_impl_all!(HipRuntime: Send, Sync, Clone);

    const OLD_VERSION: RuntimeVersion = RuntimeVersion::new(50_013_601);

    fn properties(arch_name: &str, multiprocessor_count: u32) -> RawDeviceProperties {
        RawDeviceProperties::builder()
            .name("AMD Instinct MI250X")
            .arch_name(arch_name)
            .multiprocessor_count(multiprocessor_count)
            .build()
            .unwrap()
    }

    fn runtime(bindings: MockBindings) -> HipRuntime {
        HipRuntime::from_bindings(bindings.into())
    }

    #[test]
    fn current_device_is_resolved_then_queried() {
        let mut bindings = MockBindings::new();

        bindings.expect_get_device().once().returning(|| Ok(2));
        bindings
            .expect_get_device_properties()
            .with(eq(2))
            .once()
            .returning(|_| Ok(properties("gfx1031", 40)));
        bindings
            .expect_runtime_get_version()
            .once()
            .returning(|| Ok(OLD_VERSION));

        let descriptor = runtime(bindings).descriptor_for_current_device().unwrap();

        assert_eq!(descriptor.arch_name(), "gfx1030");
        assert_eq!(descriptor.processor_count(), 40);
    }

    #[test]
    fn current_device_failure_is_surfaced() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_get_device()
            .once()
            .returning(|| Err(RuntimeStatus::INVALID_CONTEXT));

        let error = runtime(bindings)
            .descriptor_for_current_device()
            .unwrap_err();

        assert!(matches!(
            error,
            Error::RuntimeQuery {
                operation: RuntimeOperation::GetDevice,
                status: RuntimeStatus::INVALID_CONTEXT,
            }
        ));
    }

    #[test]
    fn negative_current_device_is_invalid_device() {
        let mut bindings = MockBindings::new();

        bindings.expect_get_device().once().returning(|| Ok(-1));

        let error = runtime(bindings)
            .descriptor_for_current_device()
            .unwrap_err();

        assert_eq!(error.runtime_status(), Some(RuntimeStatus::INVALID_DEVICE));
    }

    #[test]
    fn invalid_index_is_surfaced_without_further_queries() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_get_device_properties()
            .with(eq(7))
            .once()
            .returning(|_| Err(RuntimeStatus::INVALID_DEVICE));
        bindings.expect_runtime_get_version().never();
        bindings.expect_physical_multiprocessor_count().never();

        let error = runtime(bindings).descriptor_for_device(7).unwrap_err();

        assert!(matches!(
            error,
            Error::RuntimeQuery {
                operation: RuntimeOperation::GetDeviceProperties,
                status: RuntimeStatus::INVALID_DEVICE,
            }
        ));
    }

    #[test]
    fn physical_count_replaces_reported_count() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_get_device_properties()
            .returning(|_| Ok(properties("gfx90a:sramecc+:xnack-", 110)));
        bindings
            .expect_runtime_get_version()
            .returning(|| Ok(PHYSICAL_MULTIPROCESSOR_COUNT_MIN_VERSION));
        bindings
            .expect_physical_multiprocessor_count()
            .with(eq(0))
            .once()
            .returning(|_| Ok(220));

        let descriptor = runtime(bindings).descriptor_for_device(0).unwrap();

        assert_eq!(descriptor.processor_count(), 220);
        assert_eq!(descriptor.arch_name(), "gfx90a:sramecc+:xnack-");
    }

    #[test]
    fn old_runtime_is_not_asked_for_physical_count() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_get_device_properties()
            .returning(|_| Ok(properties("gfx908", 120)));
        bindings
            .expect_runtime_get_version()
            .returning(|| Ok(OLD_VERSION));
        bindings.expect_physical_multiprocessor_count().never();

        let descriptor = runtime(bindings).descriptor_for_device(0).unwrap();

        assert_eq!(descriptor.processor_count(), 120);
    }

    #[test]
    fn attribute_failure_is_fatal_by_default() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_get_device_properties()
            .returning(|_| Ok(properties("gfx908", 120)));
        bindings
            .expect_runtime_get_version()
            .returning(|| Ok(PHYSICAL_MULTIPROCESSOR_COUNT_MIN_VERSION));
        bindings
            .expect_physical_multiprocessor_count()
            .returning(|_| Err(RuntimeStatus::NOT_SUPPORTED));

        let runtime = runtime(bindings);
        assert_eq!(runtime.correction_policy(), CorrectionPolicy::Required);

        let error = runtime.descriptor_for_device(0).unwrap_err();

        assert!(matches!(
            error,
            Error::RuntimeQuery {
                operation: RuntimeOperation::DeviceGetAttribute,
                status: RuntimeStatus::NOT_SUPPORTED,
            }
        ));
    }

    #[test]
    fn version_failure_is_fatal_by_default() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_get_device_properties()
            .returning(|_| Ok(properties("gfx908", 120)));
        bindings
            .expect_runtime_get_version()
            .returning(|| Err(RuntimeStatus::NOT_INITIALIZED));
        bindings.expect_physical_multiprocessor_count().never();

        let error = runtime(bindings).device_properties(0.into()).unwrap_err();

        assert!(matches!(
            error,
            Error::RuntimeQuery {
                operation: RuntimeOperation::RuntimeGetVersion,
                status: RuntimeStatus::NOT_INITIALIZED,
            }
        ));
    }

    #[test]
    fn best_effort_keeps_reported_count_on_failure() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_get_device_properties()
            .returning(|_| Ok(properties("gfx908", 120)));
        bindings
            .expect_runtime_get_version()
            .returning(|| Ok(PHYSICAL_MULTIPROCESSOR_COUNT_MIN_VERSION));
        bindings
            .expect_physical_multiprocessor_count()
            .returning(|_| Err(RuntimeStatus::NOT_SUPPORTED));

        let descriptor = runtime(bindings)
            .with_correction_policy(CorrectionPolicy::BestEffort)
            .descriptor_for_device(0)
            .unwrap();

        assert_eq!(descriptor.processor_count(), 120);
    }

    #[test]
    fn negative_physical_count_is_invalid_value() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_get_device_properties()
            .returning(|_| Ok(properties("gfx908", 120)));
        bindings
            .expect_runtime_get_version()
            .returning(|| Ok(PHYSICAL_MULTIPROCESSOR_COUNT_MIN_VERSION));
        bindings
            .expect_physical_multiprocessor_count()
            .returning(|_| Ok(-4));

        let error = runtime(bindings).descriptor_for_device(0).unwrap_err();

        assert_eq!(error.runtime_status(), Some(RuntimeStatus::INVALID_VALUE));
    }

    #[test]
    fn device_properties_are_not_normalized() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_get_device_properties()
            .returning(|_| Ok(properties("gfx1032", 32)));
        bindings
            .expect_runtime_get_version()
            .returning(|| Ok(OLD_VERSION));

        let properties = runtime(bindings)
            .device_properties(DeviceSelector::Index(0))
            .unwrap();

        assert_eq!(properties.arch_name(), "gfx1032");
    }

    #[test]
    fn every_query_goes_to_the_runtime() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_get_device_properties()
            .times(2)
            .returning(|_| Ok(properties("gfx906", 60)));
        bindings
            .expect_runtime_get_version()
            .times(2)
            .returning(|| Ok(OLD_VERSION));

        let runtime = runtime(bindings);

        let first = runtime.descriptor_for_device(0).unwrap();
        let second = runtime.descriptor_for_device(0).unwrap();

        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn fake_runtime_backs_handle() {
        use crate::fake::DeviceBuilder;

        let runtime = HipRuntime::fake(
            RuntimeBuilder::new().device(
                DeviceBuilder::new(properties("gfx1035", 12)).physical_multiprocessor_count(6),
            ),
        );

        let descriptor = runtime.descriptor_for_current_device().unwrap();

        assert_eq!(descriptor.arch_name(), "gfx1030");
        assert_eq!(descriptor.processor_count(), 6);
    }
}
