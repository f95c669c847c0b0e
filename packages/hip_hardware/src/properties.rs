use crate::{BoundedName, Result};

/// The property block of a device, as reported by the HIP runtime.
///
/// Only the device name, the architecture name and the multiprocessor count are interpreted by
/// this package. The remaining fields are carried along for callers that need more detail than
/// the canonical [`HardwareDescriptor`][crate::HardwareDescriptor] offers.
///
/// Values obtained from [`HipRuntime`][crate::HipRuntime] are raw: the architecture name is as
/// reported by the runtime, not yet collapsed onto its family. To create a property block by hand
/// (e.g. when the properties were obtained elsewhere), use [`RawDeviceProperties::builder()`].
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct RawDeviceProperties {
    name: BoundedName,
    arch_name: BoundedName,
    multiprocessor_count: u32,

    total_global_mem: u64,
    shared_mem_per_block: u64,
    warp_size: u32,
    max_threads_per_block: u32,
    clock_rate_khz: u32,
    major: u32,
    minor: u32,
    l2_cache_size: u32,
    max_shared_memory_per_multiprocessor: u64,
    pci_domain_id: u32,
    pci_bus_id: u32,
    pci_device_id: u32,
}

impl RawDeviceProperties {
    /// Starts building a property block by hand.
    pub fn builder() -> RawDevicePropertiesBuilder {
        RawDevicePropertiesBuilder::default()
    }

    /// Human-readable name of the device, e.g. "AMD Radeon RX 6800 XT".
    #[must_use]
    pub fn name(&self) -> &BoundedName {
        &self.name
    }

    /// Architecture name, e.g. "gfx90a:sramecc+:xnack-".
    #[must_use]
    pub fn arch_name(&self) -> &BoundedName {
        &self.arch_name
    }

    /// Number of multiprocessors (compute units) on the device.
    #[must_use]
    pub fn multiprocessor_count(&self) -> u32 {
        self.multiprocessor_count
    }

    /// Global memory in bytes.
    #[must_use]
    pub fn total_global_mem(&self) -> u64 {
        self.total_global_mem
    }

    /// Shared memory available to a single block, in bytes.
    #[must_use]
    pub fn shared_mem_per_block(&self) -> u64 {
        self.shared_mem_per_block
    }

    /// Wavefront size in threads.
    #[must_use]
    pub fn warp_size(&self) -> u32 {
        self.warp_size
    }

    /// Maximum number of threads in a block.
    #[must_use]
    pub fn max_threads_per_block(&self) -> u32 {
        self.max_threads_per_block
    }

    /// Peak clock rate in kilohertz.
    #[must_use]
    pub fn clock_rate_khz(&self) -> u32 {
        self.clock_rate_khz
    }

    /// Major and minor compute capability, as reported by the runtime.
    #[must_use]
    pub fn compute_capability(&self) -> (u32, u32) {
        (self.major, self.minor)
    }

    /// L2 cache size in bytes.
    #[must_use]
    pub fn l2_cache_size(&self) -> u32 {
        self.l2_cache_size
    }

    /// Shared memory available to a single multiprocessor, in bytes.
    #[must_use]
    pub fn max_shared_memory_per_multiprocessor(&self) -> u64 {
        self.max_shared_memory_per_multiprocessor
    }

    /// PCI domain, bus and device IDs.
    #[must_use]
    pub fn pci_location(&self) -> (u32, u32, u32) {
        (self.pci_domain_id, self.pci_bus_id, self.pci_device_id)
    }

    pub(crate) fn set_arch_name(&mut self, arch_name: BoundedName) {
        self.arch_name = arch_name;
    }

    pub(crate) fn set_multiprocessor_count(&mut self, count: u32) {
        self.multiprocessor_count = count;
    }
}

/// Builds a [`RawDeviceProperties`] by hand.
///
/// Fields that are not set keep their zero value.
///
/// # Example
///
/// ```
/// use hip_hardware::RawDeviceProperties;
///
/// let properties = RawDeviceProperties::builder()
///     .name("AMD Radeon RX 6700 XT")
///     .arch_name("gfx1031")
///     .multiprocessor_count(40)
///     .build()
///     .unwrap();
///
/// assert_eq!(properties.arch_name().as_str(), "gfx1031");
/// ```
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct RawDevicePropertiesBuilder {
    name: String,
    arch_name: String,
    properties: RawDeviceProperties,
}

impl RawDevicePropertiesBuilder {
    /// Sets the human-readable device name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the architecture name.
    pub fn arch_name(mut self, arch_name: impl Into<String>) -> Self {
        self.arch_name = arch_name.into();
        self
    }

    /// Sets the multiprocessor count.
    pub fn multiprocessor_count(mut self, count: u32) -> Self {
        self.properties.multiprocessor_count = count;
        self
    }

    /// Sets the global memory size in bytes.
    pub fn total_global_mem(mut self, bytes: u64) -> Self {
        self.properties.total_global_mem = bytes;
        self
    }

    /// Sets the shared memory per block in bytes.
    pub fn shared_mem_per_block(mut self, bytes: u64) -> Self {
        self.properties.shared_mem_per_block = bytes;
        self
    }

    /// Sets the wavefront size.
    pub fn warp_size(mut self, threads: u32) -> Self {
        self.properties.warp_size = threads;
        self
    }

    /// Sets the maximum number of threads per block.
    pub fn max_threads_per_block(mut self, threads: u32) -> Self {
        self.properties.max_threads_per_block = threads;
        self
    }

    /// Sets the peak clock rate in kilohertz.
    pub fn clock_rate_khz(mut self, khz: u32) -> Self {
        self.properties.clock_rate_khz = khz;
        self
    }

    /// Sets the compute capability.
    pub fn compute_capability(mut self, major: u32, minor: u32) -> Self {
        self.properties.major = major;
        self.properties.minor = minor;
        self
    }

    /// Sets the L2 cache size in bytes.
    pub fn l2_cache_size(mut self, bytes: u32) -> Self {
        self.properties.l2_cache_size = bytes;
        self
    }

    /// Sets the shared memory per multiprocessor in bytes.
    pub fn max_shared_memory_per_multiprocessor(mut self, bytes: u64) -> Self {
        self.properties.max_shared_memory_per_multiprocessor = bytes;
        self
    }

    /// Sets the PCI domain, bus and device IDs.
    pub fn pci_location(mut self, domain: u32, bus: u32, device: u32) -> Self {
        self.properties.pci_domain_id = domain;
        self.properties.pci_bus_id = bus;
        self.properties.pci_device_id = device;
        self
    }

    /// Completes the property block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NameTooLong`][crate::Error::NameTooLong] if the device name or the
    /// architecture name do not fit into the fixed-capacity name buffers.
    pub fn build(self) -> Result<RawDeviceProperties> {
        let mut properties = self.properties;

        properties.name = BoundedName::new(self.name)?;
        properties.arch_name = BoundedName::new(self.arch_name)?;

        Ok(properties)
    }

    /// Completes the property block from names that have already been checked. Used when
    /// translating runtime-owned buffers.
    pub(crate) fn build_with_names(
        self,
        name: BoundedName,
        arch_name: BoundedName,
    ) -> RawDeviceProperties {
        RawDeviceProperties {
            name,
            arch_name,
            ..self.properties
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{Error, NAME_CAPACITY};

    #[test]
    fn builder_sets_all_fields() {
        let properties = RawDeviceProperties::builder()
            .name("AMD Instinct MI210")
            .arch_name("gfx90a:sramecc+:xnack-")
            .multiprocessor_count(104)
            .total_global_mem(64 << 30)
            .shared_mem_per_block(64 << 10)
            .warp_size(64)
            .max_threads_per_block(1024)
            .clock_rate_khz(1_700_000)
            .compute_capability(9, 0)
            .l2_cache_size(8 << 20)
            .max_shared_memory_per_multiprocessor(64 << 10)
            .pci_location(0, 0x63, 0)
            .build()
            .unwrap();

        assert_eq!(properties.name(), "AMD Instinct MI210");
        assert_eq!(properties.arch_name(), "gfx90a:sramecc+:xnack-");
        assert_eq!(properties.multiprocessor_count(), 104);
        assert_eq!(properties.total_global_mem(), 64 << 30);
        assert_eq!(properties.shared_mem_per_block(), 64 << 10);
        assert_eq!(properties.warp_size(), 64);
        assert_eq!(properties.max_threads_per_block(), 1024);
        assert_eq!(properties.clock_rate_khz(), 1_700_000);
        assert_eq!(properties.compute_capability(), (9, 0));
        assert_eq!(properties.l2_cache_size(), 8 << 20);
        assert_eq!(properties.max_shared_memory_per_multiprocessor(), 64 << 10);
        assert_eq!(properties.pci_location(), (0, 0x63, 0));
    }

    #[test]
    fn builder_rejects_oversized_arch_name() {
        let result = RawDeviceProperties::builder()
            .arch_name("gfx".repeat(NAME_CAPACITY))
            .build();

        assert!(matches!(result, Err(Error::NameTooLong { .. })));
    }

    #[test]
    fn builder_rejects_oversized_device_name() {
        let result = RawDeviceProperties::builder()
            .name("n".repeat(NAME_CAPACITY))
            .arch_name("gfx906")
            .build();

        assert!(matches!(result, Err(Error::NameTooLong { .. })));
    }
}
