use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{RawDeviceProperties, TargetId, normalize};

/// The canonical, immutable hardware identity of a device, as used by kernel selection.
///
/// The architecture name is always the normalized family name (see
/// [`normalize_arch_name()`][crate::normalize_arch_name]), never a per-revision name that
/// collapses onto a family. The full property block is retained for callers that need more
/// detail.
///
/// Two descriptors are equal if they have the same architecture name and multiprocessor count.
/// The other properties may legitimately differ between equivalent devices or driver versions
/// and do not take part in comparison or hashing.
///
/// Descriptors are handed out as `Arc<HardwareDescriptor>` so any number of consumers can hold
/// and compare them across threads.
///
/// # Example
///
/// ```
/// use hip_hardware::{RawDeviceProperties, descriptor_from_properties};
///
/// let properties = RawDeviceProperties::builder()
///     .name("AMD Radeon RX 6700 XT")
///     .arch_name("gfx1031")
///     .multiprocessor_count(40)
///     .build()
///     .unwrap();
///
/// let descriptor = descriptor_from_properties(properties);
///
/// assert_eq!(descriptor.arch_name(), "gfx1030");
/// assert_eq!(descriptor.processor_count(), 40);
/// assert_eq!(descriptor.properties().arch_name().as_str(), "gfx1030");
/// ```
#[derive(Clone, Debug)]
pub struct HardwareDescriptor {
    properties: RawDeviceProperties,
    target: TargetId,
}

impl HardwareDescriptor {
    /// Creates a descriptor, normalizing the architecture name first.
    ///
    /// Never issues a runtime call.
    #[must_use]
    pub fn from_properties(properties: RawDeviceProperties) -> Self {
        let properties = normalize(properties);
        let target = TargetId::parse(properties.arch_name().as_str());

        Self { properties, target }
    }

    /// Canonical architecture name, e.g. "gfx1030".
    #[must_use]
    pub fn arch_name(&self) -> &str {
        self.properties.arch_name().as_str()
    }

    /// Number of multiprocessors (compute units), corrected to the physical count when the
    /// runtime is able to report it.
    #[must_use]
    pub fn processor_count(&self) -> u32 {
        self.properties.multiprocessor_count()
    }

    /// Human-readable name of the device.
    #[must_use]
    pub fn device_name(&self) -> &str {
        self.properties.name().as_str()
    }

    /// The architecture name split into processor and target features.
    #[must_use]
    pub fn target(&self) -> &TargetId {
        &self.target
    }

    /// The property block the descriptor was built from, with the normalized architecture name.
    #[must_use]
    pub fn properties(&self) -> &RawDeviceProperties {
        &self.properties
    }
}

impl PartialEq for HardwareDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.arch_name() == other.arch_name() && self.processor_count() == other.processor_count()
    }
}

impl Eq for HardwareDescriptor {}

impl Display for HardwareDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} CUs)",
            self.device_name(),
            self.arch_name(),
            self.processor_count()
        )
    }
}

impl Hash for HardwareDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arch_name().hash(state);
        self.processor_count().hash(state);
    }
}

/// Creates a shared descriptor from a property block, normalizing the architecture name.
///
/// Use this for property blocks obtained without going through
/// [`HipRuntime`][crate::HipRuntime]. Never issues a runtime call.
#[must_use]
pub fn descriptor_from_properties(properties: RawDeviceProperties) -> Arc<HardwareDescriptor> {
    Arc::new(HardwareDescriptor::from_properties(properties))
}
