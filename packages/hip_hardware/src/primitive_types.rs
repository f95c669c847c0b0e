use std::fmt::{self, Display};

use derive_more::derive::Display as DeriveDisplay;

/// Identifies a specific device known to the HIP runtime.
///
/// This matches the ordinal used by the HIP runtime and by standard tooling such as `rocm-smi`.
pub type DeviceIndex = u32;

/// Selects the device to query.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "a device is either the active one or named by index, nothing else"
)]
pub enum DeviceSelector {
    /// The device that is active for the calling thread in the HIP runtime.
    Current,

    /// A specific device, by index.
    Index(DeviceIndex),
}

impl From<DeviceIndex> for DeviceSelector {
    fn from(index: DeviceIndex) -> Self {
        Self::Index(index)
    }
}

/// Version number reported by `hipRuntimeGetVersion()`.
///
/// The value is opaque apart from its ordering. HIP encodes it as
/// `major * 10_000_000 + minor * 100_000 + patch`.
#[derive(Clone, Copy, Debug, DeriveDisplay, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{_0}")]
pub struct RuntimeVersion(i32);

/// The first HIP runtime release that reports the physical multiprocessor count.
///
/// The count is reported as a device attribute. Older releases only report the count through the
/// device property block, which can be adjusted for virtualization or partitioning.
pub const PHYSICAL_MULTIPROCESSOR_COUNT_MIN_VERSION: RuntimeVersion = RuntimeVersion(50_220_730);

impl RuntimeVersion {
    /// Wraps a raw version number as reported by the runtime.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw version number.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether the physical multiprocessor count attribute can be queried from this runtime.
    #[must_use]
    pub const fn supports_physical_multiprocessor_count(self) -> bool {
        self.0 >= PHYSICAL_MULTIPROCESSOR_COUNT_MIN_VERSION.0
    }
}

/// Status code (`hipError_t`) returned by a failed HIP runtime call.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RuntimeStatus(i32);

impl RuntimeStatus {
    /// `hipErrorInvalidValue`
    pub const INVALID_VALUE: Self = Self(1);

    /// `hipErrorOutOfMemory`
    pub const OUT_OF_MEMORY: Self = Self(2);

    /// `hipErrorNotInitialized`
    pub const NOT_INITIALIZED: Self = Self(3);

    /// `hipErrorNoDevice`
    pub const NO_DEVICE: Self = Self(100);

    /// `hipErrorInvalidDevice`
    pub const INVALID_DEVICE: Self = Self(101);

    /// `hipErrorInvalidContext`
    pub const INVALID_CONTEXT: Self = Self(201);

    /// `hipErrorNotSupported`
    pub const NOT_SUPPORTED: Self = Self(801);

    /// `hipErrorUnknown`
    pub const UNKNOWN: Self = Self(999);

    /// Wraps a raw status code as returned by the runtime.
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    /// The raw status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// The symbolic name of the status code, if it is one we recognize.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            1 => Some("hipErrorInvalidValue"),
            2 => Some("hipErrorOutOfMemory"),
            3 => Some("hipErrorNotInitialized"),
            100 => Some("hipErrorNoDevice"),
            101 => Some("hipErrorInvalidDevice"),
            201 => Some("hipErrorInvalidContext"),
            801 => Some("hipErrorNotSupported"),
            999 => Some("hipErrorUnknown"),
            _ => None,
        }
    }
}

impl Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "unrecognized status ({})", self.0),
        }
    }
}

/// The HIP runtime calls issued by this package.
#[derive(Clone, Copy, Debug, DeriveDisplay, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum RuntimeOperation {
    /// Resolves the active device of the calling thread.
    #[display("hipGetDevice")]
    GetDevice,

    /// Reads the property block of a device.
    #[display("hipGetDeviceProperties")]
    GetDeviceProperties,

    /// Reads the version of the runtime.
    #[display("hipRuntimeGetVersion")]
    RuntimeGetVersion,

    /// Reads the physical multiprocessor count attribute of a device.
    #[display("hipDeviceGetAttribute")]
    DeviceGetAttribute,
}

/// What to do when the physical multiprocessor count cannot be read from the runtime.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "the failure is either surfaced or it is not"
)]
pub enum CorrectionPolicy {
    /// Failure of the version or attribute query fails the whole property fetch.
    #[default]
    Required,

    /// Failure of the version or attribute query is logged and the multiprocessor count
    /// reported in the device property block is kept.
    BestEffort,
}
