#![cfg_attr(coverage_nightly, coverage(off))]

use std::fmt::{self, Debug};
#[cfg(any(test, feature = "test-util"))]
use std::sync::Arc;

#[cfg(any(test, feature = "test-util"))]
use crate::fake::FakeRuntime;
#[cfg(test)]
use crate::pal::MockBindings;
use crate::pal::{BUILD_TARGET_BINDINGS, Bindings, BuildTargetBindings};
use crate::{DeviceIndex, RawDeviceProperties, RuntimeStatus, RuntimeVersion};

/// Enum to hide the real/fake/mock choice behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum BindingsFacade {
    Real(&'static BuildTargetBindings),

    #[cfg(any(test, feature = "test-util"))]
    Fake(Arc<FakeRuntime>),

    #[cfg(test)]
    Mock(Arc<MockBindings>),
}

impl BindingsFacade {
    pub(crate) const fn real() -> Self {
        Self::Real(&BUILD_TARGET_BINDINGS)
    }

    #[cfg(any(test, feature = "test-util"))]
    pub(crate) fn from_fake(fake: FakeRuntime) -> Self {
        Self::Fake(Arc::new(fake))
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockBindings) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Bindings for BindingsFacade {
    fn get_device(&self) -> Result<i32, RuntimeStatus> {
        match self {
            Self::Real(bindings) => bindings.get_device(),
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(bindings) => bindings.get_device(),
            #[cfg(test)]
            Self::Mock(bindings) => bindings.get_device(),
        }
    }

    fn get_device_properties(
        &self,
        device: DeviceIndex,
    ) -> Result<RawDeviceProperties, RuntimeStatus> {
        match self {
            Self::Real(bindings) => bindings.get_device_properties(device),
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(bindings) => bindings.get_device_properties(device),
            #[cfg(test)]
            Self::Mock(bindings) => bindings.get_device_properties(device),
        }
    }

    fn runtime_get_version(&self) -> Result<RuntimeVersion, RuntimeStatus> {
        match self {
            Self::Real(bindings) => bindings.runtime_get_version(),
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(bindings) => bindings.runtime_get_version(),
            #[cfg(test)]
            Self::Mock(bindings) => bindings.runtime_get_version(),
        }
    }

    fn physical_multiprocessor_count(&self, device: DeviceIndex) -> Result<i32, RuntimeStatus> {
        match self {
            Self::Real(bindings) => bindings.physical_multiprocessor_count(device),
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(bindings) => bindings.physical_multiprocessor_count(device),
            #[cfg(test)]
            Self::Mock(bindings) => bindings.physical_multiprocessor_count(device),
        }
    }
}

impl From<&'static BuildTargetBindings> for BindingsFacade {
    fn from(bindings: &'static BuildTargetBindings) -> Self {
        Self::Real(bindings)
    }
}

#[cfg(any(test, feature = "test-util"))]
impl From<FakeRuntime> for BindingsFacade {
    fn from(fake: FakeRuntime) -> Self {
        Self::from_fake(fake)
    }
}

#[cfg(test)]
impl From<MockBindings> for BindingsFacade {
    fn from(mock: MockBindings) -> Self {
        Self::from_mock(mock)
    }
}

impl Debug for BindingsFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(inner) => inner.fmt(f),
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
