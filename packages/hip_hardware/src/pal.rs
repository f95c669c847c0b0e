//! Platform Abstraction Layer (PAL). Every call into the HIP runtime goes through the `Bindings`
//! trait defined here, so unit tests can substitute mocks and integration tests a fake runtime.

mod abstractions;
mod facade;

pub(crate) use abstractions::*;
pub(crate) use facade::*;

#[cfg(all(unix, not(miri)))]
mod unix;
#[cfg(all(unix, not(miri)))]
pub(crate) use unix::*;

// Without a way to load shared libraries, every query reports that there is no device.
#[cfg(any(miri, not(unix)))]
mod fallback;
#[cfg(any(miri, not(unix)))]
pub(crate) use fallback::*;
