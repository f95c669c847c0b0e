#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Canonical hardware identity of AMD GPUs, derived from the device properties reported by the
//! HIP runtime.
//!
//! Libraries that ship precompiled GPU kernels select them by architecture. The HIP runtime,
//! however, reports per-revision architecture names such as `gfx1031` or `gfx90c:xnack-`, and
//! kernel selection keyed on families would otherwise have to enumerate every silicon revision.
//! This package collapses such names onto the canonical family names (`gfx1030`, `gfx900`, ...)
//! and produces an immutable [`HardwareDescriptor`] that kernel selection can key on.
//!
//! It also resolves a multiprocessor count discrepancy between runtime versions: the count in
//! the device property block may be adjusted for virtualization or partitioning, so runtimes
//! that can report the physical count via a device attribute are asked for it.
//!
//! # Quick start
//!
//! ```rust
//! use hip_hardware::HipRuntime;
//!
//! let runtime = HipRuntime::new();
//!
//! if let Ok(descriptor) = runtime.descriptor_for_device(0) {
//!     println!(
//!         "Device 0 is a {} ({} compute units)",
//!         descriptor.arch_name(),
//!         descriptor.processor_count()
//!     );
//! }
//! ```
//!
//! Descriptors are returned as `Arc<HardwareDescriptor>` and can be shared freely between
//! threads. They compare equal when their architecture name and processor count are equal.
//!
//! # Properties obtained elsewhere
//!
//! If the device properties were obtained without going through this package, build them with
//! [`RawDeviceProperties::builder()`] and turn them into a descriptor with
//! [`descriptor_from_properties()`], which normalizes the architecture name and never calls into
//! the runtime.
//!
//! # Architecture normalization
//!
//! See [`normalize_arch_name()`] for the rules. The rules are total: normalization never fails.
//!
//! # Runtime availability
//!
//! The HIP runtime library is loaded on first use rather than linked. On machines without the
//! runtime installed (and on non-Unix platforms), every query fails with `hipErrorNoDevice`.
//!
//! # Testing with a fake runtime
//!
//! With the `test-util` Cargo feature enabled, the [`fake`] module can simulate a HIP runtime
//! with arbitrary devices, runtime versions and failing calls.
//!
//! # Logging
//!
//! Decisions made while building a descriptor are emitted as `tracing` events at `debug`
//! level; best-effort fallbacks are emitted at `warn` level. No subscriber is installed.

mod bounded_name;
mod descriptor;
mod error;
mod normalize;
mod primitive_types;
mod properties;
mod runtime;
mod target_id;

pub(crate) mod pal;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use bounded_name::*;
pub use descriptor::*;
pub use error::*;
pub use normalize::*;
pub use primitive_types::*;
pub use properties::*;
pub use runtime::*;
pub use target_id::*;
