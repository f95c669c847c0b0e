//! Fake HIP runtime for testing code that depends on GPU hardware.
//!
//! This module is available when the `test-util` Cargo feature is enabled. It lets tests
//! describe the devices a runtime reports, the runtime version and failures of individual runtime
//! calls, without an AMD GPU or the HIP runtime installed.
//!
//! To make your code testable with a fake runtime, accept a [`HipRuntime`][crate::HipRuntime] as a
//! value (typically as a function parameter or struct field) instead of always calling
//! [`HipRuntime::new()`][crate::HipRuntime::new].
//!
//! # Example
//!
//! ```
//! use hip_hardware::fake::{DeviceBuilder, RuntimeBuilder};
//! use hip_hardware::{HipRuntime, RawDeviceProperties};
//!
//! let runtime = HipRuntime::fake(
//!     RuntimeBuilder::new().device(
//!         DeviceBuilder::new(
//!             RawDeviceProperties::builder()
//!                 .name("AMD Radeon RX 6700 XT")
//!                 .arch_name("gfx1031")
//!                 .multiprocessor_count(40)
//!                 .build()
//!                 .unwrap(),
//!         )
//!         .physical_multiprocessor_count(40),
//!     ),
//! );
//!
//! let descriptor = runtime.descriptor_for_current_device().unwrap();
//!
//! assert_eq!(descriptor.arch_name(), "gfx1030");
//! ```

mod builder;
mod runtime;

pub use builder::*;
pub(crate) use runtime::*;
