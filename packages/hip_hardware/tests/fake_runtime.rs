//! Builds descriptors through the public API against a fake HIP runtime.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use hip_hardware::fake::{DeviceBuilder, RuntimeBuilder};
use hip_hardware::{
    CorrectionPolicy, DeviceSelector, Error, HardwareDescriptor, HipRuntime,
    PHYSICAL_MULTIPROCESSOR_COUNT_MIN_VERSION, RawDeviceProperties, RuntimeOperation,
    RuntimeStatus, RuntimeVersion, descriptor_from_properties,
};

fn device(name: &str, arch_name: &str, multiprocessor_count: u32) -> DeviceBuilder {
    DeviceBuilder::new(
        RawDeviceProperties::builder()
            .name(name)
            .arch_name(arch_name)
            .multiprocessor_count(multiprocessor_count)
            .warp_size(64)
            .build()
            .unwrap(),
    )
}

fn workstation() -> RuntimeBuilder {
    RuntimeBuilder::new()
        .device(device("AMD Radeon RX 6700 XT", "gfx1031", 40).physical_multiprocessor_count(40))
        .device(
            device("AMD Radeon VII", "gfx906:sramecc+:xnack-", 60)
                .physical_multiprocessor_count(60),
        )
        .device(
            device("AMD Instinct MI210", "gfx90a:sramecc+:xnack-", 104)
                .physical_multiprocessor_count(104),
        )
}

#[test]
fn descriptors_for_each_device() {
    let runtime = HipRuntime::fake(workstation());

    let arch_names: Vec<_> = (0..3)
        .map(|index| runtime.descriptor_for_device(index).unwrap())
        .map(|descriptor| descriptor.arch_name().to_owned())
        .collect();

    assert_eq!(
        arch_names,
        [
            "gfx1030",
            "gfx906:sramecc+:xnack-",
            "gfx90a:sramecc+:xnack-",
        ]
    );
}

#[test]
fn current_device_follows_runtime() {
    let runtime = HipRuntime::fake(workstation().current_device(1));

    let descriptor = runtime.descriptor_for_current_device().unwrap();

    assert_eq!(descriptor.device_name(), "AMD Radeon VII");
    assert_eq!(descriptor.target().processor(), "gfx906");
}

#[test]
fn invalid_index_constructs_no_descriptor() {
    let runtime = HipRuntime::fake(workstation());

    let error = runtime.descriptor_for_device(3).unwrap_err();

    assert!(matches!(
        error,
        Error::RuntimeQuery {
            operation: RuntimeOperation::GetDeviceProperties,
            status: RuntimeStatus::INVALID_DEVICE,
        }
    ));
}

#[test]
fn no_device_context() {
    let runtime = HipRuntime::fake(RuntimeBuilder::new());

    let error = runtime.descriptor_for_current_device().unwrap_err();

    assert_eq!(error.runtime_status(), Some(RuntimeStatus::NO_DEVICE));
}

#[test]
fn partitioned_device_reports_physical_count() {
    // A partitioned MI250X GCD reports a virtual count in its property block.
    let runtime = HipRuntime::fake(
        RuntimeBuilder::new().device(
            device("AMD Instinct MI250X", "gfx90a:sramecc+:xnack-", 220)
                .physical_multiprocessor_count(110),
        ),
    );

    let descriptor = runtime.descriptor_for_device(0).unwrap();

    assert_eq!(descriptor.processor_count(), 110);
    assert_eq!(descriptor.properties().multiprocessor_count(), 110);
}

#[test]
fn old_runtime_keeps_reported_count() {
    let runtime = HipRuntime::fake(
        RuntimeBuilder::new()
            .version(RuntimeVersion::new(
                PHYSICAL_MULTIPROCESSOR_COUNT_MIN_VERSION.get() - 1,
            ))
            .device(
                device("AMD Instinct MI250X", "gfx90a", 220).physical_multiprocessor_count(110),
            ),
    );

    let descriptor = runtime.descriptor_for_device(0).unwrap();

    assert_eq!(descriptor.processor_count(), 220);
}

#[test]
fn missing_attribute_depends_on_policy() {
    // No physical count configured, so the attribute query is not supported.
    let builder = RuntimeBuilder::new().device(device("AMD Radeon VII", "gfx906", 60));

    let required = HipRuntime::fake(&builder);
    let error = required.descriptor_for_device(0).unwrap_err();
    assert!(matches!(
        error,
        Error::RuntimeQuery {
            operation: RuntimeOperation::DeviceGetAttribute,
            status: RuntimeStatus::NOT_SUPPORTED,
        }
    ));

    let best_effort =
        HipRuntime::fake(&builder).with_correction_policy(CorrectionPolicy::BestEffort);
    let descriptor = best_effort.descriptor_for_device(0).unwrap();
    assert_eq!(descriptor.processor_count(), 60);
}

#[test]
fn version_query_failure_depends_on_policy() {
    let builder = workstation().fail(
        RuntimeOperation::RuntimeGetVersion,
        RuntimeStatus::NOT_INITIALIZED,
    );

    let error = HipRuntime::fake(&builder)
        .descriptor(DeviceSelector::Index(0))
        .unwrap_err();
    assert_eq!(error.runtime_status(), Some(RuntimeStatus::NOT_INITIALIZED));

    let descriptor = HipRuntime::fake(&builder)
        .with_correction_policy(CorrectionPolicy::BestEffort)
        .descriptor(DeviceSelector::Index(0))
        .unwrap();
    assert_eq!(descriptor.arch_name(), "gfx1030");
}

#[test]
fn raw_properties_keep_reported_arch_name() {
    let runtime = HipRuntime::fake(workstation());

    let properties = runtime.device_properties(DeviceSelector::Current).unwrap();

    assert_eq!(properties.arch_name(), "gfx1031");
    assert_eq!(properties.warp_size(), 64);
}

#[test]
fn descriptor_from_properties_matches_runtime_descriptor() {
    let runtime = HipRuntime::fake(workstation());

    let from_runtime = runtime.descriptor_for_device(0).unwrap();
    let from_properties = descriptor_from_properties(runtime.device_properties(0.into()).unwrap());

    assert_eq!(from_runtime, from_properties);
}

#[test]
fn descriptors_are_shared_across_threads() {
    let runtime = HipRuntime::fake(workstation());

    let descriptors: Vec<Arc<HardwareDescriptor>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..3)
            .map(|index| {
                let runtime = runtime.clone();
                scope.spawn(move || runtime.descriptor_for_device(index).unwrap())
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    // Consumers key kernel tables on descriptors.
    let mut kernels = HashMap::new();
    for descriptor in &descriptors {
        kernels.insert(Arc::clone(descriptor), descriptor.arch_name().to_owned());
    }

    assert_eq!(kernels.len(), 3);

    thread::scope(|scope| {
        for descriptor in &descriptors {
            scope.spawn(|| {
                assert!(kernels.contains_key(descriptor));
            });
        }
    });
}
