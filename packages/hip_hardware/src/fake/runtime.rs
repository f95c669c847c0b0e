use crate::fake::RuntimeBuilder;
use crate::pal::Bindings;
use crate::{DeviceIndex, RawDeviceProperties, RuntimeOperation, RuntimeStatus, RuntimeVersion};

#[derive(Debug)]
struct FakeDevice {
    properties: RawDeviceProperties,
    physical_multiprocessor_count: Option<i32>,
}

/// Simulated HIP runtime, answering the PAL bindings from a [`RuntimeBuilder`] configuration.
#[derive(Debug)]
pub(crate) struct FakeRuntime {
    devices: Vec<FakeDevice>,
    current_device: Option<DeviceIndex>,
    version: RuntimeVersion,
    failures: Vec<(RuntimeOperation, RuntimeStatus)>,
}

impl FakeRuntime {
    pub(crate) fn from_builder(builder: &RuntimeBuilder) -> Self {
        let devices = builder
            .devices
            .iter()
            .map(|device| FakeDevice {
                properties: device.properties.clone(),
                physical_multiprocessor_count: device.physical_multiprocessor_count,
            })
            .collect::<Vec<_>>();

        let current_device = builder
            .current_device
            .or_else(|| (!devices.is_empty()).then_some(0));

        Self {
            devices,
            current_device,
            version: builder.version,
            failures: builder.failures.clone(),
        }
    }

    fn injected_failure(&self, operation: RuntimeOperation) -> Result<(), RuntimeStatus> {
        self.failures
            .iter()
            .rev()
            .find(|(failing, _)| *failing == operation)
            .map_or(Ok(()), |(_, status)| Err(*status))
    }

    fn device(&self, index: DeviceIndex) -> Result<&FakeDevice, RuntimeStatus> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.devices.get(index))
            .ok_or(RuntimeStatus::INVALID_DEVICE)
    }
}

impl Bindings for FakeRuntime {
    fn get_device(&self) -> Result<i32, RuntimeStatus> {
        self.injected_failure(RuntimeOperation::GetDevice)?;

        let index = self.current_device.ok_or(RuntimeStatus::NO_DEVICE)?;

        i32::try_from(index)
            .ok()
            .ok_or(RuntimeStatus::INVALID_DEVICE)
    }

    fn get_device_properties(
        &self,
        device: DeviceIndex,
    ) -> Result<RawDeviceProperties, RuntimeStatus> {
        self.injected_failure(RuntimeOperation::GetDeviceProperties)?;

        Ok(self.device(device)?.properties.clone())
    }

    fn runtime_get_version(&self) -> Result<RuntimeVersion, RuntimeStatus> {
        self.injected_failure(RuntimeOperation::RuntimeGetVersion)?;

        Ok(self.version)
    }

    fn physical_multiprocessor_count(&self, device: DeviceIndex) -> Result<i32, RuntimeStatus> {
        self.injected_failure(RuntimeOperation::DeviceGetAttribute)?;

        self.device(device)?
            .physical_multiprocessor_count
            .ok_or(RuntimeStatus::NOT_SUPPORTED)
    }
}
