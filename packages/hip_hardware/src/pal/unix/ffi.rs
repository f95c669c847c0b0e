//! Declarations mirroring `hip_runtime_api.h` for the parts of the HIP runtime we call.
//!
//! Runtimes from release 6 onwards export the property block as `hipDeviceProp_tR0600`. Older
//! runtimes only export `hipGetDeviceProperties()` with the `hipDeviceProp_tR0000` layout.

#![allow(
    non_camel_case_types,
    non_snake_case,
    non_upper_case_globals,
    dead_code,
    reason = "names and layout mirror the HIP C headers; unused fields exist for layout only"
)]

use std::ffi::{c_char, c_int, c_uint};

pub(crate) type hipError_t = c_int;

pub(crate) const hipSuccess: hipError_t = 0;

// hipDeviceAttribute_t, AMD-specific range:
//   ClockInstructionRate = hipDeviceAttributeAmdSpecificBegin (10000), Unused1,
//   MaxSharedMemoryPerMultiprocessor, Unused2, Unused3, HdpMemFlushCntl, HdpRegFlushCntl,
//   CooperativeMultiDeviceUnmatchedFunc, CooperativeMultiDeviceUnmatchedGridDim,
//   CooperativeMultiDeviceUnmatchedBlockDim, CooperativeMultiDeviceUnmatchedSharedMem,
//   IsLargeBar, AsicRevision, CanUseStreamWaitValue, ImageSupport (10014),
//   PhysicalMultiProcessorCount (10015), ...
pub(crate) const hipDeviceAttributeAmdSpecificBegin: c_int = 10000;
pub(crate) const hipDeviceAttributeImageSupport: c_int = 10014;

/// Number of physical compute units, regardless of virtualization or partitioning.
pub(crate) const hipDeviceAttributePhysicalMultiProcessorCount: c_int = 10015;

/// Capacity of the fixed-size name buffers in the property block.
pub(crate) const NAME_BUFFER_LEN: usize = 256;

#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct hipUUID {
    pub(crate) bytes: [c_char; 16],
}

/// `hipDeviceProp_tR0600`, the device property block returned by
/// `hipGetDevicePropertiesR0600()`.
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct hipDeviceProp_tR0600 {
    pub(crate) name: [c_char; NAME_BUFFER_LEN],
    pub(crate) uuid: hipUUID,
    pub(crate) luid: [c_char; 8],
    pub(crate) luidDeviceNodeMask: c_uint,
    pub(crate) totalGlobalMem: usize,
    pub(crate) sharedMemPerBlock: usize,
    pub(crate) regsPerBlock: c_int,
    pub(crate) warpSize: c_int,
    pub(crate) memPitch: usize,
    pub(crate) maxThreadsPerBlock: c_int,
    pub(crate) maxThreadsDim: [c_int; 3],
    pub(crate) maxGridSize: [c_int; 3],
    pub(crate) clockRate: c_int,
    pub(crate) totalConstMem: usize,
    pub(crate) major: c_int,
    pub(crate) minor: c_int,
    pub(crate) textureAlignment: usize,
    pub(crate) texturePitchAlignment: usize,
    pub(crate) deviceOverlap: c_int,
    pub(crate) multiProcessorCount: c_int,
    pub(crate) kernelExecTimeoutEnabled: c_int,
    pub(crate) integrated: c_int,
    pub(crate) canMapHostMemory: c_int,
    pub(crate) computeMode: c_int,
    pub(crate) maxTexture1D: c_int,
    pub(crate) maxTexture1DMipmap: c_int,
    pub(crate) maxTexture1DLinear: c_int,
    pub(crate) maxTexture2D: [c_int; 2],
    pub(crate) maxTexture2DMipmap: [c_int; 2],
    pub(crate) maxTexture2DLinear: [c_int; 3],
    pub(crate) maxTexture2DGather: [c_int; 2],
    pub(crate) maxTexture3D: [c_int; 3],
    pub(crate) maxTexture3DAlt: [c_int; 3],
    pub(crate) maxTextureCubemap: c_int,
    pub(crate) maxTexture1DLayered: [c_int; 2],
    pub(crate) maxTexture2DLayered: [c_int; 3],
    pub(crate) maxTextureCubemapLayered: [c_int; 2],
    pub(crate) maxSurface1D: c_int,
    pub(crate) maxSurface2D: [c_int; 2],
    pub(crate) maxSurface3D: [c_int; 3],
    pub(crate) maxSurface1DLayered: [c_int; 2],
    pub(crate) maxSurface2DLayered: [c_int; 3],
    pub(crate) maxSurfaceCubemap: c_int,
    pub(crate) maxSurfaceCubemapLayered: [c_int; 2],
    pub(crate) surfaceAlignment: usize,
    pub(crate) concurrentKernels: c_int,
    pub(crate) ECCEnabled: c_int,
    pub(crate) pciBusID: c_int,
    pub(crate) pciDeviceID: c_int,
    pub(crate) pciDomainID: c_int,
    pub(crate) tccDriver: c_int,
    pub(crate) asyncEngineCount: c_int,
    pub(crate) unifiedAddressing: c_int,
    pub(crate) memoryClockRate: c_int,
    pub(crate) memoryBusWidth: c_int,
    pub(crate) l2CacheSize: c_int,
    pub(crate) persistingL2CacheMaxSize: c_int,
    pub(crate) maxThreadsPerMultiProcessor: c_int,
    pub(crate) streamPrioritiesSupported: c_int,
    pub(crate) globalL1CacheSupported: c_int,
    pub(crate) localL1CacheSupported: c_int,
    pub(crate) sharedMemPerMultiprocessor: usize,
    pub(crate) regsPerMultiprocessor: c_int,
    pub(crate) managedMemory: c_int,
    pub(crate) isMultiGpuBoard: c_int,
    pub(crate) multiGpuBoardGroupID: c_int,
    pub(crate) hostNativeAtomicSupported: c_int,
    pub(crate) singleToDoublePrecisionPerfRatio: c_int,
    pub(crate) pageableMemoryAccess: c_int,
    pub(crate) concurrentManagedAccess: c_int,
    pub(crate) computePreemptionSupported: c_int,
    pub(crate) canUseHostPointerForRegisteredMem: c_int,
    pub(crate) cooperativeLaunch: c_int,
    pub(crate) cooperativeMultiDeviceLaunch: c_int,
    pub(crate) sharedMemPerBlockOptin: usize,
    pub(crate) pageableMemoryAccessUsesHostPageTables: c_int,
    pub(crate) directManagedMemAccessFromHost: c_int,
    pub(crate) maxBlocksPerMultiProcessor: c_int,
    pub(crate) accessPolicyMaxWindowSize: c_int,
    pub(crate) reservedSharedMemPerBlock: usize,
    pub(crate) hostRegisterSupported: c_int,
    pub(crate) sparseHipArraySupported: c_int,
    pub(crate) hostRegisterReadOnlySupported: c_int,
    pub(crate) timelineSemaphoreInteropSupported: c_int,
    pub(crate) memoryPoolsSupported: c_int,
    pub(crate) gpuDirectRDMASupported: c_int,
    pub(crate) gpuDirectRDMAFlushWritesOptions: c_uint,
    pub(crate) gpuDirectRDMAWritesOrdering: c_int,
    pub(crate) memoryPoolSupportedHandleTypes: c_uint,
    pub(crate) deferredMappingHipArraySupported: c_int,
    pub(crate) ipcEventSupported: c_int,
    pub(crate) clusterLaunch: c_int,
    pub(crate) unifiedFunctionPointers: c_int,
    pub(crate) reserved: [c_int; 63],
    pub(crate) hipReserved: [c_int; 32],
    pub(crate) gcnArchName: [c_char; NAME_BUFFER_LEN],
    pub(crate) maxSharedMemoryPerMultiProcessor: usize,
    pub(crate) clockInstructionRate: c_int,
    // hipDeviceArch_t: a set of single-bit flags packed into one unsigned int.
    pub(crate) arch: c_uint,
    pub(crate) hdpMemFlushCntl: *mut c_uint,
    pub(crate) hdpRegFlushCntl: *mut c_uint,
    pub(crate) cooperativeMultiDeviceUnmatchedFunc: c_int,
    pub(crate) cooperativeMultiDeviceUnmatchedGridDim: c_int,
    pub(crate) cooperativeMultiDeviceUnmatchedBlockDim: c_int,
    pub(crate) cooperativeMultiDeviceUnmatchedSharedMem: c_int,
    pub(crate) isLargeBar: c_int,
    pub(crate) asicRevision: c_int,
}

/// `hipDeviceProp_tR0000`, the device property block of runtimes before release 6, returned by
/// `hipGetDeviceProperties()` of those runtimes.
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct hipDeviceProp_tR0000 {
    pub(crate) name: [c_char; NAME_BUFFER_LEN],
    pub(crate) totalGlobalMem: usize,
    pub(crate) sharedMemPerBlock: usize,
    pub(crate) regsPerBlock: c_int,
    pub(crate) warpSize: c_int,
    pub(crate) maxThreadsPerBlock: c_int,
    pub(crate) maxThreadsDim: [c_int; 3],
    pub(crate) maxGridSize: [c_int; 3],
    pub(crate) clockRate: c_int,
    pub(crate) memoryClockRate: c_int,
    pub(crate) memoryBusWidth: c_int,
    pub(crate) totalConstMem: usize,
    pub(crate) major: c_int,
    pub(crate) minor: c_int,
    pub(crate) multiProcessorCount: c_int,
    pub(crate) l2CacheSize: c_int,
    pub(crate) maxThreadsPerMultiProcessor: c_int,
    pub(crate) computeMode: c_int,
    pub(crate) clockInstructionRate: c_int,
    // hipDeviceArch_t
    pub(crate) arch: c_uint,
    pub(crate) concurrentKernels: c_int,
    pub(crate) pciDomainID: c_int,
    pub(crate) pciBusID: c_int,
    pub(crate) pciDeviceID: c_int,
    pub(crate) maxSharedMemoryPerMultiProcessor: usize,
    pub(crate) isMultiGpuBoard: c_int,
    pub(crate) canMapHostMemory: c_int,
    pub(crate) gcnArch: c_int,
    pub(crate) gcnArchName: [c_char; NAME_BUFFER_LEN],
    pub(crate) integrated: c_int,
    pub(crate) cooperativeLaunch: c_int,
    pub(crate) cooperativeMultiDeviceLaunch: c_int,
    pub(crate) maxTexture1DLinear: c_int,
    pub(crate) maxTexture1D: c_int,
    pub(crate) maxTexture2D: [c_int; 2],
    pub(crate) maxTexture3D: [c_int; 3],
    pub(crate) hdpMemFlushCntl: *mut c_uint,
    pub(crate) hdpRegFlushCntl: *mut c_uint,
    pub(crate) memPitch: usize,
    pub(crate) textureAlignment: usize,
    pub(crate) texturePitchAlignment: usize,
    pub(crate) kernelExecTimeoutEnabled: c_int,
    pub(crate) ECCEnabled: c_int,
    pub(crate) tccDriver: c_int,
    pub(crate) cooperativeMultiDeviceUnmatchedFunc: c_int,
    pub(crate) cooperativeMultiDeviceUnmatchedGridDim: c_int,
    pub(crate) cooperativeMultiDeviceUnmatchedBlockDim: c_int,
    pub(crate) cooperativeMultiDeviceUnmatchedSharedMem: c_int,
    pub(crate) isLargeBar: c_int,
    pub(crate) asicRevision: c_int,
    pub(crate) managedMemory: c_int,
    pub(crate) directManagedMemAccessFromHost: c_int,
    pub(crate) concurrentManagedAccess: c_int,
    pub(crate) pageableMemoryAccess: c_int,
    pub(crate) pageableMemoryAccessUsesHostPageTables: c_int,
}

pub(crate) type hipGetDevice_fn = unsafe extern "C" fn(device_id: *mut c_int) -> hipError_t;

pub(crate) type hipGetDevicePropertiesR0600_fn =
    unsafe extern "C" fn(prop: *mut hipDeviceProp_tR0600, device_id: c_int) -> hipError_t;

pub(crate) type hipGetDevicePropertiesR0000_fn =
    unsafe extern "C" fn(prop: *mut hipDeviceProp_tR0000, device_id: c_int) -> hipError_t;

pub(crate) type hipRuntimeGetVersion_fn =
    unsafe extern "C" fn(runtime_version: *mut c_int) -> hipError_t;

pub(crate) type hipDeviceGetAttribute_fn =
    unsafe extern "C" fn(pi: *mut c_int, attr: c_int, device_id: c_int) -> hipError_t;
