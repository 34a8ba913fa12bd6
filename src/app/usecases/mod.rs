mod device;

pub use device::DeviceUsecases;
