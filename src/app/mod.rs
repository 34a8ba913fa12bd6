mod usecases;

pub use usecases::DeviceUsecases;
