#![no_std]
#![no_main]

mod config;
mod mqtt;
mod wifi;

use embassy_executor::Spawner;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_time::{Delay, Duration, Timer};

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use log::{error, info};

use hobby_house::app::DeviceUsecases;
use hobby_house::controllers::CommandDecoder;
use hobby_house::infrastructure::drivers::{GpioSecurityRelay, PwmLightOutput};
use hobby_house::infrastructure::tasks::ControlLoop;

use crate::mqtt::{BrokerClient, BrokerTcpClient, TCP_BUF_SIZE};
use crate::wifi::{EspWifi, init_network_stack, network_runner_task};

esp_bootloader_esp_idf::esp_app_desc!();

// static_cell::make_static! in main causes a compiler error
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Outputs come up before the radio so the relay is armed from power-on
    let relay = GpioSecurityRelay::new(Output::new(
        peripherals.GPIO5,
        Level::Low,
        OutputConfig::default(),
    ));

    let mut ledc = Ledc::new(peripherals.LEDC);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);
    let mut pwm_timer = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    pwm_timer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty8Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_khz(config::PWM_FREQUENCY_KHZ),
        })
        .expect("pwm timer config failed");

    let channel_config = channel::config::Config {
        timer: &pwm_timer,
        duty_pct: 0,
        pin_config: channel::config::PinConfig::PushPull,
    };
    let mut red = ledc.channel(channel::Number::Channel0, peripherals.GPIO14);
    red.configure(channel_config).expect("red channel config failed");
    let mut green = ledc.channel(channel::Number::Channel1, peripherals.GPIO12);
    green
        .configure(channel_config)
        .expect("green channel config failed");
    let mut blue = ledc.channel(channel::Number::Channel2, peripherals.GPIO13);
    blue.configure(channel_config).expect("blue channel config failed");

    let mut device = DeviceUsecases::new(PwmLightOutput::new(red, green, blue), relay);
    device.boot();
    let decoder = CommandDecoder::new(config::NODE.topics, device);

    let (stack, runner, controller) = init_network_stack(peripherals.WIFI);
    spawner.spawn(network_runner_task(runner)).ok();

    let tcp_state = mk_static!(
        TcpClientState<1, TCP_BUF_SIZE, TCP_BUF_SIZE>,
        TcpClientState::new()
    );
    let tcp = mk_static!(BrokerTcpClient, TcpClient::new(stack, tcp_state));

    let wifi = EspWifi::new(controller, stack);
    let broker = BrokerClient::new(stack, tcp, config::NODE.broker);

    match ControlLoop::new(&config::NODE, wifi, broker, decoder, Delay) {
        Ok(mut node) => {
            info!("node: starting control loop");
            node.run().await;
        }
        Err(e) => error!("node: invalid configuration: {}", e),
    }

    loop {
        Timer::after(Duration::from_secs(5)).await;
    }
}
