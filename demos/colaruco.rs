//! ColAruco firmware: a marker on a 10×10 WS2812 matrix, driven over UART0.
//!
//! Wiring: matrix data on GPIO 7, console on GPIO 0 (TX) / GPIO 1 (RX) at 9600 baud.
//! Send e.g. `code 2 2 1\ncl FF0000\nbr 128\nsave\n`.
#![allow(missing_docs)]
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, panic};

use colaruco::{
    Error, Result,
    command::{Command, CommandParser},
    display::MarkerDisplay,
    led_strip::{Ws2812Strip, rgb_to_u32},
    marker::LED_COUNT,
    settings::{FlashMedium, SettingsStore},
};
use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::{FLASH, PIO0, UART0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::PioWs2812Program;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartRx, Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_io_async::Read;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

const BAUD_RATE: u32 = 9600;
/// Pico 1 flash; the settings ring takes its last 16 KiB.
const FLASH_SIZE: usize = 2 * 1024 * 1024;
const RX_BUF_SIZE: usize = 64;

static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Parsed commands on their way from the console task to the display loop.
static COMMANDS: Channel<CriticalSectionRawMutex, Command, 4> = Channel::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let Pio { mut common, sm0, .. } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let strip = Ws2812Strip::<_, 0, LED_COUNT>::new(&mut common, sm0, p.DMA_CH0, p.PIN_7, &program);

    let flash: Flash<'_, FLASH, Blocking, FLASH_SIZE> = Flash::new_blocking(p.FLASH);
    let store = SettingsStore::new(FlashMedium::at_end(flash)?)?;
    let mut display = MarkerDisplay::new(strip, store);
    display.start().await?;

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BAUD_RATE;
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config).into_buffered(
        Irqs,
        TX_BUF.init([0; 64]),
        RX_BUF.init([0; 256]),
    );
    let (_tx, rx) = uart.split();
    spawner.spawn(console_task(rx)).map_err(|_| Error::TaskSpawn)?;
    info!("ColAruco connection to serial port online");

    loop {
        let command = COMMANDS.receive().await;
        if let Err(err) = display.handle(command).await {
            warn!("Command failed: {}", err);
            continue;
        }
        let config = display.config();
        info!(
            "Brightness {} color {=u32:06X} code size {} rows {=[u8]}",
            config.brightness,
            rgb_to_u32(config.color),
            config.code.size(),
            config.code.rows()
        );
    }
}

/// Feed console bytes to the parser and forward every accepted command.
#[embassy_executor::task]
async fn console_task(mut rx: BufferedUartRx) -> ! {
    let mut parser = CommandParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];
    loop {
        match rx.read(&mut buf).await {
            Ok(len) => {
                for &byte in buf.iter().take(len) {
                    if let Some(command) = parser.feed(byte) {
                        COMMANDS.send(command).await;
                    }
                }
            }
            Err(err) => {
                warn!("{}: {}", Error::Serial, err);
                parser.reset();
            }
        }
    }
}
