//! WS2812 strip backend driven by an RP2040 PIO state machine.

use embassy_rp::Peri;
use embassy_rp::dma::Channel;
use embassy_rp::pio::{Common, Instance, PioPin, StateMachine};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};

use super::{Frame1d, LedStripDriver};
use crate::Result;

/// An `N`-LED WS2812 strip on one PIO state machine.
///
/// # Example
///
/// ```rust,no_run
/// # #![no_std]
/// # #![no_main]
/// # use panic_probe as _;
/// use colaruco::led_strip::{Frame1d, LedStripDriver, Ws2812Strip, colors};
/// use embassy_rp::bind_interrupts;
/// use embassy_rp::peripherals::PIO0;
/// use embassy_rp::pio::{InterruptHandler, Pio};
/// use embassy_rp::pio_programs::ws2812::PioWs2812Program;
///
/// bind_interrupts!(struct Irqs {
///     PIO0_IRQ_0 => InterruptHandler<PIO0>;
/// });
///
/// async fn example() -> colaruco::Result<()> {
///     let p = embassy_rp::init(Default::default());
///     let Pio { mut common, sm0, .. } = Pio::new(p.PIO0, Irqs);
///     let program = PioWs2812Program::new(&mut common);
///     let mut strip = Ws2812Strip::<_, 0, 100>::new(&mut common, sm0, p.DMA_CH0, p.PIN_7, &program);
///     strip.write_frame(&Frame1d::filled(colors::BLUE)).await
/// }
/// ```
pub struct Ws2812Strip<'d, PIO: Instance, const SM: usize, const N: usize> {
    driver: PioWs2812<'d, PIO, SM, N>,
}

impl<'d, PIO: Instance, const SM: usize, const N: usize> Ws2812Strip<'d, PIO, SM, N> {
    /// Load the strip onto `sm`, sending data out of `pin` through `dma`.
    pub fn new(
        common: &mut Common<'d, PIO>,
        sm: StateMachine<'d, PIO, SM>,
        dma: Peri<'d, impl Channel>,
        pin: Peri<'d, impl PioPin>,
        program: &PioWs2812Program<'d, PIO>,
    ) -> Self {
        Self {
            driver: PioWs2812::new(common, sm, dma, pin, program),
        }
    }
}

impl<PIO: Instance, const SM: usize, const N: usize> LedStripDriver<N>
    for Ws2812Strip<'_, PIO, SM, N>
{
    async fn write_frame(&mut self, frame: &Frame1d<N>) -> Result<()> {
        self.driver.write(frame).await;
        Ok(())
    }
}
