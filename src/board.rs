use embassy_stm32::rcc::*;
use embassy_stm32::time::Hertz as TimeHertz;
use embassy_stm32::Config;

/// External crystal on the F405 board.
const HSE_HZ: u32 = 8_000_000;

pub struct Board {
    pub p: embassy_stm32::Peripherals,
}

impl Board {
    pub fn init() -> Self {
        Self {
            p: embassy_stm32::init(clock_config()),
        }
    }
}

/// SYSCLK 168 MHz from the PLL, with the 48 MHz USB clock on PLLQ.
///
/// | bus  | clock   | users                        |
/// | ---- | ------- | ---------------------------- |
/// | AHB  | 168 MHz | DMA1, GPIO, USB OTG FS       |
/// | APB1 | 42 MHz  | USART3, I2C1, time driver    |
/// | APB2 | 84 MHz  |                              |
fn clock_config() -> Config {
    let mut config = Config::default();
    let rcc = &mut config.rcc;

    rcc.hse = Some(Hse {
        freq: TimeHertz(HSE_HZ),
        mode: HseMode::Oscillator,
    });
    rcc.pll_src = PllSource::HSE;
    // 8 MHz / 4 × 168 = 336 MHz VCO
    rcc.pll = Some(Pll {
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL168,
        divp: Some(PllPDiv::DIV2),
        divq: Some(PllQDiv::DIV7),
        divr: None,
    });
    rcc.sys = Sysclk::PLL1_P;
    rcc.ahb_pre = AHBPrescaler::DIV1;
    rcc.apb1_pre = APBPrescaler::DIV4;
    rcc.apb2_pre = APBPrescaler::DIV2;

    config
}
