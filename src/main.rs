#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod lcd;
#[cfg(target_os = "none")]
mod led;
#[cfg(target_os = "none")]
mod serial;
#[cfg(target_os = "none")]
mod ticker;

#[cfg(not(target_os = "none"))]
mod hosted;

use lcd_stopwatch::{CommandChannel, Stopwatch};

static STOPWATCH: Stopwatch = Stopwatch::new();
static COMMANDS: CommandChannel = CommandChannel::new();

#[cfg(target_os = "none")]
#[cortex_m_rt::entry]
fn main() -> ! {
    use lcd_stopwatch::{
        CommandTask, DisplayTask, RolloverTask, Supervisor, Unit, config::SERIAL_BAUD, executor,
        future::OurFuture,
    };
    use panic_halt as _;
    use rtt_target::{rprintln, rtt_init_print};
    use stm32f0xx_hal::{
        delay::Delay,
        pac,
        prelude::*,
        serial::{Event, Serial},
        time::Bps,
    };

    use crate::{lcd::Lcd, led::StatusLed, ticker::Ticker};

    rtt_init_print!();
    rprintln!("=== LCD stopwatch ===");

    // Get access to the device peripherals
    let mut dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Configure the clock system
    let mut rcc = dp.RCC.configure().freeze(&mut dp.FLASH);

    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpioc = dp.GPIOC.split(&mut rcc);

    // PA2/PA3: USART2 to the ST-LINK VCP, PA5: LD2, PC0..PC5: LCD
    let (tx, rx, user_led, rs, en, data) = cortex_m::interrupt::free(|cs| {
        (
            gpioa.pa2.into_alternate_af1(cs),
            gpioa.pa3.into_alternate_af1(cs),
            gpioa.pa5.into_push_pull_output(cs).downgrade(),
            gpioc.pc0.into_push_pull_output(cs).downgrade(),
            gpioc.pc1.into_push_pull_output(cs).downgrade(),
            [
                gpioc.pc2.into_push_pull_output(cs).downgrade(),
                gpioc.pc3.into_push_pull_output(cs).downgrade(),
                gpioc.pc4.into_push_pull_output(cs).downgrade(),
                gpioc.pc5.into_push_pull_output(cs).downgrade(),
            ],
        )
    });

    let mut usart2 = Serial::usart2(dp.USART2, (tx, rx), Bps(SERIAL_BAUD), &mut rcc);
    usart2.listen(Event::Rxne);
    let (_tx, rx) = usart2.split();

    let lcd = Lcd::new(rs, en, data, Delay::new(cp.SYST, &rcc));
    let ticker = Ticker::new(dp.TIM2, &mut rcc);
    serial::listen(rx);
    rprintln!("Hardware initialized, keys: s = start, p = pause/resume, r = reset");

    let mut supervisor = Supervisor::new(&STOPWATCH, ticker, StatusLed::new(user_led));
    supervisor.init();

    let mut seconds_task = RolloverTask::new(Unit::Seconds, &STOPWATCH);
    let mut minutes_task = RolloverTask::new(Unit::Minutes, &STOPWATCH);
    let mut display_task = DisplayTask::new(lcd, &STOPWATCH);
    let mut command_task = CommandTask::new(COMMANDS.get_receiver(), supervisor);

    let mut tasks: [&mut dyn OurFuture<Output = ()>; 4] = [
        &mut seconds_task,
        &mut minutes_task,
        &mut display_task,
        &mut command_task,
    ];

    executor::run_tasks(&mut tasks, || {
        cortex_m::interrupt::free(|_| {
            if !executor::has_pending_wake() {
                cortex_m::asm::wfi();
            }
        })
    });
}

#[cfg(not(target_os = "none"))]
fn main() {
    hosted::run()
}
