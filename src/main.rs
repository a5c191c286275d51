#![no_std]
#![no_main]

// https://github.com/embassy-rs/embassy/blob/main/examples/stm32f4/src/bin/multiprio.rs

use cortex_m_rt::entry;
use defmt::info;
use defmt_rtt as _;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Input;
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use panic_halt as _;
use static_cell::StaticCell;

use occupancy_control::{
    EntryTask, ExitTask, OutputPanel, ResetSignal, ResetTask, SlotCounter, raise_on_falling_edge,
};

mod io;
use io::{Board, BuzzerChannel, Led, Oled};

type Shared = CriticalSectionRawMutex;
type Panel = OutputPanel<Shared, Led, BuzzerChannel, Oled>;

static SLOTS: SlotCounter<Shared> = SlotCounter::new();
static RESET: ResetSignal<Shared> = ResetSignal::new();
static PANEL: StaticCell<Panel> = StaticCell::new();

// The reset edge runs on its own executor at interrupt priority, so raising
// the reset preempts whatever the thread-mode tasks are doing.
static EDGE_EXECUTOR: InterruptExecutor = InterruptExecutor::new();
static TASK_EXECUTOR: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn UART4() {
    unsafe { EDGE_EXECUTOR.on_interrupt() }
}

#[embassy_executor::task]
async fn reset_edge(button: ExtiInput<'static>) -> ! {
    raise_on_falling_edge(button, &RESET).await
}

#[embassy_executor::task]
async fn entry_loop(
    task: EntryTask<'static, Shared, Input<'static>, Delay, Led, BuzzerChannel, Oled>,
) -> ! {
    task.run().await
}

#[embassy_executor::task]
async fn exit_loop(
    task: ExitTask<'static, Shared, Input<'static>, Delay, Led, BuzzerChannel, Oled>,
) -> ! {
    task.run().await
}

#[embassy_executor::task]
async fn reset_loop(task: ResetTask<'static, Shared, Delay, Led, BuzzerChannel, Oled>) -> ! {
    task.run().await
}

#[entry]
fn main() -> ! {
    let board = Board::init();
    info!("board up, {} slots", SLOTS.capacity());

    let panel: &'static Panel = PANEL.init(OutputPanel::new(
        board.indicator,
        board.buzzer,
        board.display,
    ));

    interrupt::UART4.set_priority(Priority::P6);
    let edge_spawner = EDGE_EXECUTOR.start(interrupt::UART4);
    edge_spawner.spawn(reset_edge(board.reset_button)).unwrap();

    let executor = TASK_EXECUTOR.init(Executor::new());
    executor.run(move |spawner| {
        spawner
            .spawn(entry_loop(EntryTask::new(board.entry_button, Delay, &SLOTS, panel)))
            .unwrap();
        spawner
            .spawn(exit_loop(ExitTask::new(board.exit_button, Delay, &SLOTS, panel)))
            .unwrap();
        spawner
            .spawn(reset_loop(ResetTask::new(&RESET, Delay, &SLOTS, panel)))
            .unwrap();
    })
}
