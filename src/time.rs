use core::cell::Cell;
use embassy_futures::yield_now;
use embassy_time::Instant;

/// Monotonic millisecond counter that wraps at `u32::MAX`.
pub trait Clock {
	fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
	fn now_ms(&self) -> u32 { (**self).now_ms() }
}

/// Uptime from the embassy time driver, truncated to 32 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
	fn now_ms(&self) -> u32 { Instant::now().as_millis() as u32 }
}

/// Clock that only moves when told to. Shared by reference between the
/// components under test and the code driving time forward.
#[derive(Debug, Default)]
pub struct ManualClock(Cell<u32>);

impl ManualClock {
	pub const fn new(start_ms: u32) -> Self { Self(Cell::new(start_ms)) }

	pub fn set(&self, now_ms: u32) { self.0.set(now_ms) }

	pub fn advance(&self, ms: u32) { self.0.set(self.0.get().wrapping_add(ms)) }
}

impl Clock for ManualClock {
	fn now_ms(&self) -> u32 { self.0.get() }
}

/// Milliseconds from `start` to `end`, treating the counter as wrapping.
pub const fn elapsed_ms(start: u32, end: u32) -> u32 {
	if end >= start {
		end - start
	} else {
		(u32::MAX - start) + end + 1
	}
}

pub fn is_timeout(clock: &impl Clock, start: u32, timeout_ms: u32) -> bool {
	elapsed_ms(start, clock.now_ms()) >= timeout_ms
}

/// Spins until `ms` have passed on `clock`, yielding to the executor between
/// checks.
pub async fn precise_delay(clock: &impl Clock, ms: u32) {
	let start = clock.now_ms();
	while !is_timeout(clock, start, ms) {
		yield_now().await;
	}
}
