#![allow(dead_code)]

use std::{
	cell::{Cell, RefCell},
	collections::VecDeque,
	rc::Rc,
};
use swarm_link::{Clock, Error, Radio, RadioConfig, Result};

#[derive(Clone, Debug)]
pub struct Frame {
	pub bytes: Vec<u8>,
	pub rssi: i16,
	pub snr: f32,
}

#[derive(Default)]
pub struct MockState {
	/// One entry per poll; `None` means the poll finds nothing.
	pub inbound: VecDeque<Option<Frame>>,
	pub sent: Vec<Vec<u8>>,
	pub fail_configure: bool,
	pub fail_transmit: bool,
	pub configured: Option<RadioConfig>,
	pub configure_calls: usize,
	pub transmit_calls: usize,
	pub poll_calls: usize,
	pub tx_power: Option<i32>,
	pub frequency: Option<u32>,
	current: Option<Frame>,
	rssi: i16,
	snr: f32,
}

impl MockState {
	pub fn deliver(&mut self, bytes: &[u8], rssi: i16, snr: f32) {
		self.inbound.push_back(Some(Frame {
			bytes: bytes.to_vec(),
			rssi,
			snr,
		}));
	}

	pub fn silence(&mut self, polls: usize) {
		for _ in 0..polls {
			self.inbound.push_back(None);
		}
	}
}

/// Scripted in-memory transceiver. Clones share state, so a test keeps one
/// handle while the codec owns another.
#[derive(Clone, Default)]
pub struct MockRadio(pub Rc<RefCell<MockState>>);

impl MockRadio {
	pub fn new() -> Self { Self::default() }

	pub fn state(&self) -> std::cell::RefMut<'_, MockState> { self.0.borrow_mut() }
}

impl Radio for MockRadio {
	async fn configure(&mut self, config: &RadioConfig) -> Result<()> {
		let mut state = self.state();
		state.configure_calls += 1;
		if state.fail_configure {
			return Err(Error::InvalidConfig);
		}
		state.configured = Some(*config);
		Ok(())
	}

	async fn transmit(&mut self, frame: &[u8]) -> Result<()> {
		let mut state = self.state();
		state.transmit_calls += 1;
		if state.fail_transmit {
			return Err(Error::TransmitFailed);
		}
		state.sent.push(frame.to_vec());
		Ok(())
	}

	async fn poll_receive(&mut self) -> Result<usize> {
		let mut state = self.state();
		state.poll_calls += 1;
		let next = state.inbound.pop_front().flatten();
		state.current = next.clone();
		let Some(frame) = next else {
			return Ok(0);
		};
		state.rssi = frame.rssi;
		state.snr = frame.snr;
		Ok(frame.bytes.len())
	}

	fn read_bytes(&mut self, buffer: &mut [u8]) -> usize {
		let mut state = self.state();
		let Some(frame) = state.current.take() else {
			return 0;
		};
		let len = frame.bytes.len().min(buffer.len());
		buffer[..len].copy_from_slice(&frame.bytes[..len]);
		len
	}

	fn last_rssi(&self) -> i16 { self.0.borrow().rssi }

	fn last_snr(&self) -> f32 { self.0.borrow().snr }

	async fn set_tx_power(&mut self, dbm: i32) -> Result<()> {
		self.state().tx_power = Some(dbm);
		Ok(())
	}

	async fn set_frequency(&mut self, hz: u32) -> Result<()> {
		self.state().frequency = Some(hz);
		Ok(())
	}
}

/// Clock that moves forward by `step` ms every time it is read.
pub struct TickingClock {
	now: Cell<u32>,
	step: u32,
}

impl TickingClock {
	pub fn new(start: u32, step: u32) -> Self {
		Self {
			now: Cell::new(start),
			step,
		}
	}

	pub fn peek(&self) -> u32 { self.now.get() }
}

impl Clock for TickingClock {
	fn now_ms(&self) -> u32 {
		let now = self.now.get();
		self.now.set(now.wrapping_add(self.step));
		now
	}
}
