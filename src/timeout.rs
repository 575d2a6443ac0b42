//! Named countdown timers polled from the main loop.
//!
//! Nothing here fires on its own: the caller asks which timers have run out
//! and acts on the answer. Peer liveness, request and election timeouts are
//! all meant to be expressed as entries in a [`TimeoutRegistry`].

use crate::{
	error::{Error, Result},
	time::{Clock, elapsed_ms},
};
use core::fmt::Write;
use heapless::{LinearMap, String, Vec};

pub const DEFAULT_CAPACITY: usize = 16;
pub const NAME_CAPACITY: usize = 24;

/// Handle to a registered timeout. Never reused for the life of its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeoutId(u32);

impl TimeoutId {
	pub const fn get(&self) -> u32 { self.0 }
}

#[derive(Clone, Debug)]
pub struct TimeoutEntry {
	start_ms: u32,
	duration_ms: u32,
	active: bool,
	name: String<NAME_CAPACITY>,
}

impl TimeoutEntry {
	pub fn start_ms(&self) -> u32 { self.start_ms }

	pub fn duration_ms(&self) -> u32 { self.duration_ms }

	pub fn is_active(&self) -> bool { self.active }

	pub fn name(&self) -> &str { self.name.as_str() }

	fn has_expired(&self, now: u32) -> bool {
		self.active && elapsed_ms(self.start_ms, now) >= self.duration_ms
	}

	fn remaining_ms(&self, now: u32) -> u32 {
		if !self.active {
			return 0;
		}
		self.duration_ms.saturating_sub(elapsed_ms(self.start_ms, now))
	}
}

pub struct TimeoutRegistry<C: Clock, const N: usize = DEFAULT_CAPACITY> {
	clock: C,
	entries: LinearMap<TimeoutId, TimeoutEntry, N>,
	/// `None` once `u32::MAX` has been handed out.
	next_id: Option<u32>,
}

impl<C: Clock, const N: usize> TimeoutRegistry<C, N> {
	pub fn new(clock: C) -> Self {
		Self {
			clock,
			entries: LinearMap::new(),
			next_id: Some(1),
		}
	}

	/// Starts a new active timeout. Without a name the entry is labelled
	/// `Timeout_<id>`; longer names are cut at [`NAME_CAPACITY`] bytes.
	pub fn add_timeout(&mut self, duration_ms: u32, name: Option<&str>) -> Result<TimeoutId> {
		if self.entries.len() == N {
			warn!("Timeout registry full ({} entries)", N as u32);
			return Err(Error::RegistryFull);
		}

		let id = TimeoutId(self.next_id.ok_or(Error::HandlesExhausted)?);

		let name = match name {
			Some(name) if !name.is_empty() => truncated(name),
			_ => {
				let mut label = String::new();
				// "Timeout_" plus at most ten digits always fits.
				let _ = write!(label, "Timeout_{}", id.0);
				label
			}
		};

		let entry = TimeoutEntry {
			start_ms: self.clock.now_ms(),
			duration_ms,
			active: true,
			name,
		};

		info!("Added timeout {} ({}) for {} ms", id.0, entry.name.as_str(), duration_ms);

		self.entries.insert(id, entry).map_err(|_| Error::RegistryFull)?;
		self.next_id = id.0.checked_add(1);

		Ok(id)
	}

	pub fn is_expired(&self, id: TimeoutId) -> bool {
		let now = self.clock.now_ms();
		self.entries.get(&id).is_some_and(|entry| entry.has_expired(now))
	}

	/// Restarts the countdown from now and re-arms the entry. Unknown ids are
	/// ignored.
	pub fn reset(&mut self, id: TimeoutId) {
		let now = self.clock.now_ms();
		if let Some(entry) = self.entries.get_mut(&id) {
			entry.start_ms = now;
			entry.active = true;
			info!("Reset timeout {} ({})", id.0, entry.name.as_str());
		}
	}

	pub fn remove(&mut self, id: TimeoutId) {
		if let Some(entry) = self.entries.remove(&id) {
			info!("Removed timeout {} ({})", id.0, entry.name.as_str());
		}
	}

	/// Active timeouts whose duration has elapsed, in ascending id order.
	pub fn expired_handles(&self) -> Vec<TimeoutId, N> {
		let now = self.clock.now_ms();
		let mut expired: Vec<TimeoutId, N> = self
			.entries
			.iter()
			.filter(|(_, entry)| entry.has_expired(now))
			.map(|(id, _)| *id)
			.collect();
		expired.sort_unstable();
		expired
	}

	/// Like [`Self::expired_handles`], but disarms every entry it returns so
	/// each expiry is reported once.
	pub fn check_all(&mut self) -> Vec<TimeoutId, N> {
		let expired = self.expired_handles();
		for id in &expired {
			if let Some(entry) = self.entries.get_mut(id) {
				entry.active = false;
				info!("Timeout expired: {} ({})", id.0, entry.name.as_str());
			}
		}
		expired
	}

	pub fn remaining_time(&self, id: TimeoutId) -> u32 {
		let now = self.clock.now_ms();
		self.entries.get(&id).map_or(0, |entry| entry.remaining_ms(now))
	}

	pub fn entry(&self, id: TimeoutId) -> Option<&TimeoutEntry> { self.entries.get(&id) }

	pub fn iter(&self) -> impl Iterator<Item = (TimeoutId, &TimeoutEntry)> {
		self.entries.iter().map(|(id, entry)| (*id, entry))
	}

	pub fn len(&self) -> usize { self.entries.len() }

	pub fn is_empty(&self) -> bool { self.entries.is_empty() }

	pub fn log_status(&self) {
		let now = self.clock.now_ms();
		info!("Timeout registry: {} entries", self.entries.len() as u32);
		for (id, entry) in self.entries.iter() {
			let state = if entry.active { "active" } else { "expired" };
			info!(
				"  {} ({}): {}, {} ms remaining",
				id.0,
				entry.name.as_str(),
				state,
				entry.remaining_ms(now)
			);
		}
	}
}

fn truncated(name: &str) -> String<NAME_CAPACITY> {
	let mut out = String::new();
	for c in name.chars() {
		if out.push(c).is_err() {
			break;
		}
	}
	out
}
