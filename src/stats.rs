/// Counters and last observed signal metrics for one link.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
	pub messages_sent: u32,
	pub messages_received: u32,
	/// Failed sends plus received frames that failed validation.
	pub messages_lost: u32,
	pub last_rssi: i16,
	pub last_snr: f32,
	pub uptime_ms: u32,
}

impl LinkStats {
	/// Percentage of send attempts that went out, `None` before the first.
	pub fn success_rate(&self) -> Option<f32> {
		let attempts = self.messages_sent as f32 + self.messages_lost as f32;
		(attempts > 0.0).then(|| 100.0 * self.messages_sent as f32 / attempts)
	}

	pub(crate) fn clear_counters(&mut self) {
		self.messages_sent = 0;
		self.messages_received = 0;
		self.messages_lost = 0;
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalQuality {
	VeryPoor,
	Poor,
	Fair,
	Good,
	Excellent,
}

impl SignalQuality {
	pub const fn from_rssi(rssi: i16) -> Self {
		if rssi > -70 {
			Self::Excellent
		} else if rssi > -80 {
			Self::Good
		} else if rssi > -90 {
			Self::Fair
		} else if rssi > -100 {
			Self::Poor
		} else {
			Self::VeryPoor
		}
	}

	pub const fn name(self) -> &'static str {
		match self {
			Self::VeryPoor => "Very Poor",
			Self::Poor => "Poor",
			Self::Fair => "Fair",
			Self::Good => "Good",
			Self::Excellent => "Excellent",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn success_rate_needs_attempts() {
		let mut stats = LinkStats::default();
		assert_eq!(stats.success_rate(), None);

		stats.messages_sent = 3;
		stats.messages_lost = 1;
		assert_eq!(stats.success_rate(), Some(75.0));
	}

	#[test]
	fn rssi_bands() {
		assert_eq!(SignalQuality::from_rssi(-45), SignalQuality::Excellent);
		assert_eq!(SignalQuality::from_rssi(-70), SignalQuality::Good);
		assert_eq!(SignalQuality::from_rssi(-85), SignalQuality::Fair);
		assert_eq!(SignalQuality::from_rssi(-90), SignalQuality::Poor);
		assert_eq!(SignalQuality::from_rssi(-100), SignalQuality::VeryPoor);
		assert!(SignalQuality::Good > SignalQuality::Fair);
	}
}
