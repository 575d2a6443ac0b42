/// Largest payload a single packet can carry.
pub const MAX_PAYLOAD: usize = 32;

pub const HEARTBEAT_INTERVAL_MS: u32 = 2_000;
/// Three missed heartbeats.
pub const HEARTBEAT_TIMEOUT_MS: u32 = 3 * HEARTBEAT_INTERVAL_MS;
pub const MESSAGE_TIMEOUT_MS: u32 = 5_000;
pub const STATS_INTERVAL_MS: u32 = 10_000;
pub const ACK_TIMEOUT_MS: u32 = 1_000;

/// Modulation and power settings applied once by `LinkCodec::begin`.
///
/// Every node on the channel must agree on frequency, bandwidth, spreading
/// factor, coding rate and preamble length or frames will not demodulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioConfig {
	pub frequency_hz: u32,
	pub tx_power_dbm: i32,
	pub bandwidth_hz: u32,
	pub spreading_factor: u8,
	/// Denominator of the 4/x coding rate, 5 through 8.
	pub coding_rate: u8,
	pub preamble_length: u16,
}

impl RadioConfig {
	pub const DEFAULT: Self = Self {
		frequency_hz: 433_000_000,
		tx_power_dbm: 20,
		bandwidth_hz: 125_000,
		spreading_factor: 7,
		coding_rate: 5,
		preamble_length: 8,
	};

	pub const fn with_frequency(self, frequency_hz: u32) -> Self {
		Self {
			frequency_hz,
			..self
		}
	}

	pub const fn with_tx_power(self, tx_power_dbm: i32) -> Self {
		Self {
			tx_power_dbm,
			..self
		}
	}
}

impl Default for RadioConfig {
	fn default() -> Self { Self::DEFAULT }
}
