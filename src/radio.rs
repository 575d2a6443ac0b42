use crate::{config::RadioConfig, error::Result};

pub mod lora;

/// Transceiver seen by the link layer. One call is one logical operation:
/// a whole frame out, or one check for a frame in. Implementations are not
/// expected to be reentrant.
pub trait Radio {
	/// Applies modulation and power settings. Called once from
	/// `LinkCodec::begin`.
	async fn configure(&mut self, config: &RadioConfig) -> Result<()>;

	/// Sends `frame` as a single transmission.
	async fn transmit(&mut self, frame: &[u8]) -> Result<()>;

	/// Checks for an inbound frame and returns its size, 0 if nothing
	/// arrived.
	async fn poll_receive(&mut self) -> Result<usize>;

	/// Copies the frame found by the last [`Radio::poll_receive`] into
	/// `buffer`, returning how many bytes were written.
	fn read_bytes(&mut self, buffer: &mut [u8]) -> usize;

	/// RSSI of the last received frame, in dBm.
	fn last_rssi(&self) -> i16;

	/// SNR of the last received frame, in dB.
	fn last_snr(&self) -> f32;

	async fn set_tx_power(&mut self, dbm: i32) -> Result<()>;

	async fn set_frequency(&mut self, hz: u32) -> Result<()>;
}
