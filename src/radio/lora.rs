use crate::{
	config::RadioConfig,
	error::{Error, Result},
	radio::Radio,
};
use lora_phy::{
	DelayNs, LoRa, RxMode,
	mod_params::{Bandwidth, CodingRate, ModulationParams, RadioError, SpreadingFactor},
	mod_traits::RadioKind,
};

pub const RX_BUFFER_SIZE: usize = 255;

/// Symbols the receiver stays open for on each poll.
pub const POLL_WINDOW_SYMBOLS: u16 = 32;

fn spreading_factor(sf: u8) -> Option<SpreadingFactor> {
	let sf = match sf {
		5 => SpreadingFactor::_5,
		6 => SpreadingFactor::_6,
		7 => SpreadingFactor::_7,
		8 => SpreadingFactor::_8,
		9 => SpreadingFactor::_9,
		10 => SpreadingFactor::_10,
		11 => SpreadingFactor::_11,
		12 => SpreadingFactor::_12,
		_ => return None,
	};
	Some(sf)
}

fn bandwidth(hz: u32) -> Option<Bandwidth> {
	let bw = match hz {
		62_500 => Bandwidth::_62KHz,
		125_000 => Bandwidth::_125KHz,
		250_000 => Bandwidth::_250KHz,
		500_000 => Bandwidth::_500KHz,
		_ => return None,
	};
	Some(bw)
}

fn coding_rate(denominator: u8) -> Option<CodingRate> {
	let cr = match denominator {
		5 => CodingRate::_4_5,
		6 => CodingRate::_4_6,
		7 => CodingRate::_4_7,
		8 => CodingRate::_4_8,
		_ => return None,
	};
	Some(cr)
}

/// [`Radio`] over a `lora-phy` driver. The caller builds the `LoRa` handle
/// for its board; this type only drives it.
pub struct LoraRadio<RK: RadioKind, DLY: DelayNs> {
	lora: LoRa<RK, DLY>,
	config: RadioConfig,
	mod_params: Option<ModulationParams>,
	rx_buffer: [u8; RX_BUFFER_SIZE],
	rx_len: usize,
	last_rssi: i16,
	last_snr: f32,
}

impl<RK: RadioKind, DLY: DelayNs> LoraRadio<RK, DLY> {
	pub fn new(lora: LoRa<RK, DLY>) -> Self {
		Self {
			lora,
			config: RadioConfig::DEFAULT,
			mod_params: None,
			rx_buffer: [0; RX_BUFFER_SIZE],
			rx_len: 0,
			last_rssi: 0,
			last_snr: 0.0,
		}
	}

	pub fn into_inner(self) -> LoRa<RK, DLY> { self.lora }

	fn modulation(&mut self, config: &RadioConfig) -> Result<ModulationParams> {
		let sf = spreading_factor(config.spreading_factor).ok_or(Error::InvalidConfig)?;
		let bw = bandwidth(config.bandwidth_hz).ok_or(Error::InvalidConfig)?;
		let cr = coding_rate(config.coding_rate).ok_or(Error::InvalidConfig)?;

		self.lora
			.create_modulation_params(sf, bw, cr, config.frequency_hz)
			.map_err(Error::Radio)
	}
}

impl<RK: RadioKind, DLY: DelayNs> Radio for LoraRadio<RK, DLY> {
	async fn configure(&mut self, config: &RadioConfig) -> Result<()> {
		let mod_params = self.modulation(config)?;
		self.mod_params = Some(mod_params);
		self.config = *config;
		Ok(())
	}

	async fn transmit(&mut self, frame: &[u8]) -> Result<()> {
		let mod_params = self.mod_params.as_ref().ok_or(Error::NotInitialized)?;

		let mut tx_pkt_params = self
			.lora
			.create_tx_packet_params(self.config.preamble_length, false, false, false, mod_params)
			.map_err(Error::Radio)?;

		self.lora
			.prepare_for_tx(mod_params, &mut tx_pkt_params, self.config.tx_power_dbm, frame)
			.await
			.map_err(Error::Radio)?;

		debug!("Ready for tx");

		self.lora.tx().await.map_err(Error::Radio)?;

		debug!("Tx complete");

		Ok(())
	}

	async fn poll_receive(&mut self) -> Result<usize> {
		let mod_params = self.mod_params.as_ref().ok_or(Error::NotInitialized)?;
		self.rx_len = 0;

		let rx_pkt_params = self
			.lora
			.create_rx_packet_params(
				self.config.preamble_length,
				false,
				RX_BUFFER_SIZE as u8,
				false,
				false,
				mod_params,
			)
			.map_err(Error::Radio)?;

		self.lora
			.prepare_for_rx(RxMode::Single(POLL_WINDOW_SYMBOLS), mod_params, &rx_pkt_params)
			.await
			.map_err(Error::Radio)?;

		match self.lora.rx(&rx_pkt_params, &mut self.rx_buffer).await {
			Ok((received_len, packet_status)) => {
				self.rx_len = received_len as usize;
				self.last_rssi = packet_status.rssi;
				self.last_snr = f32::from(packet_status.snr);
				Ok(self.rx_len)
			}
			Err(RadioError::ReceiveTimeout) => Ok(0),
			Err(err) => Err(Error::Radio(err)),
		}
	}

	fn read_bytes(&mut self, buffer: &mut [u8]) -> usize {
		let len = self.rx_len.min(buffer.len());
		buffer[..len].copy_from_slice(&self.rx_buffer[..len]);
		self.rx_len = 0;
		len
	}

	fn last_rssi(&self) -> i16 { self.last_rssi }

	fn last_snr(&self) -> f32 { self.last_snr }

	async fn set_tx_power(&mut self, dbm: i32) -> Result<()> {
		// Output power is applied per transmission.
		self.config.tx_power_dbm = dbm;
		Ok(())
	}

	async fn set_frequency(&mut self, hz: u32) -> Result<()> {
		let config = self.config.with_frequency(hz);
		let mod_params = self.modulation(&config)?;
		self.mod_params = Some(mod_params);
		self.config = config;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_channel_plan_maps_to_phy_settings() {
		let config = RadioConfig::DEFAULT;
		assert!(spreading_factor(config.spreading_factor).is_some());
		assert!(bandwidth(config.bandwidth_hz).is_some());
		assert!(coding_rate(config.coding_rate).is_some());
	}

	#[test]
	fn unsupported_settings_are_rejected() {
		assert!(spreading_factor(4).is_none());
		assert!(spreading_factor(13).is_none());
		assert!(bandwidth(100_000).is_none());
		assert!(coding_rate(4).is_none());
		assert!(coding_rate(9).is_none());
	}
}
