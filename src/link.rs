use crate::{
	config::{ACK_TIMEOUT_MS, MAX_PAYLOAD, RadioConfig},
	error::{Error, Result},
	packet::{MessageType, NodeId, Packet, heartbeat::HeartbeatData},
	radio::Radio,
	stats::{LinkStats, SignalQuality},
	time::{Clock, elapsed_ms},
};
use embassy_futures::yield_now;
use zerocopy::IntoBytes;

/// Packet codec for one node: frames, sends and validates packets over a
/// [`Radio`] and keeps the link statistics.
///
/// Single owner, one operation at a time. Nothing runs in the background;
/// the main loop polls [`LinkCodec::receive_message`] every iteration.
pub struct LinkCodec<R, C> {
	radio: R,
	clock: C,
	node_id: NodeId,
	config: RadioConfig,
	sequence: u16,
	initialized: bool,
	stats: LinkStats,
}

impl<R: Radio, C: Clock> LinkCodec<R, C> {
	pub fn new(node_id: NodeId, radio: R, clock: C) -> Self {
		Self::with_config(node_id, radio, clock, RadioConfig::DEFAULT)
	}

	pub fn with_config(node_id: NodeId, radio: R, clock: C, config: RadioConfig) -> Self {
		Self {
			radio,
			clock,
			node_id,
			config,
			sequence: 0,
			initialized: false,
			stats: LinkStats::default(),
		}
	}

	/// Brings up the radio with the configured channel plan. Nothing can be
	/// sent or received until this succeeds.
	pub async fn begin(&mut self) -> Result<()> {
		if self.initialized {
			warn!("Link already initialized, reapplying radio configuration");
		}

		info!("Initializing LoRa link for node {}", self.node_id.id());

		if let Err(err) = self.radio.configure(&self.config).await {
			error!("LoRa initialization failed");
			return Err(err);
		}

		self.initialized = true;

		info!(
			"LoRa initialized: {} Hz, {} dBm, SF{}",
			self.config.frequency_hz,
			self.config.tx_power_dbm,
			self.config.spreading_factor
		);

		Ok(())
	}

	pub fn is_initialized(&self) -> bool { self.initialized }

	pub fn node_id(&self) -> NodeId { self.node_id }

	pub fn config(&self) -> &RadioConfig { &self.config }

	/// Sequence number the next built packet will carry.
	pub fn next_sequence(&self) -> u16 { self.sequence.wrapping_add(1) }

	/// Transmits `packet` as-is, checksum included. Not retried.
	///
	/// A packet that would fail [`Packet::verify`] on the receiving side is
	/// refused without touching the radio or the counters; call
	/// [`Packet::seal`] after editing fields by hand.
	pub async fn send_message(&mut self, packet: &Packet) -> Result<()> {
		if !self.initialized {
			error!("Send attempted before initialization");
			return Err(Error::NotInitialized);
		}

		if let Err(err) = packet.verify() {
			error!("Refusing to send malformed packet (seq {})", packet.sequence.get());
			return Err(err);
		}

		debug!(
			"Sending message type {:02x} to node {}",
			packet.message_type,
			packet.destination.id()
		);

		match self.radio.transmit(packet.as_bytes()).await {
			Ok(()) => {
				self.stats.messages_sent = self.stats.messages_sent.wrapping_add(1);
				info!("Message sent (seq {})", packet.sequence.get());
				Ok(())
			}
			Err(err) => {
				self.stats.messages_lost = self.stats.messages_lost.wrapping_add(1);
				error!("Failed to send message (seq {})", packet.sequence.get());
				Err(err)
			}
		}
	}

	/// Builds a packet addressed to `destination`, stamped with the current
	/// time and the next sequence number, and sends it. Returns the sequence
	/// number used.
	pub async fn send_to(
		&mut self,
		destination: NodeId,
		message_type: MessageType,
		payload: &[u8],
	) -> Result<u16> {
		if payload.len() > MAX_PAYLOAD {
			error!("Payload of {} bytes is too large for a packet", payload.len() as u32);
			return Err(Error::OversizedPayload { len: payload.len() });
		}

		self.sequence = self.sequence.wrapping_add(1);
		let packet = Packet::new(
			message_type,
			self.node_id,
			destination,
			self.clock.now_ms(),
			self.sequence,
			payload,
		)?;

		self.send_message(&packet).await?;

		Ok(self.sequence)
	}

	pub async fn broadcast_message(
		&mut self,
		message_type: MessageType,
		payload: &[u8],
	) -> Result<u16> {
		self.send_to(NodeId::BROADCAST, message_type, payload).await
	}

	pub async fn broadcast_heartbeat(&mut self, heartbeat: &HeartbeatData) -> Result<u16> {
		self.broadcast_message(MessageType::Heartbeat, heartbeat.as_bytes()).await
	}

	/// Polls the radio once.
	///
	/// `Ok(None)` covers both "nothing arrived" and a frame of the wrong
	/// size; the latter is only visible in the logs and leaves the counters
	/// alone. A frame that fails validation counts as lost and is returned
	/// as an error.
	pub async fn receive_message(&mut self) -> Result<Option<Packet>> {
		if !self.initialized {
			return Err(Error::NotInitialized);
		}

		let available = self.radio.poll_receive().await?;
		if available == 0 {
			return Ok(None);
		}

		if available != Packet::SIZE {
			warn!("Invalid packet size: {} bytes", available as u32);
			return Ok(None);
		}

		let mut frame = [0u8; Packet::SIZE];
		let read = self.radio.read_bytes(&mut frame);
		let packet = match Packet::from_bytes(&frame[..read]) {
			Ok(packet) => packet,
			Err(_) => {
				warn!("Short read: {} of {} bytes", read as u32, Packet::SIZE as u32);
				return Ok(None);
			}
		};

		self.stats.last_rssi = self.radio.last_rssi();
		self.stats.last_snr = self.radio.last_snr();

		if let Err(err) = packet.verify() {
			self.stats.messages_lost = self.stats.messages_lost.wrapping_add(1);
			error!("Message validation failed (seq {})", packet.sequence.get());
			return Err(err);
		}

		self.stats.messages_received = self.stats.messages_received.wrapping_add(1);

		info!(
			"Message received from node {} (type {:02x}, seq {})",
			packet.source.id(),
			packet.message_type,
			packet.sequence.get()
		);
		info!("Signal: RSSI={} dBm, SNR={} dB", self.stats.last_rssi, self.stats.last_snr);

		Ok(Some(packet))
	}

	/// Keeps polling until a packet arrives or `timeout_ms` has elapsed,
	/// yielding between polls. Receive errors end the wait early.
	pub async fn receive_with_timeout(&mut self, timeout_ms: u32) -> Result<Option<Packet>> {
		let start = self.clock.now_ms();
		loop {
			if let Some(packet) = self.receive_message().await? {
				return Ok(Some(packet));
			}
			if elapsed_ms(start, self.clock.now_ms()) >= timeout_ms {
				return Ok(None);
			}
			yield_now().await;
		}
	}

	/// Waits up to [`ACK_TIMEOUT_MS`] for the next packet, the window a
	/// peer has to answer a directed request.
	pub async fn receive_reply(&mut self) -> Result<Option<Packet>> {
		self.receive_with_timeout(ACK_TIMEOUT_MS).await
	}

	/// Forwarded to the radio without range checks.
	pub async fn set_tx_power(&mut self, dbm: i32) -> Result<()> {
		self.radio.set_tx_power(dbm).await?;
		info!("TX power set to {} dBm", dbm);
		Ok(())
	}

	/// Forwarded to the radio without range checks.
	pub async fn set_frequency(&mut self, hz: u32) -> Result<()> {
		self.radio.set_frequency(hz).await?;
		info!("Frequency set to {} Hz", hz);
		Ok(())
	}

	pub fn rssi(&self) -> i16 { self.stats.last_rssi }

	pub fn snr(&self) -> f32 { self.stats.last_snr }

	pub fn signal_quality(&self) -> SignalQuality { SignalQuality::from_rssi(self.stats.last_rssi) }

	/// Snapshot of the counters with the uptime filled in.
	pub fn stats(&self) -> LinkStats {
		LinkStats {
			uptime_ms: self.clock.now_ms(),
			..self.stats
		}
	}

	/// Zeroes the message counters. Signal metrics are kept.
	pub fn reset_stats(&mut self) {
		self.stats.clear_counters();
		info!("Statistics reset");
	}

	pub fn log_stats(&self) {
		let stats = self.stats();
		info!("=== Link statistics, node {} ===", self.node_id.id());
		info!("Messages sent: {}", stats.messages_sent);
		info!("Messages received: {}", stats.messages_received);
		info!("Messages lost: {}", stats.messages_lost);
		match stats.success_rate() {
			Some(rate) => info!("Success rate: {}%", rate),
			None => info!("Success rate: n/a"),
		}
		info!(
			"Last RSSI: {} dBm ({})",
			stats.last_rssi,
			SignalQuality::from_rssi(stats.last_rssi).name()
		);
		info!("Last SNR: {} dB", stats.last_snr);
		info!("Uptime: {} ms", stats.uptime_ms);
	}

	/// Hands back the radio and clock, e.g. to tear the link down.
	pub fn release(self) -> (R, C) { (self.radio, self.clock) }
}
