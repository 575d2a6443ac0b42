use crate::{
	config::{MAX_PAYLOAD, MESSAGE_TIMEOUT_MS},
	error::{Error, Result},
	time::elapsed_ms,
};
use zerocopy::{
	FromBytes, Immutable, IntoBytes, KnownLayout,
	little_endian::{U16, U32},
};

pub mod heartbeat;

#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct NodeId(u8);

impl NodeId {
	pub const BROADCAST: Self = Self(0xff);

	pub const fn id(&self) -> u8 { self.0 }

	pub const fn from_id(id: u8) -> Self { Self(id) }

	pub const fn is_broadcast(&self) -> bool { self.0 == Self::BROADCAST.0 }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageType {
	Heartbeat = 0x01,
	Gossip = 0x02,
	MutexRequest = 0x03,
	MutexResponse = 0x04,
	VoteRequest = 0x05,
	VoteResponse = 0x06,
	MissionUpdate = 0x07,
	TargetFound = 0x08,
	EmergencyStop = 0x09,
	StatusRequest = 0x0a,
	StatusResponse = 0x0b,
}

impl MessageType {
	pub const fn name(self) -> &'static str {
		match self {
			Self::Heartbeat => "HEARTBEAT",
			Self::Gossip => "GOSSIP",
			Self::MutexRequest => "MUTEX_REQUEST",
			Self::MutexResponse => "MUTEX_RESPONSE",
			Self::VoteRequest => "RAFT_VOTE_REQUEST",
			Self::VoteResponse => "RAFT_VOTE_RESPONSE",
			Self::MissionUpdate => "MISSION_UPDATE",
			Self::TargetFound => "TARGET_FOUND",
			Self::EmergencyStop => "EMERGENCY_STOP",
			Self::StatusRequest => "STATUS_REQUEST",
			Self::StatusResponse => "STATUS_RESPONSE",
		}
	}

	/// Tags that have a slot on the wire but no producer or consumer yet.
	pub const fn is_reserved(self) -> bool { !matches!(self, Self::Heartbeat | Self::Gossip) }
}

impl TryFrom<u8> for MessageType {
	type Error = Error;

	fn try_from(tag: u8) -> Result<Self> {
		let message_type = match tag {
			0x01 => Self::Heartbeat,
			0x02 => Self::Gossip,
			0x03 => Self::MutexRequest,
			0x04 => Self::MutexResponse,
			0x05 => Self::VoteRequest,
			0x06 => Self::VoteResponse,
			0x07 => Self::MissionUpdate,
			0x08 => Self::TargetFound,
			0x09 => Self::EmergencyStop,
			0x0a => Self::StatusRequest,
			0x0b => Self::StatusResponse,
			_ => return Err(Error::UnknownMessageType(tag)),
		};
		Ok(message_type)
	}
}

/// XOR of every byte.
///
/// This is a parity check per bit column: any odd number of flips in one
/// column is caught, so every single-bit error is caught. Two flips in the
/// same column cancel, and reordered bytes go unnoticed. Peers depend on
/// this exact value, so it cannot be swapped for a CRC.
pub fn calculate_checksum(data: &[u8]) -> u8 { data.iter().fold(0, |acc, byte| acc ^ byte) }

/// Fixed-size frame exchanged over the air. Always [`Packet::SIZE`] bytes
/// regardless of how much of `data` is in use.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct Packet {
	pub message_type: u8,
	pub source: NodeId,
	pub destination: NodeId,
	/// Sender uptime in ms when the packet was built.
	pub timestamp: U32,
	pub sequence: U16,
	pub data_length: u8,
	pub data: [u8; MAX_PAYLOAD],
	pub checksum: u8,
}

const _: () = assert!(Packet::SIZE == 43);

impl Packet {
	pub const SIZE: usize = size_of::<Self>();

	/// Builds a sealed packet. Bytes of `data` past the payload are zero.
	pub fn new(
		message_type: MessageType,
		source: NodeId,
		destination: NodeId,
		timestamp: u32,
		sequence: u16,
		payload: &[u8],
	) -> Result<Self> {
		if payload.len() > MAX_PAYLOAD {
			return Err(Error::OversizedPayload { len: payload.len() });
		}

		let mut data = [0u8; MAX_PAYLOAD];
		data[..payload.len()].copy_from_slice(payload);

		let mut packet = Self {
			message_type: message_type as u8,
			source,
			destination,
			timestamp: U32::new(timestamp),
			sequence: U16::new(sequence),
			data_length: payload.len() as u8,
			data,
			checksum: 0,
		};
		packet.seal();

		Ok(packet)
	}

	/// Parses a received frame. Only the size is checked here; integrity is
	/// left to [`Packet::verify`].
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Self::read_from_bytes(bytes).map_err(|_| Error::SizeMismatch {
			expected: Self::SIZE,
			actual: bytes.len(),
		})
	}

	pub fn message_type(&self) -> Result<MessageType> { MessageType::try_from(self.message_type) }

	pub fn payload(&self) -> &[u8] {
		let len = usize::from(self.data_length).min(MAX_PAYLOAD);
		&self.data[..len]
	}

	pub fn is_broadcast(&self) -> bool { self.destination.is_broadcast() }

	pub fn compute_checksum(&self) -> u8 { calculate_checksum(&self.as_bytes()[..Self::SIZE - 1]) }

	pub fn seal(&mut self) { self.checksum = self.compute_checksum(); }

	pub fn verify(&self) -> Result<()> {
		let expected = self.compute_checksum();
		if expected != self.checksum {
			return Err(Error::ChecksumMismatch {
				expected,
				actual: self.checksum,
			});
		}
		if usize::from(self.data_length) > MAX_PAYLOAD {
			return Err(Error::InvalidDataLength(self.data_length));
		}
		Ok(())
	}

	pub fn is_valid(&self) -> bool { self.verify().is_ok() }

	/// Time since the sender stamped the packet. Only meaningful when both
	/// ends share a time base.
	pub fn age_ms(&self, now: u32) -> u32 { elapsed_ms(self.timestamp.get(), now) }

	/// Older than [`MESSAGE_TIMEOUT_MS`] and no longer worth acting on.
	pub fn is_stale(&self, now: u32) -> bool { self.age_ms(now) > MESSAGE_TIMEOUT_MS }
}
