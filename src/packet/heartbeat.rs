use crate::{
	error::{Error, Result},
	packet::{MessageType, NodeId, Packet},
};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, little_endian::F32};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum HealthStatus {
	Ok = 0,
	Warning = 1,
	Critical = 2,
}

impl HealthStatus {
	pub const fn name(self) -> &'static str {
		match self {
			Self::Ok => "OK",
			Self::Warning => "WARNING",
			Self::Critical => "CRITICAL",
		}
	}
}

impl TryFrom<u8> for HealthStatus {
	type Error = Error;

	fn try_from(raw: u8) -> Result<Self> {
		match raw {
			0 => Ok(Self::Ok),
			1 => Ok(Self::Warning),
			2 => Ok(Self::Critical),
			_ => Err(Error::UnknownHealthStatus(raw)),
		}
	}
}

/// Periodic liveness report carried in a [`MessageType::Heartbeat`] packet.
#[derive(Clone, FromBytes, IntoBytes, KnownLayout, Immutable, Debug)]
#[repr(C)]
pub struct HeartbeatData {
	pub node: NodeId,
	/// Percent, 0.0 to 100.0.
	pub battery_level: F32,
	pub latitude: F32,
	pub longitude: F32,
	pub status: u8,
	pub mission_state: u8,
}

impl HeartbeatData {
	pub const SIZE: usize = size_of::<Self>();

	pub fn new(
		node: NodeId,
		battery_level: f32,
		latitude: f32,
		longitude: f32,
		status: HealthStatus,
		mission_state: u8,
	) -> Self {
		Self {
			node,
			battery_level: F32::new(battery_level),
			latitude: F32::new(latitude),
			longitude: F32::new(longitude),
			status: status as u8,
			mission_state,
		}
	}

	pub fn health(&self) -> Result<HealthStatus> { HealthStatus::try_from(self.status) }

	/// Decodes the payload of a heartbeat packet. The declared length must
	/// match the heartbeat layout exactly.
	pub fn from_packet(packet: &Packet) -> Result<Self> {
		if packet.message_type()? != MessageType::Heartbeat {
			return Err(Error::PayloadLayout);
		}
		Self::read_from_bytes(packet.payload()).map_err(|_| Error::PayloadLayout)
	}
}
