use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error("Link used before a successful begin()")]
	NotInitialized,
	#[error("Payload of {len} bytes exceeds the packet capacity")]
	OversizedPayload { len: usize },
	#[error("Lora radio error: {0:?}")]
	Radio(lora_phy::mod_params::RadioError),
	#[error("Radio reported a failed transmission")]
	TransmitFailed,
	#[error("Frame size mismatch: expected {expected} bytes, got {actual}")]
	SizeMismatch { expected: usize, actual: usize },
	#[error("Checksum mismatch: computed {expected:#04x}, carried {actual:#04x}")]
	ChecksumMismatch { expected: u8, actual: u8 },
	#[error("Declared data length {0} exceeds the packet capacity")]
	InvalidDataLength(u8),
	#[error("Unknown message type {0:#04x}")]
	UnknownMessageType(u8),
	#[error("Unknown health status {0}")]
	UnknownHealthStatus(u8),
	#[error("Payload does not match the expected layout")]
	PayloadLayout,
	#[error("Radio configuration not supported")]
	InvalidConfig,
	#[error("Timeout registry is full")]
	RegistryFull,
	#[error("Timeout handles exhausted")]
	HandlesExhausted,
}
