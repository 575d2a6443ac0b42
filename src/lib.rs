#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)] // Radio is consumed through generics, never as dyn

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod link;
pub mod packet;
pub mod radio;
pub mod stats;
pub mod time;
pub mod timeout;

pub use config::{MAX_PAYLOAD, RadioConfig};
pub use error::{Error, Result};
pub use link::LinkCodec;
pub use packet::{
	MessageType, NodeId, Packet, calculate_checksum,
	heartbeat::{HealthStatus, HeartbeatData},
};
pub use radio::{Radio, lora::LoraRadio};
pub use stats::{LinkStats, SignalQuality};
pub use time::{Clock, EmbassyClock, ManualClock, elapsed_ms};
pub use timeout::{TimeoutEntry, TimeoutId, TimeoutRegistry};
