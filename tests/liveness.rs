mod common;

use common::MockRadio;
use embassy_futures::block_on;
use std::collections::HashMap;
use swarm_link::{
	HealthStatus, HeartbeatData, LinkCodec, ManualClock, MessageType, NodeId, Packet, TimeoutId,
	TimeoutRegistry,
	config::{HEARTBEAT_INTERVAL_MS, HEARTBEAT_TIMEOUT_MS, STATS_INTERVAL_MS},
};
use zerocopy::IntoBytes;

/// Peer liveness built from the two halves: every heartbeat received
/// re-arms that peer's timeout, and `check_all` reports each silent peer
/// once.
#[test]
fn silent_peer_is_reported_once() {
	let clock = ManualClock::new(u32::MAX - 3_000);
	let radio = MockRadio::new();
	let mut codec = LinkCodec::new(NodeId::from_id(1), radio.clone(), &clock);
	block_on(codec.begin()).unwrap();

	let mut registry: TimeoutRegistry<_, 8> = TimeoutRegistry::new(&clock);
	let mut peers: HashMap<u8, TimeoutId> = HashMap::new();
	let stats_timer = registry.add_timeout(STATS_INTERVAL_MS, Some("stats")).unwrap();
	let mut stats_reports = 0;

	let heartbeat_from = |id: u8, seq: u16| {
		let report = HeartbeatData::new(NodeId::from_id(id), 80.0, 0.0, 0.0, HealthStatus::Ok, 1);
		Packet::new(
			MessageType::Heartbeat,
			NodeId::from_id(id),
			NodeId::BROADCAST,
			0,
			seq,
			report.as_bytes(),
		)
		.unwrap()
	};

	for round in 0..5u16 {
		radio.state().deliver(heartbeat_from(2, round).as_bytes(), -70, 5.0);
		if round < 2 {
			radio.state().deliver(heartbeat_from(3, round).as_bytes(), -80, 3.0);
		}

		while let Some(packet) = block_on(codec.receive_message()).unwrap() {
			let source = packet.source.id();
			match peers.get(&source) {
				Some(&id) => registry.reset(id),
				None => {
					let id = registry.add_timeout(HEARTBEAT_TIMEOUT_MS, None).unwrap();
					peers.insert(source, id);
				}
			}
		}

		clock.advance(HEARTBEAT_INTERVAL_MS);

		let mut expired = registry.check_all();
		if let Some(at) = expired.iter().position(|&id| id == stats_timer) {
			expired.remove(at);
			codec.log_stats();
			registry.reset(stats_timer);
			stats_reports += 1;
			assert_eq!(round, 4);
		}
		if round == 3 {
			// Node 3 last spoke in round 1, three intervals ago.
			assert_eq!(expired.as_slice(), &[peers[&3]]);
		} else {
			assert!(expired.is_empty(), "round {round}: {expired:?}");
		}
	}

	assert!(!registry.is_expired(peers[&3]));
	assert!(registry.check_all().is_empty());
	assert_eq!(stats_reports, 1);
	assert_eq!(registry.remaining_time(stats_timer), STATS_INTERVAL_MS);
	assert_eq!(registry.remaining_time(peers[&2]), HEARTBEAT_TIMEOUT_MS - HEARTBEAT_INTERVAL_MS);
	assert_eq!(codec.stats().messages_received, 7);
	registry.log_status();
}
