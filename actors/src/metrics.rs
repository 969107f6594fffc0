// Copyright (C) 2023 QuerentAI LLC.
// This file is part of Querent.

// The Licensed Work is licensed under the Business Source License 1.1 (BSL 1.1).
// You may use this file in compliance with the BSL 1.1, subject to the following restrictions:
// 1. You may not use the Licensed Work for AI-related services, database services,
//    or any service or product offering that provides database, big data, or analytics
//    services to third parties unless explicitly authorized by QuerentAI LLC.
// 2. For more details, see the LICENSE file or visit https://mariadb.com/bsl11/.

// For inquiries about alternative licensing arrangements, please contact contact@querent.xyz.

// The Licensed Work is provided "AS IS", WITHOUT WARRANTY OF ANY KIND, express or implied,
// including but not limited to the warranties of merchantability, fitness for a particular purpose,
// and non-infringement. See the Business Source License for more details.

// This software includes code developed by QuerentAI LLC (https://querent.xyz).

use common::metrics::{new_counter, new_counter_vec, new_gauge, IntCounter, IntCounterVec, IntGauge};
use once_cell::sync::Lazy;

pub struct ActorMetrics {
	pub messages_processed_total: IntCounterVec<1>,
	pub sends_rejected_total: IntCounter,
	pub actors_spawned_total: IntCounter,
	pub actors_dead_total: IntCounter,
	pub run_queue_depth: IntGauge,
}

impl Default for ActorMetrics {
	fn default() -> Self {
		ActorMetrics {
			messages_processed_total: new_counter_vec(
				"messages_processed_total",
				"Number of messages dispatched to actors, by message kind.",
				"querent",
				"actors",
				["kind"],
			),
			sends_rejected_total: new_counter(
				"sends_rejected_total",
				"Number of sends refused: unknown target, inactive target, stopping system or \
				 full mailbox.",
				"querent",
				"actors",
			),
			actors_spawned_total: new_counter(
				"actors_spawned_total",
				"Number of actors ever registered.",
				"querent",
				"actors",
			),
			actors_dead_total: new_counter(
				"actors_dead_total",
				"Number of actors that went inactive and drained their mailbox.",
				"querent",
				"actors",
			),
			run_queue_depth: new_gauge(
				"run_queue_depth",
				"Number of actors currently waiting for a worker.",
				"querent",
				"actors",
			),
		}
	}
}

/// Instruments of the runtime, registered once per process. Counters span
/// create/join cycles; only the gauge resets with the queue it mirrors.
pub static ACTOR_METRICS: Lazy<ActorMetrics> = Lazy::new(ActorMetrics::default);
