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

#![deny(clippy::disallowed_methods)]

//! actors is a thread-pool actor runtime for querent.
//!
//! It solves the following problem:
//! - run thousands of lightweight actors on a small, fixed pool of OS threads
//! - let every actor own private state its prompts mutate without any
//!   synchronization of their own
//! - deliver each actor's messages strictly in send order, one at a time
//! - wind the whole system down cleanly once every actor has asked to die,
//!   and forcibly on SIGINT
//!
//! An actor is a record: an id, a fixed [`Role`] (a table of prompt
//! handlers), an opaque state slot and a bounded mailbox. Sending is the only
//! way actors interact; [`send_message`] queues a [`Message`] and, when the
//! target is idle, puts it on the run queue a worker will pick it from. Three
//! message types belong to the runtime: [`MSG_HELLO`] greets a fresh actor,
//! [`MSG_SPAWN`] creates a new one, [`MSG_GODIE`] retires the receiver.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use tracing::warn;

mod actor;
mod mailbox;
mod message;
pub mod metrics;
mod registry;
mod role;
mod scheduler;
mod signal;
mod system;
mod worker;


pub use actor::ActorId;
pub use message::{Message, MessageType, Payload, MSG_GODIE, MSG_HELLO, MSG_SPAWN};
pub use role::{Prompt, Role, State};
pub use scheduler::SendError;
pub use system::{send_message, ActorSystem, CreateError};
pub use worker::actor_id_self;

/// Default ceiling on the logical length of one actor's mailbox.
pub const DEFAULT_ACTOR_QUEUE_LIMIT: usize = 1024;

/// Default ceiling on the number of actors ever registered in one run.
pub const DEFAULT_CAST_LIMIT: usize = 1 << 20;

/// Sizing knobs of one actor system.
///
/// [`SystemConfig::default`] honors `QW_ACTOR_POOL_SIZE`,
/// `QW_ACTOR_QUEUE_LIMIT` and `QW_CAST_LIMIT` when set and valid, and falls
/// back to the number of CPUs for the pool and to the compiled-in limits for
/// the rest. Zero values are lifted to 1 at system creation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
	/// Number of worker threads dispatching actors.
	pub pool_size: usize,
	/// Per-actor mailbox cap; a send hitting it is rejected, not queued.
	pub actor_queue_limit: usize,
	/// Maximum number of actors over the lifetime of the system. Spawn
	/// requests beyond it are dropped without notice.
	pub cast_limit: usize,
}

impl Default for SystemConfig {
	fn default() -> Self {
		SystemConfig {
			pool_size: limit_from_env_or_default("QW_ACTOR_POOL_SIZE", num_cpus::get()),
			actor_queue_limit: limit_from_env_or_default(
				"QW_ACTOR_QUEUE_LIMIT",
				DEFAULT_ACTOR_QUEUE_LIMIT,
			),
			cast_limit: limit_from_env_or_default("QW_CAST_LIMIT", DEFAULT_CAST_LIMIT),
		}
	}
}

fn limit_from_env_or_default(env_name: &str, default: usize) -> usize {
	match std::env::var(env_name) {
		Ok(limit_str) => {
			if let Ok(limit) = limit_str.parse::<NonZeroUsize>() {
				return limit.get();
			}
			warn!(
				"failed to parse `{env_name}={limit_str}` as an integer > 0, using the default \
				 ({default})"
			);
		},
		Err(std::env::VarError::NotUnicode(os_str)) => {
			warn!(
				"failed to parse `{env_name}={os_str:?}` as a valid unicode string, using the \
				 default ({default})"
			);
		},
		Err(std::env::VarError::NotPresent) => {},
	}
	default
}
