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

use crate::{
	mailbox::Mailbox,
	role::{Role, State},
};

/// Dense, sequentially assigned actor identity. The first actor of a system
/// is 0; ids are never reused while the system lives.
pub type ActorId = usize;

/// One actor record. Every field except `state` is only touched under the
/// scheduler mutex; `state` additionally leaves the record for the duration
/// of a dispatch, so the prompt can mutate it with the mutex released.
pub(crate) struct Actor {
	pub(crate) id: ActorId,
	pub(crate) role: &'static Role,
	pub(crate) state: State,
	pub(crate) mailbox: Mailbox,
	/// Set while the actor sits in the run queue or a worker processes it.
	/// A send finding it set must not enqueue the actor a second time.
	pub(crate) on_queue: bool,
	/// Cleared when the actor handles a GODIE or the system is interrupted.
	/// An inactive actor rejects every further send.
	pub(crate) active: bool,
}

impl Actor {
	pub(crate) fn new(id: ActorId, role: &'static Role, queue_limit: usize) -> Actor {
		Actor {
			id,
			role,
			state: None,
			mailbox: Mailbox::new(queue_limit),
			on_queue: false,
			active: true,
		}
	}
}
