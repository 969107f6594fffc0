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
	actor::{Actor, ActorId},
	role::Role,
};

/// Append-only id → actor record index. Records are boxed so their addresses
/// survive the vec growing; the HELLO sent on behalf of a spawn points into
/// the parent's record and relies on that.
#[derive(Default)]
pub(crate) struct ActorRegistry {
	actors: Vec<Box<Actor>>,
}

impl ActorRegistry {
	/// Creates a record for a new actor and assigns it the next id.
	pub(crate) fn register(&mut self, role: &'static Role, queue_limit: usize) -> ActorId {
		let actor_id = self.actors.len();
		self.actors.push(Box::new(Actor::new(actor_id, role, queue_limit)));
		actor_id
	}

	pub(crate) fn get(&self, actor_id: ActorId) -> Option<&Actor> {
		self.actors.get(actor_id).map(|actor| actor.as_ref())
	}

	pub(crate) fn get_mut(&mut self, actor_id: ActorId) -> Option<&mut Actor> {
		self.actors.get_mut(actor_id).map(|actor| actor.as_mut())
	}

	/// Number of actors ever registered, which is also the next free id.
	pub(crate) fn total(&self) -> usize {
		self.actors.len()
	}

	pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
		self.actors.iter_mut().map(|actor| actor.as_mut())
	}
}
