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

//! The scheduler couples three things under a single mutex: every actor's
//! mailbox, the global run queue of actors with pending messages, and the
//! lifecycle flags that drive shutdown. One mutex is enough because dispatch
//! hands a worker exclusive access to an actor between two critical sections;
//! per-mailbox locks would buy nothing and complicate the runnable-flag
//! transition.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

use crate::{
	actor::ActorId,
	message::Message,
	metrics::ACTOR_METRICS,
	registry::ActorRegistry,
	role::Role,
	SystemConfig,
};

/// Error returned by [`send_message`](crate::send_message) and
/// [`ActorSystem::send`](crate::ActorSystem::send).
///
/// `UnknownActor` and `Inactive` are contract violations on the caller's
/// side; `Stopping` and `Full` are transient rejections the caller may back
/// off from or drop.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum SendError {
	#[error("no actor was ever registered under id {0}")]
	UnknownActor(ActorId),
	#[error("actor {0} is no longer accepting messages")]
	Inactive(ActorId),
	#[error("the actor system is shutting down")]
	Stopping,
	#[error("the mailbox of actor {0} is at capacity")]
	Full(ActorId),
}

fn reject(send_error: SendError) -> Result<(), SendError> {
	ACTOR_METRICS.sends_rejected_total.inc();
	Err(send_error)
}

/// Everything the scheduler mutex guards.
pub(crate) struct SchedulerState {
	/// Actors holding at least one message, in dispatch order. Same growable
	/// ring-buffer shape as a mailbox, but uncapped.
	pub(crate) run_queue: VecDeque<ActorId>,
	pub(crate) registry: ActorRegistry,
	/// Actors that went inactive and drained their mailbox. The system stops
	/// cleanly the moment this reaches the registry total.
	pub(crate) dead_actors: usize,
	/// Workers that left their loop; join waits for this to reach the pool.
	pub(crate) dead_workers: usize,
	pub(crate) stop: bool,
	pub(crate) interrupted: bool,
	pub(crate) pool_size: usize,
	pub(crate) actor_queue_limit: usize,
	pub(crate) cast_limit: usize,
}

impl SchedulerState {
	pub(crate) fn register(&mut self, role: &'static Role) -> ActorId {
		let actor_id = self.registry.register(role, self.actor_queue_limit);
		ACTOR_METRICS.actors_spawned_total.inc();
		actor_id
	}
}

pub(crate) struct Scheduler {
	pub(crate) state: Mutex<SchedulerState>,
	/// Workers park here while the run queue is empty and `stop` is unset.
	pub(crate) work_available: Condvar,
	/// Signalled once by the last worker to leave; join waits on it.
	pub(crate) pool_drained: Condvar,
}

impl Scheduler {
	pub(crate) fn new(config: SystemConfig) -> Scheduler {
		let state = SchedulerState {
			run_queue: VecDeque::with_capacity(4),
			registry: ActorRegistry::default(),
			dead_actors: 0,
			dead_workers: 0,
			stop: false,
			interrupted: false,
			pool_size: config.pool_size.max(1),
			actor_queue_limit: config.actor_queue_limit.max(1),
			cast_limit: config.cast_limit.max(1),
		};
		Scheduler {
			state: Mutex::new(state),
			work_available: Condvar::new(),
			pool_drained: Condvar::new(),
		}
	}

	/// The send path. Queues `message` on the target's mailbox and, when the
	/// target is idle, makes it runnable and wakes one worker. Rejections are
	/// checked in a fixed order: unknown id, inactive target, system
	/// stopping, mailbox at capacity.
	pub(crate) fn send(&self, actor_id: ActorId, message: Message) -> Result<(), SendError> {
		let mut guard = self.state.lock();
		let state = &mut *guard;
		let Some(actor) = state.registry.get_mut(actor_id) else {
			return reject(SendError::UnknownActor(actor_id));
		};
		if !actor.active {
			return reject(SendError::Inactive(actor_id));
		}
		if state.stop {
			return reject(SendError::Stopping);
		}
		if actor.mailbox.push(message).is_err() {
			return reject(SendError::Full(actor_id));
		}
		if !actor.on_queue {
			actor.on_queue = true;
			state.run_queue.push_back(actor_id);
			ACTOR_METRICS.run_queue_depth.set(state.run_queue.len() as i64);
			self.work_available.notify_one();
		}
		Ok(())
	}

	/// The forced-shutdown path, taken by the signal watcher. Marks the whole
	/// cast inactive so pending sends start bouncing, and raises `stop` so
	/// workers drain what is queued and leave. No wake-up here: workers
	/// notice on their next pass over the wait loop, and each exiting worker
	/// wakes the next one.
	pub(crate) fn interrupt(&self) {
		let mut guard = self.state.lock();
		guard.interrupted = true;
		guard.stop = true;
		for actor in guard.registry.iter_mut() {
			actor.active = false;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		message::Payload,
		role::{Prompt, State},
	};

	fn noop(_state: &mut State, _nbytes: usize, _data: Payload) {}

	static PROMPTS: [Prompt; 1] = [noop];
	static ROLE: Role = Role::new(&PROMPTS);

	fn scheduler_with_queue_limit(actor_queue_limit: usize) -> Scheduler {
		Scheduler::new(SystemConfig { pool_size: 1, actor_queue_limit, cast_limit: 8 })
	}

	fn probe() -> Message {
		Message::new(0, 0, Payload::null())
	}

	#[test]
	fn test_send_to_an_unregistered_id() {
		let scheduler = scheduler_with_queue_limit(4);
		assert_eq!(scheduler.send(3, probe()), Err(SendError::UnknownActor(3)));
	}

	#[test]
	fn test_send_enqueues_the_target_at_most_once() {
		let scheduler = scheduler_with_queue_limit(4);
		scheduler.state.lock().register(&ROLE);
		scheduler.send(0, probe()).unwrap();
		scheduler.send(0, probe()).unwrap();
		let state = scheduler.state.lock();
		assert_eq!(state.registry.get(0).unwrap().mailbox.len(), 2);
		assert_eq!(state.run_queue.len(), 1);
		assert!(state.registry.get(0).unwrap().on_queue);
	}

	#[test]
	fn test_send_to_an_inactive_actor() {
		let scheduler = scheduler_with_queue_limit(4);
		{
			let mut state = scheduler.state.lock();
			state.register(&ROLE);
			state.registry.get_mut(0).unwrap().active = false;
		}
		assert_eq!(scheduler.send(0, probe()), Err(SendError::Inactive(0)));
	}

	#[test]
	fn test_send_while_stopping() {
		let scheduler = scheduler_with_queue_limit(4);
		{
			let mut state = scheduler.state.lock();
			state.register(&ROLE);
			state.stop = true;
		}
		assert_eq!(scheduler.send(0, probe()), Err(SendError::Stopping));
	}

	#[test]
	fn test_send_to_a_full_mailbox() {
		let scheduler = scheduler_with_queue_limit(2);
		scheduler.state.lock().register(&ROLE);
		scheduler.send(0, probe()).unwrap();
		scheduler.send(0, probe()).unwrap();
		assert_eq!(scheduler.send(0, probe()), Err(SendError::Full(0)));
	}

	#[test]
	fn test_interrupt_deactivates_the_whole_cast() {
		let scheduler = scheduler_with_queue_limit(4);
		{
			let mut state = scheduler.state.lock();
			state.register(&ROLE);
			state.register(&ROLE);
		}
		scheduler.interrupt();
		let state = scheduler.state.lock();
		assert!(state.stop);
		assert!(state.interrupted);
		assert!(!state.registry.get(0).unwrap().active);
		assert!(!state.registry.get(1).unwrap().active);
	}
}
