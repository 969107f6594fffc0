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

//! The worker loop. Every worker repeats the same round trip: wait for a
//! runnable actor, pull one message out of its mailbox, run the prompt with
//! the scheduler mutex released, then either put the actor back on the run
//! queue or watch it die. The loop also carries the two shutdown paths: the
//! clean one (the last actor dies under this worker's lock) and the forced
//! one (`stop` raised by the signal watcher).

use std::{cell::Cell, mem, sync::Arc};

use parking_lot::MutexGuard;
use signal_hook::iterator::Handle;
use tracing::debug;

use crate::{
	actor::ActorId,
	message::{Message, MessageType, Payload, MSG_GODIE, MSG_HELLO, MSG_SPAWN},
	metrics::ACTOR_METRICS,
	role::Role,
	scheduler::{Scheduler, SchedulerState},
};

thread_local! {
	/// Id of the actor this worker is currently dispatching.
	static CURRENT_ACTOR: Cell<Option<ActorId>> = const { Cell::new(None) };
}

/// Returns the id of the actor whose prompt is executing on this thread.
///
/// # Panics
///
/// Only defined inside a prompt handler running on a worker thread; panics
/// anywhere else.
pub fn actor_id_self() -> ActorId {
	CURRENT_ACTOR
		.with(Cell::get)
		.expect("actor_id_self is only defined inside a prompt running on a worker thread")
}

pub(crate) fn worker_loop(scheduler: Arc<Scheduler>, signal_handle: Handle) {
	loop {
		let mut guard = scheduler.state.lock();
		while guard.run_queue.is_empty() && !guard.stop {
			scheduler.work_available.wait(&mut guard);
		}
		if guard.stop && guard.run_queue.is_empty() {
			exit_pool(&scheduler, guard, &signal_handle);
			return;
		}

		// Dispatch. The actor keeps its runnable mark for the whole round
		// trip: a send landing while the prompt runs must queue mail only,
		// never hand the actor to a second worker.
		let state = &mut *guard;
		let actor_id = state.run_queue.pop_front().expect("woken with a non-empty run queue");
		ACTOR_METRICS.run_queue_depth.set(state.run_queue.len() as i64);
		CURRENT_ACTOR.with(|current| current.set(Some(actor_id)));
		let actor = state.registry.get_mut(actor_id).expect("the run queue holds registered actors");
		let message = actor.mailbox.pop().expect("a runnable actor holds at least one message");
		let mut actor_state = actor.state.take();
		let role = actor.role;
		drop(guard);

		match message.message_type {
			MSG_SPAWN => handle_spawn(&scheduler, actor_id, &message),
			MSG_GODIE => {
				let mut guard = scheduler.state.lock();
				guard.registry.get_mut(actor_id).expect("the registry never shrinks").active = false;
				drop(guard);
				debug!(actor_id, "godie");
			},
			MSG_HELLO => {
				// A HELLO always starts from an empty state slot.
				actor_state = None;
				if let Some(prompt) = role.prompt(MSG_HELLO) {
					prompt(&mut actor_state, message.nbytes, message.data);
				}
			},
			message_type => {
				// Types outside the prompt table are dropped without a word.
				if let Some(prompt) = role.prompt(message_type) {
					prompt(&mut actor_state, message.nbytes, message.data);
				}
			},
		}
		ACTOR_METRICS
			.messages_processed_total
			.with_label_values([kind_label(message.message_type)])
			.inc();

		let mut guard = scheduler.state.lock();
		let state = &mut *guard;
		let actor = state.registry.get_mut(actor_id).expect("the registry never shrinks");
		actor.state = actor_state;
		if !actor.mailbox.is_empty() {
			// Still runnable: straight back on the queue, mark still set.
			state.run_queue.push_back(actor_id);
			ACTOR_METRICS.run_queue_depth.set(state.run_queue.len() as i64);
			scheduler.work_available.notify_one();
		} else {
			actor.on_queue = false;
			if !actor.active {
				state.dead_actors += 1;
				ACTOR_METRICS.actors_dead_total.inc();
				debug!(actor_id, "actor-dead");
				if state.dead_actors == state.registry.total() {
					// No live actor is left to produce work: stop the pool.
					state.stop = true;
					scheduler.work_available.notify_all();
					exit_pool(&scheduler, guard, &signal_handle);
					return;
				}
			}
		}
		drop(guard);
	}
}

/// Creates the actor a SPAWN message asks for and greets it with a HELLO
/// carrying a pointer to the spawner's id. The request is dropped without
/// notice while the system stops or once the cast cap is reached.
fn handle_spawn(scheduler: &Scheduler, parent_id: ActorId, message: &Message) {
	let mut guard = scheduler.state.lock();
	let state = &mut *guard;
	if state.stop || state.registry.total() >= state.cast_limit {
		drop(guard);
		debug!(parent_id, "spawn-dropped");
		return;
	}
	// `Message::spawn` is the only way to build a spawn request, so the
	// payload is a live `&'static Role`.
	let child_role: &'static Role = unsafe { &*message.data.as_ptr::<Role>() };
	let child_id = state.register(child_role);
	let parent_id_ptr: *const ActorId =
		&state.registry.get(parent_id).expect("the registry never shrinks").id;
	drop(guard);
	debug!(parent_id, child_id, "spawn-actor");
	let hello =
		Message::new(MSG_HELLO, mem::size_of::<ActorId>(), Payload::from_ptr(parent_id_ptr.cast()));
	let _ = scheduler.send(child_id, hello);
}

/// The termination path of one worker, entered with the scheduler locked.
/// Wakes one parked peer so the exit cascades through the pool; the last
/// worker out unblocks the signal watcher (unless the watcher already
/// returned on its own after an interrupt) and releases join.
fn exit_pool(
	scheduler: &Scheduler,
	mut guard: MutexGuard<'_, SchedulerState>,
	signal_handle: &Handle,
) {
	scheduler.work_available.notify_one();
	guard.dead_workers += 1;
	if guard.dead_workers == guard.pool_size {
		if !guard.interrupted {
			signal_handle.close();
		}
		scheduler.pool_drained.notify_all();
	}
	drop(guard);
	debug!("worker-exit");
}

fn kind_label(message_type: MessageType) -> &'static str {
	match message_type {
		MSG_HELLO => "hello",
		MSG_SPAWN => "spawn",
		MSG_GODIE => "godie",
		_ => "user",
	}
}
