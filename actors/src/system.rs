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

use std::{
	mem,
	sync::Arc,
	thread,
	thread::JoinHandle,
};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::info;

use crate::{
	actor::ActorId,
	message::{Message, Payload, MSG_HELLO},
	role::Role,
	scheduler::{Scheduler, SendError},
	signal::start_signal_watcher,
	worker::worker_loop,
	SystemConfig,
};

/// The one live system of this process. Prompt handlers receive no context
/// argument, so [`send_message`] reaches the scheduler through this slot.
static CURRENT_SYSTEM: Lazy<Mutex<Option<Arc<Scheduler>>>> = Lazy::new(|| Mutex::new(None));

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum CreateError {
	#[error("an actor system is already running in this process")]
	AlreadyRunning,
}

/// Handle on a running actor system.
///
/// At most one instance exists per process between [`ActorSystem::create`]
/// and [`ActorSystem::join`]. Prompt faults are not trapped: a panicking
/// prompt takes its worker thread down with it, and a system short a worker
/// may never finish joining.
pub struct ActorSystem {
	scheduler: Arc<Scheduler>,
	workers: Vec<JoinHandle<()>>,
	signal_watcher: JoinHandle<()>,
}

impl ActorSystem {
	/// Boots a system sized by [`SystemConfig::default`], creates actor 0
	/// with `role` and greets it with a HELLO carrying a null payload.
	/// Returns the handle and the id of actor 0.
	pub fn create(role: &'static Role) -> Result<(ActorSystem, ActorId), CreateError> {
		Self::with_config(SystemConfig::default(), role)
	}

	pub fn with_config(
		config: SystemConfig,
		role: &'static Role,
	) -> Result<(ActorSystem, ActorId), CreateError> {
		let mut current_system = CURRENT_SYSTEM.lock();
		if current_system.is_some() {
			return Err(CreateError::AlreadyRunning);
		}
		let scheduler = Arc::new(Scheduler::new(config));
		let (root_id, pool_size) = {
			let mut state = scheduler.state.lock();
			(state.register(role), state.pool_size)
		};
		// The watcher goes up before the first worker.
		let (signal_watcher, signal_handle) = start_signal_watcher(scheduler.clone());
		let workers: Vec<JoinHandle<()>> = (0..pool_size)
			.map(|worker_ord| {
				let scheduler = scheduler.clone();
				let signal_handle = signal_handle.clone();
				thread::Builder::new()
					.name(format!("actor-worker-{worker_ord}"))
					.spawn(move || worker_loop(scheduler, signal_handle))
					.expect("failed to spawn a worker thread")
			})
			.collect();
		*current_system = Some(scheduler.clone());
		drop(current_system);
		info!(pool_size, "actor-system-up");
		let system = ActorSystem { scheduler, workers, signal_watcher };
		// An interrupt racing the bring-up may already have refused it.
		let _ = system
			.send(root_id, Message::new(MSG_HELLO, mem::size_of::<Payload>(), Payload::null()));
		Ok((system, root_id))
	}

	/// Queues `message` for `actor`. Callable from any thread, including
	/// prompt handlers.
	pub fn send(&self, actor: ActorId, message: Message) -> Result<(), SendError> {
		self.scheduler.send(actor, message)
	}

	/// Blocks until the pool has drained (every actor dead, or an interrupt
	/// flushed the remaining work), then joins every thread and tears the
	/// instance down. A subsequent [`ActorSystem::create`] may succeed again.
	pub fn join(self) {
		{
			let mut guard = self.scheduler.state.lock();
			while guard.dead_workers != guard.pool_size {
				self.scheduler.pool_drained.wait(&mut guard);
			}
		}
		for worker in self.workers {
			worker.join().expect("a worker thread panicked");
		}
		self.signal_watcher.join().expect("the signal watcher thread panicked");
		*CURRENT_SYSTEM.lock() = None;
		info!("actor-system-down");
	}
}

/// Queues `message` for `actor` on the system currently running in this
/// process. This is the form prompt handlers use, since they hold no
/// reference to the [`ActorSystem`] handle.
///
/// # Panics
///
/// Panics when no system is running.
pub fn send_message(actor: ActorId, message: Message) -> Result<(), SendError> {
	let scheduler =
		CURRENT_SYSTEM.lock().clone().expect("no actor system is running in this process");
	scheduler.send(actor, message)
}
