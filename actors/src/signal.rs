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
	sync::Arc,
	thread,
	thread::JoinHandle,
};

use signal_hook::{
	consts::SIGINT,
	iterator::{Handle, Signals},
};
use tracing::info;

use crate::scheduler::Scheduler;

/// Starts the dedicated interrupt watcher and returns its join handle plus
/// the handle the last worker uses to unblock it on a clean shutdown. Runs
/// before the first worker so an early SIGINT already has somewhere to land.
///
/// The watcher blocks until one of two things happens: SIGINT arrives, in
/// which case it forces the whole system down and returns, or the handle is
/// closed, in which case it returns immediately.
pub(crate) fn start_signal_watcher(scheduler: Arc<Scheduler>) -> (JoinHandle<()>, Handle) {
	let mut signals =
		Signals::new([SIGINT]).expect("failed to install the interrupt signal handler");
	let handle = signals.handle();
	let join_handle = thread::Builder::new()
		.name("actor-signal-watcher".to_string())
		.spawn(move || {
			if signals.forever().next() == Some(SIGINT) {
				info!("interrupt-shutdown");
				scheduler.interrupt();
			}
		})
		.expect("failed to spawn the signal watcher thread");
	(join_handle, handle)
}
