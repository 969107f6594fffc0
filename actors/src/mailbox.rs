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

use std::collections::VecDeque;

use crate::message::Message;

/// Per-actor message FIFO. The physical ring buffer starts tiny and doubles
/// as needed; the logical length is capped, and a push over the cap hands the
/// message back instead of queueing it. Callers hold the scheduler mutex.
pub(crate) struct Mailbox {
	messages: VecDeque<Message>,
	limit: usize,
}

impl Mailbox {
	pub(crate) fn new(limit: usize) -> Mailbox {
		Mailbox { messages: VecDeque::with_capacity(4), limit }
	}

	pub(crate) fn push(&mut self, message: Message) -> Result<(), Message> {
		if self.messages.len() >= self.limit {
			return Err(message);
		}
		self.messages.push_back(message);
		Ok(())
	}

	pub(crate) fn pop(&mut self) -> Option<Message> {
		self.messages.pop_front()
	}

	pub(crate) fn len(&self) -> usize {
		self.messages.len()
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}
}
