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

use std::{mem, ptr};

use crate::role::Role;

/// Selects the prompt a message is dispatched to. User message types are
/// direct indexes into the prompt table of the target's role; types that are
/// not valid indexes are dropped without a word.
pub type MessageType = usize;

/// Greeting. A role's first prompt, when it has one, handles it. The runtime
/// sends a HELLO with a null payload to actor 0 on startup, and one carrying
/// a pointer to the parent's id to every spawned actor.
pub const MSG_HELLO: MessageType = 0;

/// Asks the receiving actor to create a new actor whose role travels in the
/// payload. Interpreted by the runtime, never delivered to user code.
pub const MSG_SPAWN: MessageType = MessageType::MAX - 1;

/// Asks the receiving actor to stop accepting messages. Interpreted by the
/// runtime, never delivered to user code.
pub const MSG_GODIE: MessageType = MessageType::MAX;

/// An untyped borrowed pointer travelling inside a message.
///
/// The runtime never copies, frees or reads the pointee; it hands the pointer
/// to the receiving prompt exactly as the sender built it. Whether and how
/// long the pointee stays valid is a contract between sender and handler;
/// the handler assumes it when it dereferences through [`Payload::as_ptr`].
#[derive(Clone, Copy, Debug)]
pub struct Payload(*const ());

// A payload crosses threads exactly once, from the sender to the worker that
// dispatches the target actor. The sender vouches for the pointee.
unsafe impl Send for Payload {}

impl Payload {
	pub const fn null() -> Payload {
		Payload(ptr::null())
	}

	pub fn from_ptr(ptr: *const ()) -> Payload {
		Payload(ptr)
	}

	pub fn from_ref<T>(value: &T) -> Payload {
		Payload((value as *const T).cast())
	}

	pub fn as_ptr<T>(self) -> *const T {
		self.0.cast()
	}

	pub fn is_null(self) -> bool {
		self.0.is_null()
	}
}

/// What a mailbox holds: a type selecting the prompt, a payload length in
/// bytes, and the payload pointer itself.
#[derive(Clone, Copy, Debug)]
pub struct Message {
	pub message_type: MessageType,
	pub nbytes: usize,
	pub data: Payload,
}

impl Message {
	pub fn new(message_type: MessageType, nbytes: usize, data: Payload) -> Message {
		Message { message_type, nbytes, data }
	}

	/// A spawn request carrying the role of the actor to create.
	pub fn spawn(role: &'static Role) -> Message {
		Message {
			message_type: MSG_SPAWN,
			nbytes: mem::size_of::<Role>(),
			data: Payload::from_ref(role),
		}
	}

	pub fn godie() -> Message {
		Message { message_type: MSG_GODIE, nbytes: 0, data: Payload::null() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_reserved_message_types_are_distinct() {
		assert_ne!(MSG_HELLO, MSG_SPAWN);
		assert_ne!(MSG_HELLO, MSG_GODIE);
		assert_ne!(MSG_SPAWN, MSG_GODIE);
	}

	#[test]
	fn test_payload_carries_a_pointer_through() {
		let value: u64 = 0xfeed;
		let payload = Payload::from_ref(&value);
		assert!(!payload.is_null());
		assert_eq!(unsafe { *payload.as_ptr::<u64>() }, 0xfeed);
	}

	#[test]
	fn test_null_payload() {
		assert!(Payload::null().is_null());
		assert!(Message::godie().data.is_null());
	}
}
