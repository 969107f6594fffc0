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

//! Thin helpers over prometheus: every instrument created here is registered
//! on the default registry, so `metrics_text` exposes all of them at once.

use prometheus::{Encoder, Opts, TextEncoder};
pub use prometheus::{IntCounter, IntCounterVec as PrometheusIntCounterVec, IntGauge};

/// A counter vec whose label cardinality is checked at compile time.
#[derive(Clone)]
pub struct IntCounterVec<const N: usize> {
	underlying: PrometheusIntCounterVec,
}

impl<const N: usize> IntCounterVec<N> {
	pub fn with_label_values(&self, label_values: [&str; N]) -> IntCounter {
		self.underlying.with_label_values(&label_values)
	}
}

pub fn new_counter(name: &str, help: &str, namespace: &str, subsystem: &str) -> IntCounter {
	let counter_opts = Opts::new(name, help).namespace(namespace).subsystem(subsystem);
	let counter = IntCounter::with_opts(counter_opts).expect("failed to create counter");
	prometheus::register(Box::new(counter.clone())).expect("failed to register counter");
	counter
}

pub fn new_counter_vec<const N: usize>(
	name: &str,
	help: &str,
	namespace: &str,
	subsystem: &str,
	label_names: [&str; N],
) -> IntCounterVec<N> {
	let counter_opts = Opts::new(name, help).namespace(namespace).subsystem(subsystem);
	let underlying = PrometheusIntCounterVec::new(counter_opts, &label_names)
		.expect("failed to create counter vec");
	prometheus::register(Box::new(underlying.clone())).expect("failed to register counter vec");
	IntCounterVec { underlying }
}

pub fn new_gauge(name: &str, help: &str, namespace: &str, subsystem: &str) -> IntGauge {
	let gauge_opts = Opts::new(name, help).namespace(namespace).subsystem(subsystem);
	let gauge = IntGauge::with_opts(gauge_opts).expect("failed to create gauge");
	prometheus::register(Box::new(gauge.clone())).expect("failed to register gauge");
	gauge
}

/// Renders every registered instrument in the prometheus text exposition
/// format, ready to serve from a scrape endpoint.
pub fn metrics_text() -> String {
	let metric_families = prometheus::gather();
	let mut buffer = Vec::new();
	let encoder = TextEncoder::new();
	if let Err(encode_error) = encoder.encode(&metric_families, &mut buffer) {
		return format!("# failed to encode metrics: {encode_error}");
	}
	String::from_utf8_lossy(&buffer).into_owned()
}
