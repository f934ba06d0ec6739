/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Per-call timers and counters
//!
//! One [`ExecutionMetrics`] is created for every call and stored in the request's property bag.
//! Middleware stages time themselves against it. It is never shared between calls: concurrent
//! calls each carry their own instance, and the client keeps no aggregate.

use crate::property_bag::PropertyBag;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Field {
    /// Whole call, from the façade receiving the input to the result being returned
    ClientExecuteTime,
    /// Conversion of the typed input into an HTTP request
    RequestMarshallTime,
    /// Resolution of credentials, whether from the provider or a per-request override
    CredentialsRequestTime,
    RequestSigningTime,
    /// Time spent in the transport, until response headers are received
    HttpRequestTime,
    /// Reading the body and unmarshalling the result or the error
    ResponseProcessingTime,
    /// Number of times the request was handed to the transport
    RequestCount,
    /// Number of attempts made by an outer retry wrapper beyond the first
    RetryCount,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::ClientExecuteTime => "ClientExecuteTime",
            Field::RequestMarshallTime => "RequestMarshallTime",
            Field::CredentialsRequestTime => "CredentialsRequestTime",
            Field::RequestSigningTime => "RequestSigningTime",
            Field::HttpRequestTime => "HttpRequestTime",
            Field::ResponseProcessingTime => "ResponseProcessingTime",
            Field::RequestCount => "RequestCount",
            Field::RetryCount => "RetryCount",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExecutionMetrics {
    open: HashMap<Field, Instant>,
    timings: Vec<(Field, Duration)>,
    counters: HashMap<Field, u64>,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts timing `field`. Starting an event that is already running restarts it.
    pub fn start_event(&mut self, field: Field) {
        self.open.insert(field, Instant::now());
    }

    /// Stops timing `field` and records a sample. Ending an event that was never started is a
    /// no-op.
    pub fn end_event(&mut self, field: Field) {
        match self.open.remove(&field) {
            Some(start) => self.timings.push((field, start.elapsed())),
            None => tracing::trace!(field = field.name(), "ended a metrics event that never started"),
        }
    }

    pub fn increment_counter(&mut self, field: Field) {
        *self.counters.entry(field).or_insert(0) += 1;
    }

    pub fn counter(&self, field: Field) -> u64 {
        self.counters.get(&field).copied().unwrap_or(0)
    }

    /// Every sample recorded for `field`, in the order they ended
    pub fn timings(&self, field: Field) -> impl Iterator<Item = Duration> + '_ {
        self.timings
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(|(_, duration)| *duration)
    }

    /// Total time recorded for `field`, or `None` if no sample was recorded
    pub fn time_taken(&self, field: Field) -> Option<Duration> {
        self.timings(field).fold(None, |acc, sample| {
            Some(acc.unwrap_or_default() + sample)
        })
    }

    pub fn is_running(&self, field: Field) -> bool {
        self.open.contains_key(&field)
    }
}

impl fmt::Display for ExecutionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<Field> = self.timings.iter().map(|(field, _)| *field).collect();
        fields.sort();
        fields.dedup();
        let mut first = true;
        for field in fields {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            let samples: Vec<String> = self
                .timings(field)
                .map(|d| format!("{:.3}ms", d.as_secs_f64() * 1000_f64))
                .collect();
            write!(f, "{}=[{}]", field.name(), samples.join(", "))?;
        }
        let mut counters: Vec<_> = self.counters.iter().collect();
        counters.sort();
        for (field, count) in counters {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}={}", field.name(), count)?;
        }
        Ok(())
    }
}

/// Starts `field` on the metrics stored in `properties`, if any
pub fn start_event(properties: &mut PropertyBag, field: Field) {
    if let Some(metrics) = properties.get_mut::<ExecutionMetrics>() {
        metrics.start_event(field);
    }
}

/// Ends `field` on the metrics stored in `properties`, if any
pub fn end_event(properties: &mut PropertyBag, field: Field) {
    if let Some(metrics) = properties.get_mut::<ExecutionMetrics>() {
        metrics.end_event(field);
    }
}

pub fn increment_counter(properties: &mut PropertyBag, field: Field) {
    if let Some(metrics) = properties.get_mut::<ExecutionMetrics>() {
        metrics.increment_counter(field);
    }
}
