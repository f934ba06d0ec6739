/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Optional retry wrapper for aws-hyper
//!
//! The request pipeline itself never retries. When a [`RetryConfig`] allows more than one
//! attempt, the client wraps the whole pipeline: each attempt resolves the endpoint, loads
//! credentials, signs, dispatches and parses once, and increments `RetryCount` in the call's
//! metrics. Retries draw from a token bucket shared by every call of a client.

use smithy_http::metrics::{self, Field};
use smithy_http::operation::Operation;
use smithy_http::result::{SdkError, SdkSuccess};
use smithy_http::retry::ClassifyResponse;
use smithy_types::retry::{ErrorKind, RetryKind};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct RetryConfig {
    initial_retry_tokens: usize,
    retry_cost: usize,
    no_retry_increment: usize,
    timeout_retry_cost: usize,
    max_attempts: u32,
    max_backoff: Duration,
    base: fn() -> f64,
}

impl RetryConfig {
    /// Every call is a single attempt
    pub fn disabled() -> Self {
        Self::standard().with_max_attempts(1)
    }

    /// Three attempts with exponential backoff
    pub fn standard() -> Self {
        Self {
            initial_retry_tokens: INITIAL_RETRY_TOKENS,
            retry_cost: RETRY_COST,
            no_retry_increment: 1,
            timeout_retry_cost: 10,
            max_attempts: MAX_ATTEMPTS,
            max_backoff: Duration::from_secs(20),
            // by default, use a random base for exponential backoff
            base: fastrand::f64,
        }
    }

    /// Total number of attempts, including the first. `1` disables retries.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// For deterministic tests, enable using a static base instead of random base for exponential backoff
    pub fn with_base(mut self, base: fn() -> f64) -> Self {
        self.base = base;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_RETRY_TOKENS: usize = 500;
const RETRY_COST: usize = 5;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// StandardRetryStrategy
///
/// `ctx` captures cross-request retry state, whereas `attempts` captures retry state local to this
/// request
#[derive(Clone, Debug)]
pub(crate) struct StandardRetryStrategy {
    attempts: u32,
    ctx: Arc<Mutex<RetryCtx>>,
}

impl StandardRetryStrategy {
    pub fn new(ctx: Arc<Mutex<RetryCtx>>) -> Self {
        Self { attempts: 0, ctx }
    }

    #[cfg(test)]
    pub fn ctx(&self) -> MutexGuard<'_, RetryCtx> {
        lock(&self.ctx)
    }

    pub fn do_retry(&self, retry_kind: Result<(), ErrorKind>) -> Option<(Self, Duration)> {
        let mut ctx = lock(&self.ctx);
        let can_retry = match retry_kind {
            Ok(_) => {
                ctx.retry_quota_release();
                return None;
            }
            Err(e) => {
                if self.attempts + 1 >= ctx.config.max_attempts {
                    return None;
                }
                ctx.get_retry_quota(e)
            }
        };
        if !can_retry {
            return None;
        };
        let b = (ctx.config.base)();
        let r: i32 = 2;
        let backoff = b * (r.pow(self.attempts) as f64);
        let backoff = Duration::from_secs_f64(backoff).min(ctx.config.max_backoff);
        let mut next = self.clone();
        next.attempts += 1;
        Some((next, backoff))
    }
}

#[derive(Debug)]
pub(crate) struct RetryCtx {
    retry_quota: usize,
    last_retry: Option<usize>,
    config: RetryConfig,
}

impl RetryCtx {
    pub fn new(config: RetryConfig) -> Self {
        RetryCtx {
            retry_quota: config.initial_retry_tokens,
            last_retry: None,
            config,
        }
    }

    fn retry_quota_release(&mut self) {
        self.retry_quota += self.last_retry.unwrap_or(self.config.no_retry_increment);
    }

    fn get_retry_quota(&mut self, err: ErrorKind) -> bool {
        let retry_cost = if err == ErrorKind::TransientError {
            self.config.timeout_retry_cost
        } else {
            self.config.retry_cost
        };
        if retry_cost > self.retry_quota {
            false
        } else {
            self.last_retry = Some(retry_cost);
            self.retry_quota -= retry_cost;
            true
        }
    }
}

impl<Handler, R, T, E> tower::retry::Policy<Operation<Handler, R>, SdkSuccess<T>, SdkError<E>>
    for StandardRetryStrategy
where
    Handler: Clone,
    R: ClassifyResponse<SdkSuccess<T>, SdkError<E>>,
{
    type Future = Pin<Box<dyn Future<Output = Self> + Send>>;

    fn retry(
        &self,
        req: &Operation<Handler, R>,
        result: Result<&SdkSuccess<T>, &SdkError<E>>,
    ) -> Option<Self::Future> {
        let policy = req.retry_policy();
        let retry = policy.classify(result);
        let (next, delay) = match retry {
            RetryKind::Explicit(dur) => (self.clone(), dur),
            RetryKind::NotRetryable => {
                // only a success refunds the bucket, a failure that cannot be retried does not
                if result.is_ok() {
                    lock(&self.ctx).retry_quota_release();
                }
                return None;
            }
            RetryKind::Error(err) => self.do_retry(Err(err))?,
        };
        {
            let properties = req.request().properties_handle();
            let mut properties = lock(&properties);
            metrics::increment_counter(&mut properties, Field::RetryCount);
        }
        tracing::debug!(delay = ?delay, kind = ?retry, "retrying request");
        let fut = async move {
            tokio::time::sleep(delay).await;
            next
        };
        Some(Box::pin(fut))
    }

    fn clone_request(&self, req: &Operation<Handler, R>) -> Option<Operation<Handler, R>> {
        req.try_clone()
    }
}

#[cfg(test)]
mod test {
    use crate::retry::{RetryConfig, RetryCtx, StandardRetryStrategy};
    use smithy_http::body::SdkBody;
    use smithy_http::operation::{self, Operation};
    use smithy_http::result::{SdkError, SdkSuccess};
    use smithy_types::retry::ErrorKind;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::retry::Policy;

    fn strategy(conf: RetryConfig) -> StandardRetryStrategy {
        let ctx = RetryCtx::new(conf.with_base(|| 1_f64));
        StandardRetryStrategy::new(Arc::new(Mutex::new(ctx)))
    }

    #[test]
    fn disabled_by_default() {
        assert!(!RetryConfig::default().is_enabled());
        assert_eq!(RetryConfig::disabled().max_attempts(), 1);
        let strategy = strategy(RetryConfig::default());
        assert!(strategy.do_retry(Err(ErrorKind::ServerError)).is_none());
        assert_eq!(strategy.ctx().retry_quota, 500);
    }

    #[test]
    fn eventual_success() {
        let strategy = strategy(RetryConfig::standard());
        let (strategy, dur) = strategy
            .do_retry(Err(ErrorKind::ServerError))
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(1));
        assert_eq!(strategy.ctx().retry_quota, 495);

        let (strategy, dur) = strategy
            .do_retry(Err(ErrorKind::ServerError))
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(2));
        assert_eq!(strategy.ctx().retry_quota, 490);

        let no_retry = strategy.do_retry(Ok(()));
        assert!(no_retry.is_none());
        assert_eq!(strategy.ctx().retry_quota, 495);
    }

    #[test]
    fn no_more_attempts() {
        let strategy = strategy(RetryConfig::standard());
        let (strategy, _) = strategy
            .do_retry(Err(ErrorKind::ServerError))
            .expect("should retry");
        let (strategy, _) = strategy
            .do_retry(Err(ErrorKind::ServerError))
            .expect("should retry");
        assert_eq!(strategy.ctx().retry_quota, 490);

        let no_retry = strategy.do_retry(Err(ErrorKind::ServerError));
        assert!(no_retry.is_none());
        assert_eq!(strategy.ctx().retry_quota, 490);
    }

    #[test]
    fn no_quota() {
        let mut conf = RetryConfig::standard();
        conf.initial_retry_tokens = 5;
        let strategy = strategy(conf);
        let (strategy, dur) = strategy
            .do_retry(Err(ErrorKind::ServerError))
            .expect("should retry");
        assert_eq!(dur, Duration::from_secs(1));
        assert_eq!(strategy.ctx().retry_quota, 0);
        let no_retry = strategy.do_retry(Err(ErrorKind::ServerError));
        assert!(no_retry.is_none());
        assert_eq!(strategy.ctx().retry_quota, 0);
    }

    #[test]
    fn transient_errors_cost_more() {
        let strategy = strategy(RetryConfig::standard());
        let (strategy, _) = strategy
            .do_retry(Err(ErrorKind::TransientError))
            .expect("should retry");
        assert_eq!(strategy.ctx().retry_quota, 490);
    }

    #[test]
    fn max_backoff_time() {
        let conf = RetryConfig::standard()
            .with_max_attempts(5)
            .with_max_backoff(Duration::from_secs(3));
        let strategy = strategy(conf);
        let mut backoffs = vec![];
        let mut current = strategy;
        while let Some((next, dur)) = current.do_retry(Err(ErrorKind::ServerError)) {
            backoffs.push(dur);
            current = next;
        }
        assert_eq!(
            backoffs,
            vec![1, 2, 3, 3]
                .into_iter()
                .map(Duration::from_secs)
                .collect::<Vec<_>>()
        );
        assert_eq!(current.ctx().retry_quota, 480);
    }

    #[test]
    fn only_successes_refund_the_bucket() {
        let strategy = strategy(RetryConfig::standard());
        let (strategy, _) = strategy
            .do_retry(Err(ErrorKind::ServerError))
            .expect("should retry");
        assert_eq!(strategy.ctx().retry_quota, 495);

        let op = Operation::new(
            operation::Request::new(http::Request::new(SdkBody::empty())),
            (),
        );
        let failure: SdkError<std::io::Error> = SdkError::construction_failure("missing field");
        let retry: Option<_> = Policy::<_, SdkSuccess<()>, _>::retry(&strategy, &op, Err(&failure));
        assert!(retry.is_none());
        assert_eq!(strategy.ctx().retry_quota, 495);

        let success = SdkSuccess {
            raw: operation::Response::new(http::Response::new(SdkBody::empty())),
            parsed: (),
        };
        let retry: Option<_> =
            Policy::<_, _, SdkError<std::io::Error>>::retry(&strategy, &op, Ok(&success));
        assert!(retry.is_none());
        assert_eq!(strategy.ctx().retry_quota, 500);
    }
}
