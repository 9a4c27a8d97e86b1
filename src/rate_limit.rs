use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter, clock::Clock};
use tracing::warn;

pub const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later.";

/// Per-client limiter: a burst of `max` requests that refills evenly over
/// `window`.
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    max: NonZeroU32,
    window: Duration,
}

impl ClientRateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        let max = NonZeroU32::new(max).unwrap_or(NonZeroU32::MIN);
        let period = (window / max.get()).max(Duration::from_millis(1));
        let quota = Quota::with_period(period).unwrap_or(Quota::per_second(max)).allow_burst(max);

        Self { limiter: Arc::new(RateLimiter::keyed(quota)), max, window }
    }

    /// Ok when `client` may proceed, otherwise how long it has to wait.
    pub fn check(&self, client: IpAddr) -> Result<(), Duration> {
        self.limiter
            .check_key(&client)
            .map_err(|not_until| not_until.wait_time_from(self.limiter.clock().now()))
    }

    /// Drops state for clients that have been idle long enough to be full
    /// again.
    pub async fn prune_periodically(self, every: Duration) {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            self.limiter.retain_recent();
            self.limiter.shrink_to_fit();
        }
    }

    fn policy_headers(&self, headers: &mut HeaderMap) {
        headers.insert("ratelimit-limit", HeaderValue::from(self.max.get()));
        if let Ok(policy) =
            HeaderValue::from_str(&format!("{};w={}", self.max, self.window.as_secs()))
        {
            headers.insert("ratelimit-policy", policy);
        }
    }
}

pub async fn enforce(
    State(limiter): State<ClientRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match limiter.check(client) {
        Ok(()) => {
            let mut resp = next.run(req).await;
            limiter.policy_headers(resp.headers_mut());
            resp
        },
        Err(wait) => {
            let retry_after = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            warn!(client = %client, retry_after, "rate limit exceeded");

            let mut resp = (StatusCode::TOO_MANY_REQUESTS, TOO_MANY_REQUESTS).into_response();
            resp.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
            limiter.policy_headers(resp.headers_mut());
            resp
        },
    }
}
