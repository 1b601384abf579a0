use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub type ApiRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

pub fn build_rate_limiter(per_minute: u32) -> Arc<ApiRateLimiter> {
    let quota = Quota::per_minute(NonZeroU32::new(per_minute.max(1)).unwrap());
    let limiter = Arc::new(RateLimiter::keyed(quota));

    // The keyed store holds one entry per client IP; idle entries are pruned
    // periodically so a long-running instance stays bounded. The task ends
    // when the limiter itself is gone.
    let pruner = Arc::downgrade(&limiter);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let Some(limiter) = pruner.upgrade() else { break };
            limiter.retain_recent();
        }
    });

    limiter
}

pub async fn rate_limit(
    State(limiter): State<Arc<ApiRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    if limiter.check_key(&ip).is_err() {
        warn!("Rate limit exceeded for {}", ip);
        return (StatusCode::TOO_MANY_REQUESTS, "Too many requests").into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_quota_is_tracked_per_client() {
        let limiter = build_rate_limiter(2);
        let first = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let second = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(limiter.check_key(&first).is_ok());
        assert!(limiter.check_key(&first).is_ok());
        assert!(limiter.check_key(&first).is_err());

        // One client exhausting its quota leaves another untouched.
        assert!(limiter.check_key(&second).is_ok());
    }
}
