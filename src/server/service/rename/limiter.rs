use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{num::NonZeroU32, time::Duration};

/// In-process permit check keyed by resource id.
///
/// Mirrors Discord's per-channel rename allowance (`burst` renames per `window`)
/// so a job whose first attempt would certainly be throttled is put on the
/// backoff path without spending a request. Uses GCRA: after the burst is spent,
/// one permit is replenished every `window / burst`.
///
/// State is per process and lost on restart; Discord remains the authority.
pub struct LocalPermitCheck {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl LocalPermitCheck {
    pub fn new(burst: NonZeroU32, window: Duration) -> Self {
        let quota = Quota::with_period(window / burst.get())
            .map(|quota| quota.allow_burst(burst))
            .unwrap_or_else(|| Quota::per_second(burst));

        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Takes one permit for the resource.
    ///
    /// # Returns
    /// - `true` - A rename may be attempted now
    /// - `false` - The resource has used its allowance for the current window
    pub fn check(&self, resource_id: &str) -> bool {
        self.limiter.check_key(&resource_id.to_string()).is_ok()
    }

    /// Drops keys whose allowance has fully replenished.
    pub fn forget_idle(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of resources currently tracked.
    pub fn tracked(&self) -> usize {
        self.limiter.len()
    }
}
