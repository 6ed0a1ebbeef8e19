//! Request tokens for async fetches.
//!
//! Each fetch is tagged with a token from a monotonically increasing counter. When the
//! response arrives it is applied only if its token is still the latest one issued, so a slow
//! response to a superseded request cannot overwrite newer state.

/// Identifies one issued request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct RequestGuard {
    latest: u64,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new token, invalidating every token issued before it.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Invalidates every outstanding token without starting a new request.
    pub fn cancel_all(&mut self) {
        self.latest += 1;
    }
}
