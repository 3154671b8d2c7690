use std::time::{Duration, Instant};

/// Holds back the most recent input until nothing new arrived for `quiet`.
///
/// Time is passed in by the caller, which keeps the type usable from any
/// event loop and deterministic under test.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Replace any pending value and restart the quiet period.
    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, due)) if due <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Time left until the pending value becomes ready.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, due)| due.saturating_duration_since(now))
    }

    /// Take the pending value regardless of the quiet period.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}

/// Sequence number attached to an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and keeps only the response to the newest one.
///
/// Responses may arrive in any order; anything answering an older ticket is
/// stale and gets dropped, so a slow early request cannot overwrite a later
/// one.
#[derive(Debug, Default)]
pub struct RequestTracker {
    issued: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    pub fn accept<R>(&self, ticket: Ticket, response: R) -> Option<R> {
        self.is_latest(ticket).then_some(response)
    }
}
