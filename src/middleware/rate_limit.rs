use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tokio::time::Instant;

/// Minimum spacing between accepted chat messages, shared by every client.
#[derive(Clone, Debug)]
pub struct MessageCooldown {
    interval: Duration,
    last: Arc<Mutex<Option<Instant>>>,
}

impl MessageCooldown {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Arc::new(Mutex::new(None)),
        }
    }

    /// Claims the slot, or returns how long the caller still has to wait.
    /// On success yields the stamp taken and the one it replaced.
    fn try_acquire(&self) -> Result<(Instant, Option<Instant>), Duration> {
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        if let Some(prev) = *last {
            let elapsed = now.duration_since(prev);
            if elapsed < self.interval {
                return Err(self.interval - elapsed);
            }
        }
        Ok((now, last.replace(now)))
    }

    /// Gives the slot back if nothing has claimed it since `taken`.
    fn release(&self, taken: Instant, previous: Option<Instant>) {
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *last == Some(taken) {
            *last = previous;
        }
    }
}

/// Rejected messages (4xx) do not count against the cooldown.
pub async fn cooldown_middleware(
    State(state): State<MessageCooldown>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (taken, previous) = match state.try_acquire() {
        Ok(slot) => slot,
        Err(remaining) => {
            let secs = remaining.as_secs_f64().ceil() as u64;
            tracing::debug!(remaining_secs = secs, "Message rejected by cooldown");
            let body = Json(json!({
                "error": format!("Please wait {} seconds before sending another message.", secs.max(1)),
            }));
            return (StatusCode::TOO_MANY_REQUESTS, body).into_response();
        }
    };

    let response = next.run(req).await;
    if response.status().is_client_error() {
        state.release(taken, previous);
    }
    response
}

pub fn new_cooldown_state(secs: u64) -> MessageCooldown {
    MessageCooldown::new(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn second_message_waits_for_interval() {
        let cooldown = new_cooldown_state(5);
        assert!(cooldown.try_acquire().is_ok());

        tokio::time::advance(Duration::from_secs(2)).await;
        let remaining = cooldown.try_acquire().unwrap_err();
        assert_eq!(remaining, Duration::from_secs(3));

        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(cooldown.try_acquire().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_never_blocks() {
        let cooldown = new_cooldown_state(0);
        assert!(cooldown.try_acquire().is_ok());
        assert!(cooldown.try_acquire().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn released_slot_can_be_reused() {
        let cooldown = new_cooldown_state(5);
        let (taken, previous) = cooldown.try_acquire().unwrap();
        assert_eq!(previous, None);

        cooldown.release(taken, previous);
        assert!(cooldown.try_acquire().is_ok());
        assert!(cooldown.try_acquire().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_release_keeps_newer_claim() {
        let cooldown = new_cooldown_state(1);
        let (first, previous) = cooldown.try_acquire().unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        cooldown.try_acquire().unwrap();

        cooldown.release(first, previous);
        assert!(cooldown.try_acquire().is_err());
    }
}
