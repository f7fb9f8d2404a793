//! Coalesced render requests.
//!
//! Any number of `request` calls between two frames collapse into a single
//! layout recomputation. The waker (typically `egui::Context::request_repaint`)
//! fires only on the first request of a window.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Handle for requesting a re-render. Cheap to clone and `Send`, so async
/// completions (waveform decodes, transport replies) can hold one.
#[derive(Clone)]
pub struct RenderScheduler {
    pending: Arc<AtomicBool>,
    waker: Option<Waker>,
}

impl RenderScheduler {
    /// Scheduler with no waker; the owner polls [`Self::take`] each frame.
    pub fn new() -> Self {
        Self {
            pending: Arc::new(AtomicBool::new(false)),
            waker: None,
        }
    }

    pub fn with_waker(waker: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            pending: Arc::new(AtomicBool::new(false)),
            waker: Some(Arc::new(waker)),
        }
    }

    /// Ask for a re-render. Returns true if this call opened a new window.
    pub fn request(&self) -> bool {
        let first = !self.pending.swap(true, Ordering::AcqRel);
        if first {
            if let Some(waker) = &self.waker {
                waker();
            }
        }
        first
    }

    /// Consume the pending flag at the start of a frame.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("pending", &self.is_pending())
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}
