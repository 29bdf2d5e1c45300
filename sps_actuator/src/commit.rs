//! Timer-driven actuator commit loop.
//!
//! A window move request does not touch hardware immediately: a commit delay
//! is derived from the AF window's lower-right corner over the virtual
//! coordinate space, a one-shot timer is armed, and the move is committed
//! only when the timer fires. The timer callback runs in a restricted
//! execution context and must never perform blocking bus I/O — it only hands
//! the pending move to the deferred queue.
//!
//! Phases: `Idle → Armed → (timer fires) → Committing → Idle`.
//!
//! The pending move is a single-slot mailbox: a new request overwrites an
//! armed one and re-arms the same timer (last write wins). Contention is
//! reported, not corrected.

use sps_common::consts::{VIRTUAL_COORDINATE_HEIGHT, VIRTUAL_COORDINATE_WIDTH};
use std::time::Duration;
use tracing::{debug, warn};

/// Target AF window in virtual coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AfWindow {
    /// Upper-left corner, x.
    pub left_x: u32,
    /// Upper-left corner, y.
    pub left_y: u32,
    /// Lower-right corner, x.
    pub right_x: u32,
    /// Lower-right corner, y.
    pub right_y: u32,
}

/// Phase of the commit loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitPhase {
    /// No move pending.
    #[default]
    Idle,
    /// Timer armed, move waiting in the mailbox.
    Armed,
    /// Timer fired, move being handed to the deferred queue.
    Committing,
}

/// One-shot timer collaborator.
///
/// Re-arming before expiry replaces the pending fire; there is no cancel
/// API. The timer invokes [`CommitLoop::on_timer_fire`] in a restricted
/// execution context after the delay elapses.
pub trait OneShotTimer {
    /// Arm (or re-arm) the timer for `delay`.
    fn arm_once(&mut self, delay: Duration);
}

/// Deferred work collaborator.
///
/// Runs scheduled items later in an unrestricted, blocking-I/O-capable
/// context; the consumer performs the actual register write of the resolved
/// position.
pub trait DeferredQueue {
    /// Queue a committed window move for execution.
    fn schedule(&mut self, window: AfWindow);
}

/// Derive the commit delay for a window move.
///
/// Ratio of the window's lower-right corner over the virtual coordinate
/// space scales the caller's valid-time budget. Integer division order is
/// load-bearing: the ratio quantizes to per-mille steps before the budget
/// is applied, and the result truncates to whole milliseconds.
pub fn commit_delay(valid_time_us: u64, window: &AfWindow) -> Duration {
    let window_ratio = u64::from(window.right_y) * VIRTUAL_COORDINATE_WIDTH
        + u64::from(window.right_x);
    let virtual_image_size = (VIRTUAL_COORDINATE_WIDTH * VIRTUAL_COORDINATE_HEIGHT) / 1000;
    let delay_us = (valid_time_us * (window_ratio / virtual_image_size)) / 1000;

    Duration::from_millis(delay_us / 1000)
}

/// Timer-driven commit loop for one actuator.
pub struct CommitLoop<T: OneShotTimer, Q: DeferredQueue> {
    timer: T,
    queue: Q,
    phase: CommitPhase,
    pending: Option<AfWindow>,
}

impl<T: OneShotTimer, Q: DeferredQueue> CommitLoop<T, Q> {
    /// Create an idle loop over the given collaborators.
    pub fn new(timer: T, queue: Q) -> Self {
        Self {
            timer,
            queue,
            phase: CommitPhase::Idle,
            pending: None,
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> CommitPhase {
        self.phase
    }

    /// Window move waiting for the timer, if any.
    #[inline]
    pub fn pending(&self) -> Option<AfWindow> {
        self.pending
    }

    /// Request a deferred move to `window`.
    ///
    /// Computes the commit delay from `valid_time_us`, overwrites any armed
    /// move (the superseded window is lost) and re-arms the timer. An armed
    /// predecessor is logged as contention; the caller's request never
    /// fails because of it.
    pub fn request_window_move(&mut self, window: AfWindow, valid_time_us: u64) {
        let delay = commit_delay(valid_time_us, &window);

        if self.phase == CommitPhase::Armed {
            warn!(
                superseded = ?self.pending,
                "previous window move still armed, re-arming over it"
            );
        }

        self.pending = Some(window);
        self.phase = CommitPhase::Armed;
        self.timer.arm_once(delay);
        debug!(?window, ?delay, "window move armed");
    }

    /// Timer expiry callback.
    ///
    /// Runs in the timer's restricted context: no blocking I/O here, only
    /// the hand-off of the pending move to the deferred queue. A fire with
    /// nothing armed is logged and ignored.
    pub fn on_timer_fire(&mut self) {
        if self.phase != CommitPhase::Armed {
            warn!(phase = ?self.phase, "timer fired with no armed move");
            return;
        }

        self.phase = CommitPhase::Committing;
        if let Some(window) = self.pending.take() {
            self.queue.schedule(window);
        }
        self.phase = CommitPhase::Idle;
    }
}
