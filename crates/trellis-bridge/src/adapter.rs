//! The boundary adapter: the single host-side operation reachable from the
//! guest.
//!
//! [`HostBridge::handle`] must always return a well-formed reply string --
//! never panic, never propagate an error, never emit non-JSON. A fault
//! crossing the boundary is either dropped or corrupts channel state
//! depending on the transport, so every failure at every step is folded
//! into an encoded failed reply.
//!
//! Lifecycle is one-way: `Unattached → Attached → Disposed`. Requests are
//! served only while `Attached`. The channel has no correlation mechanism
//! beyond "one call, one return", so a second request arriving while one
//! is in flight is rejected with a busy reply.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use trellis_interop::{BridgeError, Reply, RequestDispatcher};

const UNATTACHED: u8 = 0;
const ATTACHED: u8 = 1;
const DISPOSED: u8 = 2;

/// Boundary lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Unattached,
    Attached,
    Disposed,
}

pub struct HostBridge {
    dispatcher: RequestDispatcher,
    state: AtomicU8,
    in_flight: AtomicBool,
    cancel: CancellationToken,
}

/// Clears the in-flight flag when a request completes or is dropped.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl HostBridge {
    /// New bridge in `Unattached` state; requests fail fast until
    /// [`attach`](Self::attach) is called.
    pub fn new(dispatcher: RequestDispatcher) -> Self {
        Self {
            dispatcher,
            state: AtomicU8::new(UNATTACHED),
            in_flight: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    /// Transition to `Attached`. Ignored with a warning after disposal;
    /// a second attach is a no-op.
    pub fn attach(&self) {
        match self.state.compare_exchange(
            UNATTACHED,
            ATTACHED,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => info!("boundary attached"),
            Err(s) if s == DISPOSED => warn!("attach ignored: boundary already disposed"),
            Err(_) => {}
        }
    }

    /// Transition to `Disposed` and cancel any handler still running.
    /// Terminal; the bridge cannot be re-attached.
    pub fn dispose(&self) {
        let prev = self.state.swap(DISPOSED, Ordering::AcqRel);
        if prev != DISPOSED {
            self.cancel.cancel();
            info!("boundary disposed");
        }
    }

    pub fn state(&self) -> BridgeState {
        match self.state.load(Ordering::Acquire) {
            ATTACHED => BridgeState::Attached,
            DISPOSED => BridgeState::Disposed,
            _ => BridgeState::Unattached,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.state.load(Ordering::Acquire) == ATTACHED
    }

    /// Serve one request from the guest: decode, dispatch, encode.
    ///
    /// Returns an encoded [`Reply`], well-formed in every case:
    /// - not attached → transport-unavailable failure
    /// - a request already in flight → busy failure
    /// - unknown tag / malformed payload / handler error → the
    ///   dispatcher's failure reply
    pub async fn handle(&self, payload: &str, tag: &str) -> String {
        if self.state.load(Ordering::Acquire) != ATTACHED {
            debug!(tag, "request rejected: boundary not attached");
            return Reply::fail(BridgeError::TransportUnavailable.to_string()).to_json();
        }

        if self.in_flight.swap(true, Ordering::AcqRel) {
            warn!(tag, "request rejected: another request is in flight");
            return Reply::fail(BridgeError::Busy.to_string()).to_json();
        }
        let _guard = FlightGuard(&self.in_flight);

        self.dispatcher
            .dispatch(tag, payload, &self.cancel)
            .await
            .to_json()
    }
}
