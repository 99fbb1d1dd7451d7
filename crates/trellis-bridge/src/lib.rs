//! The boundary between the Trellis host and its embedded web guest.
//!
//! Everything that touches the wire lives here:
//! - the envelope codec (`envelope`) -- the one place that knows the wire
//!   format,
//! - the boundary adapter (`adapter`) -- the single entry point reachable
//!   from the guest, which must always return a well-formed reply string,
//! - the event relay (`relay`) -- the single one-way egress toward the
//!   guest,
//! - the injected guest script (`script`) -- the JavaScript half of the
//!   bridge.
//!
//! Transport specifics (how strings actually cross) are someone else's
//! problem: the adapter is called with two strings and returns one, and
//! the relay posts through an opaque [`MessagePost`] sink.

pub mod adapter;
pub mod envelope;
pub mod relay;
pub mod script;

pub use adapter::{BridgeState, HostBridge};
pub use envelope::{CodecError, Envelope};
pub use relay::{EventRelay, MessagePost};
pub use script::{js_deliver, BRIDGE_INIT_SCRIPT};
