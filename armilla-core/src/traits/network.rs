//! Network connectivity collaborator
//!
//! The radio is consumed purely through this boolean wake/sleep
//! contract; bring-up details (scanning, credential filtering, the
//! bounded association window) live behind `wake`.

pub trait Network {
    /// Bring the radio up: scan, filter against the locally stored
    /// credential list, and attempt association within a bounded
    /// window (about sixty one-second polls). Returns `true` once
    /// connected.
    async fn wake(&mut self) -> bool;

    /// Power the radio down.
    async fn sleep(&mut self);

    /// Whether the link is currently usable.
    fn is_connected(&self) -> bool;
}
