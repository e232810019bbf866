//! Built-in shell views.
//!
//! The launcher and notifier are ordinary applications registered by
//! the manager itself; they stay out of both rings and are reached
//! only through navigation.

mod launcher;
mod notifier;

pub use launcher::LauncherView;
pub use notifier::NotifierView;
