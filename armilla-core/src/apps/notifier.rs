//! Notification view.

use crate::app::{AppError, Application, Capabilities};
use crate::manager::SystemApi;

/// Passive view shown when a down navigation finds pending
/// notifications. Any further navigation leaves it again; rendering is
/// the firmware's concern.
pub struct NotifierView {
    _reserved: (),
}

impl NotifierView {
    pub fn new() -> Self {
        Self { _reserved: () }
    }
}

impl Default for NotifierView {
    fn default() -> Self {
        Self::new()
    }
}

impl Application for NotifierView {
    fn name(&self) -> &'static str {
        "Notifier"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    fn foreground(&mut self, _sys: &mut SystemApi) -> Result<(), AppError> {
        Ok(())
    }
}
