//! Live controls on the page, kept for bulk disposal.

use std::rc::Rc;

use crate::config::Settings;
use crate::control::ControlHandle;
use crate::host::Host;

pub struct Registry<H: Host> {
    controls: Vec<ControlHandle<H>>,
}

impl<H: Host> Default for Registry<H> {
    fn default() -> Self {
        Self {
            controls: Vec::new(),
        }
    }
}

impl<H: Host> Registry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, control: ControlHandle<H>) {
        self.controls.push(control);
    }

    /// Drop controls that were closed or whose video or bar left the page.
    /// Orphaned controls are released first. Returns how many were dropped.
    pub fn prune(&mut self) -> usize {
        for control in &self.controls {
            if let Ok(mut control) = control.try_borrow_mut() {
                if control.is_orphaned() {
                    control.release();
                }
            }
        }
        let before = self.controls.len();
        self.controls.retain(|c| match c.try_borrow() {
            Ok(control) => !control.is_disposed(),
            // Busy handling an event right now, so not disposed yet.
            Err(_) => true,
        });
        before - self.controls.len()
    }

    /// Number of registered controls that are not disposed.
    pub fn live(&self) -> usize {
        self.controls
            .iter()
            .filter(|c| c.try_borrow().map_or(true, |c| !c.is_disposed()))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.live() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlHandle<H>> {
        self.controls.iter()
    }

    /// Hand new settings to every live control.
    pub fn update_settings(&self, settings: &Rc<Settings>) {
        for control in &self.controls {
            if let Ok(mut control) = control.try_borrow_mut() {
                control.set_settings(Rc::clone(settings));
            }
        }
    }

    /// Dispose every control and empty the registry. Returns how many were live.
    pub fn dispose_all(&mut self) -> usize {
        let mut disposed = 0;
        for control in self.controls.drain(..) {
            match control.try_borrow_mut() {
                Ok(mut control) if !control.is_disposed() => {
                    control.dispose();
                    disposed += 1;
                }
                Ok(_) => {}
                Err(_) => tracing::warn!("control busy during bulk disposal, skipped"),
            }
        }
        disposed
    }
}
