//! Render integration for hosts with an explicit update method
//!
//! Some component frameworks re-render only when their update method is
//! called. Binding such hosts with
//! [`BindingOptions::render_with_perform_update`] calls it after every
//! notification-driven resync.

use crate::lifecycle::BindingOptions;

/// Hosts with an explicit update method
pub trait PerformUpdate {
    /// Re-render the host from its current properties
    fn perform_update(&mut self);
}

/// Render callback that calls [`PerformUpdate::perform_update`]
pub fn perform_update<T: PerformUpdate>(host: &mut T) {
    host.perform_update();
}

impl<S, T: PerformUpdate + 'static> BindingOptions<S, T> {
    /// Render through [`PerformUpdate`] after every notification
    pub fn render_with_perform_update(self) -> Self {
        self.render(perform_update::<T>)
    }
}
