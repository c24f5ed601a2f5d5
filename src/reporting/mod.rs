//! Diagnostic logging
//!
//! Developer-facing diagnostics routed through the `log` facade, separate
//! from the status lines printed by [`crate::ui::logger`].

pub mod logging;
