//! Read-only projections consumed by plotting code.

pub mod time_window;
