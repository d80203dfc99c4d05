//! UI module root: exposes drawing functions for individual panels.

pub mod header;
pub mod login;
pub mod series;
pub mod theme;
pub mod totals;
pub mod usage;
pub mod util;
