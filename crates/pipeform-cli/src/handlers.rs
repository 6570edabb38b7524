//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

mod apply;
mod completions;
mod eval;
mod list;
mod transform;
mod utils;

pub use apply::handle_apply;
pub use completions::handle_completions;
pub use eval::handle_eval;
pub use list::handle_list;
pub use transform::handle_transform;
