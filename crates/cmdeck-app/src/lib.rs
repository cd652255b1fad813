// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod catalog;
pub mod output;
pub mod palette;
pub mod state;

pub use catalog::*;
pub use output::*;
pub use palette::*;
pub use state::*;
