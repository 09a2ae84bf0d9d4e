// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — page sizing, image fitting, and flowing multi-image layout.

pub mod planner;
pub mod session;

pub use planner::LayoutPlanner;
pub use session::LayoutSession;
