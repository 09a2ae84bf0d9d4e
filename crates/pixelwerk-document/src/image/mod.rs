// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, encoding, and the 2x enhancer.

pub mod codec;
pub mod enhance;

pub use codec::{Encoder, ImageDecoder};
pub use enhance::{EnhanceOptions, Enhancer};
