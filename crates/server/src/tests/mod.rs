// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router tests driven with `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]

mod auth_tests;
mod helpers;
mod scenario_tests;
