// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `results`: result rows, pending review list, report rows, rosters
//! - `directory`: students, subjects and teaching assignments
//! - `accounts`: accounts and sessions

pub mod accounts;
pub mod directory;
pub mod results;
