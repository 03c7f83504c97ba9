// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `results`: transactional upsert and review transitions
//! - `directory`: seeding classes, subjects, teachers, students, assignments
//! - `accounts`: accounts and sessions

pub mod accounts;
pub mod directory;
pub mod results;
