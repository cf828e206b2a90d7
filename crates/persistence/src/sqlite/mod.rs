// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite`-specific persistence internals.
//!
//! The modules here operate on raw connections and transactions; the public
//! `Persistence` adapter in the crate root wraps them.

pub mod mail;
pub mod persistence;
pub mod queries;
pub mod schema;
pub mod users;
