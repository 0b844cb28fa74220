// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 The staybook-rs Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Engine configuration.

use crate::pricing::FeeSchedule;
use serde::{Deserialize, Serialize};

/// Policy knobs for the booking engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Service fee and tax applied to every quote.
    pub fees: FeeSchedule,
    /// When set, requested reservations older than this many days are
    /// cancelled by [`expire_stale_requests`]. There is no automatic expiry
    /// by default; an owner may leave a request pending indefinitely.
    ///
    /// [`expire_stale_requests`]: crate::Engine::expire_stale_requests
    pub pending_expiry_days: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fees: FeeSchedule::default(),
            pending_expiry_days: None,
        }
    }
}
