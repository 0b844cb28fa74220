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

//! Property records.
//!
//! Property CRUD lives outside this engine; the booking flow only reads the
//! fields it needs to price and authorize operations. Registration is the
//! hand-off point from the external property-management collaborator.

use crate::base::{PropertyId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The slice of a property the booking engine cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Property {
    pub id: PropertyId,
    pub owner: UserId,
    /// Nightly price before any pricing rule applies.
    pub base_price: Decimal,
    /// Inactive properties keep their history but reject new reservations.
    pub active: bool,
}

impl Property {
    pub fn new(id: PropertyId, owner: UserId, base_price: Decimal) -> Self {
        Self {
            id,
            owner,
            base_price,
            active: true,
        }
    }
}
