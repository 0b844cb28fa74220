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

//! Calendar day resolution.
//!
//! Given the reservations and owner blocks of a property, every date maps to
//! exactly one [`DayStatus`]. Resolution is deterministic over a snapshot of
//! the property's records; there is no sampling or guessing involved.

use crate::base::{BlockId, DateRange, PropertyId};
use crate::reservation::{Reservation, ReservationStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An owner-imposed unavailability window (maintenance, personal use).
///
/// Blocks count like confirmed reservations for overlap purposes but carry
/// no requester and no price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarBlock {
    pub id: BlockId,
    pub property_id: PropertyId,
    pub range: DateRange,
    pub label: Option<String>,
}

/// UI-facing status of a single calendar day.
///
/// Precedence when a date is covered by records of different kinds:
/// `Booked > Blocked > Pending > Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Available,
    /// Covered by a confirmed reservation.
    Booked,
    /// Covered by an owner block.
    Blocked,
    /// Covered only by a requested (not yet approved) reservation. Still
    /// unavailable to new requests, but surfaced distinctly from booked.
    Pending,
}

/// Resolves the status of one day from a snapshot of records.
pub fn resolve_day(
    date: NaiveDate,
    reservations: &[&Reservation],
    blocks: &[&CalendarBlock],
) -> DayStatus {
    let mut pending = false;
    for r in reservations {
        if !r.range.contains(date) {
            continue;
        }
        match r.status {
            ReservationStatus::Confirmed => return DayStatus::Booked,
            ReservationStatus::Requested => pending = true,
            _ => {}
        }
    }
    if blocks.iter().any(|b| b.range.contains(date)) {
        return DayStatus::Blocked;
    }
    if pending {
        return DayStatus::Pending;
    }
    DayStatus::Available
}

/// Resolves each day of `[range.start, range.end)` in order.
pub fn resolve_range(
    range: DateRange,
    reservations: &[&Reservation],
    blocks: &[&CalendarBlock],
) -> Vec<(NaiveDate, DayStatus)> {
    range
        .iter_days()
        .map(|date| (date, resolve_day(date, reservations, blocks)))
        .collect()
}

/// True when any day in the range is withheld from new requests.
///
/// This is the conflict predicate behind reservation creation: requested and
/// confirmed reservations both count, as do owner blocks.
pub fn range_has_conflict(
    range: DateRange,
    reservations: &[&Reservation],
    blocks: &[&CalendarBlock],
) -> bool {
    reservations
        .iter()
        .any(|r| r.status.blocks_availability() && r.range.overlaps(&range))
        || blocks.iter().any(|b| b.range.overlaps(&range))
}
