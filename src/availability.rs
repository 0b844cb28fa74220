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

//! Month grid projection.
//!
//! Builds the fixed 42-cell (6-week) calendar grid rendered by property
//! dashboards. Pure projection over a snapshot of reservations, blocks, and
//! pricing rules; calling it twice with no intervening mutation yields
//! identical output.

use crate::base::PropertyId;
use crate::calendar::{CalendarBlock, DayStatus, resolve_day};
use crate::error::BookingError;
use crate::pricing::PriceSchedule;
use crate::reservation::Reservation;
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// Number of cells in a month grid: six full weeks.
pub const GRID_CELLS: usize = 42;

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    /// False for the leading/trailing days of adjacent months.
    pub in_month: bool,
    pub today: bool,
    pub status: DayStatus,
    /// Effective nightly price via the pricing resolver.
    pub price: Decimal,
}

/// A six-week grid for one property and month, Sunday-first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    pub property_id: PropertyId,
    pub year: i32,
    pub month: u32,
    pub cells: Vec<MonthCell>,
}

impl MonthGrid {
    /// Builds the grid starting on the Sunday on/before the 1st.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        property_id: PropertyId,
        year: i32,
        month: u32,
        today: NaiveDate,
        reservations: &[&Reservation],
        blocks: &[&CalendarBlock],
        schedule: &PriceSchedule,
        base_price: Decimal,
    ) -> Result<Self, BookingError> {
        let first =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(BookingError::InvalidDateRange)?;
        let lead = first.weekday().num_days_from_sunday() as u64;
        let grid_start = first - Days::new(lead);

        let cells = (0..GRID_CELLS as u64)
            .map(|offset| {
                let date = grid_start + Days::new(offset);
                MonthCell {
                    date,
                    in_month: date.year() == year && date.month() == month,
                    today: date == today,
                    status: resolve_day(date, reservations, blocks),
                    price: schedule.resolve(date, base_price),
                }
            })
            .collect();

        Ok(MonthGrid {
            property_id,
            year,
            month,
            cells,
        })
    }
}
