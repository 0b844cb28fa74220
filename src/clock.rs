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

//! Time source abstraction.
//!
//! Every "today" comparison in the engine (no past-dated starts, review
//! eligibility, pending-request expiry) flows through a [`Clock`] so tests
//! can pin the calendar to a fixed date.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;

/// Source of the current date and time.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a settable date, for deterministic tests.
///
/// Tests keep their own handle to the clock and move it forward to simulate
/// the passage of calendar time (a stay ending, a request going stale).
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Moves the clock to a new date.
    pub fn set_today(&self, today: NaiveDate) {
        *self.today.lock() = today;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock()
    }

    fn now(&self) -> DateTime<Utc> {
        self.today()
            .and_hms_opt(12, 0, 0)
            .expect("noon is a valid time")
            .and_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_pinned_date() {
        let clock = FixedClock::new("2025-07-01".parse().unwrap());
        assert_eq!(clock.today(), "2025-07-01".parse::<NaiveDate>().unwrap());
        assert_eq!(clock.now().date_naive(), clock.today());
    }

    #[test]
    fn fixed_clock_can_advance() {
        let clock = FixedClock::new("2025-07-01".parse().unwrap());
        clock.set_today("2025-08-01".parse().unwrap());
        assert_eq!(clock.today(), "2025-08-01".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn system_clock_now_matches_today() {
        let clock = SystemClock;
        assert_eq!(clock.now().date_naive(), clock.today());
    }
}
