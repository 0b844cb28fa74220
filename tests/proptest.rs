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

//! Property-based tests for the reservation engine.
//!
//! These tests verify invariants that should hold for any combination of
//! date ranges, pricing rules, and booking sequences.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use staybook_rs::{
    BookingError, DateRange, DayStatus, Engine, EngineConfig, FixedClock, Property, PropertyId,
    ReservationStatus, UserId,
};
use std::sync::Arc;

const OWNER: UserId = UserId(10);
const TENANT: UserId = UserId(7);
const PROPERTY: PropertyId = PropertyId(1);

fn today() -> NaiveDate {
    "2025-01-01".parse().unwrap()
}

fn engine() -> Engine {
    let engine = Engine::with_clock(
        Arc::new(FixedClock::new(today())),
        EngineConfig::default(),
    );
    engine.register_property(Property::new(PROPERTY, OWNER, dec!(100)));
    engine
}

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a future date range: start 1..365 days out, 1..14 nights long.
fn arb_range() -> impl Strategy<Value = DateRange> {
    (1u64..365, 1u64..14).prop_map(|(offset, nights)| {
        let start = today() + Days::new(offset);
        DateRange::new(start, start + Days::new(nights)).unwrap()
    })
}

/// Generate a positive nightly price (0.01 to 1000.00).
fn arb_price() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

// =============================================================================
// Date Range Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Overlap is symmetric.
    #[test]
    fn overlap_is_symmetric(a in arb_range(), b in arb_range()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    /// A range always overlaps itself.
    #[test]
    fn range_overlaps_itself(a in arb_range()) {
        prop_assert!(a.overlaps(&a));
    }

    /// Night count matches the number of days iterated.
    #[test]
    fn nights_equals_day_count(a in arb_range()) {
        prop_assert_eq!(a.nights() as usize, a.iter_days().count());
        prop_assert!(a.iter_days().all(|d| a.contains(d)));
        prop_assert!(!a.contains(a.end));
    }

    /// Back-to-back ranges sharing a boundary date do not overlap: the end
    /// date is a checkout day, not an occupied night.
    #[test]
    fn adjacent_ranges_do_not_overlap(a in arb_range(), nights in 1u64..14) {
        let b = DateRange::new(a.end, a.end + Days::new(nights)).unwrap();
        prop_assert!(!a.overlaps(&b));
        prop_assert!(!b.overlaps(&a));
    }
}

// =============================================================================
// Double-Booking Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A second request succeeds exactly when its range is disjoint from
    /// the first, regardless of where the two ranges fall.
    #[test]
    fn second_request_succeeds_iff_disjoint(a in arb_range(), b in arb_range()) {
        let engine = engine();
        engine
            .create_reservation(PROPERTY, TENANT, a.start, a.end)
            .unwrap();

        let result = engine.create_reservation(PROPERTY, UserId(8), b.start, b.end);
        if a.overlaps(&b) {
            prop_assert_eq!(result, Err(BookingError::DateRangeUnavailable));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// Rejecting or cancelling the first request always frees its dates for
    /// an identical second request.
    #[test]
    fn released_dates_become_bookable(a in arb_range(), cancel in any::<bool>()) {
        let engine = engine();
        let r = engine
            .create_reservation(PROPERTY, TENANT, a.start, a.end)
            .unwrap();
        if cancel {
            engine.cancel(r.id, TENANT).unwrap();
        } else {
            engine.reject(r.id, OWNER, None).unwrap();
        }

        prop_assert!(
            engine
                .create_reservation(PROPERTY, UserId(8), a.start, a.end)
                .is_ok()
        );
    }

    /// Every night of a held range resolves to a non-available status, and
    /// nothing outside it is touched.
    #[test]
    fn held_nights_are_never_available(a in arb_range()) {
        let engine = engine();
        engine
            .create_reservation(PROPERTY, TENANT, a.start, a.end)
            .unwrap();

        for day in a.iter_days() {
            prop_assert_eq!(
                engine.resolve_day(PROPERTY, day).unwrap(),
                DayStatus::Pending
            );
        }
        // The checkout day itself is free.
        prop_assert_eq!(
            engine.resolve_day(PROPERTY, a.end).unwrap(),
            DayStatus::Available
        );
    }

    /// Different properties never contend for the same dates.
    #[test]
    fn properties_are_isolated(a in arb_range()) {
        let engine = engine();
        engine.register_property(Property::new(PropertyId(2), OWNER, dec!(80)));

        engine
            .create_reservation(PROPERTY, TENANT, a.start, a.end)
            .unwrap();
        prop_assert!(
            engine
                .create_reservation(PropertyId(2), TENANT, a.start, a.end)
                .is_ok()
        );
    }
}

// =============================================================================
// Lifecycle Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Cancel is idempotent: the first call reports a change, every later
    /// call is a no-op, and the status stays cancelled.
    #[test]
    fn cancel_is_idempotent(a in arb_range(), extra_cancels in 1usize..4) {
        let engine = engine();
        let r = engine
            .create_reservation(PROPERTY, TENANT, a.start, a.end)
            .unwrap();

        let first = engine.cancel(r.id, TENANT).unwrap();
        prop_assert_eq!(first.status, ReservationStatus::Cancelled);

        for _ in 0..extra_cancels {
            let again = engine.cancel(r.id, TENANT).unwrap();
            prop_assert_eq!(again.status, ReservationStatus::Cancelled);
        }
        // A single lifecycle event despite the repeats.
        let events = engine.drain_events();
        prop_assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, staybook_rs::BookingEvent::ReservationCancelled { .. }))
                .count(),
            1
        );
    }

    /// Approve then reject (or the reverse) never succeeds twice: the
    /// decision on a request is final.
    #[test]
    fn decision_is_final(a in arb_range(), approve_first in any::<bool>()) {
        let engine = engine();
        let r = engine
            .create_reservation(PROPERTY, TENANT, a.start, a.end)
            .unwrap();

        if approve_first {
            engine.approve(r.id, OWNER).unwrap();
            let second = engine.reject(r.id, OWNER, None);
            let refused = matches!(second, Err(BookingError::InvalidTransition { .. }));
            prop_assert!(refused, "reject after approve: {:?}", second);
        } else {
            engine.reject(r.id, OWNER, None).unwrap();
            let second = engine.approve(r.id, OWNER);
            let refused = matches!(second, Err(BookingError::InvalidTransition { .. }));
            prop_assert!(refused, "approve after reject: {:?}", second);
        }
    }
}

// =============================================================================
// Pricing Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// With an override, a seasonal window, and a weekend rule all covering
    /// the same date, the resolved price is the override: layers never stack.
    #[test]
    fn override_always_wins(a in arb_range(), price in arb_price()) {
        let engine = engine();
        engine.set_seasonal_rule(PROPERTY, OWNER, a, 150).unwrap();
        engine.set_weekend_rule(PROPERTY, OWNER, a, 120).unwrap();
        engine.set_price_override(PROPERTY, OWNER, a, price).unwrap();

        for day in a.iter_days() {
            prop_assert_eq!(engine.resolve_price(PROPERTY, day).unwrap(), price);
        }
    }

    /// Without rules every date resolves to the base price.
    #[test]
    fn bare_schedule_resolves_to_base(a in arb_range()) {
        let engine = engine();
        for day in a.iter_days() {
            prop_assert_eq!(engine.resolve_price(PROPERTY, day).unwrap(), dec!(100));
        }
    }

    /// A quote's subtotal is the sum of its nightly prices and its total is
    /// subtotal + service fee + taxes, for any range and any override price.
    #[test]
    fn quote_arithmetic_holds(a in arb_range(), price in arb_price()) {
        let engine = engine();
        engine.set_price_override(PROPERTY, OWNER, a, price).unwrap();

        let quote = engine.range_quote(PROPERTY, a).unwrap();
        let nightly_sum: Decimal = quote.nightly.iter().map(|(_, p)| *p).sum();
        prop_assert_eq!(quote.nightly.len() as u64, a.nights());
        prop_assert_eq!(quote.subtotal, nightly_sum);
        prop_assert_eq!(quote.total, quote.subtotal + quote.service_fee + quote.taxes);
    }

    /// The stored reservation total always matches a fresh quote for the
    /// same range.
    #[test]
    fn reservation_total_matches_quote(a in arb_range(), price in arb_price()) {
        let engine = engine();
        engine.set_price_override(PROPERTY, OWNER, a, price).unwrap();

        let quote = engine.range_quote(PROPERTY, a).unwrap();
        let r = engine
            .create_reservation(PROPERTY, TENANT, a.start, a.end)
            .unwrap();
        prop_assert_eq!(r.total_price, Some(quote.total));
    }
}

// =============================================================================
// Calendar Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The month grid always has 42 cells, starts on a Sunday, and covers
    /// every day of the requested month.
    #[test]
    fn month_grid_shape_holds(month in 1u32..=12) {
        use chrono::{Datelike, Weekday};

        let engine = engine();
        let grid = engine.build_month(PROPERTY, 2025, month).unwrap();

        prop_assert_eq!(grid.cells.len(), staybook_rs::GRID_CELLS);
        prop_assert_eq!(grid.cells[0].date.weekday(), Weekday::Sun);
        let in_month = grid.cells.iter().filter(|c| c.in_month).count();
        let days_in_month = grid
            .cells
            .iter()
            .filter(|c| c.date.month() == month && c.date.year() == 2025)
            .count();
        prop_assert_eq!(in_month, days_in_month);
        // Consecutive cells are consecutive days.
        for pair in grid.cells.windows(2) {
            prop_assert_eq!(pair[1].date, pair[0].date + Days::new(1));
        }
    }

    /// Grid day statuses agree with single-day resolution.
    #[test]
    fn grid_agrees_with_resolve_day(a in arb_range()) {
        let engine = engine();
        engine
            .create_reservation(PROPERTY, TENANT, a.start, a.end)
            .unwrap();

        use chrono::Datelike;
        let grid = engine
            .build_month(PROPERTY, a.start.year(), a.start.month())
            .unwrap();
        for cell in &grid.cells {
            prop_assert_eq!(
                cell.status,
                engine.resolve_day(PROPERTY, cell.date).unwrap()
            );
        }
    }
}
