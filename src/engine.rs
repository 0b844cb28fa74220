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

//! Booking engine.
//!
//! The [`Engine`] is the central component coordinating the reservation
//! lifecycle, calendar resolution, pricing, and reviews. Each property's
//! timeline is a shared resource: every state-changing operation on a
//! property runs inside that property's critical section, so a conflict
//! check and the write it guards form one atomic unit. Operations on
//! different properties proceed in parallel.
//!
//! # Invariants
//!
//! - For a given property, no two reservations with status in
//!   {Requested, Confirmed} have overlapping `[start, end)` ranges.
//! - A reservation's start date is strictly after the date of submission.
//! - Once `create_reservation` succeeds, no overlapping create on the same
//!   property succeeds until the winner leaves Requested/Confirmed.
//! - At most one review exists per reservation.

use crate::availability::MonthGrid;
use crate::base::{BlockId, DateRange, PropertyId, ReservationId, ReviewId, UserId};
use crate::calendar::{self, CalendarBlock, DayStatus};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::BookingError;
use crate::events::{BookingEvent, EventOutbox};
use crate::pricing::{PriceSchedule, Quote};
use crate::property::Property;
use crate::reservation::{Reservation, ReservationStatus};
use crate::review::{Review, ReviewLog};
use chrono::{Days, NaiveDate};
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Everything the engine tracks for one property, guarded by one lock.
#[derive(Debug)]
struct BookData {
    property: Property,
    /// Reservations in creation order; never deleted, only transitioned.
    reservations: BTreeMap<ReservationId, Reservation>,
    blocks: Vec<CalendarBlock>,
    schedule: PriceSchedule,
}

impl BookData {
    fn new(property: Property) -> Self {
        Self {
            property,
            reservations: BTreeMap::new(),
            blocks: Vec::new(),
            schedule: PriceSchedule::new(),
        }
    }

    fn reservation_refs(&self) -> Vec<&Reservation> {
        self.reservations.values().collect()
    }

    fn block_refs(&self) -> Vec<&CalendarBlock> {
        self.blocks.iter().collect()
    }

    fn assert_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            let blocking: Vec<&Reservation> = self
                .reservations
                .values()
                .filter(|r| r.status.blocks_availability())
                .collect();
            for (i, a) in blocking.iter().enumerate() {
                for b in &blocking[i + 1..] {
                    debug_assert!(
                        !a.range.overlaps(&b.range),
                        "Invariant violated: reservations {} and {} overlap on property {}",
                        a.id,
                        b.id,
                        self.property.id
                    );
                }
            }
        }
    }
}

/// Per-property timeline with its own mutex.
#[derive(Debug)]
struct PropertyBook {
    inner: Mutex<BookData>,
}

impl PropertyBook {
    fn new(property: Property) -> Self {
        Self {
            inner: Mutex::new(BookData::new(property)),
        }
    }
}

/// Per-user reservation counts for dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ReservationStats {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
}

/// Booking engine coordinating properties, reservations, pricing, and
/// reviews.
pub struct Engine {
    /// Per-property books indexed by property ID.
    books: DashMap<PropertyId, PropertyBook>,
    /// Locates the property owning a reservation.
    locator: DashMap<ReservationId, PropertyId>,
    reviews: ReviewLog,
    /// Month-grid projections, invalidated by every write to the property.
    month_cache: DashMap<(PropertyId, i32, u32), Arc<MonthGrid>>,
    outbox: EventOutbox,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    next_reservation_id: AtomicU64,
    next_block_id: AtomicU64,
    next_review_id: AtomicU64,
}

impl Engine {
    /// Creates an engine on the system clock with default configuration.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_clock(Arc::new(SystemClock), config)
    }

    /// Creates an engine with an explicit time source, for deterministic
    /// tests.
    pub fn with_clock(clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        Engine {
            books: DashMap::new(),
            locator: DashMap::new(),
            reviews: ReviewLog::new(),
            month_cache: DashMap::new(),
            outbox: EventOutbox::new(),
            clock,
            config,
            next_reservation_id: AtomicU64::new(1),
            next_block_id: AtomicU64::new(1),
            next_review_id: AtomicU64::new(1),
        }
    }

    // === Property boundary ===

    /// Registers a property with the engine.
    ///
    /// This is the hand-off from external property management. Registering
    /// an already-known property updates its record without touching its
    /// reservations, blocks, or pricing rules.
    pub fn register_property(&self, property: Property) {
        match self.books.get(&property.id) {
            Some(book) => {
                book.inner.lock().property = property;
            }
            None => {
                self.books.insert(property.id, PropertyBook::new(property));
            }
        }
    }

    /// Activates or deactivates a property. Owner only.
    pub fn set_property_active(
        &self,
        property_id: PropertyId,
        actor: UserId,
        active: bool,
    ) -> Result<(), BookingError> {
        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::PropertyNotFound)?;
        let mut data = book.inner.lock();
        if data.property.owner != actor {
            return Err(BookingError::NotAuthorized);
        }
        data.property.active = active;
        Ok(())
    }

    pub fn get_property(&self, property_id: PropertyId) -> Option<Property> {
        self.books
            .get(&property_id)
            .map(|book| book.inner.lock().property.clone())
    }

    // === Reservation lifecycle ===

    /// Creates a reservation in `Requested` state.
    ///
    /// The conflict check and the insert run under the property's lock, so
    /// two concurrent requests for overlapping ranges can never both
    /// succeed.
    ///
    /// # Errors
    ///
    /// - [`BookingError::PropertyNotFound`] / [`BookingError::PropertyInactive`]
    /// - [`BookingError::InvalidDateRange`] - start not after today, or end <= start.
    /// - [`BookingError::DateRangeUnavailable`] - overlaps a requested or
    ///   confirmed reservation, or an owner block.
    pub fn create_reservation(
        &self,
        property_id: PropertyId,
        requester: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Reservation, BookingError> {
        let range = DateRange::new(start, end)?;
        if range.start <= self.clock.today() {
            return Err(BookingError::InvalidDateRange);
        }

        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::PropertyNotFound)?;
        let mut data = book.inner.lock();
        if !data.property.active {
            return Err(BookingError::PropertyInactive);
        }
        if calendar::range_has_conflict(range, &data.reservation_refs(), &data.block_refs()) {
            return Err(BookingError::DateRangeUnavailable);
        }

        let id = ReservationId(self.next_reservation_id.fetch_add(1, Ordering::Relaxed));
        let quote = Quote::compute(
            range,
            &data.schedule,
            data.property.base_price,
            &self.config.fees,
        );
        let mut reservation =
            Reservation::new(id, property_id, requester, range, self.clock.now());
        reservation.total_price = Some(quote.total);

        let owner = data.property.owner;
        data.reservations.insert(id, reservation.clone());
        data.assert_invariants();
        drop(data);

        self.locator.insert(id, property_id);
        self.invalidate_calendar(property_id);
        self.outbox.publish(BookingEvent::ReservationCreated {
            reservation_id: id,
            property_id,
            requester,
            owner,
        });
        info!(%id, %property_id, %requester, %range, "reservation requested");
        Ok(reservation)
    }

    /// Approves a requested reservation. Property owner only.
    pub fn approve(
        &self,
        reservation_id: ReservationId,
        actor: UserId,
    ) -> Result<Reservation, BookingError> {
        self.transition(reservation_id, |data, reservation| {
            if data.property.owner != actor {
                return Err(BookingError::NotAuthorized);
            }
            reservation.approve()?;
            Ok(Some(BookingEvent::ReservationApproved {
                reservation_id,
                property_id: reservation.property_id,
                requester: reservation.requester,
                owner: actor,
            }))
        })
    }

    /// Rejects a requested reservation. Property owner only. The reason is
    /// advisory metadata and is not validated.
    pub fn reject(
        &self,
        reservation_id: ReservationId,
        actor: UserId,
        reason: Option<String>,
    ) -> Result<Reservation, BookingError> {
        self.transition(reservation_id, |data, reservation| {
            if data.property.owner != actor {
                return Err(BookingError::NotAuthorized);
            }
            reservation.reject(reason.clone())?;
            Ok(Some(BookingEvent::ReservationRejected {
                reservation_id,
                property_id: reservation.property_id,
                requester: reservation.requester,
                owner: actor,
            }))
        })
    }

    /// Cancels a reservation. Requester or property owner.
    ///
    /// Cancelling an already terminal reservation is a no-op success: the
    /// final state is reported as-is and no event is emitted.
    pub fn cancel(
        &self,
        reservation_id: ReservationId,
        actor: UserId,
    ) -> Result<Reservation, BookingError> {
        self.transition(reservation_id, |data, reservation| {
            if data.property.owner != actor && reservation.requester != actor {
                return Err(BookingError::NotAuthorized);
            }
            if !reservation.cancel()? {
                return Ok(None);
            }
            Ok(Some(BookingEvent::ReservationCancelled {
                reservation_id,
                property_id: reservation.property_id,
                requester: reservation.requester,
                cancelled_by: actor,
            }))
        })
    }

    /// Runs one state transition under the property lock.
    ///
    /// `op` validates authorization, mutates the reservation, and reports
    /// the event to publish (`None` for idempotent no-ops). Nothing is
    /// committed when `op` fails.
    fn transition<F>(
        &self,
        reservation_id: ReservationId,
        op: F,
    ) -> Result<Reservation, BookingError>
    where
        F: FnOnce(&BookData, &mut Reservation) -> Result<Option<BookingEvent>, BookingError>,
    {
        let property_id = *self
            .locator
            .get(&reservation_id)
            .ok_or(BookingError::ReservationNotFound)?;
        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::ReservationNotFound)?;

        let mut data = book.inner.lock();
        // Work on a copy so a failed transition leaves no partial state.
        let mut reservation = data
            .reservations
            .get(&reservation_id)
            .cloned()
            .ok_or(BookingError::ReservationNotFound)?;
        let event = op(&data, &mut reservation)?;
        data.reservations.insert(reservation_id, reservation.clone());
        data.assert_invariants();
        drop(data);

        if let Some(event) = event {
            self.invalidate_calendar(property_id);
            self.outbox.publish(event);
            info!(
                id = %reservation_id,
                %property_id,
                status = %reservation.status,
                "reservation transitioned"
            );
        }
        Ok(reservation)
    }

    pub fn get_reservation(&self, reservation_id: ReservationId) -> Option<Reservation> {
        let property_id = *self.locator.get(&reservation_id)?;
        let book = self.books.get(&property_id)?;
        let data = book.inner.lock();
        data.reservations.get(&reservation_id).cloned()
    }

    /// All reservations for a property, in creation order.
    pub fn reservations_for_property(&self, property_id: PropertyId) -> Vec<Reservation> {
        self.books
            .get(&property_id)
            .map(|book| book.inner.lock().reservations.values().cloned().collect())
            .unwrap_or_default()
    }

    /// All reservations made by a requester, across properties.
    pub fn reservations_for_requester(&self, requester: UserId) -> Vec<Reservation> {
        let mut reservations: Vec<Reservation> = self
            .books
            .iter()
            .flat_map(|book| {
                let data = book.inner.lock();
                data.reservations
                    .values()
                    .filter(|r| r.requester == requester)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        reservations.sort_by_key(|r| r.id.0);
        reservations
    }

    /// Reservation counts for a requester's dashboard.
    pub fn stats_for_requester(&self, requester: UserId) -> ReservationStats {
        Self::stats_over(self.reservations_for_requester(requester).iter())
    }

    /// Reservation counts across all properties owned by `owner`.
    pub fn stats_for_owner(&self, owner: UserId) -> ReservationStats {
        let reservations: Vec<Reservation> = self
            .books
            .iter()
            .flat_map(|book| {
                let data = book.inner.lock();
                if data.property.owner != owner {
                    return Vec::new();
                }
                data.reservations.values().cloned().collect()
            })
            .collect();
        Self::stats_over(reservations.iter())
    }

    fn stats_over<'a>(reservations: impl Iterator<Item = &'a Reservation>) -> ReservationStats {
        let mut stats = ReservationStats {
            total: 0,
            confirmed: 0,
            pending: 0,
        };
        for r in reservations {
            stats.total += 1;
            match r.status {
                ReservationStatus::Confirmed => stats.confirmed += 1,
                ReservationStatus::Requested => stats.pending += 1,
                _ => {}
            }
        }
        stats
    }

    /// Cancels requested reservations older than the configured expiry.
    ///
    /// Disabled unless [`EngineConfig::pending_expiry_days`] is set. Returns
    /// the ids of the reservations it expired.
    pub fn expire_stale_requests(&self) -> Vec<ReservationId> {
        let Some(expiry_days) = self.config.pending_expiry_days else {
            return Vec::new();
        };
        let today = self.clock.today();
        let mut expired = Vec::new();

        for book in self.books.iter() {
            let mut data = book.inner.lock();
            let property_id = data.property.id;
            let owner = data.property.owner;
            let stale: Vec<ReservationId> = data
                .reservations
                .values()
                .filter(|r| {
                    r.status == ReservationStatus::Requested
                        && r.created_at.date_naive() + Days::new(expiry_days as u64) < today
                })
                .map(|r| r.id)
                .collect();
            let mut expired_here = false;
            for id in stale {
                let Some(reservation) = data.reservations.get_mut(&id) else {
                    continue;
                };
                if reservation.cancel().unwrap_or(false) {
                    let requester = reservation.requester;
                    self.outbox.publish(BookingEvent::ReservationCancelled {
                        reservation_id: id,
                        property_id,
                        requester,
                        cancelled_by: owner,
                    });
                    expired.push(id);
                    expired_here = true;
                }
            }
            drop(data);
            if expired_here {
                self.invalidate_calendar(property_id);
            }
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "expired stale reservation requests");
        }
        expired
    }

    // === Owner calendar management ===

    /// Withholds a date range from booking. Property owner only.
    ///
    /// Blocks count like confirmed reservations for overlap purposes, so a
    /// block cannot land on dates a pending or confirmed reservation holds.
    pub fn add_block(
        &self,
        property_id: PropertyId,
        actor: UserId,
        range: DateRange,
        label: Option<String>,
    ) -> Result<CalendarBlock, BookingError> {
        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::PropertyNotFound)?;
        let mut data = book.inner.lock();
        if data.property.owner != actor {
            return Err(BookingError::NotAuthorized);
        }
        let holds_dates = data
            .reservations
            .values()
            .any(|r| r.status.blocks_availability() && r.range.overlaps(&range));
        if holds_dates {
            return Err(BookingError::DateRangeUnavailable);
        }

        let block = CalendarBlock {
            id: BlockId(self.next_block_id.fetch_add(1, Ordering::Relaxed)),
            property_id,
            range,
            label,
        };
        data.blocks.push(block.clone());
        drop(data);

        self.invalidate_calendar(property_id);
        debug!(%property_id, %range, "dates blocked");
        Ok(block)
    }

    /// Releases a block. Property owner only.
    pub fn remove_block(
        &self,
        property_id: PropertyId,
        actor: UserId,
        block_id: BlockId,
    ) -> Result<(), BookingError> {
        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::PropertyNotFound)?;
        let mut data = book.inner.lock();
        if data.property.owner != actor {
            return Err(BookingError::NotAuthorized);
        }
        let before = data.blocks.len();
        data.blocks.retain(|b| b.id != block_id);
        if data.blocks.len() == before {
            return Err(BookingError::BlockNotFound);
        }
        drop(data);
        self.invalidate_calendar(property_id);
        Ok(())
    }

    pub fn blocks_for_property(&self, property_id: PropertyId) -> Vec<CalendarBlock> {
        self.books
            .get(&property_id)
            .map(|book| book.inner.lock().blocks.clone())
            .unwrap_or_default()
    }

    // === Pricing edits (owner only) ===

    /// Bulk price edit: one explicit override per date in the range.
    pub fn set_price_override(
        &self,
        property_id: PropertyId,
        actor: UserId,
        range: DateRange,
        price: Decimal,
    ) -> Result<(), BookingError> {
        self.edit_schedule(property_id, actor, |data| {
            data.schedule.add_overrides(property_id, range, price)
        })
    }

    /// Clears explicit overrides intersecting the range.
    pub fn clear_price_overrides(
        &self,
        property_id: PropertyId,
        actor: UserId,
        range: DateRange,
    ) -> Result<(), BookingError> {
        self.edit_schedule(property_id, actor, |data| {
            data.schedule.clear_overrides(range);
            Ok(())
        })
    }

    /// Applies `base_price × multiplier / 100` across a season window.
    pub fn set_seasonal_rule(
        &self,
        property_id: PropertyId,
        actor: UserId,
        range: DateRange,
        multiplier_percent: u32,
    ) -> Result<(), BookingError> {
        self.edit_schedule(property_id, actor, |data| {
            let base = data.property.base_price;
            data.schedule
                .set_seasonal(property_id, range, multiplier_percent, base)
        })
    }

    /// Applies `base_price × multiplier / 100` to Saturdays and Sundays in
    /// the window.
    pub fn set_weekend_rule(
        &self,
        property_id: PropertyId,
        actor: UserId,
        range: DateRange,
        multiplier_percent: u32,
    ) -> Result<(), BookingError> {
        self.edit_schedule(property_id, actor, |data| {
            let base = data.property.base_price;
            data.schedule
                .set_weekend(property_id, range, multiplier_percent, base)
        })
    }

    fn edit_schedule<F>(
        &self,
        property_id: PropertyId,
        actor: UserId,
        edit: F,
    ) -> Result<(), BookingError>
    where
        F: FnOnce(&mut BookData) -> Result<(), BookingError>,
    {
        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::PropertyNotFound)?;
        let mut data = book.inner.lock();
        if data.property.owner != actor {
            return Err(BookingError::NotAuthorized);
        }
        edit(&mut data)?;
        drop(data);
        self.invalidate_calendar(property_id);
        debug!(%property_id, "pricing rules updated");
        Ok(())
    }

    // === Calendar and pricing reads ===

    /// Status of one day for a property.
    pub fn resolve_day(
        &self,
        property_id: PropertyId,
        date: NaiveDate,
    ) -> Result<DayStatus, BookingError> {
        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::PropertyNotFound)?;
        let data = book.inner.lock();
        Ok(calendar::resolve_day(
            date,
            &data.reservation_refs(),
            &data.block_refs(),
        ))
    }

    /// Status of each day in `[start, end)`.
    pub fn resolve_range(
        &self,
        property_id: PropertyId,
        range: DateRange,
    ) -> Result<Vec<(NaiveDate, DayStatus)>, BookingError> {
        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::PropertyNotFound)?;
        let data = book.inner.lock();
        Ok(calendar::resolve_range(
            range,
            &data.reservation_refs(),
            &data.block_refs(),
        ))
    }

    /// Dates available for new requests within the next `horizon_days`.
    pub fn available_dates(
        &self,
        property_id: PropertyId,
        horizon_days: u32,
    ) -> Result<Vec<NaiveDate>, BookingError> {
        let start = self.clock.today() + Days::new(1);
        let range = DateRange::new(start, start + Days::new(horizon_days as u64))?;
        Ok(self
            .resolve_range(property_id, range)?
            .into_iter()
            .filter(|(_, status)| *status == DayStatus::Available)
            .map(|(date, _)| date)
            .collect())
    }

    /// Month grid for the property, served from cache when warm.
    pub fn build_month(
        &self,
        property_id: PropertyId,
        year: i32,
        month: u32,
    ) -> Result<Arc<MonthGrid>, BookingError> {
        if let Some(grid) = self.month_cache.get(&(property_id, year, month)) {
            return Ok(Arc::clone(&grid));
        }

        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::PropertyNotFound)?;
        let data = book.inner.lock();
        let grid = Arc::new(MonthGrid::build(
            property_id,
            year,
            month,
            self.clock.today(),
            &data.reservation_refs(),
            &data.block_refs(),
            &data.schedule,
            data.property.base_price,
        )?);
        // Fill the cache before releasing the book lock. A writer cannot
        // commit until the lock drops, so its invalidation always lands
        // after this insert and the cache never holds a superseded grid.
        self.month_cache
            .insert((property_id, year, month), Arc::clone(&grid));
        drop(data);
        Ok(grid)
    }

    /// Effective nightly price for a date.
    pub fn resolve_price(
        &self,
        property_id: PropertyId,
        date: NaiveDate,
    ) -> Result<Decimal, BookingError> {
        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::PropertyNotFound)?;
        let data = book.inner.lock();
        Ok(data.schedule.resolve(date, data.property.base_price))
    }

    /// Full cost breakdown for a range: nightly prices, service fee, taxes.
    pub fn range_quote(
        &self,
        property_id: PropertyId,
        range: DateRange,
    ) -> Result<Quote, BookingError> {
        let book = self
            .books
            .get(&property_id)
            .ok_or(BookingError::PropertyNotFound)?;
        let data = book.inner.lock();
        Ok(Quote::compute(
            range,
            &data.schedule,
            data.property.base_price,
            &self.config.fees,
        ))
    }

    /// Drops every cached projection for the property.
    ///
    /// Called after each committed write so calendar reads within the same
    /// process never observe stale state.
    fn invalidate_calendar(&self, property_id: PropertyId) {
        self.month_cache.retain(|key, _| key.0 != property_id);
    }

    // === Reviews ===

    /// Reservations the requester may still review: confirmed, ended before
    /// today, and not yet reviewed. Optionally scoped to one property.
    pub fn eligible_reservations(
        &self,
        requester: UserId,
        property_id: Option<PropertyId>,
    ) -> Vec<Reservation> {
        let today = self.clock.today();
        self.reservations_for_requester(requester)
            .into_iter()
            .filter(|r| property_id.is_none_or(|p| r.property_id == p))
            .filter(|r| Self::reviewable(r, today) && !self.reviews.has_review_for(r.id))
            .collect()
    }

    /// True when the reservation could be reviewed right now.
    pub fn can_review(&self, reservation_id: ReservationId) -> bool {
        let Some(reservation) = self.get_reservation(reservation_id) else {
            return false;
        };
        Self::reviewable(&reservation, self.clock.today())
            && !self.reviews.has_review_for(reservation_id)
    }

    fn reviewable(reservation: &Reservation, today: NaiveDate) -> bool {
        reservation.status == ReservationStatus::Confirmed && reservation.range.end < today
    }

    /// Submits a review for a completed stay.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidRating`] - rating outside 1-5.
    /// - [`BookingError::NotEligible`] - actor is not the requester, or the
    ///   stay is not confirmed-and-ended.
    /// - [`BookingError::DuplicateReview`] - reservation already reviewed.
    pub fn submit_review(
        &self,
        reservation_id: ReservationId,
        actor: UserId,
        rating: u8,
        comment: impl Into<String>,
    ) -> Result<Arc<Review>, BookingError> {
        if !(1..=5).contains(&rating) {
            return Err(BookingError::InvalidRating);
        }
        let reservation = self
            .get_reservation(reservation_id)
            .ok_or(BookingError::ReservationNotFound)?;
        if reservation.requester != actor || !Self::reviewable(&reservation, self.clock.today()) {
            return Err(BookingError::NotEligible);
        }

        let review = Review {
            id: ReviewId(self.next_review_id.fetch_add(1, Ordering::Relaxed)),
            property_id: reservation.property_id,
            reservation_id,
            reviewer: actor,
            rating,
            comment: comment.into(),
            created_at: self.clock.now(),
        };
        // The log owns the one-review-per-reservation constraint.
        let review = self.reviews.append(review)?;

        self.outbox.publish(BookingEvent::ReviewSubmitted {
            review_id: review.id,
            reservation_id,
            property_id: review.property_id,
            reviewer: actor,
        });
        info!(id = %review.id, reservation = %reservation_id, "review submitted");
        Ok(review)
    }

    pub fn reviews_for_property(&self, property_id: PropertyId) -> Vec<Arc<Review>> {
        self.reviews.for_property(property_id)
    }

    pub fn average_rating(&self, property_id: PropertyId) -> Option<Decimal> {
        self.reviews.average_rating(property_id)
    }

    pub fn review_count(&self, property_id: PropertyId) -> usize {
        self.reviews.count_for_property(property_id)
    }

    // === Notification boundary ===

    /// Drains all pending notification events in publication order.
    pub fn drain_events(&self) -> Vec<BookingEvent> {
        self.outbox.drain()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
