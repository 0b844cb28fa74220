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

//! Pricing rule resolution.
//!
//! Every date resolves to exactly one nightly price by rule precedence:
//! explicit override > seasonal > weekend > base price. One class applies
//! per date; a seasonal window on a Saturday never stacks the weekend
//! multiplier on top.
//!
//! Multiplier rules store their resolved price at creation time
//! (`base × multiplier / 100`), so resolution itself is a pure lookup.

use crate::base::{DateRange, PropertyId};
use crate::error::BookingError;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Rule class, ordered by ascending precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleClass {
    /// Saturday/Sunday multiplier inside a window.
    Weekend,
    /// Season-window multiplier.
    Seasonal,
    /// Per-date price set by the owner; bulk edits expand into one of these
    /// per day and take top precedence until explicitly cleared.
    Override,
}

/// A date-scoped nightly price layered over the property's base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRule {
    pub property_id: PropertyId,
    pub range: DateRange,
    pub class: RuleClass,
    pub price: Decimal,
}

impl PricingRule {
    /// True when this rule prices the given date.
    ///
    /// Weekend rules only match Saturdays and Sundays inside their window.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        if !self.range.contains(date) {
            return false;
        }
        match self.class {
            RuleClass::Weekend => is_weekend(date),
            RuleClass::Seasonal | RuleClass::Override => true,
        }
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Resolves a multiplier percentage against a base price, rounded to 2 dp.
pub fn apply_multiplier(base: Decimal, multiplier_percent: u32) -> Decimal {
    (base * Decimal::from(multiplier_percent) / dec!(100)).round_dp(2)
}

/// The pricing rules of one property.
///
/// Lives inside the property's critical section; mutations happen under the
/// same lock as reservation writes so quotes never see a half-applied bulk
/// edit.
#[derive(Debug, Default, Clone)]
pub struct PriceSchedule {
    rules: Vec<PricingRule>,
}

impl PriceSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[PricingRule] {
        &self.rules
    }

    /// Expands a bulk price edit into one single-day override per date.
    pub fn add_overrides(
        &mut self,
        property_id: PropertyId,
        range: DateRange,
        price: Decimal,
    ) -> Result<(), BookingError> {
        if price <= Decimal::ZERO {
            return Err(BookingError::InvalidPrice);
        }
        for date in range.iter_days() {
            // Replace any earlier override for the same date.
            self.rules.retain(|r| {
                !(r.class == RuleClass::Override && r.range.contains(date))
            });
            let day = DateRange {
                start: date,
                end: date + Days::new(1),
            };
            self.rules.push(PricingRule {
                property_id,
                range: day,
                class: RuleClass::Override,
                price,
            });
        }
        Ok(())
    }

    /// Removes explicit overrides intersecting the range.
    pub fn clear_overrides(&mut self, range: DateRange) {
        self.rules
            .retain(|r| !(r.class == RuleClass::Override && r.range.overlaps(&range)));
    }

    /// Adds a seasonal multiplier window, resolved against the base price.
    pub fn set_seasonal(
        &mut self,
        property_id: PropertyId,
        range: DateRange,
        multiplier_percent: u32,
        base_price: Decimal,
    ) -> Result<(), BookingError> {
        if multiplier_percent == 0 {
            return Err(BookingError::InvalidPrice);
        }
        self.rules
            .retain(|r| !(r.class == RuleClass::Seasonal && r.range.overlaps(&range)));
        self.rules.push(PricingRule {
            property_id,
            range,
            class: RuleClass::Seasonal,
            price: apply_multiplier(base_price, multiplier_percent),
        });
        Ok(())
    }

    /// Adds a weekend multiplier window, resolved against the base price.
    pub fn set_weekend(
        &mut self,
        property_id: PropertyId,
        range: DateRange,
        multiplier_percent: u32,
        base_price: Decimal,
    ) -> Result<(), BookingError> {
        if multiplier_percent == 0 {
            return Err(BookingError::InvalidPrice);
        }
        self.rules
            .retain(|r| !(r.class == RuleClass::Weekend && r.range.overlaps(&range)));
        self.rules.push(PricingRule {
            property_id,
            range,
            class: RuleClass::Weekend,
            price: apply_multiplier(base_price, multiplier_percent),
        });
        Ok(())
    }

    /// Effective nightly price for a date.
    ///
    /// The highest-precedence applicable rule wins; with no applicable rule
    /// the base price stands.
    pub fn resolve(&self, date: NaiveDate, base_price: Decimal) -> Decimal {
        self.rules
            .iter()
            .filter(|r| r.applies_to(date))
            .max_by_key(|r| r.class)
            .map(|r| r.price)
            .unwrap_or(base_price)
    }
}

/// Fixed service fee and tax percentage applied on top of the nightly
/// subtotal. Both are configuration constants, never computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub service_fee: Decimal,
    pub tax_percent: Decimal,
}

impl Default for FeeSchedule {
    /// Defaults: flat 15 service fee and a 10% tax rate.
    fn default() -> Self {
        Self {
            service_fee: dec!(15),
            tax_percent: dec!(10),
        }
    }
}

/// Cost breakdown for a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub nightly: Vec<(NaiveDate, Decimal)>,
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

impl Quote {
    /// Prices each night in `[start, end)` and applies the fee schedule.
    ///
    /// Taxes round to the nearest whole unit, matching the observed
    /// production behavior.
    pub fn compute(
        range: DateRange,
        schedule: &PriceSchedule,
        base_price: Decimal,
        fees: &FeeSchedule,
    ) -> Self {
        let nightly: Vec<(NaiveDate, Decimal)> = range
            .iter_days()
            .map(|date| (date, schedule.resolve(date, base_price)))
            .collect();
        let subtotal: Decimal = nightly.iter().map(|(_, p)| *p).sum();
        let taxes = (subtotal * fees.tax_percent / dec!(100)).round_dp(0);
        let total = subtotal + fees.service_fee + taxes;
        Quote {
            nightly,
            subtotal,
            service_fee: fees.service_fee,
            taxes,
            total,
        }
    }
}
