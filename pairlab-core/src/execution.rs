//! Execution sink: the boundary to whatever fills orders and keeps the books.
//!
//! The engine only ever asks three things of it: take the latest prices, move a
//! leg to a target weight, and report total portfolio value. Fees, slippage, and
//! margin live behind this trait. The engine's own accountant stays authoritative
//! for Sharpe, so a sink with execution quirks cannot change the headline numbers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Leg, LegWeights};

pub trait ExecutionSink {
    /// Mark both legs to the given prices. Called once per step, before any order.
    fn mark(&mut self, date: NaiveDate, price_a: f64, price_b: f64);

    /// Set net exposure on `leg` to `weight` × current portfolio value.
    fn set_target_weight(&mut self, leg: Leg, weight: f64);

    /// Current total portfolio value.
    fn portfolio_value(&self) -> f64;

    /// Move both legs to their target weights.
    fn set_target_weights(&mut self, weights: LegWeights) {
        self.set_target_weight(Leg::A, weights.a);
        self.set_target_weight(Leg::B, weights.b);
    }
}

/// Cash-and-shares portfolio that fills every target at the last marked price,
/// with no fees or slippage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrictionlessPortfolio {
    cash: f64,
    shares_a: f64,
    shares_b: f64,
    price_a: f64,
    price_b: f64,
    last_mark: Option<NaiveDate>,
}

impl FrictionlessPortfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            shares_a: 0.0,
            shares_b: 0.0,
            price_a: 0.0,
            price_b: 0.0,
            last_mark: None,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn shares(&self, leg: Leg) -> f64 {
        match leg {
            Leg::A => self.shares_a,
            Leg::B => self.shares_b,
        }
    }

    pub fn last_mark(&self) -> Option<NaiveDate> {
        self.last_mark
    }
}

impl ExecutionSink for FrictionlessPortfolio {
    fn mark(&mut self, date: NaiveDate, price_a: f64, price_b: f64) {
        self.price_a = price_a;
        self.price_b = price_b;
        self.last_mark = Some(date);
    }

    fn set_target_weight(&mut self, leg: Leg, weight: f64) {
        let price = match leg {
            Leg::A => self.price_a,
            Leg::B => self.price_b,
        };
        if price <= 0.0 {
            tracing::warn!(?leg, weight, "target weight requested before leg was marked");
            return;
        }

        let target = weight * self.portfolio_value() / price;
        let held = match leg {
            Leg::A => &mut self.shares_a,
            Leg::B => &mut self.shares_b,
        };
        self.cash -= (target - *held) * price;
        *held = target;
    }

    fn portfolio_value(&self) -> f64 {
        self.cash + self.shares_a * self.price_a + self.shares_b * self.price_b
    }
}
