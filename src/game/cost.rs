//! Upgrade cost curve.
//!
//! Both the shop display and the affordability check go through
//! [`next_cost`], so the two can never disagree about a price.

/// Price of the next level of an upgrade: `floor(base_cost * multiplier^level)`.
///
/// `level` is the number of levels already owned. Pure and deterministic.
pub fn next_cost(base_cost: f64, multiplier: f64, level: u32) -> u64 {
    (base_cost * multiplier.powi(level as i32)).floor() as u64
}
