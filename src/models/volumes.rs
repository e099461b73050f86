//! Per-stop aggregated cargo volume.

use std::collections::HashMap;

use super::Order;

/// Cargo volume per destination, summed over all orders to that destination.
///
/// Stops keep the order in which they were first seen, which fixes the
/// enumeration order of savings pairs.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Order, StopVolumes, Weekday};
///
/// let orders = vec![
///     Order::new(255, 100.0, Weekday::Mon),
///     Order::new(209, 40.0, Weekday::Mon),
///     Order::new(255, 60.0, Weekday::Mon),
/// ];
/// let volumes = StopVolumes::from_orders(&orders);
/// assert_eq!(volumes.stops(), &[255, 209]);
/// assert_eq!(volumes.get(255), Some(160.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopVolumes {
    stops: Vec<usize>,
    volumes: HashMap<usize, f64>,
}

impl StopVolumes {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates orders by destination.
    pub fn from_orders<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut volumes = Self::new();
        for order in orders {
            volumes.add(order.destination, order.volume);
        }
        volumes
    }

    /// Adds `volume` to `stop`, registering the stop if new.
    pub fn add(&mut self, stop: usize, volume: f64) {
        match self.volumes.get_mut(&stop) {
            Some(total) => *total += volume,
            None => {
                self.stops.push(stop);
                self.volumes.insert(stop, volume);
            }
        }
    }

    /// Aggregated volume for `stop`, if it has any order.
    pub fn get(&self, stop: usize) -> Option<f64> {
        self.volumes.get(&stop).copied()
    }

    /// Stops in first-seen order.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Sum of all volumes.
    pub fn total(&self) -> f64 {
        self.stops.iter().map(|s| self.volumes[s]).sum()
    }
}

impl FromIterator<(usize, f64)> for StopVolumes {
    fn from_iter<T: IntoIterator<Item = (usize, f64)>>(iter: T) -> Self {
        let mut volumes = Self::new();
        for (stop, volume) in iter {
            volumes.add(stop, volume);
        }
        volumes
    }
}
