//! Seeded synthetic instances for demos and tests.
//!
//! Customers are scattered uniformly on a square around the depot; the
//! distance matrix is Euclidean, symmetric, and rounded to 0.1.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::distance::DistanceMatrix;
use crate::models::{Order, Weekday};

/// Shape of a generated instance.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Number of distinct customers.
    pub customers: usize,
    /// Real location code of the depot; customers follow it consecutively.
    pub depot_code: usize,
    /// Half-width of the square customers are placed on.
    pub radius: f64,
    /// Upper bound of a single order's volume.
    pub max_volume: f64,
    /// Probability that a customer receives a second order.
    pub repeat_probability: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            customers: 40,
            depot_code: 1000,
            radius: 250.0,
            max_volume: 1800.0,
            repeat_probability: 0.3,
        }
    }
}

/// A generated set of orders with a matching distance matrix.
#[derive(Debug, Clone)]
pub struct GeneratedInstance {
    pub depot_code: usize,
    pub orders: Vec<Order>,
    /// Distances between the depot and every customer, without depot alias.
    pub distances: DistanceMatrix,
}

/// Generates an instance; the same seed always yields the same instance.
///
/// # Examples
///
/// ```
/// use u_dispatch::generate::{generate_instance, GeneratorSettings};
///
/// let settings = GeneratorSettings { customers: 10, ..GeneratorSettings::default() };
/// let a = generate_instance(&settings, 7);
/// let b = generate_instance(&settings, 7);
/// assert_eq!(a.orders, b.orders);
/// assert_eq!(a.distances.size(), 11);
/// assert!(a.distances.is_symmetric(1e-10));
/// ```
pub fn generate_instance(settings: &GeneratorSettings, seed: u64) -> GeneratedInstance {
    let mut rng = StdRng::seed_from_u64(seed);
    let depot = settings.depot_code;

    let mut labels = vec![depot];
    let mut points = vec![(0.0, 0.0)];
    for k in 1..=settings.customers {
        labels.push(depot + k);
        points.push((
            rng.random_range(-settings.radius..=settings.radius),
            rng.random_range(-settings.radius..=settings.radius),
        ));
    }

    let mut distances = DistanceMatrix::new(labels.clone());
    for a in 0..labels.len() {
        distances.set(labels[a], labels[a], 0.0);
        for b in (a + 1)..labels.len() {
            let (dx, dy) = (points[a].0 - points[b].0, points[a].1 - points[b].1);
            let d = ((dx * dx + dy * dy).sqrt() * 10.0).round() / 10.0;
            distances.set(labels[a], labels[b], d);
            distances.set(labels[b], labels[a], d);
        }
    }

    let mut orders = Vec::new();
    for &customer in &labels[1..] {
        let count = if rng.random_bool(settings.repeat_probability) { 2 } else { 1 };
        for _ in 0..count {
            let day = Weekday::ALL[rng.random_range(0..Weekday::ALL.len())];
            let volume = (rng.random_range(1.0..=settings.max_volume) * 10.0).round() / 10.0;
            orders.push(Order::new(customer, volume, day));
        }
    }

    GeneratedInstance {
        depot_code: depot,
        orders,
        distances,
    }
}
