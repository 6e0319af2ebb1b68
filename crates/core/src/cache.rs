//! Memoization of model evaluations
//!
//! The models are pure, so a result can be reused whenever the exact same
//! arguments come back (an interactive front end re-renders far more often than
//! inputs change). Keys are the bit patterns of every argument, which makes the
//! lookup exact: `0.1 + 0.2` and `0.3` are different inputs.
//!
//! Each operation gets its own bounded cache. When full, the oldest entry is
//! evicted first.

use crate::config::ModelConfig;
use crate::core_types::{ExposureScenario, PostDeparture, RiskResult, TimeSeries};
use crate::model::{self, TimeRange};
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::collections::VecDeque;
use std::hash::Hash;
use tracing::trace;

type WellsRileyKey = (u32, [u64; 4]);
type SweepKey = (u32, [u64; 3]);
type ScenarioKey = (u32, [u64; 5]);
type PostDepartureKey = Option<u64>;
type RangeKey = [u64; 2];

fn scenario_key(scenario: &ExposureScenario) -> ScenarioKey {
    (
        scenario.infector_count,
        [
            scenario.breathing_rate.to_bits(),
            scenario.quanta_emission_rate.to_bits(),
            scenario.ventilation_rate.to_bits(),
            scenario.room_volume.to_bits(),
            scenario.presence_duration.to_bits(),
        ],
    )
}

fn post_departure_key(post_departure: PostDeparture) -> PostDepartureKey {
    post_departure.duration().map(f64::to_bits)
}

fn range_key(range: &TimeRange) -> RangeKey {
    [range.end().to_bits(), range.resolution().to_bits()]
}

/// Fixed-capacity map with insertion-order eviction
#[derive(Debug, Clone)]
struct BoundedCache<K, V> {
    entries: FxHashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V: Clone> BoundedCache<K, V> {
    fn new(capacity: usize) -> Self {
        BoundedCache {
            entries: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Hit/miss counters across all cached operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizing front end for the four model operations
///
/// # Example
/// ```
/// use iara_core::ModelCache;
///
/// let mut cache = ModelCache::new(16);
/// let first = cache.wells_riley(1, 0.465, 2.7, 1.0, 50.0);
/// let again = cache.wells_riley(1, 0.465, 2.7, 1.0, 50.0);
/// assert_eq!(first, again);
/// assert_eq!(cache.stats().hits, 1);
/// ```
#[derive(Debug, Clone)]
pub struct ModelCache {
    wells_riley: BoundedCache<WellsRileyKey, f64>,
    residual: BoundedCache<(ScenarioKey, PostDepartureKey), RiskResult>,
    wells_riley_sweeps: BoundedCache<(SweepKey, RangeKey), TimeSeries>,
    residual_sweeps: BoundedCache<(ScenarioKey, PostDepartureKey, RangeKey), TimeSeries>,
    stats: CacheStats,
}

impl ModelCache {
    /// Create a cache holding up to `capacity` results per operation
    pub fn new(capacity: usize) -> Self {
        ModelCache {
            wells_riley: BoundedCache::new(capacity),
            residual: BoundedCache::new(capacity),
            wells_riley_sweeps: BoundedCache::new(capacity),
            residual_sweeps: BoundedCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.cache_capacity)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Total number of memoized results
    pub fn len(&self) -> usize {
        self.wells_riley.len()
            + self.residual.len()
            + self.wells_riley_sweeps.len()
            + self.residual_sweeps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every memoized result and reset the counters
    pub fn clear(&mut self) {
        self.wells_riley.clear();
        self.residual.clear();
        self.wells_riley_sweeps.clear();
        self.residual_sweeps.clear();
        self.stats = CacheStats::default();
    }

    fn lookup<K, V>(
        stats: &mut CacheStats,
        cache: &mut BoundedCache<K, V>,
        key: K,
        operation: &'static str,
        compute: impl FnOnce() -> V,
    ) -> V
    where
        K: Hash + Eq + Clone,
        V: Clone,
    {
        if let Some(value) = cache.get(&key) {
            stats.hits += 1;
            trace!(operation, "Cache hit");
            return value;
        }
        stats.misses += 1;
        trace!(operation, "Cache miss");
        let value = compute();
        cache.insert(key, value.clone());
        value
    }

    /// Memoized Wells-Riley probability, see [`wells_riley`](fn@model::wells_riley)
    pub fn wells_riley(
        &mut self,
        infector_count: u32,
        breathing_rate: f64,
        quanta_emission_rate: f64,
        exposure_time: f64,
        ventilation_rate: f64,
    ) -> f64 {
        let key = (
            infector_count,
            [
                breathing_rate.to_bits(),
                quanta_emission_rate.to_bits(),
                exposure_time.to_bits(),
                ventilation_rate.to_bits(),
            ],
        );
        Self::lookup(
            &mut self.stats,
            &mut self.wells_riley,
            key,
            "wells_riley",
            || {
                model::wells_riley(
                    infector_count,
                    breathing_rate,
                    quanta_emission_rate,
                    exposure_time,
                    ventilation_rate,
                )
            },
        )
    }

    /// Memoized residual-risk evaluation, see [`residual_risk`](fn@model::residual_risk)
    pub fn residual_risk(
        &mut self,
        scenario: &ExposureScenario,
        post_departure: PostDeparture,
    ) -> RiskResult {
        let key = (scenario_key(scenario), post_departure_key(post_departure));
        Self::lookup(
            &mut self.stats,
            &mut self.residual,
            key,
            "residual_risk",
            || scenario.residual_risk(post_departure),
        )
    }

    /// Memoized [`model::sweep_wells_riley`]
    pub fn sweep_wells_riley(
        &mut self,
        infector_count: u32,
        breathing_rate: f64,
        quanta_emission_rate: f64,
        ventilation_rate: f64,
        range: &TimeRange,
    ) -> TimeSeries {
        let key = (
            (
                infector_count,
                [
                    breathing_rate.to_bits(),
                    quanta_emission_rate.to_bits(),
                    ventilation_rate.to_bits(),
                ],
            ),
            range_key(range),
        );
        Self::lookup(
            &mut self.stats,
            &mut self.wells_riley_sweeps,
            key,
            "sweep_wells_riley",
            || {
                model::sweep_wells_riley(
                    infector_count,
                    breathing_rate,
                    quanta_emission_rate,
                    ventilation_rate,
                    range,
                )
            },
        )
    }

    /// Memoized [`model::sweep_residual_risk`]
    pub fn sweep_residual_risk(
        &mut self,
        scenario: &ExposureScenario,
        post_departure: PostDeparture,
        range: &TimeRange,
    ) -> TimeSeries {
        let key = (
            scenario_key(scenario),
            post_departure_key(post_departure),
            range_key(range),
        );
        Self::lookup(
            &mut self.stats,
            &mut self.residual_sweeps,
            key,
            "sweep_residual_risk",
            || model::sweep_residual_risk(scenario, post_departure, range),
        )
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::from_config(&ModelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ExposureScenario {
        ExposureScenario {
            infector_count: 2,
            breathing_rate: 0.00775,
            quanta_emission_rate: 0.05,
            ventilation_rate: 1.0,
            room_volume: 50.0,
            presence_duration: 60.0,
        }
    }

    #[test]
    fn test_repeated_calls_hit() {
        let mut cache = ModelCache::new(8);
        let s = scenario();
        let first = cache.residual_risk(&s, PostDeparture::FixedDuration(5.0));
        let second = cache.residual_risk(&s, PostDeparture::FixedDuration(5.0));
        assert_eq!(first, second);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_post_departure_is_part_of_key() {
        let mut cache = ModelCache::new(8);
        let s = scenario();
        let indefinite = cache.residual_risk(&s, PostDeparture::Indefinite);
        let fixed = cache.residual_risk(&s, PostDeparture::FixedDuration(5.0));
        assert!(indefinite.combined.is_none());
        assert!(fixed.combined.is_some());
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_cached_values_match_direct_evaluation() {
        let mut cache = ModelCache::default();
        let s = scenario();
        let range = TimeRange::new(90.0, 5.0).unwrap();
        let post = PostDeparture::FixedDuration(30.0);

        assert_eq!(
            cache.sweep_residual_risk(&s, post, &range),
            model::sweep_residual_risk(&s, post, &range)
        );
        assert_eq!(
            cache.sweep_wells_riley(2, 0.00775, 0.05, 1.0, &range),
            model::sweep_wells_riley(2, 0.00775, 0.05, 1.0, &range)
        );
        assert_eq!(
            cache.wells_riley(2, 0.00775, 0.05, 60.0, 1.0),
            s.wells_riley()
        );
    }

    #[test]
    fn test_eviction_is_bounded() {
        let mut cache = ModelCache::new(2);
        for t in [1.0, 2.0, 3.0] {
            cache.wells_riley(1, 1.0, 1.0, t, 10.0);
        }
        assert_eq!(cache.len(), 2);

        // Oldest entry (t = 1) was evicted
        cache.wells_riley(1, 1.0, 1.0, 1.0, 10.0);
        assert_eq!(cache.stats().hits, 0);
        cache.wells_riley(1, 1.0, 1.0, 3.0, 10.0);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let mut cache = ModelCache::new(0);
        cache.wells_riley(1, 1.0, 1.0, 1.0, 10.0);
        cache.wells_riley(1, 1.0, 1.0, 1.0, 10.0);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 2);

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
