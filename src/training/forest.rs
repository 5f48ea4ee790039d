//! Forest driver: many independent trees over one shared source.
//!
//! Tree `i` owns a random stream seeded with `seed + i`. Its bootstrap sample
//! and every split draw come from that stream, so results do not depend on
//! how trees are scheduled across threads.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::data::{validate_source, FeatureSource};
use crate::repr::Tree;

use super::grower::{GrowError, TreeGrower};
use super::logger::TrainingLogger;
use super::params::ForestParams;
use super::sampling::bootstrap_indices;

/// Grow `params.n_trees` trees over `source`.
///
/// Trees are returned in index order.
pub fn grow_forest<D>(source: &D, params: &ForestParams) -> Result<Vec<Tree>, GrowError>
where
    D: FeatureSource + Sync + ?Sized,
{
    params.validate()?;
    if source.n_features() == 0 {
        return Err(GrowError::NoFeatures);
    }
    if source.n_samples() == 0 {
        return Err(GrowError::EmptyDataset);
    }
    params.tree.validate_for(source.n_features())?;
    validate_source(source)?;

    let logger = TrainingLogger::new(params.tree.verbosity);
    logger.info(&format!(
        "Growing {} trees on {} samples",
        params.n_trees,
        source.n_samples()
    ));

    // n_threads == 0: rayon's global pool
    // n_threads == 1: sequential, no pool
    // n_threads > 1: dedicated pool
    match params.n_threads {
        0 => grow_all(source, params),
        1 => (0..params.n_trees)
            .map(|i| grow_one(source, params, i))
            .collect(),
        n => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| GrowError::ThreadPool(e.to_string()))?;
            pool.install(|| grow_all(source, params))
        }
    }
}

fn grow_all<D>(source: &D, params: &ForestParams) -> Result<Vec<Tree>, GrowError>
where
    D: FeatureSource + Sync + ?Sized,
{
    (0..params.n_trees)
        .into_par_iter()
        .map(|i| grow_one(source, params, i))
        .collect()
}

fn grow_one<D>(source: &D, params: &ForestParams, index: usize) -> Result<Tree, GrowError>
where
    D: FeatureSource + ?Sized,
{
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(params.seed.wrapping_add(index as u64));
    let sampled = bootstrap_indices(source.n_samples(), params.bootstrap, &mut rng);

    let mut grower = TreeGrower::with_rng(params.tree.clone(), rng)?;
    grower.set_logger(TrainingLogger::with_prefix(
        params.tree.verbosity,
        format!("tree {index}"),
    ));
    // Source and indices were checked once for the whole forest.
    grower.grow_validated(source, Some(&sampled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::data::{Dataset, FeatureColumn, FeatureKind};
    use crate::training::params::{Bootstrap, ParamsError, TreeParams};
    use crate::Float;

    /// Counts response reads.
    struct Counting {
        inner: Dataset,
        responses: AtomicUsize,
    }

    impl FeatureSource for Counting {
        fn n_samples(&self) -> usize {
            self.inner.n_samples()
        }

        fn n_features(&self) -> usize {
            self.inner.n_features()
        }

        fn feature_kind(&self, feature: usize) -> FeatureKind {
            self.inner.feature_kind(feature)
        }

        fn feature(&self, feature: usize, sample: usize) -> Float {
            self.inner.feature(feature, sample)
        }

        fn response(&self, sample: usize) -> Float {
            self.responses.fetch_add(1, Ordering::Relaxed);
            self.inner.response(sample)
        }
    }

    fn dataset() -> Dataset {
        let x: Vec<Float> = (0..40).map(|i| i as Float * 0.25).collect();
        let y = x.iter().map(|v| (v * 1.7).sin() * 3.0).collect();
        let c = (0..40).map(|i| (i % 5) as u32).collect();
        Dataset::new(
            vec![FeatureColumn::numeric(x), FeatureColumn::categorical(c, 5)],
            y,
        )
        .unwrap()
    }

    #[test]
    fn same_seed_same_forest_across_thread_counts() {
        let ds = dataset();
        let base = ForestParams {
            n_trees: 6,
            seed: 9,
            n_threads: 1,
            ..Default::default()
        };
        let sequential = grow_forest(&ds, &base).unwrap();
        let pooled = grow_forest(&ds, &ForestParams { n_threads: 3, ..base.clone() }).unwrap();
        let global = grow_forest(&ds, &ForestParams { n_threads: 0, ..base }).unwrap();

        assert_eq!(sequential.len(), 6);
        assert_eq!(sequential, pooled);
        assert_eq!(sequential, global);
    }

    #[test]
    fn tree_matches_standalone_grower() {
        let ds = dataset();
        let params = ForestParams {
            n_trees: 2,
            seed: 100,
            bootstrap: Bootstrap::None,
            n_threads: 1,
            ..Default::default()
        };
        let forest = grow_forest(&ds, &params).unwrap();
        let second = TreeGrower::new(params.tree.clone(), 101)
            .unwrap()
            .grow(&ds)
            .unwrap();
        assert_eq!(forest[1], second);
    }

    #[test]
    fn source_is_validated_once_per_forest() {
        let source = Counting {
            inner: dataset(),
            responses: AtomicUsize::new(0),
        };
        let n = source.n_samples();
        // Root-only trees read each response once, when the leaf is built.
        let params = ForestParams {
            n_trees: 3,
            tree: TreeParams {
                max_depth: 0,
                ..Default::default()
            },
            bootstrap: Bootstrap::None,
            n_threads: 1,
            ..Default::default()
        };
        let forest = grow_forest(&source, &params).unwrap();
        assert_eq!(forest.len(), 3);
        assert_eq!(source.responses.load(Ordering::Relaxed), n + 3 * n);
    }

    #[test]
    fn rejects_invalid_params() {
        let ds = dataset();
        let params = ForestParams {
            n_trees: 0,
            ..Default::default()
        };
        assert_eq!(
            grow_forest(&ds, &params).unwrap_err(),
            GrowError::Params(ParamsError::NoTrees)
        );
    }
}
