use super::*;

// ── AggregateFunction ─────────────────────────────────────────────────────────

/// Incremental aggregation function.
///
/// The aggregator keeps one accumulator per `(key, window)` and replaces it
/// with the result of [`add`](Self::add) for every element. `add` only reads
/// the current accumulator, so a failing fold leaves it untouched.
pub trait AggregateFunction<IN, ACC>: Send {
    /// Create a fresh accumulator for a new window.
    fn create_accumulator(&self) -> ACC;

    /// Fold one element into the accumulator, returning the replacement.
    fn add(&self, acc: &ACC, element: &IN) -> Result<ACC, FoldError>;
}

// ── Closure adapters ──────────────────────────────────────────────────────────

/// [`AggregateFunction`] built from a zero factory and an infallible fold.
#[derive(Clone)]
pub struct FnAggregate<Z, F> {
    zero_fn: Z,
    fold_fn: F,
}

impl<Z, F> FnAggregate<Z, F> {
    pub fn new(zero_fn: Z, fold_fn: F) -> Self {
        Self { zero_fn, fold_fn }
    }
}

impl<IN, ACC, Z, F> AggregateFunction<IN, ACC> for FnAggregate<Z, F>
where
    Z: Fn() -> ACC + Send,
    F: Fn(&ACC, &IN) -> ACC + Send,
{
    fn create_accumulator(&self) -> ACC {
        (self.zero_fn)()
    }

    fn add(&self, acc: &ACC, element: &IN) -> Result<ACC, FoldError> {
        Ok((self.fold_fn)(acc, element))
    }
}

/// [`AggregateFunction`] built from a zero factory and a fold that may reject
/// an element.
#[derive(Clone)]
pub struct TryFnAggregate<Z, F> {
    zero_fn: Z,
    fold_fn: F,
}

impl<Z, F> TryFnAggregate<Z, F> {
    pub fn new(zero_fn: Z, fold_fn: F) -> Self {
        Self { zero_fn, fold_fn }
    }
}

impl<IN, ACC, Z, F> AggregateFunction<IN, ACC> for TryFnAggregate<Z, F>
where
    Z: Fn() -> ACC + Send,
    F: Fn(&ACC, &IN) -> Result<ACC, FoldError> + Send,
{
    fn create_accumulator(&self) -> ACC {
        (self.zero_fn)()
    }

    fn add(&self, acc: &ACC, element: &IN) -> Result<ACC, FoldError> {
        (self.fold_fn)(acc, element)
    }
}
