//! The shared visibility cache.
//!
//! A [`VisibilityCache`] holds the most recently derived [`VisibilityGrid`]
//! together with a validity flag and a generation counter, all behind one
//! mutex. Readers check validity under the lock; when the grid is invalid
//! they drop the lock, run the (slow) recompute, and take the lock again only
//! to install the result. Writers call [`VisibilityCache::invalidate`], which
//! never recomputes.
//!
//! The generation counter makes each installed grid a versioned snapshot:
//! `invalidate` bumps it, and an install is only accepted if the generation
//! still matches the one seen when its recompute started. A recompute that
//! raced an invalidation is discarded instead of resurrecting stale data.

use crate::config::CacheConfig;
use crate::error::{NotReady, VisibilityError};
use crate::grid::VisibilityGrid;
use coord_2d::Coord;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace, warn};

/// Derives a fresh grid from the current state of a domain `D`.
///
/// Implementations must be total: every call eventually returns either a
/// grid or [`NotReady`]. They may run concurrently with each other and with
/// mutations of `D`; making that safe is the domain's business.
pub trait Recompute<D: ?Sized> {
    fn recompute(&self, domain: &D) -> Result<VisibilityGrid, NotReady>;
}

impl<D, F> Recompute<D> for F
where
    D: ?Sized,
    F: Fn(&D) -> Result<VisibilityGrid, NotReady>,
{
    fn recompute(&self, domain: &D) -> Result<VisibilityGrid, NotReady> {
        self(domain)
    }
}

#[derive(Debug, Default)]
struct CacheState {
    /// May hold a stale grid while `valid` is false. Never handed out then.
    grid: Option<Arc<VisibilityGrid>>,
    valid: bool,
    generation: u64,
}

enum Lookup {
    Valid(Arc<VisibilityGrid>),
    Invalid { generation: u64 },
}

pub struct VisibilityCache<R> {
    recompute: R,
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl<R: Default> Default for VisibilityCache<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R> fmt::Debug for VisibilityCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("VisibilityCache")
            .field("config", &self.config)
            .field("valid", &state.valid)
            .field("generation", &state.generation)
            .field("size", &state.grid.as_ref().map(|grid| grid.size()))
            .finish()
    }
}

impl<R> VisibilityCache<R> {
    /// An empty, invalid cache. Nothing is computed until the first query.
    pub fn new(recompute: R) -> Self {
        Self::with_config(recompute, CacheConfig::default())
    }

    pub fn with_config(recompute: R, config: CacheConfig) -> Self {
        Self {
            recompute,
            config,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // Only plain field stores happen under the lock, so a poisoned guard
    // still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self) -> Lookup {
        let state = self.lock();
        match (&state.grid, state.valid) {
            (Some(grid), true) => Lookup::Valid(Arc::clone(grid)),
            _ => Lookup::Invalid {
                generation: state.generation,
            },
        }
    }

    /// Installs `grid` if no invalidation happened since `started` was read.
    /// Returns whether the grid was accepted.
    fn install(&self, grid: Arc<VisibilityGrid>, started: u64) -> bool {
        let mut state = self.lock();
        if state.generation != started {
            trace!(
                started,
                current = state.generation,
                "discarding grid computed before an invalidation"
            );
            return false;
        }
        state.grid = Some(grid);
        state.valid = true;
        true
    }

    /// Marks the cached grid as untrustworthy. Cheap: takes the lock, flips
    /// the flag, and returns. Idempotent.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.valid = false;
        state.generation = state.generation.wrapping_add(1);
        trace!(generation = state.generation, "visibility invalidated");
    }

    pub fn is_valid(&self) -> bool {
        let state = self.lock();
        state.valid && state.grid.is_some()
    }

    /// The installed grid, if it is currently valid.
    pub fn snapshot(&self) -> Option<Arc<VisibilityGrid>> {
        match self.lookup() {
            Lookup::Valid(grid) => Some(grid),
            Lookup::Invalid { .. } => None,
        }
    }

    /// Starts a batch of visibility-affecting changes. The cache is
    /// invalidated once, when the returned guard is dropped.
    pub fn begin_change(&self) -> VisibilityChange<'_, R> {
        VisibilityChange { cache: self }
    }

    fn run_recompute<D: ?Sized>(&self, domain: &D, started: u64) -> Result<VisibilityGrid, NotReady>
    where
        R: Recompute<D>,
    {
        debug!(generation = started, "recomputing visibility grid");
        match self.recompute.recompute(domain) {
            Ok(grid) => {
                let size = grid.size();
                debug!(
                    generation = started,
                    width = size.width(),
                    height = size.height(),
                    "visibility grid recomputed"
                );
                Ok(grid)
            }
            Err(reason) => {
                debug!(%reason, "visibility not ready");
                Err(reason)
            }
        }
    }

    /// Returns a grid no older than the last invalidation that completed
    /// before this call, recomputing as needed.
    ///
    /// Each round either finds a valid grid or recomputes and re-checks; the
    /// freshly computed grid is not trusted until a later check sees it valid.
    /// After `max_recompute_attempts` rounds the last grid this call computed
    /// is returned: it started after the call did, so it is still fresh.
    fn current_grid<D: ?Sized>(&self, domain: &D) -> Result<Arc<VisibilityGrid>, NotReady>
    where
        R: Recompute<D>,
    {
        let limit = self.config.attempt_limit();
        let mut attempts = 0;
        let mut computed: Option<Arc<VisibilityGrid>> = None;
        loop {
            let started = match self.lookup() {
                Lookup::Valid(grid) => return Ok(grid),
                Lookup::Invalid { generation } => generation,
            };
            if attempts >= limit {
                if let Some(grid) = computed.take() {
                    warn!(
                        attempts,
                        "visibility kept being invalidated during recompute; using latest computed grid"
                    );
                    return Ok(grid);
                }
            }
            let grid = Arc::new(self.run_recompute(domain, started)?);
            attempts += 1;
            self.install(Arc::clone(&grid), started);
            computed = Some(grid);
        }
    }

    /// Eagerly recomputes a grid, whether or not the current one is valid,
    /// and returns it. The grid is only installed if no invalidation landed
    /// while it was being computed; otherwise it is discarded and the cache
    /// stays invalid.
    pub fn reset<D: ?Sized>(&self, domain: &D) -> Result<Arc<VisibilityGrid>, NotReady>
    where
        R: Recompute<D>,
    {
        let started = self.lock().generation;
        let grid = Arc::new(self.run_recompute(domain, started)?);
        self.install(Arc::clone(&grid), started);
        Ok(grid)
    }

    /// Like [`query`](Self::query) but reports why the answer is not
    /// available.
    pub fn try_query<D: ?Sized>(&self, domain: &D, coord: Coord) -> Result<bool, VisibilityError>
    where
        R: Recompute<D>,
    {
        let grid = self.current_grid(domain)?;
        grid.get(coord).ok_or(VisibilityError::OutOfBounds {
            coord,
            size: grid.size(),
        })
    }

    /// Can `tile` currently be seen? A missing tile and a domain that is not
    /// ready answer `false`.
    ///
    /// A coordinate off the grid is a caller bug: it panics in debug builds
    /// and answers `false` in release builds.
    pub fn query<D: ?Sized>(&self, domain: &D, tile: impl Into<Option<Coord>>) -> bool
    where
        R: Recompute<D>,
    {
        let coord = match tile.into() {
            Some(coord) => coord,
            None => return false,
        };
        match self.try_query(domain, coord) {
            Ok(visible) => {
                trace!(?coord, visible, "visibility query");
                visible
            }
            Err(VisibilityError::NotReady(_)) => false,
            Err(error @ VisibilityError::OutOfBounds { .. }) => {
                debug_assert!(false, "{}", error);
                warn!(%error, "visibility query outside the map");
                false
            }
        }
    }
}

/// Scope of a batch of visibility-affecting changes. Invalidates its cache
/// when dropped.
#[must_use = "the cache is invalidated as soon as the change is dropped"]
pub struct VisibilityChange<'a, R> {
    cache: &'a VisibilityCache<R>,
}

impl<'a, R> VisibilityChange<'a, R> {
    /// Ends the change now instead of at the end of the scope.
    pub fn finish(self) {}
}

impl<'a, R> Drop for VisibilityChange<'a, R> {
    fn drop(&mut self) {
        self.cache.invalidate();
    }
}
