// ── Context loader ──
//
// Owns the installed application state. Every load gets a generation
// number; a load that is overtaken by a newer one is cancelled and its
// result dropped, so only the latest request ever reaches subscribers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::{ArcSwap, ArcSwapOption};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use geoclient_api::ApplicationContext;

use crate::error::CoreError;
use crate::model::AppState;
use crate::resolver::LayerResolver;
use crate::state::StateBuilder;

/// Result of a [`ContextLoader::load`] call.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The state is now current.
    Installed(Arc<AppState>),
    /// A newer load was requested before this one finished.
    Superseded,
}

impl LoadOutcome {
    pub fn installed(&self) -> Option<&Arc<AppState>> {
        match self {
            Self::Installed(state) => Some(state),
            Self::Superseded => None,
        }
    }
}

struct Installed {
    generation: u64,
    state: Arc<AppState>,
}

pub struct ContextLoader<R> {
    builder: StateBuilder<R>,
    generation: AtomicU64,
    in_flight: ArcSwap<CancellationToken>,
    installed: ArcSwapOption<Installed>,
    state_tx: watch::Sender<Option<Arc<AppState>>>,
}

impl<R: LayerResolver> ContextLoader<R> {
    pub fn new(builder: StateBuilder<R>) -> Self {
        let (state_tx, _) = watch::channel(None);
        Self {
            builder,
            generation: AtomicU64::new(0),
            in_flight: ArcSwap::from_pointee(CancellationToken::new()),
            installed: ArcSwapOption::empty(),
            state_tx,
        }
    }

    pub fn builder(&self) -> &StateBuilder<R> {
        &self.builder
    }

    /// The installed state, if any load has completed.
    pub fn current(&self) -> Option<Arc<AppState>> {
        self.installed
            .load_full()
            .map(|installed| Arc::clone(&installed.state))
    }

    /// Watch installed states as they change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<AppState>>> {
        self.state_tx.subscribe()
    }

    /// Cancel the in-flight load, if any.
    pub fn cancel(&self) {
        self.in_flight.load().cancel();
    }

    /// Build a state for `context` and install it unless a newer load
    /// overtakes this one. Failures leave the installed state untouched.
    pub async fn load(
        &self,
        context: impl Into<Arc<ApplicationContext>>,
    ) -> Result<LoadOutcome, CoreError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        self.in_flight.swap(Arc::new(token.clone())).cancel();
        debug!(generation, "loading application context");

        let built = tokio::select! {
            () = token.cancelled() => {
                debug!(generation, "load cancelled");
                return Ok(LoadOutcome::Superseded);
            }
            result = self.builder.build_state(context) => result,
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "load finished after a newer request, discarding");
            return Ok(LoadOutcome::Superseded);
        }

        let state = Arc::new(built?);
        if !self.install(generation, &state) {
            return Ok(LoadOutcome::Superseded);
        }

        info!(
            generation,
            app = %state.app_info.name,
            layers = state.map_layers.leaf_count(),
            "application state installed"
        );
        Ok(LoadOutcome::Installed(state))
    }

    fn installed_generation(&self) -> Option<u64> {
        self.installed.load_full().map(|installed| installed.generation)
    }

    /// Swap in `state` unless a newer generation is already installed.
    fn install(&self, generation: u64, state: &Arc<AppState>) -> bool {
        let entry = Arc::new(Installed {
            generation,
            state: Arc::clone(state),
        });
        let previous = self.installed.rcu(|current| match current {
            Some(newer) if newer.generation > generation => Some(Arc::clone(newer)),
            _ => Some(Arc::clone(&entry)),
        });
        if previous.is_some_and(|p| p.generation > generation) {
            return false;
        }

        self.state_tx.send_if_modified(|slot| {
            let latest = self.installed_generation() == Some(generation);
            if latest {
                *slot = Some(Arc::clone(state));
            }
            latest
        });
        true
    }
}
