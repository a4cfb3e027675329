// ── Map session ──
//
// Entry point for consumers. Wires the configured backend flavour into
// a context source, a layer registry and a loader, and exposes the
// installed state plus the toolbar derived from it.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use geoclient_api::{ApplicationContext, BackendClient, read_layers_file, read_messages_file};

use crate::config::{AppMode, ClientConfig, PrintConfig};
use crate::error::CoreError;
use crate::layer::LayerFactory;
use crate::loader::{ContextLoader, LoadOutcome};
use crate::model::AppState;
use crate::resolver::{RegistryResolver, StaticResolver};
use crate::source::ContextSource;
use crate::state::StateBuilder;
use crate::toolbar::{self, Catalog, MapToolContext, ToolBinding, Translate};
use crate::tree::TreeBuilder;

/// Cheaply cloneable handle to one map session.
#[derive(Clone)]
pub struct MapSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: ClientConfig,
    source: ContextSource,
    loader: ContextLoader<RegistryResolver>,
    print: PrintConfig,
}

impl MapSession {
    /// Create a session. Reads the static layer registry if one is configured.
    pub async fn new(config: ClientConfig) -> Result<Self, CoreError> {
        Self::with_factory(config, LayerFactory::new()).await
    }

    /// Create a session with a custom layer factory (e.g. a fixed clock).
    pub async fn with_factory(
        config: ClientConfig,
        factory: LayerFactory,
    ) -> Result<Self, CoreError> {
        let client = BackendClient::new(config.endpoints()?, &config.transport())?;

        let resolver = match config.mode {
            AppMode::Static => {
                let layers = match &config.static_layers {
                    Some(path) => read_layers_file(path).await?,
                    None => Vec::new(),
                };
                debug!(layers = layers.len(), "using static layer registry");
                RegistryResolver::Static(StaticResolver::from_descriptors(layers))
            }
            AppMode::Boot | AppMode::Shogun2 => RegistryResolver::Remote(client.clone()),
        };

        let source = match &config.static_context {
            Some(path) => ContextSource::File(path.clone()),
            None => ContextSource::Remote(client),
        };

        let tree = TreeBuilder::new(resolver, factory).with_siblings(config.siblings);
        let builder =
            StateBuilder::new(tree, config.baseline.clone()).with_unit(config.projection_unit);
        let print = config.print_config()?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                source,
                loader: ContextLoader::new(builder),
                print,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn print_config(&self) -> &PrintConfig {
        &self.inner.print
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Fetch the context for `app_id` and load it.
    pub async fn load(&self, app_id: &str) -> Result<LoadOutcome, CoreError> {
        let context = self.inner.source.fetch(app_id).await?;
        self.load_context(context).await
    }

    /// Load an already fetched context document.
    pub async fn load_context(
        &self,
        context: impl Into<Arc<ApplicationContext>>,
    ) -> Result<LoadOutcome, CoreError> {
        self.inner.loader.load(context).await
    }

    /// The installed state, if any.
    pub fn state(&self) -> Option<Arc<AppState>> {
        self.inner.loader.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<AppState>>> {
        self.inner.loader.subscribe()
    }

    // ── Toolbar ──────────────────────────────────────────────────

    /// Toolbar for the installed state.
    pub fn toolbar(
        &self,
        translate: &dyn Translate,
        mobile: bool,
    ) -> Result<Vec<ToolBinding>, CoreError> {
        let state = self.require_state()?;
        let map = MapToolContext::from_state(&state, mobile);
        Ok(toolbar::build_toolbar(
            &state.active_modules,
            &map,
            translate,
            Some(&self.inner.print),
        ))
    }

    pub fn measure_tools_enabled(&self) -> Result<bool, CoreError> {
        let state = self.require_state()?;
        Ok(toolbar::measure_tools_enabled(&state.active_modules))
    }

    // ── Messages ─────────────────────────────────────────────────

    /// Load the message catalog for `language`.
    ///
    /// Catalogs live next to the context document: beside the local file
    /// for file sources, under the base URL otherwise. A missing catalog
    /// yields an empty one, so keys translate to themselves.
    pub async fn catalog(&self, language: &str) -> Result<Catalog, CoreError> {
        let document = match &self.inner.source {
            ContextSource::File(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new("."));
                let file = dir.join(self.inner.config.locale_for(language));
                match read_messages_file(&file).await {
                    Ok(document) => Some(document),
                    Err(geoclient_api::Error::Io(e))
                        if e.kind() == std::io::ErrorKind::NotFound =>
                    {
                        None
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            ContextSource::Remote(client) => {
                let url = self.inner.config.locale_url(language)?;
                client.fetch_messages(url).await?
            }
        };

        let Some(document) = document else {
            warn!(language, "no message catalog, falling back to message keys");
            return Ok(Catalog::default());
        };
        let catalog = Catalog::from_json(&document);
        debug!(language, messages = catalog.len(), "message catalog loaded");
        Ok(catalog)
    }

    fn require_state(&self) -> Result<Arc<AppState>, CoreError> {
        self.state().ok_or_else(|| CoreError::ContextUnavailable {
            message: "no application context loaded".into(),
        })
    }
}
