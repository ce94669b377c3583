use std::sync::Arc;

use serde::Serialize;
use strata_convert::{ConverterRegistry, WrappedResult};
use strata_store::{FragmentCache, Resolver, StoreConnector};
use strata_types::{GraphNode, ObjectId};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::resolve_token;
use crate::config::LoaderConfig;
use crate::dispatch::{Dispatcher, OnConverted, TraversalReport};
use crate::error::{LoaderError, LoaderResult};
use crate::events::{publish, EventStream, LoaderEvent};
use crate::scene::{SceneManager, SceneObject};
use crate::url::ObjectUrl;
use crate::yielding::CooperativeYield;

/// Fraction of a root's fragments received so far.
///
/// The total comes from the first fragment; the root itself counts as one
/// more, so the fraction reaches exactly 1 once every fragment has arrived.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressState {
    seen: u64,
    total: Option<u64>,
}

impl ProgressState {
    /// Record one more fragment and return the new fraction.
    pub fn observe(&mut self, total_hint: Option<u64>) -> f64 {
        if self.total.is_none() {
            self.total = Some(total_hint.unwrap_or(0));
        }
        self.seen += 1;
        self.fraction()
    }

    pub fn fraction(&self) -> f64 {
        match self.total {
            Some(total) => (self.seen as f64 / (total + 1) as f64).min(1.0),
            None => 0.0,
        }
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Declared number of fragments after the root, once known.
    pub fn total(&self) -> Option<u64> {
        self.total
    }
}

/// What a completed load did.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoadSummary {
    pub url: String,
    pub fragments: u64,
    /// Declared fragment count after the root.
    pub total: u64,
    pub converted: usize,
    pub failed: usize,
}

/// One load of the object graph behind an object URL.
///
/// Construction only parses the URL; nothing is fetched until [`load`].
///
/// [`load`]: LoadSession::load
pub struct LoadSession {
    url: ObjectUrl,
    source_url: String,
    token: Option<String>,
    config: LoaderConfig,
    connector: Arc<dyn StoreConnector>,
    scene: Arc<dyn SceneManager>,
    registry: Arc<ConverterRegistry>,
    events: broadcast::Sender<LoaderEvent>,
}

impl LoadSession {
    /// Prepare a session for `url`. Fails immediately if the URL does not
    /// name an object.
    ///
    /// An explicit `token` wins over the one persisted in the configured
    /// token file.
    pub fn new(
        url: &str,
        token: Option<String>,
        config: LoaderConfig,
        connector: Arc<dyn StoreConnector>,
        scene: Arc<dyn SceneManager>,
    ) -> LoaderResult<Self> {
        let parsed = ObjectUrl::parse(url)?;
        let token = resolve_token(token, config.token_file.as_deref());
        if token.is_none() {
            warn!(url, "no access token; reads of non-public objects will fail");
        }
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Ok(Self {
            url: parsed,
            source_url: url.to_string(),
            token,
            config,
            connector,
            scene,
            registry: Arc::new(ConverterRegistry::with_defaults()),
            events,
        })
    }

    /// Replace the built-in converters.
    pub fn with_registry(mut self, registry: ConverterRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn url(&self) -> &ObjectUrl {
        &self.url
    }

    pub fn object_id(&self) -> &ObjectId {
        &self.url.object_id
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Receive the events of subsequent loads.
    pub fn subscribe(&self) -> EventStream {
        self.events.subscribe()
    }

    /// Stream the root's fragments while traversing the graph from the root,
    /// delivering converted objects to the scene as they complete.
    ///
    /// Returns once every fragment has been received and the traversal has
    /// settled. Failures inside the traversal are logged and counted; only
    /// failures of the fragment stream itself abort the load.
    pub async fn load(&self) -> LoaderResult<LoadSummary> {
        info!(url = %self.source_url, "load started");
        let source = self.connector.connect(&self.url.target(), self.token.as_deref())?;

        let cache = FragmentCache::new();
        let yielder = CooperativeYield::from_config(&self.config);
        let dispatcher = Dispatcher::new(
            Resolver::with_cache(source.clone(), cache.clone()),
            self.registry.clone(),
            yielder.clone(),
        );
        let on_converted = self.delivery();

        let mut stream = source.fragments(&self.url.object_id).await?;
        let mut progress = ProgressState::default();
        let mut traversal: Option<JoinHandle<TraversalReport>> = None;

        loop {
            let fragment = match stream.next_fragment().await {
                Ok(Some(fragment)) => fragment,
                Ok(None) => break,
                Err(e) => {
                    // A failed load must not keep delivering into the scene.
                    if let Some(handle) = traversal.take() {
                        handle.abort();
                        let _ = handle.await;
                        warn!(url = %self.source_url, error = %e, "fragment stream failed; traversal aborted");
                    }
                    return Err(e.into());
                }
            };
            cache.insert(fragment.id.clone(), fragment.body.clone());
            if traversal.is_none() {
                debug!(id = %fragment.id, total = ?fragment.total_children, "root fragment received");
                let root = GraphNode::decode(fragment.body);
                traversal = Some(tokio::spawn(dispatcher.traverse(root, on_converted.clone())));
            }

            let fraction = progress.observe(fragment.total_children);
            debug!(id = %fragment.id, progress = fraction, "fragment received");
            publish(
                &self.events,
                LoaderEvent::Progress {
                    progress: fraction,
                    id: self.source_url.clone(),
                },
            );
            yielder.maybe_yield().await;
        }

        let Some(traversal) = traversal else {
            return Err(LoaderError::EmptyStream(self.url.object_id.clone()));
        };
        let report = traversal
            .await
            .map_err(|e| LoaderError::TaskFailed(e.to_string()))?;

        self.scene.set_filtered_view();

        if report.converted == 0 {
            let message = format!("no displayable objects found in object {}", self.url.object_id);
            warn!(url = %self.source_url, "{message}");
            publish(&self.events, LoaderEvent::Warning { message });
        }

        let summary = LoadSummary {
            url: self.source_url.clone(),
            fragments: progress.seen(),
            total: progress.total().unwrap_or(0),
            converted: report.converted,
            failed: report.failed,
        };
        info!(
            url = %summary.url,
            fragments = summary.fragments,
            converted = summary.converted,
            failed = summary.failed,
            "load finished"
        );
        Ok(summary)
    }

    /// Remove everything this session's URL contributed to the scene.
    pub fn unload(&self) {
        info!(url = %self.source_url, "unloading");
        self.scene.remove_imported_object(&self.source_url);
    }

    fn delivery(&self) -> OnConverted {
        let scene = self.scene.clone();
        let source_url = self.source_url.clone();
        Arc::new(move |result: WrappedResult| {
            scene.add_object(SceneObject {
                source_url: source_url.clone(),
                result,
            })
        })
    }
}

impl std::fmt::Debug for LoadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadSession")
            .field("url", &self.source_url)
            .field("has_token", &self.has_token())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
