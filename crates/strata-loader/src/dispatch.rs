use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use strata_convert::{ConvertResult, ConverterRegistry, WrappedResult};
use strata_store::Resolver;
use strata_types::GraphNode;
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use crate::yielding::CooperativeYield;

/// Receives every converted object, in completion order.
pub type OnConverted = Arc<dyn Fn(WrappedResult) + Send + Sync>;

/// A boxed traversal of one subtree.
pub type Traversal = Pin<Box<dyn Future<Output = TraversalReport> + Send + 'static>>;

/// Outcome counts of a traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalReport {
    /// Objects converted and delivered.
    pub converted: usize,
    /// Branches abandoned because of an error.
    pub failed: usize,
}

impl TraversalReport {
    fn absorb(&mut self, other: TraversalReport) {
        self.converted += other.converted;
        self.failed += other.failed;
    }
}

/// Walks an object graph, converting recognized objects and recursing into
/// everything else.
///
/// Each node is handled as follows:
///
/// 1. primitives are leaves;
/// 2. references are resolved through the session resolver first;
/// 3. arrays fan out into their elements;
/// 4. objects whose type tag has a registered converter are converted, and
///    the traversal does not descend into them;
/// 5. other objects fan out into their field values.
///
/// Children of a node run as sibling tasks and are joined before the node
/// completes. A failure ends only the branch it occurs in.
#[derive(Clone)]
pub struct Dispatcher {
    resolver: Resolver,
    registry: Arc<ConverterRegistry>,
    yielder: CooperativeYield,
}

impl Dispatcher {
    pub fn new(resolver: Resolver, registry: Arc<ConverterRegistry>, yielder: CooperativeYield) -> Self {
        Self {
            resolver,
            registry,
            yielder,
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Traverse the subtree rooted at `node`. The returned future owns
    /// everything it needs and can be spawned.
    pub fn traverse(&self, node: GraphNode, on_converted: OnConverted) -> Traversal {
        let this = self.clone();
        Box::pin(async move {
            match this.visit(node, &on_converted).await {
                Ok(report) => report,
                Err(e) => {
                    warn!(error = %e, "traversal branch failed");
                    TraversalReport {
                        converted: 0,
                        failed: 1,
                    }
                }
            }
        })
    }

    async fn visit(&self, node: GraphNode, on_converted: &OnConverted) -> ConvertResult<TraversalReport> {
        let node = self.resolver.resolve(node).await?;
        match node {
            GraphNode::Primitive(_) => Ok(TraversalReport::default()),
            GraphNode::Reference(id) => {
                // A stored object that is itself a bare reference stub.
                debug!(%id, "reference resolved to another reference; skipping");
                Ok(TraversalReport::default())
            }
            GraphNode::Array(items) => {
                Ok(self.fan_out(items.into_iter().map(GraphNode::decode), on_converted).await)
            }
            GraphNode::Object(object) => match self.registry.get(object.type_tag()) {
                Some(converter) => {
                    self.yielder.maybe_yield().await;
                    trace!(id = ?object.id(), type_tag = object.type_tag(), "converting");
                    match converter.convert(object, &self.resolver).await? {
                        Some(result) => {
                            on_converted(result);
                            Ok(TraversalReport {
                                converted: 1,
                                failed: 0,
                            })
                        }
                        None => Ok(TraversalReport::default()),
                    }
                }
                None => {
                    let children = object.into_fields().into_iter().map(|(_, v)| GraphNode::decode(v));
                    Ok(self.fan_out(children, on_converted).await)
                }
            },
        }
    }

    async fn fan_out(
        &self,
        children: impl Iterator<Item = GraphNode>,
        on_converted: &OnConverted,
    ) -> TraversalReport {
        let mut tasks = JoinSet::new();
        for child in children {
            if matches!(child, GraphNode::Primitive(_)) {
                continue;
            }
            tasks.spawn(self.traverse(child, on_converted.clone()));
        }

        let mut report = TraversalReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(child) => report.absorb(child),
                Err(e) => {
                    warn!(error = %e, "traversal task aborted");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("converters", &self.registry.tags())
            .finish_non_exhaustive()
    }
}
