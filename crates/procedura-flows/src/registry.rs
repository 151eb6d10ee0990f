//! Named flows with optional guards, evaluated in registration order.
//!
//! Guards are not required to be mutually exclusive. [`FlowRegistry::decide`]
//! returns the first registered flow whose guard holds, so registration order
//! is the tie-break. Flows without a guard are never selected by a guard
//! scan; they run only by name or as the default.

use std::future::Future;
use std::sync::Arc;

use procedura_core::accumulator::ResultAccumulator;
use procedura_core::gateway::BoxFuture;
use tracing::{error, info, warn};

use crate::error::FlowError;

pub type Guard = Arc<dyn Fn(&ResultAccumulator) -> Result<bool, FlowError> + Send + Sync>;
pub type Action<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<O, FlowError>> + Send + Sync>;

struct Registration<I, O> {
    name: String,
    guard: Option<Guard>,
    action: Action<I, O>,
}

pub struct FlowRegistry<I, O> {
    flows: Vec<Registration<I, O>>,
}

impl<I, O> Default for FlowRegistry<I, O> {
    fn default() -> Self {
        Self { flows: Vec::new() }
    }
}

impl<I, O> FlowRegistry<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flow that runs only by name or as the default.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, FlowError>> + Send + 'static,
    {
        self.insert(name.into(), None, boxed(action))
    }

    /// Register a flow selected when `guard` holds for the accumulator.
    pub fn register_guarded<G, F, Fut>(
        &mut self,
        name: impl Into<String>,
        guard: G,
        action: F,
    ) -> &mut Self
    where
        G: Fn(&ResultAccumulator) -> Result<bool, FlowError> + Send + Sync + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, FlowError>> + Send + 'static,
    {
        self.insert(name.into(), Some(Arc::new(guard)), boxed(action))
    }

    /// Re-registering a name replaces the flow in place, keeping its
    /// original position in the scan order.
    fn insert(&mut self, name: String, guard: Option<Guard>, action: Action<I, O>) -> &mut Self {
        if let Some(existing) = self.flows.iter_mut().find(|r| r.name == name) {
            warn!(flow = %name, "flow already registered, replacing");
            existing.guard = guard;
            existing.action = action;
        } else {
            info!(flow = %name, guarded = guard.is_some(), "flow registered");
            self.flows.push(Registration {
                name,
                guard,
                action,
            });
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flows.iter().any(|r| r.name == name)
    }

    /// Registered names in scan order.
    pub fn names(&self) -> Vec<&str> {
        self.flows.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Name of the first guarded flow whose guard holds, else `default` if
    /// it is registered, else `None`.
    ///
    /// A guard that errors is logged and treated as not satisfied.
    pub fn decide<'a>(
        &'a self,
        results: &ResultAccumulator,
        default: Option<&'a str>,
    ) -> Option<&'a str> {
        for registration in &self.flows {
            let Some(guard) = &registration.guard else {
                continue;
            };
            match guard(results) {
                Ok(true) => {
                    info!(flow = %registration.name, "guard satisfied");
                    return Some(registration.name.as_str());
                }
                Ok(false) => {}
                Err(e) => {
                    error!(flow = %registration.name, error = %e, "guard evaluation failed");
                }
            }
        }

        match default {
            Some(name) if self.contains(name) => {
                info!(flow = name, "no guard satisfied, using default flow");
                Some(name)
            }
            _ => {
                warn!("no flow selected");
                None
            }
        }
    }

    /// Run a flow by name.
    ///
    /// `None` means the flow is unknown or failed, never "succeeded with
    /// nothing". Failures are logged here.
    pub async fn execute(&self, name: &str, input: I) -> Option<O> {
        let Some(registration) = self.flows.iter().find(|r| r.name == name) else {
            error!(flow = name, "{}", FlowError::UnknownFlow(name.to_string()));
            return None;
        };

        info!(flow = name, "executing flow");
        let action = Arc::clone(&registration.action);
        match action(input).await {
            Ok(output) => Some(output),
            Err(e) => {
                error!(flow = name, error = %e, "flow failed");
                None
            }
        }
    }

    pub async fn decide_and_execute(
        &self,
        results: &ResultAccumulator,
        default: Option<&str>,
        input: I,
    ) -> Option<O> {
        let name = self.decide(results, default)?.to_string();
        self.execute(&name, input).await
    }
}

fn boxed<I, O, F, Fut>(action: F) -> Action<I, O>
where
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, FlowError>> + Send + 'static,
{
    Arc::new(move |input| Box::pin(action(input)) as BoxFuture<'static, Result<O, FlowError>>)
}
