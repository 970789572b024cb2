//! Service layer owning registered services and their live connections.

use super::events::EventBus;
use crate::service_registry::{
    domain::{
        ConnectionId, CredentialSet, LifecycleEvent, PersistedRegistryState, ServiceConfig,
        ServiceDescriptor, ServiceDomainError, ServiceId, ServiceKind, ServiceName,
        ServiceStatus, ToolCallError, ToolDefinition,
    },
    ports::{Connector, ConnectorFactories, CredentialSource, ServiceStateStore},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Request payload for registering a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterServiceRequest {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Service family.
    pub kind: ServiceKind,
    /// Initial configuration.
    pub config: ServiceConfig,
}

impl RegisterServiceRequest {
    /// Creates a request with an empty configuration.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ServiceKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            config: ServiceConfig::new(),
        }
    }

    /// Sets the initial configuration.
    #[must_use]
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }
}

/// Result of a connect request. Connect never fails with an error; every
/// path resolves to one of these outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A live connection was established.
    Connected,
    /// A live connection already existed.
    AlreadyConnected,
    /// Credentials were not supplied; the service is disconnected.
    Declined,
    /// The connector rejected the credentials; the service is in error.
    Failed {
        /// Diagnostic recorded as the service's last error.
        message: String,
    },
    /// Another connect for the same service is in flight.
    Busy,
    /// No service has the requested identifier.
    UnknownService,
}

impl ConnectOutcome {
    /// Returns whether a live connection exists after the request.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected | Self::AlreadyConnected)
    }
}

/// Result of a disconnect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// The service moved to `disconnected`.
    Disconnected,
    /// The service was already disconnected; nothing changed.
    AlreadyDisconnected,
    /// A connect is in flight; retry once it settles.
    Busy,
    /// No service has the requested identifier.
    UnknownService,
}

/// Service counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryOverview {
    /// Registered services.
    pub total: usize,
    /// Services with a live connection.
    pub connected: usize,
    /// Services with a connect in flight.
    pub connecting: usize,
    /// Services without a connection.
    pub disconnected: usize,
    /// Services whose last connect failed.
    pub error: usize,
}

/// Service-level errors for registry operations.
#[derive(Debug, Error)]
pub enum ServiceRegistryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ServiceDomainError),
    /// No service has the given identifier.
    #[error("service {0} not found")]
    NotFound(ServiceId),
    /// The service has no live connection.
    #[error("service {0} is not connected")]
    NotConnected(ServiceId),
    /// A connect for the service is in flight.
    #[error("service {0} is connecting")]
    Busy(ServiceId),
    /// The connector rejected a tool call.
    #[error(transparent)]
    Tool(#[from] ToolCallError),
}

/// Result type for registry operations.
pub type ServiceRegistryResult<T> = Result<T, ServiceRegistryError>;

struct LiveConnection {
    connection_id: ConnectionId,
    connector: Arc<dyn Connector>,
    connected_at: DateTime<Utc>,
}

#[derive(Default)]
struct RegistryState {
    services: HashMap<ServiceId, ServiceDescriptor>,
    connections: HashMap<ServiceId, LiveConnection>,
    disconnecting: HashSet<ServiceId>,
}

/// Marks a service as tearing down its connection until dropped.
struct PendingDisconnect<'a> {
    state: &'a Mutex<RegistryState>,
    service_id: ServiceId,
}

impl Drop for PendingDisconnect<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .disconnecting
            .remove(&self.service_id);
    }
}

enum Settlement {
    Connected {
        connector: Arc<dyn Connector>,
        credentials: CredentialSet,
    },
    Failed(String),
    Declined,
}

/// Connection registry and lifecycle manager.
///
/// Owns every registered [`ServiceDescriptor`] and at most one live
/// connector per service. Every state change is persisted as a full snapshot
/// and announced on the event bus. Connect and disconnect never return
/// errors; failures become status transitions and log lines.
pub struct ServiceRegistry<S, C>
where
    S: ServiceStateStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    factories: Arc<ConnectorFactories>,
    clock: Arc<C>,
    state: Mutex<RegistryState>,
    persist_lock: tokio::sync::Mutex<()>,
    events: EventBus,
}

impl<S, C> ServiceRegistry<S, C>
where
    S: ServiceStateStore,
    C: Clock + Send + Sync,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new(store: Arc<S>, factories: Arc<ConnectorFactories>, clock: Arc<C>) -> Self {
        Self {
            store,
            factories,
            clock,
            state: Mutex::new(RegistryState::default()),
            persist_lock: tokio::sync::Mutex::new(()),
            events: EventBus::default(),
        }
    }

    /// Creates a registry seeded from the stored snapshot.
    ///
    /// A connect cannot survive a restart, so restored `connecting` services
    /// settle to `disconnected`. Load failures are logged and yield an empty
    /// registry.
    pub async fn open(store: Arc<S>, factories: Arc<ConnectorFactories>, clock: Arc<C>) -> Self {
        let restored = match store.load().await {
            Ok(snapshot) => snapshot.unwrap_or_default().servers,
            Err(err) => {
                warn!(error = %err, "failed to load registry state; starting empty");
                Vec::new()
            }
        };
        let registry = Self::new(store, factories, clock);
        {
            let mut state = registry.lock();
            for descriptor in restored {
                let settled = descriptor.restored();
                state.services.insert(settled.id().clone(), settled);
            }
            debug!(services = state.services.len(), "restored registry state");
        }
        registry
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> PersistedRegistryState {
        let mut servers: Vec<ServiceDescriptor> = self.lock().services.values().cloned().collect();
        servers.sort_by(|left, right| left.id().cmp(right.id()));
        PersistedRegistryState::from_servers(servers)
    }

    async fn persist(&self) {
        let _ordering = self.persist_lock.lock().await;
        let snapshot = self.snapshot();
        if let Err(err) = self.store.save(&snapshot).await {
            warn!(error = %err, "failed to persist registry state");
        }
    }

    fn pending_disconnect(&self, service_id: &ServiceId) -> PendingDisconnect<'_> {
        PendingDisconnect {
            state: &self.state,
            service_id: service_id.clone(),
        }
    }

    fn announce_status(&self, service_id: &ServiceId, status: ServiceStatus) {
        info!(service_id = %service_id, status = %status, "service status changed");
        self.events.publish(LifecycleEvent::StatusChanged {
            service_id: service_id.clone(),
            status,
        });
    }

    /// Subscribes to lifecycle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// Registers or overwrites a service.
    ///
    /// Overwriting a connected service drops its live connection.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::Domain`] when the id or name is invalid
    /// and [`ServiceRegistryError::Busy`] while a connect for the id is in
    /// flight.
    pub async fn register_service(
        &self,
        request: RegisterServiceRequest,
    ) -> ServiceRegistryResult<ServiceDescriptor> {
        let service_id = ServiceId::new(request.id)?;
        let name = ServiceName::new(request.name)?;
        let descriptor =
            ServiceDescriptor::new(service_id.clone(), name, request.kind, request.config);

        let dropped = {
            let mut state = self.lock();
            let connecting = state
                .services
                .get(&service_id)
                .is_some_and(|existing| existing.status() == ServiceStatus::Connecting);
            if connecting || state.disconnecting.contains(&service_id) {
                return Err(ServiceRegistryError::Busy(service_id));
            }
            state.services.insert(service_id.clone(), descriptor.clone());
            let removed = state.connections.remove(&service_id);
            if removed.is_some() {
                state.disconnecting.insert(service_id.clone());
            }
            removed
        };
        let _pending = dropped.as_ref().map(|_| self.pending_disconnect(&service_id));

        if let Some(live) = &dropped {
            live.connector.disconnect().await;
            info!(
                service_id = %service_id,
                connection_id = %live.connection_id,
                "dropped live connection of re-registered service"
            );
        }
        self.persist().await;
        info!(service_id = %service_id, kind = %descriptor.kind(), "service registered");
        self.events.publish(LifecycleEvent::Registered {
            service_id: service_id.clone(),
            kind: descriptor.kind(),
        });
        if dropped.is_some() {
            self.announce_status(&service_id, ServiceStatus::Disconnected);
        }
        Ok(descriptor)
    }

    /// Registers every request whose id is not registered yet, keeping
    /// restored configuration and status. Returns how many were added.
    ///
    /// # Errors
    ///
    /// Returns the first registration error.
    pub async fn bootstrap(
        &self,
        requests: impl IntoIterator<Item = RegisterServiceRequest>,
    ) -> ServiceRegistryResult<usize> {
        let mut added = 0;
        for request in requests {
            let known = ServiceId::new(request.id.as_str())
                .is_ok_and(|service_id| self.lock().services.contains_key(&service_id));
            if known {
                continue;
            }
            self.register_service(request).await?;
            added += 1;
        }
        Ok(added)
    }

    /// Connects a service with the supplied credentials.
    ///
    /// `None`, or credentials whose primary value is blank, count as a
    /// declined prompt and settle the service as `disconnected`.
    pub async fn connect(
        &self,
        service_id: &ServiceId,
        credentials: Option<CredentialSet>,
    ) -> ConnectOutcome {
        let descriptor = match self.begin_connect(service_id).await {
            Ok(descriptor) => descriptor,
            Err(outcome) => return outcome,
        };
        self.finish_connect(&descriptor, credentials).await
    }

    /// Connects a service, acquiring credentials from `source` after the
    /// service has entered `connecting`.
    pub async fn connect_with<A>(&self, service_id: &ServiceId, source: &A) -> ConnectOutcome
    where
        A: CredentialSource + ?Sized,
    {
        let descriptor = match self.begin_connect(service_id).await {
            Ok(descriptor) => descriptor,
            Err(outcome) => return outcome,
        };
        let credentials = source.acquire(&descriptor).await;
        self.finish_connect(&descriptor, credentials).await
    }

    async fn begin_connect(
        &self,
        service_id: &ServiceId,
    ) -> Result<ServiceDescriptor, ConnectOutcome> {
        let descriptor = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let Some(descriptor) = state.services.get_mut(service_id) else {
                warn!(service_id = %service_id, "connect requested for unknown service");
                return Err(ConnectOutcome::UnknownService);
            };
            if state.disconnecting.contains(service_id) {
                debug!(service_id = %service_id, "disconnect still in flight");
                return Err(ConnectOutcome::Busy);
            }
            match descriptor.status() {
                ServiceStatus::Connecting => {
                    debug!(service_id = %service_id, "connect already in flight");
                    return Err(ConnectOutcome::Busy);
                }
                ServiceStatus::Connected if state.connections.contains_key(service_id) => {
                    info!(service_id = %service_id, "service already connected");
                    return Err(ConnectOutcome::AlreadyConnected);
                }
                _ => {}
            }
            if let Err(err) = descriptor.begin_connecting() {
                error!(service_id = %service_id, error = %err, "cannot start connect");
                return Err(ConnectOutcome::Busy);
            }
            descriptor.clone()
        };

        self.persist().await;
        self.announce_status(service_id, ServiceStatus::Connecting);
        Ok(descriptor)
    }

    async fn finish_connect(
        &self,
        descriptor: &ServiceDescriptor,
        credentials: Option<CredentialSet>,
    ) -> ConnectOutcome {
        let service_id = descriptor.id();
        let kind = descriptor.kind();

        let Some(accepted) = credentials.filter(|supplied| !supplied.is_declined_for(kind)) else {
            info!(service_id = %service_id, "credential prompt declined");
            return self.settle(service_id, Settlement::Declined).await;
        };

        let Some(connector) = self.factories.build(descriptor) else {
            let message = format!("no connector available for {kind}");
            error!(service_id = %service_id, kind = %kind, "{message}");
            return self.settle(service_id, Settlement::Failed(message)).await;
        };

        match connector.connect(&accepted).await {
            Ok(()) => {
                self.settle(
                    service_id,
                    Settlement::Connected {
                        connector,
                        credentials: accepted,
                    },
                )
                .await
            }
            Err(err) => {
                connector.disconnect().await;
                warn!(service_id = %service_id, kind = %kind, error = %err, "connect failed");
                self.settle(service_id, Settlement::Failed(err.to_string()))
                    .await
            }
        }
    }

    async fn settle(&self, service_id: &ServiceId, settlement: Settlement) -> ConnectOutcome {
        let now = self.clock.utc();
        let (status, outcome, orphan) = {
            let mut guard = self.lock();
            apply_settlement(&mut guard, service_id, settlement, now)
        };

        if let Some(connector) = orphan {
            connector.disconnect().await;
        }
        if outcome == ConnectOutcome::UnknownService {
            warn!(service_id = %service_id, "service changed while connecting; attempt abandoned");
            return outcome;
        }
        self.persist().await;
        self.announce_status(service_id, status);
        outcome
    }

    /// Disconnects a service.
    ///
    /// Disconnecting a service that is already disconnected changes nothing:
    /// no event, no persistence write. Until the connector has shut down and
    /// the transition is announced, connects for the service return
    /// [`ConnectOutcome::Busy`].
    pub async fn disconnect(&self, service_id: &ServiceId) -> DisconnectOutcome {
        let live = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let Some(descriptor) = state.services.get_mut(service_id) else {
                warn!(service_id = %service_id, "disconnect requested for unknown service");
                return DisconnectOutcome::UnknownService;
            };
            match descriptor.status() {
                ServiceStatus::Disconnected => {
                    debug!(service_id = %service_id, "service already disconnected");
                    return DisconnectOutcome::AlreadyDisconnected;
                }
                ServiceStatus::Connecting => return DisconnectOutcome::Busy,
                ServiceStatus::Connected | ServiceStatus::Error => {}
            }
            if let Err(err) = descriptor.mark_disconnected() {
                error!(service_id = %service_id, error = %err, "cannot disconnect");
                return DisconnectOutcome::Busy;
            }
            state.disconnecting.insert(service_id.clone());
            state.connections.remove(service_id)
        };
        let _pending = self.pending_disconnect(service_id);

        if let Some(connection) = live {
            connection.connector.disconnect().await;
            debug!(
                service_id = %service_id,
                connection_id = %connection.connection_id,
                connected_for_secs = (self.clock.utc() - connection.connected_at).num_seconds(),
                "connection closed"
            );
        }
        self.persist().await;
        self.announce_status(service_id, ServiceStatus::Disconnected);
        DisconnectOutcome::Disconnected
    }

    /// Shallow-merges `partial` into a service's configuration. Returns
    /// `false` for unknown services.
    pub async fn update_config(&self, service_id: &ServiceId, partial: ServiceConfig) -> bool {
        {
            let mut state = self.lock();
            let Some(descriptor) = state.services.get_mut(service_id) else {
                warn!(service_id = %service_id, "config update for unknown service");
                return false;
            };
            descriptor.merge_config(partial);
        }
        self.persist().await;
        debug!(service_id = %service_id, "service configuration updated");
        self.events.publish(LifecycleEvent::ConfigUpdated {
            service_id: service_id.clone(),
        });
        true
    }

    /// Returns a service's status; unknown services report `disconnected`.
    #[must_use]
    pub fn status(&self, service_id: &ServiceId) -> ServiceStatus {
        self.lock()
            .services
            .get(service_id)
            .map_or(ServiceStatus::Disconnected, ServiceDescriptor::status)
    }

    /// Returns a snapshot of one service.
    #[must_use]
    pub fn service(&self, service_id: &ServiceId) -> Option<ServiceDescriptor> {
        self.lock().services.get(service_id).cloned()
    }

    /// Returns every service sorted by display name (case-sensitive).
    #[must_use]
    pub fn list_services(&self) -> Vec<ServiceDescriptor> {
        let mut services: Vec<ServiceDescriptor> = self.lock().services.values().cloned().collect();
        services.sort_by(|left, right| {
            left.name()
                .as_str()
                .cmp(right.name().as_str())
                .then_with(|| left.id().cmp(right.id()))
        });
        services
    }

    /// Returns service counts per status.
    #[must_use]
    pub fn overview(&self) -> RegistryOverview {
        let state = self.lock();
        let mut overview = RegistryOverview {
            total: state.services.len(),
            ..RegistryOverview::default()
        };
        for descriptor in state.services.values() {
            match descriptor.status() {
                ServiceStatus::Connected => overview.connected += 1,
                ServiceStatus::Connecting => overview.connecting += 1,
                ServiceStatus::Disconnected => overview.disconnected += 1,
                ServiceStatus::Error => overview.error += 1,
            }
        }
        overview
    }

    /// Returns the number of live connections.
    #[must_use]
    pub fn live_connection_count(&self) -> usize {
        self.lock().connections.len()
    }

    fn live_connector(&self, service_id: &ServiceId) -> ServiceRegistryResult<Arc<dyn Connector>> {
        let state = self.lock();
        if !state.services.contains_key(service_id) {
            return Err(ServiceRegistryError::NotFound(service_id.clone()));
        }
        state
            .connections
            .get(service_id)
            .map(|live| Arc::clone(&live.connector))
            .ok_or_else(|| ServiceRegistryError::NotConnected(service_id.clone()))
    }

    /// Reports whether a live connection exists and its connector still
    /// holds a session.
    #[must_use]
    pub fn test_connection(&self, service_id: &ServiceId) -> bool {
        self.live_connector(service_id)
            .is_ok_and(|connector| connector.is_connected())
    }

    /// Returns the tool catalog of a connected service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::NotFound`] or
    /// [`ServiceRegistryError::NotConnected`].
    pub fn list_tools(&self, service_id: &ServiceId) -> ServiceRegistryResult<Vec<ToolDefinition>> {
        Ok(self.live_connector(service_id)?.tools())
    }

    /// Runs one tool on a connected service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryError::NotFound`],
    /// [`ServiceRegistryError::NotConnected`], or the connector's
    /// [`ToolCallError`].
    pub async fn call_tool(
        &self,
        service_id: &ServiceId,
        tool_name: &str,
        arguments: &Map<String, Value>,
    ) -> ServiceRegistryResult<Value> {
        let connector = self.live_connector(service_id)?;
        let result = connector.call_tool(tool_name, arguments).await;
        if let Err(err) = &result {
            debug!(service_id = %service_id, tool = tool_name, error = %err, "tool call failed");
        }
        Ok(result?)
    }

    /// Connects every disconnected service in display-name order, one at a
    /// time, acquiring credentials from `source`.
    pub async fn connect_all<A>(&self, source: &A) -> Vec<(ServiceId, ConnectOutcome)>
    where
        A: CredentialSource + ?Sized,
    {
        let pending: Vec<ServiceId> = self
            .list_services()
            .into_iter()
            .filter(|descriptor| descriptor.status() == ServiceStatus::Disconnected)
            .map(|descriptor| descriptor.id().clone())
            .collect();

        let mut outcomes = Vec::with_capacity(pending.len());
        for service_id in pending {
            let outcome = self.connect_with(&service_id, source).await;
            outcomes.push((service_id, outcome));
        }
        let connected = outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_connected())
            .count();
        info!(attempted = outcomes.len(), connected, "connect-all finished");
        outcomes
    }

    /// Disconnects every connected or failed service. Returns how many
    /// changed.
    pub async fn disconnect_all(&self) -> usize {
        let targets: Vec<ServiceId> = self
            .list_services()
            .into_iter()
            .filter(|descriptor| {
                matches!(
                    descriptor.status(),
                    ServiceStatus::Connected | ServiceStatus::Error
                )
            })
            .map(|descriptor| descriptor.id().clone())
            .collect();

        let mut disconnected = 0;
        for service_id in targets {
            if self.disconnect(&service_id).await == DisconnectOutcome::Disconnected {
                disconnected += 1;
            }
        }
        disconnected
    }

    /// Tears the registry down.
    ///
    /// Connected and connecting services are marked `disconnected`, every
    /// live connector is disconnected concurrently with individual failures
    /// swallowed, the final snapshot is persisted, and then the in-memory
    /// maps are cleared and all subscriptions closed.
    pub async fn shutdown(&self) {
        let (live, mut changed) = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let drained: Vec<(ServiceId, LiveConnection)> = state.connections.drain().collect();
            let mut marked = Vec::new();
            for (service_id, descriptor) in &mut state.services {
                if matches!(
                    descriptor.status(),
                    ServiceStatus::Connected | ServiceStatus::Connecting
                ) && descriptor.mark_disconnected().is_ok()
                {
                    marked.push(service_id.clone());
                }
            }
            (drained, marked)
        };

        let mut disconnects = JoinSet::new();
        for (service_id, connection) in live {
            disconnects.spawn(async move {
                connection.connector.disconnect().await;
                (service_id, connection.connection_id)
            });
        }
        while let Some(joined) = disconnects.join_next().await {
            match joined {
                Ok((service_id, connection_id)) => {
                    debug!(
                        service_id = %service_id,
                        connection_id = %connection_id,
                        "connection closed"
                    );
                }
                Err(err) => warn!(error = %err, "connector disconnect failed during shutdown"),
            }
        }

        self.persist().await;
        changed.sort();
        for service_id in &changed {
            self.announce_status(service_id, ServiceStatus::Disconnected);
        }

        {
            let mut state = self.lock();
            state.services.clear();
            state.connections.clear();
        }
        self.events.close();
        info!(disconnected = changed.len(), "service registry shut down");
    }
}

type AppliedSettlement = (ServiceStatus, ConnectOutcome, Option<Arc<dyn Connector>>);

fn apply_settlement(
    state: &mut RegistryState,
    service_id: &ServiceId,
    settlement: Settlement,
    now: DateTime<Utc>,
) -> AppliedSettlement {
    let Some(descriptor) = state
        .services
        .get_mut(service_id)
        .filter(|descriptor| descriptor.status() == ServiceStatus::Connecting)
    else {
        let orphan = match settlement {
            Settlement::Connected { connector, .. } => Some(connector),
            Settlement::Failed(_) | Settlement::Declined => None,
        };
        return (ServiceStatus::Disconnected, ConnectOutcome::UnknownService, orphan);
    };

    let (result, outcome, orphan) = match settlement {
        Settlement::Connected {
            connector,
            credentials,
        } => {
            let result = descriptor.mark_connected(now);
            if result.is_ok() {
                descriptor.merge_config(credentials.to_config());
                state.connections.insert(
                    service_id.clone(),
                    LiveConnection {
                        connection_id: ConnectionId::new(),
                        connector,
                        connected_at: now,
                    },
                );
                (result, ConnectOutcome::Connected, None)
            } else {
                (result, ConnectOutcome::Busy, Some(connector))
            }
        }
        Settlement::Failed(message) => (
            descriptor.mark_failed(message.as_str()),
            ConnectOutcome::Failed { message },
            None,
        ),
        Settlement::Declined => (descriptor.mark_disconnected(), ConnectOutcome::Declined, None),
    };

    let status = state
        .services
        .get(service_id)
        .map_or(ServiceStatus::Disconnected, ServiceDescriptor::status);
    if let Err(err) = result {
        error!(service_id = %service_id, error = %err, "connect settlement rejected");
    }
    (status, outcome, orphan)
}
