//! Push hub: couples the notification store with the connection registry.
//!
//! Creating a notification and opening a connection both run under one
//! sequencer lock. A connection therefore sees every notification exactly once,
//! either in its backlog or as a live push, and always in creation order.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::HubConfig;
use crate::error::HeraldResult;
use crate::notification::model::{NewNotification, Notification};
use crate::notification::NotificationStore;
use crate::registry::{Connection, ConnectionId, ConnectionRegistry, Subscription};

pub struct PushHub {
    store: NotificationStore,
    registry: ConnectionRegistry,
    sequencer: Mutex<()>,
    config: HubConfig,
}

impl PushHub {
    /// Create an empty hub.
    ///
    /// # Panics
    ///
    /// Panics if `config.queue_capacity` is zero.
    pub fn new(config: HubConfig) -> Self {
        assert!(config.queue_capacity > 0, "hub queue capacity must be greater than 0");
        Self {
            store: NotificationStore::new(),
            registry: ConnectionRegistry::new(),
            sequencer: Mutex::new(()),
            config,
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Store a notification and push it to every open connection.
    pub fn create_notification(&self, request: NewNotification) -> Arc<Notification> {
        let _guard = self.sequencer.lock();
        let notification = self.store.append(request.title, request.body);
        let report = self.registry.broadcast(&notification);

        info!(
            notification_id = %notification.id,
            delivered = report.delivered,
            dropped = report.dropped.len(),
            "Notification created"
        );
        notification
    }

    /// Register a connection and return the backlog it must be sent first.
    pub fn on_connection_open(&self, connection: Connection) -> Vec<Arc<Notification>> {
        let id = connection.id();
        let _guard = self.sequencer.lock();
        let backlog = self.store.list();
        self.registry.register(connection);

        info!(
            connection_id = %id,
            backlog = backlog.len(),
            connections = self.registry.len(),
            "Push connection opened"
        );
        backlog
    }

    /// Open a connection with the configured queue bound.
    pub fn open_connection(&self) -> Subscription {
        let (connection, mut subscription) = Connection::channel(self.config.queue_capacity);
        let backlog = self.on_connection_open(connection);
        subscription.set_backlog(backlog);
        subscription
    }

    /// Unregister a connection. Safe to call more than once.
    pub fn on_connection_close(&self, id: ConnectionId) -> bool {
        let removed = self.registry.unregister(id);
        if removed {
            info!(connection_id = %id, connections = self.registry.len(), "Push connection closed");
        } else {
            debug!(connection_id = %id, "Push connection already closed");
        }
        removed
    }

    pub fn get_notification(&self, id: &str) -> HeraldResult<Arc<Notification>> {
        self.store.get(id)
    }

    pub fn list_notifications(&self) -> Vec<Arc<Notification>> {
        self.store.list()
    }

    pub fn notification_count(&self) -> usize {
        self.store.len()
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Close every push connection, e.g. on shutdown.
    pub fn shutdown(&self) -> usize {
        self.registry.close_all()
    }
}

impl Default for PushHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}
