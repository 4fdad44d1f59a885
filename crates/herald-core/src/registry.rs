//! Push connection registry.
//!
//! Each connection owns a bounded queue. Broadcasting never waits on a
//! connection: a full queue means the client has stalled, and it is dropped
//! instead of holding up everyone else.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::notification::model::Notification;

/// Opaque identifier of a push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

/// State shared by both halves of a connection.
#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    fn new() -> Self {
        Self(AtomicU8::new(ConnectionState::Connecting as u8))
    }

    fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: ConnectionState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Why a broadcast gave up on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropReason {
    /// The outbound queue was full.
    Lagging,
    /// The receiving side is gone.
    Disconnected,
}

impl DropReason {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Lagging => "lagging",
            Self::Disconnected => "disconnected",
        }
    }
}

/// Registry-side half of a push connection.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    sender: mpsc::Sender<Arc<Notification>>,
    state: Arc<StateCell>,
}

impl Connection {
    /// Create a connection whose queue holds at most `capacity` live notifications.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn channel(capacity: usize) -> (Connection, Subscription) {
        let (sender, receiver) = mpsc::channel(capacity);
        let id = ConnectionId::new();
        let state = Arc::new(StateCell::new());

        let connection = Connection {
            id,
            sender,
            state: Arc::clone(&state),
        };
        let subscription = Subscription {
            id,
            backlog: VecDeque::new(),
            receiver,
            state,
        };
        (connection, subscription)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    fn try_deliver(&self, notification: &Arc<Notification>) -> Result<(), DropReason> {
        match self.sender.try_send(Arc::clone(notification)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DropReason::Lagging),
            Err(TrySendError::Closed(_)) => Err(DropReason::Disconnected),
        }
    }

    fn close(&self) {
        self.state.set(ConnectionState::Closing);
        self.state.set(ConnectionState::Closed);
    }
}

/// Transport-side half of a push connection: the backlog burst, then live items.
#[derive(Debug)]
pub struct Subscription {
    id: ConnectionId,
    backlog: VecDeque<Arc<Notification>>,
    receiver: mpsc::Receiver<Arc<Notification>>,
    state: Arc<StateCell>,
}

impl Subscription {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Notifications still waiting in the backlog burst.
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    pub(crate) fn set_backlog(&mut self, backlog: Vec<Arc<Notification>>) {
        self.backlog = backlog.into();
    }

    /// Wait for the next notification.
    ///
    /// Returns `None` once the connection has left the `Open` state; anything
    /// still queued at that point is discarded.
    pub async fn next(&mut self) -> Option<Arc<Notification>> {
        if !self.is_open() {
            return None;
        }
        if let Some(notification) = self.backlog.pop_front() {
            return Some(notification);
        }
        let notification = self.receiver.recv().await?;
        self.is_open().then_some(notification)
    }

    /// Non-blocking variant of [`Subscription::next`].
    pub fn try_next(&mut self) -> Option<Arc<Notification>> {
        if !self.is_open() {
            return None;
        }
        if let Some(notification) = self.backlog.pop_front() {
            return Some(notification);
        }
        let notification = self.receiver.try_recv().ok()?;
        self.is_open().then_some(notification)
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub dropped: Vec<ConnectionId>,
}

/// Set of open push connections.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection and mark it open.
    ///
    /// # Panics
    ///
    /// Panics if a connection with the same id is already registered.
    pub fn register(&self, connection: Connection) {
        let mut connections = self.connections.write();
        let id = connection.id;
        assert!(
            !connections.contains_key(&id),
            "connection {} registered twice",
            id
        );
        connection.state.set(ConnectionState::Open);
        connections.insert(id, connection);
        debug!(connection_id = %id, total = connections.len(), "Connection registered");
    }

    /// Remove a connection. Returns `false` if it was not registered.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        let removed = self.connections.write().remove(&id);
        match removed {
            Some(connection) => {
                connection.close();
                debug!(connection_id = %id, "Connection unregistered");
                true
            }
            None => false,
        }
    }

    /// Enqueue a notification on every open connection.
    ///
    /// Connections whose queue is full or whose receiver is gone are removed
    /// and closed before this returns.
    pub fn broadcast(&self, notification: &Arc<Notification>) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let mut connections = self.connections.write();

        connections.retain(|id, connection| match connection.try_deliver(notification) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(reason) => {
                connection.close();
                warn!(
                    connection_id = %id,
                    notification_id = %notification.id,
                    reason = reason.as_str(),
                    "Dropping push connection"
                );
                report.dropped.push(*id);
                false
            }
        });

        debug!(
            notification_id = %notification.id,
            delivered = report.delivered,
            dropped = report.dropped.len(),
            "Broadcast complete"
        );
        report
    }

    /// Unregister and close every connection.
    pub fn close_all(&self) -> usize {
        let drained: Vec<Connection> = self.connections.write().drain().map(|(_, c)| c).collect();
        for connection in &drained {
            connection.close();
        }
        info!(closed = drained.len(), "Closed all push connections");
        drained.len()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
