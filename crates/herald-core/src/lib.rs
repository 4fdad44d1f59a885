//! Herald Core Library
//!
//! Notification store, push connection registry and the hub that couples them.

pub mod config;
pub mod error;
pub mod hub;
pub mod notification;
pub mod registry;

pub use config::{HeraldConfig, HubConfig, ServerConfig};
pub use error::{HeraldError, HeraldResult};
pub use hub::PushHub;
pub use notification::model::{NewNotification, Notification};
pub use notification::NotificationStore;
pub use registry::{
    BroadcastReport, Connection, ConnectionId, ConnectionRegistry, ConnectionState, Subscription,
};
