mod container;
mod context;
mod dispatch_config;
mod error;
mod event;
mod handler;
mod subscription_registry;

pub use container::Container;
pub use context::EventContext;
pub use dispatch_config::DispatchConfig;
pub use error::{ContainerError, DispatchError, HandlerError, RegistryError};
pub use event::{Event, EventKind};
pub use handler::HandlerId;
pub(crate) use handler::PendingSubscription;
pub use subscription_registry::{SubscriberInfo, SubscriptionRegistry};
