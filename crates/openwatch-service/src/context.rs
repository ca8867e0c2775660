//! Request context carrying the acting user and request provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use openwatch_entity::user::Actor;

/// Context for one inbound mutation.
///
/// Built by whatever transport fronts the service and passed into every
/// gated operation, so audit provenance never comes from ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The already-authenticated caller.
    pub actor: Actor,
    /// Client address, if the transport knows it.
    pub ip_address: Option<String>,
    /// Client user agent, if the transport knows it.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Create a context with no provenance metadata.
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            ip_address: None,
            user_agent: None,
            request_time: Utc::now(),
        }
    }

    /// Attach the client address.
    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    /// Attach the client user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
