//! Transport adapter: a `reqwest::Client` paired with an ownership flag.
//!
//! The library never reimplements pooling, TLS, or retries. It either builds
//! its own client (owned) or uses one the caller supplies (borrowed). On
//! release an owned handle is dropped, which shuts the connection pool down
//! once the last in-flight request finishes. A borrowed handle is left alone
//! unless the caller opted into disposal.

use crate::error::{LabelzoomError, Result};
use tracing::debug;

/// Who is responsible for closing the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Built by the library, or supplied with disposal opted in.
    Owned,
    /// Supplied by the caller, who keeps it open.
    Borrowed,
}

#[derive(Debug)]
pub(crate) struct Transport {
    client: reqwest::Client,
    ownership: Ownership,
}

impl Transport {
    /// Build a library-owned client. Timeouts are applied per request.
    pub(crate) fn owned(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .build()
            .map_err(|e| LabelzoomError::ConfigurationInvalid(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            ownership: Ownership::Owned,
        })
    }

    /// Wrap a caller-supplied client.
    pub(crate) fn supplied(client: reqwest::Client, dispose: bool) -> Self {
        Self {
            client,
            ownership: if dispose {
                Ownership::Owned
            } else {
                Ownership::Borrowed
            },
        }
    }

    pub(crate) fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Our handle is dropped with the struct; an owned pool closes once no other
/// handle remains, a borrowed one stays alive through the caller's clones.
impl Drop for Transport {
    fn drop(&mut self) {
        match self.ownership {
            Ownership::Owned => debug!("Closing owned HTTP transport"),
            Ownership::Borrowed => debug!("Leaving caller-owned HTTP transport open"),
        }
    }
}
