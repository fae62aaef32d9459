use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of an actor in the protocol: broker, owner, requester
/// or fulfiller. Every public operation takes the caller's `ActorId`
/// explicitly; authorization is membership checks against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}
