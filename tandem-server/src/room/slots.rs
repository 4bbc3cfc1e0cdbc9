use serde::Serialize;
use tandem_core::{ConnectionId, Role};

/// Outcome of a successful slot claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claimed {
    /// The other slot is still empty.
    Waiting,
    /// This claim filled the room. Carries the initiator to notify.
    Filled { initiator: ConnectionId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRejected {
    SlotTaken(Role),
    AlreadyAssigned(Role),
}

/// Which slots are occupied, without exposing who holds them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SlotsSnapshot {
    pub initiator: bool,
    pub responder: bool,
}

/// The two role positions of the single room.
///
/// A slot holds at most one connection and a connection holds at most one slot.
#[derive(Debug, Default)]
pub struct RoomSlots {
    initiator: Option<ConnectionId>,
    responder: Option<ConnectionId>,
}

impl RoomSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupant(&self, role: Role) -> Option<ConnectionId> {
        match role {
            Role::Initiator => self.initiator,
            Role::Responder => self.responder,
        }
    }

    pub fn role_of(&self, conn: &ConnectionId) -> Option<Role> {
        if self.initiator.as_ref() == Some(conn) {
            Some(Role::Initiator)
        } else if self.responder.as_ref() == Some(conn) {
            Some(Role::Responder)
        } else {
            None
        }
    }

    /// The connection a message from `role` should be relayed to.
    pub fn peer_of(&self, role: Role) -> Option<ConnectionId> {
        self.occupant(role.other())
    }

    pub fn is_full(&self) -> bool {
        self.initiator.is_some() && self.responder.is_some()
    }

    pub fn claim(&mut self, role: Role, conn: ConnectionId) -> Result<Claimed, JoinRejected> {
        if let Some(held) = self.role_of(&conn) {
            return Err(JoinRejected::AlreadyAssigned(held));
        }

        let slot = match role {
            Role::Initiator => &mut self.initiator,
            Role::Responder => &mut self.responder,
        };
        if slot.is_some() {
            return Err(JoinRejected::SlotTaken(role));
        }
        *slot = Some(conn);

        match self.initiator {
            Some(initiator) if self.is_full() => Ok(Claimed::Filled { initiator }),
            _ => Ok(Claimed::Waiting),
        }
    }

    /// Clears whichever slot `conn` held.
    pub fn release(&mut self, conn: &ConnectionId) -> Option<Role> {
        let role = self.role_of(conn)?;
        match role {
            Role::Initiator => self.initiator = None,
            Role::Responder => self.responder = None,
        }
        Some(role)
    }

    pub fn snapshot(&self) -> SlotsSnapshot {
        SlotsSnapshot {
            initiator: self.initiator.is_some(),
            responder: self.responder.is_some(),
        }
    }
}
