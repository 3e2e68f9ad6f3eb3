// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use log::{debug, error};

use crate::{error::Result, session::Session};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum EventKind {
    LoggedIn,
    LoggedOut,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    LoggedIn(Session),
    LoggedOut,
}

impl Event {
    pub(crate) const fn kind(&self) -> EventKind {
        match *self {
            Self::LoggedIn(_) => EventKind::LoggedIn,
            Self::LoggedOut => EventKind::LoggedOut,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::LoggedIn => f.write_str("logged in"),
            Self::LoggedOut => f.write_str("logged out"),
        }
    }
}

pub(crate) type Handler = Arc<dyn Fn(&Event) -> Result<()> + Send + Sync>;

struct Registration {
    id: u64,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    registrations: Vec<Registration>,
}

/// In-process notification of login and logout transitions.
///
/// Events are not replayed: a subscriber has to read the session store when
/// it starts instead of waiting for an event that may already have fired.
#[derive(Clone, Default)]
pub(crate) struct Bus {
    registry: Arc<Mutex<Registry>>,
}

impl Bus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&Event) -> Result<()> + Send + Sync + 'static,
    {
        let mut registry = self.registry();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.registrations.push(Registration {
            id,
            kind,
            handler: Arc::new(handler),
        });

        Subscription {
            id,
            registry: Some(Arc::downgrade(&self.registry)),
        }
    }

    /// Delivers `event` to every handler registered for its kind, in the order
    /// they subscribed. Handlers that fail or panic are logged and skipped.
    pub(crate) fn publish(&self, event: &Event) {
        let kind = event.kind();
        let handlers: Vec<(u64, Handler)> = self
            .registry()
            .registrations
            .iter()
            .filter(|registration| registration.kind == kind)
            .map(|registration| (registration.id, Arc::clone(&registration.handler)))
            .collect();

        debug!("Publishing {} to {} handler(s)", kind, handlers.len());
        for (id, handler) in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Session handler {} failed on {}: {}", id, kind, e),
                Err(_) => error!("Session handler {} panicked on {}", id, kind),
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.registry().registrations.len()
    }
}

/// A live registration on a [`Bus`]. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes it immediately"]
pub(crate) struct Subscription {
    id: u64,
    registry: Option<Weak<Mutex<Registry>>>,
}

impl Subscription {
    /// Removes exactly this registration. Calling it again does nothing.
    pub(crate) fn unsubscribe(&mut self) {
        let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) else {
            return;
        };
        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry
            .registrations
            .retain(|registration| registration.id != self.id);
    }

    /// Keeps the registration alive for the rest of the bus's lifetime.
    pub(crate) fn forget(mut self) {
        self.registry = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
