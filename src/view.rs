// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! A consumer-side copy of "who is logged in".
//!
//! A view reads the store when it is attached, follows the bus for changes
//! made in this process, and re-reads the store on a fixed interval. The
//! interval is what picks up changes made by other processes sharing the
//! store, and any event the view was not yet subscribed for. Consistency is
//! eventual, bounded by the interval.

use std::time::Duration;

use log::debug;
use tokio::{sync::watch, task::JoinHandle, time};

use crate::{
    bus::{Bus, Event, EventKind, Subscription},
    session::{Session, Store},
};

pub(crate) const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub(crate) struct SessionView {
    state: watch::Receiver<Option<Session>>,
    subscriptions: Vec<Subscription>,
    reconciler: JoinHandle<()>,
}

fn apply(state: &watch::Sender<Option<Session>>, next: Option<Session>) -> bool {
    state.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    })
}

impl SessionView {
    pub(crate) async fn attach(store: Store, bus: &Bus, poll_interval: Duration) -> Self {
        let (tx, rx) = watch::channel(store.load().await);

        let on_login = {
            let tx = tx.clone();
            bus.subscribe(EventKind::LoggedIn, move |event| {
                if let Event::LoggedIn(ref session) = *event {
                    let _ = apply(&tx, Some(session.clone()));
                }
                Ok(())
            })
        };
        let on_logout = {
            let tx = tx.clone();
            bus.subscribe(EventKind::LoggedOut, move |_| {
                let _ = apply(&tx, None);
                Ok(())
            })
        };

        let reconciler = tokio::spawn(async move {
            let mut ticks = time::interval(poll_interval);
            ticks.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
            loop {
                let _ = ticks.tick().await;
                if apply(&tx, store.load().await) {
                    debug!("Session changed outside of this process");
                }
            }
        });

        Self {
            state: rx,
            subscriptions: vec![on_login, on_logout],
            reconciler,
        }
    }

    pub(crate) fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// Waits until the view's session differs from the last one seen through
    /// this method, and returns it.
    pub(crate) async fn changed(&mut self) -> Option<Session> {
        if self.state.changed().await.is_err() {
            return self.current();
        }
        self.state.borrow_and_update().clone()
    }

    pub(crate) fn detach(self) {
        drop(self);
    }
}

impl Drop for SessionView {
    fn drop(&mut self) {
        for subscription in &mut self.subscriptions {
            subscription.unsubscribe();
        }
        self.reconciler.abort();
    }
}
