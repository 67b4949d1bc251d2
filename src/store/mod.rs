//! Shared application state.
//!
//! Each piece of cross-cutting state lives in its own [`Store`] handle and is
//! passed explicitly to whoever needs it. Handles are cheap to clone and all
//! clones observe the same value.

pub mod cart;
pub mod language;

use std::sync::Arc;

use tokio::sync::watch;

use crate::types::Locale;

pub use cart::{Cart, CartBook, CartItem, GUEST_USER};
pub use language::LanguageState;

/// A typed, observable cell of shared state.
#[derive(Debug)]
pub struct Store<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Read the current value through a closure.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Mutate the value, notifying subscribers only if `f` returns true.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// A receiver that is notified on every update.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Store<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

/// The application's shared stores.
#[derive(Debug, Clone, Default)]
pub struct AppStore {
    pub language: Store<LanguageState>,
    pub cart: Store<CartBook>,
}

impl AppStore {
    pub fn new(locale: Locale, cart: CartBook) -> Self {
        Self {
            language: Store::new(LanguageState::new(locale)),
            cart: Store::new(cart),
        }
    }

    pub fn locale(&self) -> Locale {
        self.language.read(|l| l.locale)
    }
}
