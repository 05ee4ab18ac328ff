//! Change events, subscriptions and the timers that pace refreshes

mod debounce;
mod hub;
mod timer;

pub use debounce::Debouncer;
pub use hub::{ChangeHub, ChangeListener, Subscription, Topic};
pub use timer::{RefreshTimer, TimerTick};
