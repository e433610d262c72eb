//! Viewport size tracking.
//!
//! A [`ViewportSubscription`] holds the latest width and height of the
//! display surface and is refreshed on every resize event published on a
//! [`ResizeBus`]. Each subscription registers exactly one listener and
//! removes it when it ends.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::debug;

/// Width and height of the display surface, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Dimensions {
    pub height: u16,
    pub width: u16,
}

impl Dimensions {
    pub fn new(width: u16, height: u16) -> Self {
        Self { height, width }
    }
}

/// Something that can report its current size.
pub trait DisplaySurface: Send + Sync {
    /// Current size, or `None` when it cannot be measured.
    fn measure(&self) -> Option<Dimensions>;
}

/// Identifier handed out by [`ResizeBus::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Registry of resize listeners, fed by the host's resize events.
#[derive(Default)]
pub struct ResizeBus {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
}

impl ResizeBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a listener called on every resize.
    pub fn add_listener(&self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, Arc::new(listener)));
        debug!("Registered resize listener {:?}", id);
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        let removed = listeners.len() != before;
        if removed {
            debug!("Removed resize listener {:?}", id);
        }
        removed
    }

    /// Notify every registered listener.
    pub fn emit(&self) {
        // Call outside the lock so listeners may (de)register.
        let listeners: Vec<Listener> = self.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Hands out viewport subscriptions for one display surface.
pub struct ViewportTracker {
    surface: Option<Arc<dyn DisplaySurface>>,
    bus: Arc<ResizeBus>,
}

impl ViewportTracker {
    /// `surface` is `None` in non-interactive contexts; subscriptions then
    /// stay at `0x0` and register no listener.
    pub fn new(surface: Option<Arc<dyn DisplaySurface>>, bus: Arc<ResizeBus>) -> Self {
        Self { surface, bus }
    }

    /// Start tracking. The value is `0x0` until the first measurement,
    /// which happens immediately.
    pub fn subscribe(&self) -> ViewportSubscription {
        let (tx, mut rx) = watch::channel(Dimensions::default());

        let Some(surface) = self.surface.clone() else {
            debug!("No display surface; viewport stays at 0x0");
            return ViewportSubscription {
                rx,
                bus: Arc::clone(&self.bus),
                listener: None,
            };
        };

        let derive = move || {
            let measured = surface.measure().unwrap_or_default();
            tx.send_if_modified(|current| {
                if *current == measured {
                    false
                } else {
                    *current = measured;
                    true
                }
            });
        };

        derive();
        // The first measurement is the starting value, not a change
        rx.borrow_and_update();
        let listener = self.bus.add_listener(derive);
        debug!("{} resize listener(s) registered", self.bus.listener_count());

        ViewportSubscription {
            rx,
            bus: Arc::clone(&self.bus),
            listener: Some(listener),
        }
    }
}

/// Live view of the display size, bound to one activation.
pub struct ViewportSubscription {
    rx: watch::Receiver<Dimensions>,
    bus: Arc<ResizeBus>,
    listener: Option<ListenerId>,
}

impl ViewportSubscription {
    /// Latest known dimensions.
    pub fn current(&self) -> Dimensions {
        *self.rx.borrow()
    }

    /// Wait for the next change. Returns `None` once the subscription has
    /// ended.
    pub async fn changed(&mut self) -> Option<Dimensions> {
        if !self.is_active() {
            return None;
        }
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// Deregister the resize listener. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(id) = self.listener.take() {
            self.bus.remove_listener(id);
        }
    }
}

impl Drop for ViewportSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Surface whose size is set by the test.
    #[derive(Default)]
    pub(crate) struct FakeSurface {
        size: Mutex<Option<Dimensions>>,
    }

    impl FakeSurface {
        pub(crate) fn sized(width: u16, height: u16) -> Arc<Self> {
            let surface = Self::default();
            surface.resize(width, height);
            Arc::new(surface)
        }

        pub(crate) fn resize(&self, width: u16, height: u16) {
            *self.size.lock().unwrap() = Some(Dimensions::new(width, height));
        }
    }

    impl DisplaySurface for FakeSurface {
        fn measure(&self) -> Option<Dimensions> {
            *self.size.lock().unwrap()
        }
    }

    #[test]
    fn test_subscribe_measures_immediately() {
        let bus = ResizeBus::new();
        let tracker = ViewportTracker::new(Some(FakeSurface::sized(80, 24)), Arc::clone(&bus));
        let sub = tracker.subscribe();
        assert_eq!(sub.current(), Dimensions::new(80, 24));
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn test_resize_updates_and_teardown_stops_updates() {
        let bus = ResizeBus::new();
        let surface = FakeSurface::sized(80, 24);
        let tracker = ViewportTracker::new(Some(surface.clone()), Arc::clone(&bus));
        let mut sub = tracker.subscribe();

        surface.resize(120, 40);
        bus.emit();
        assert_eq!(sub.current(), Dimensions::new(120, 40));

        sub.unsubscribe();
        sub.unsubscribe();
        assert_eq!(bus.listener_count(), 0);
        assert!(!sub.is_active());

        surface.resize(60, 20);
        bus.emit();
        assert_eq!(sub.current(), Dimensions::new(120, 40));
    }

    #[test]
    fn test_repeated_activations_do_not_leak_listeners() {
        let bus = ResizeBus::new();
        let tracker = ViewportTracker::new(Some(FakeSurface::sized(80, 24)), Arc::clone(&bus));
        for _ in 0..5 {
            let _sub = tracker.subscribe();
            assert_eq!(bus.listener_count(), 1);
        }
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_missing_surface_falls_back_to_zero() {
        let bus = ResizeBus::new();
        let tracker = ViewportTracker::new(None, Arc::clone(&bus));
        let sub = tracker.subscribe();
        assert_eq!(sub.current(), Dimensions::default());
        assert_eq!(bus.listener_count(), 0);

        let unmeasurable = Arc::new(FakeSurface::default());
        let tracker = ViewportTracker::new(Some(unmeasurable), Arc::clone(&bus));
        assert_eq!(tracker.subscribe().current(), Dimensions { height: 0, width: 0 });
    }

    #[tokio::test]
    async fn test_changed_reports_new_size_once() {
        let bus = ResizeBus::new();
        let surface = FakeSurface::sized(80, 24);
        let tracker = ViewportTracker::new(Some(surface.clone()), Arc::clone(&bus));
        let mut sub = tracker.subscribe();

        surface.resize(100, 30);
        bus.emit();
        // Same size again is not a change
        bus.emit();
        assert_eq!(sub.changed().await, Some(Dimensions::new(100, 30)));

        sub.unsubscribe();
        assert_eq!(sub.changed().await, None);
    }
}
