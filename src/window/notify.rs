use super::{WindowId, WindowState};
use crate::layout::FloatRect;

/// Output of the core, consumed by whatever renders the windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    RectChanged(WindowId, FloatRect),
    StateChanged(WindowId, WindowState),
    ActiveChanged(WindowId),
    ZIndexChanged(WindowId, u64),
    /// Outline shown instead of live content while a gesture runs. `None`
    /// hides it.
    PreviewChanged(WindowId, Option<FloatRect>),
    /// The title changed; read it back from the registry.
    TitleChanged(WindowId),
    Closed(WindowId),
}

impl Notification {
    pub fn window(&self) -> WindowId {
        match *self {
            Notification::RectChanged(id, _)
            | Notification::StateChanged(id, _)
            | Notification::ActiveChanged(id)
            | Notification::ZIndexChanged(id, _)
            | Notification::PreviewChanged(id, _)
            | Notification::TitleChanged(id)
            | Notification::Closed(id) => id,
        }
    }
}

/// Rendering-side receiver. Implement only the callbacks you need.
pub trait WindowObserver {
    fn on_rect_changed(&mut self, _id: WindowId, _rect: FloatRect) {}
    fn on_state_changed(&mut self, _id: WindowId, _state: WindowState) {}
    fn on_active_changed(&mut self, _id: WindowId) {}
    fn on_z_index_changed(&mut self, _id: WindowId, _z: u64) {}
    fn on_preview_changed(&mut self, _id: WindowId, _preview: Option<FloatRect>) {}
    fn on_title_changed(&mut self, _id: WindowId) {}
    fn on_closed(&mut self, _id: WindowId) {}

    fn notify(&mut self, notification: &Notification) {
        match *notification {
            Notification::RectChanged(id, rect) => self.on_rect_changed(id, rect),
            Notification::StateChanged(id, state) => self.on_state_changed(id, state),
            Notification::ActiveChanged(id) => self.on_active_changed(id),
            Notification::ZIndexChanged(id, z) => self.on_z_index_changed(id, z),
            Notification::PreviewChanged(id, preview) => self.on_preview_changed(id, preview),
            Notification::TitleChanged(id) => self.on_title_changed(id),
            Notification::Closed(id) => self.on_closed(id),
        }
    }
}

impl<T: WindowObserver + ?Sized> WindowObserver for Box<T> {
    fn notify(&mut self, notification: &Notification) {
        (**self).notify(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RectsOnly {
        rects: Vec<(WindowId, FloatRect)>,
    }

    impl WindowObserver for RectsOnly {
        fn on_rect_changed(&mut self, id: WindowId, rect: FloatRect) {
            self.rects.push((id, rect));
        }
    }

    #[test]
    fn notify_routes_to_matching_callback() {
        let mut obs = RectsOnly::default();
        let id = WindowId::from_raw(4);
        let rect = FloatRect::new(1, 2, 3, 4);
        obs.notify(&Notification::ActiveChanged(id));
        obs.notify(&Notification::RectChanged(id, rect));
        assert_eq!(obs.rects, vec![(id, rect)]);
    }

    #[test]
    fn boxed_observer_forwards() {
        let mut obs: Box<RectsOnly> = Box::default();
        let id = WindowId::from_raw(1);
        obs.notify(&Notification::RectChanged(id, FloatRect::default()));
        assert_eq!(obs.rects.len(), 1);
        assert_eq!(Notification::Closed(id).window(), id);
    }

    #[test]
    fn title_changes_route_to_their_callback() {
        #[derive(Default)]
        struct Titles(Vec<WindowId>);
        impl WindowObserver for Titles {
            fn on_title_changed(&mut self, id: WindowId) {
                self.0.push(id);
            }
        }
        let mut obs = Titles::default();
        let id = WindowId::from_raw(7);
        obs.notify(&Notification::TitleChanged(id));
        obs.notify(&Notification::Closed(id));
        assert_eq!(obs.0, vec![id]);
        assert_eq!(Notification::TitleChanged(id).window(), id);
    }
}
