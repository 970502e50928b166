//! Collaborators the login flow drives but does not own: the router and the
//! toast display. Both are fire-and-forget.

/// Moves the user to another page.
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

/// Shows transient success/error notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

impl<T: Navigator + ?Sized> Navigator for std::sync::Arc<T> {
    fn go_to(&self, path: &str) {
        (**self).go_to(path);
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn success(&self, message: &str) {
        (**self).success(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }
}
