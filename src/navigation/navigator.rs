use super::Route;

/// In-memory history stack for the kiosk's screens.
///
/// Never empty: it starts at `/home` and `back_or_home` refuses to pop the
/// last entry.
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            history: vec![Route::Home],
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or(Route::Home)
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn push(&mut self, route: Route) -> Route {
        if self.current() != route {
            self.history.push(route);
        }
        self.current()
    }

    /// Swap the current entry so "back" cannot return to it.
    pub fn replace(&mut self, route: Route) -> Route {
        match self.history.last_mut() {
            Some(last) => *last = route,
            None => self.history.push(route),
        }
        self.current()
    }

    /// The footer Home button: step back when there is history, otherwise
    /// land on home.
    pub fn back_or_home(&mut self) -> Route {
        if self.history.len() > 1 {
            self.history.pop();
            self.current()
        } else {
            self.replace(Route::Home)
        }
    }

    /// Idle expiry target: home replaces the current entry.
    pub fn go_home(&mut self) -> Route {
        self.replace(Route::Home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_home() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), Route::Home);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn back_returns_to_previous_screen() {
        let mut nav = Navigator::new();
        nav.push(Route::UniversityTalks);
        nav.push(Route::VideoGallery);
        assert_eq!(nav.back_or_home(), Route::UniversityTalks);
        assert_eq!(nav.back_or_home(), Route::Home);
        assert_eq!(nav.back_or_home(), Route::Home);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn pushing_the_current_screen_is_a_no_op() {
        let mut nav = Navigator::new();
        nav.push(Route::VideoGallery);
        nav.push(Route::VideoGallery);
        assert_eq!(nav.depth(), 2);
    }

    #[test]
    fn go_home_discards_the_expired_entry() {
        let mut nav = Navigator::new();
        nav.push(Route::UniversityTalks);
        nav.go_home();
        assert_eq!(nav.current(), Route::Home);
        assert_eq!(nav.depth(), 2);

        // Back from here lands on the original home, never the talks screen.
        assert_eq!(nav.back_or_home(), Route::Home);
    }
}
