use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Route {
    Home,
    VideoGallery,
    UniversityTalks,
}

impl Route {
    /// `/` and anything unrecognised land on the home screen.
    pub fn from_path(path: &str) -> Self {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "/home" => Route::Home,
            "/video-gallery" => Route::VideoGallery,
            "/university-talks" => Route::UniversityTalks,
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/home",
            Route::VideoGallery => "/video-gallery",
            Route::UniversityTalks => "/university-talks",
        }
    }

    /// Every screen except home is wrapped in an idle guard.
    pub fn is_guarded(&self) -> bool {
        !matches!(self, Route::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths() {
        assert_eq!(Route::from_path("/home"), Route::Home);
        assert_eq!(Route::from_path("/video-gallery"), Route::VideoGallery);
        assert_eq!(Route::from_path("/university-talks/"), Route::UniversityTalks);
        assert_eq!(Route::from_path("/university-talks?from=qr"), Route::UniversityTalks);
    }

    #[test]
    fn root_and_unknown_paths_redirect_home() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/admin"), Route::Home);
    }

    #[test]
    fn only_home_is_unguarded() {
        assert!(!Route::Home.is_guarded());
        assert!(Route::VideoGallery.is_guarded());
        assert!(Route::UniversityTalks.is_guarded());
    }
}
