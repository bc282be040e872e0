//! Theme preference persistence.

use crate::model::preference::Theme;
use crate::repo::json::{PersistReport, THEME_KEY};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::Saved;
use log::warn;

/// Reads the stored theme; missing or unknown values mean `Theme::Light`.
///
/// Accepts both the JSON form (`"dark"`) and bare text (`dark`).
pub fn load_theme<S: KeyValueStore + ?Sized>(store: &S) -> Theme {
    let raw = match store.get_raw(THEME_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Theme::default(),
        Err(err) => {
            warn!(
                "event=store_read_fallback module=preference status=error key={} reason=read_failed error={}",
                THEME_KEY, err
            );
            return Theme::default();
        }
    };
    if let Ok(theme) = serde_json::from_str::<Theme>(&raw) {
        return theme;
    }
    match raw.trim() {
        "dark" => Theme::Dark,
        _ => Theme::Light,
    }
}

pub fn save_theme<S: KeyValueStore + ?Sized>(store: &S, theme: Theme) -> PersistReport {
    let mut persist = PersistReport::new();
    persist.save(store, THEME_KEY, &theme);
    persist
}

/// Flips the stored theme and returns the new value.
pub fn toggle_theme<S: KeyValueStore + ?Sized>(store: &S) -> Saved<Theme> {
    let theme = load_theme(store).toggled();
    let persist = save_theme(store, theme);
    Saved::new(theme, persist)
}
