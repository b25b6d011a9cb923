//! Editing session over the last-used configuration

use crate::store::load_or_default;
use crate::{ConfigStore, Configuration, Location, RegionOfInterest, Result};

/// One configuration round-trip: seed from the store, edit live, then
/// confirm (save) or drop (discard).
pub struct Session<S: ConfigStore> {
    store: S,
    config: Configuration,
    roi: Option<RegionOfInterest>,
    macro_mode: bool,
}

impl<S: ConfigStore> Session<S> {
    /// Opens a session.
    ///
    /// In macro mode the built-in defaults are used and nothing is saved.
    /// When a selection exists the location is preselected to
    /// [`Location::AtSelection`].
    pub fn open(store: S, roi: Option<RegionOfInterest>, macro_mode: bool) -> Self {
        let mut config = if macro_mode {
            Configuration::default()
        } else {
            load_or_default(&store)
        };
        if roi.is_some() {
            config.location = Location::AtSelection;
        }

        Self {
            store,
            config,
            roi,
            macro_mode,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Live edits; only persisted by [`Session::confirm`]
    pub fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    pub fn roi(&self) -> Option<&RegionOfInterest> {
        self.roi.as_ref()
    }

    /// Saves the edited configuration as the new last-used one and returns it
    pub fn confirm(mut self) -> Result<(Configuration, S)> {
        self.config = self.config.normalized();
        if self.macro_mode {
            tracing::debug!("Macro mode, configuration not saved");
        } else {
            self.store.save(&self.config)?;
            tracing::info!("Saved time bar configuration");
        }
        Ok((self.config, self.store))
    }

    /// Discards the edits and hands back the untouched store
    pub fn cancel(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DurationTemplate, MemoryStore};

    fn seeded_store() -> MemoryStore {
        MemoryStore::with(Configuration {
            location: Location::LowerLeft,
            duration_template: DurationTemplate::MinutesToSeconds,
            ..Configuration::default()
        })
    }

    #[test]
    fn test_open_seeds_from_store() {
        let session = Session::open(seeded_store(), None, false);
        assert_eq!(session.config().location, Location::LowerLeft);
        assert_eq!(
            session.config().duration_template,
            DurationTemplate::MinutesToSeconds
        );
    }

    #[test]
    fn test_roi_preselects_at_selection() {
        let session = Session::open(seeded_store(), Some(RegionOfInterest::at(5, 6)), false);
        assert_eq!(session.config().location, Location::AtSelection);
        assert_eq!(session.roi(), Some(&RegionOfInterest::at(5, 6)));
    }

    #[test]
    fn test_confirm_saves_and_cancel_discards() {
        let mut session = Session::open(seeded_store(), None, false);
        session.config_mut().show_units = false;
        let store = session.cancel();
        assert!(store.load().unwrap().unwrap().show_units);

        let mut session = Session::open(store, None, false);
        session.config_mut().show_units = false;
        session.config_mut().font_size = 2;
        let (confirmed, store) = session.confirm().unwrap();
        assert_eq!(confirmed.font_size, 5);

        let saved = store.load().unwrap().unwrap();
        assert!(!saved.show_units);
        assert_eq!(saved.location, Location::LowerLeft);
    }

    #[test]
    fn test_macro_mode_uses_defaults_and_skips_save() {
        let mut session = Session::open(seeded_store(), None, true);
        assert_eq!(session.config(), &Configuration::default());

        session.config_mut().location = Location::UpperLeft;
        let (_, store) = session.confirm().unwrap();
        assert_eq!(store.load().unwrap().unwrap().location, Location::LowerLeft);
    }

    #[test]
    fn test_macro_mode_keeps_selection_anchor() {
        let roi = RegionOfInterest::at(12, 34);
        let session = Session::open(seeded_store(), Some(roi), true);
        assert_eq!(session.config().location, Location::AtSelection);
        assert_eq!(session.config().font_size, Configuration::default().font_size);
    }
}
