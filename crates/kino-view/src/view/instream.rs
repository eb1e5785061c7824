//! Instream (ad) mode wiring

use tracing::{debug, instrument};

use super::ViewInner;
use crate::model::{truthy, Attr, Change};

impl ViewInner {
    pub(super) fn on_instream_change(&self, change: &Change) {
        if truthy(&change.value) {
            self.setup_instream();
        } else {
            self.destroy_instream();
        }
    }

    #[instrument(skip(self))]
    fn setup_instream(&self) {
        if !self.instream.enter(&**self.container()) {
            return;
        }
        if let Some(controls) = self.current_controls() {
            controls.setup_instream();
        }
    }

    #[instrument(skip(self))]
    fn destroy_instream(&self) {
        let Some(click_handler) = self.click_handler.borrow().clone() else {
            debug!("View destroyed; nothing to revert");
            return;
        };
        if !self.instream.is_active() {
            return;
        }

        let controls = self.current_controls();
        if let Some(controls) = &controls {
            controls.destroy_instream(&self.model);
        }

        self.set_alt_text("");
        // With controls attached the stream type is authoritative
        let live = controls.as_ref().map(|_| self.model.stream_type().is_live());
        self.instream.exit(&**self.container(), live);
        self.model.set(Attr::HideAdsControls, false);

        // Ads may have moved the media element
        if let Some(provider) = self.model.provider() {
            provider.set_container(self.layout.media.clone());
        }
        click_handler.revert_alternate_click_handlers();
    }

    pub(super) fn set_alt_text(&self, text: &str) {
        self.model.set(Attr::AltText, text);
    }
}
