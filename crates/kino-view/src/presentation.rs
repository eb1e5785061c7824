//! Playback state to presentation mapping
//!
//! Pure mapping from the model's playback state to what the container
//! should show. The view applies the result; applying the same
//! presentation twice leaves the DOM unchanged.

use crate::dom::classes;
use crate::types::{MediaType, PlaybackState};

/// When the state class should be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassTiming {
    /// Write now
    Immediate,
    /// Coalesce into the next animation frame
    NextFrame,
}

impl ClassTiming {
    pub fn for_state(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Playing => ClassTiming::Immediate,
            _ => ClassTiming::NextFrame,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionsVisibility {
    Show,
    Hide,
}

/// What the view knows besides the state itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentationContext {
    pub media_type: MediaType,
    /// The model's `controls` attribute
    pub controls_enabled: bool,
    /// `Some(showing)` when a controls instance is attached
    pub controls_showing: Option<bool>,
}

/// Presentation for one playback state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePresentation {
    pub state: PlaybackState,
    pub state_class: String,
    /// Clear a controls-hidden flag left by a tap while paused
    pub reveal_controls: bool,
    /// Put the playlist item's poster into the preview
    pub show_poster: bool,
    pub captions: CaptionsVisibility,
    /// Re-render cues immediately so they show over a paused frame
    pub render_cues_now: bool,
}

impl StatePresentation {
    pub fn for_state(state: PlaybackState, ctx: PresentationContext) -> Self {
        let at_rest = state.is_at_rest();
        let controls_hidden_while_paused =
            state == PlaybackState::Paused && ctx.controls_showing == Some(false);

        Self {
            state,
            state_class: format!("{}{}", classes::STATE_PREFIX, state.as_str()),
            reveal_controls: ctx.controls_enabled && ctx.controls_showing.is_some() && state != PlaybackState::Paused,
            show_poster: at_rest && ctx.media_type == MediaType::Video,
            captions: if at_rest {
                CaptionsVisibility::Hide
            } else {
                CaptionsVisibility::Show
            },
            render_cues_now: !at_rest && controls_hidden_while_paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> PresentationContext {
        PresentationContext {
            media_type: MediaType::Video,
            controls_enabled: true,
            controls_showing: Some(true),
        }
    }

    #[test]
    fn test_timing() {
        assert_eq!(ClassTiming::for_state(PlaybackState::Playing), ClassTiming::Immediate);
        assert_eq!(ClassTiming::for_state(PlaybackState::Buffering), ClassTiming::NextFrame);
        assert_eq!(ClassTiming::for_state(PlaybackState::Error), ClassTiming::NextFrame);
    }

    #[test]
    fn test_rest_states_show_poster_and_hide_captions() {
        for state in [PlaybackState::Idle, PlaybackState::Error, PlaybackState::Complete] {
            let p = StatePresentation::for_state(state, video());
            assert!(p.show_poster, "{}", state);
            assert_eq!(p.captions, CaptionsVisibility::Hide);
            assert!(!p.render_cues_now);
        }
    }

    #[test]
    fn test_audio_keeps_poster_untouched() {
        let ctx = PresentationContext {
            media_type: MediaType::Audio,
            ..video()
        };
        assert!(!StatePresentation::for_state(PlaybackState::Idle, ctx).show_poster);
    }

    #[test]
    fn test_paused_with_hidden_controls_renders_cues() {
        let ctx = PresentationContext {
            controls_showing: Some(false),
            ..video()
        };
        let p = StatePresentation::for_state(PlaybackState::Paused, ctx);
        assert_eq!(p.captions, CaptionsVisibility::Show);
        assert!(p.render_cues_now);
        assert!(!p.reveal_controls);
        assert_eq!(p.state_class, "kino-state-paused");

        let no_controls = PresentationContext {
            controls_showing: None,
            ..video()
        };
        assert!(!StatePresentation::for_state(PlaybackState::Paused, no_controls).render_cues_now);
    }

    #[test]
    fn test_playing_reveals_controls() {
        let p = StatePresentation::for_state(PlaybackState::Playing, video());
        assert!(p.reveal_controls);
        assert!(!p.show_poster);
        assert_eq!(p.captions, CaptionsVisibility::Show);

        let disabled = PresentationContext {
            controls_enabled: false,
            controls_showing: None,
            ..video()
        };
        assert!(!StatePresentation::for_state(PlaybackState::Playing, disabled).reveal_controls);
    }
}
