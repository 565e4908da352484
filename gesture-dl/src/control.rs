//! Boundary between recognized gestures and media playback.

use crate::common::*;
use strum::{AsRefStr, EnumIter, EnumString};

/// A playback command a gesture can trigger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GestureAction {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
}

/// Playback control provided by an external media service.
pub trait PlaybackController {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn next_track(&mut self) -> Result<()>;
    fn previous_track(&mut self) -> Result<()>;
    fn volume_up(&mut self) -> Result<()>;
    fn volume_down(&mut self) -> Result<()>;
}

/// Turns a `[3, H, W]` camera frame into a gesture class name, if a hand is seen.
pub trait HandGestureDetector {
    fn detect(&mut self, frame: &Tensor) -> Result<Option<String>>;
}

/// Associates gesture class names with playback actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GestureMapping(IndexMap<String, GestureAction>);

impl Default for GestureMapping {
    fn default() -> Self {
        use GestureAction as A;

        [
            ("thumbs_up", A::Play),
            ("thumbs_down", A::Pause),
            ("swipe_right", A::NextTrack),
            ("swipe_left", A::PreviousTrack),
            ("open_palm", A::VolumeUp),
            ("closed_fist", A::VolumeDown),
        ]
        .into_iter()
        .map(|(gesture, action)| (gesture.to_string(), action))
        .collect()
    }
}

impl FromIterator<(String, GestureAction)> for GestureMapping {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (String, GestureAction)>,
    {
        Self(iter.into_iter().collect())
    }
}

impl GestureMapping {
    pub fn action(&self, gesture: &str) -> Option<GestureAction> {
        self.0.get(gesture).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, GestureAction)> {
        self.0.iter().map(|(gesture, &action)| (gesture.as_str(), action))
    }

    /// Invokes the action mapped to `gesture` on the controller.
    ///
    /// Returns the performed action, or `None` for an unmapped gesture.
    pub fn dispatch(
        &self,
        gesture: &str,
        controller: &mut dyn PlaybackController,
    ) -> Result<Option<GestureAction>> {
        let action = match self.action(gesture) {
            Some(action) => action,
            None => {
                debug!("gesture '{}' is not mapped to any action", gesture);
                return Ok(None);
            }
        };

        match action {
            GestureAction::Play => controller.play(),
            GestureAction::Pause => controller.pause(),
            GestureAction::NextTrack => controller.next_track(),
            GestureAction::PreviousTrack => controller.previous_track(),
            GestureAction::VolumeUp => controller.volume_up(),
            GestureAction::VolumeDown => controller.volume_down(),
        }
        .with_context(|| format!("unable to perform '{}'", action.as_ref()))?;

        Ok(Some(action))
    }

    /// Detects the gesture in a frame and dispatches its action.
    pub fn handle_frame(
        &self,
        frame: &Tensor,
        detector: &mut dyn HandGestureDetector,
        controller: &mut dyn PlaybackController,
    ) -> Result<Option<GestureAction>> {
        match detector.detect(frame)? {
            Some(gesture) => self.dispatch(&gesture, controller),
            None => Ok(None),
        }
    }
}
