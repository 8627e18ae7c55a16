//! Notification rules for a vehicle approaching the user.

use serde::{Deserialize, Serialize};

/// Distance at which the alert banner appears.
pub const ALERT_VISIBLE_METERS: f64 = 800.0;
/// Below this distance the vehicle is passing the user.
pub const PASSING_METERS: f64 = 70.0;
/// Upper bound (exclusive) of the very-close tier.
pub const VERY_CLOSE_METERS: f64 = 50.0;
/// Upper bound (inclusive) of the close tier.
pub const CLOSE_METERS: f64 = 200.0;
/// Upper bound (inclusive) of the approaching tier.
pub const APPROACHING_METERS: f64 = 500.0;

/// Where the vehicle is relative to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Behind,
    Passing,
}

/// Notification tiers, nearest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityTier {
    VeryClose,
    Close,
    Approaching,
}

impl ProximityTier {
    /// The tier for a distance, if any.
    pub fn for_distance(meters: f64) -> Option<Self> {
        if meters < VERY_CLOSE_METERS {
            Some(Self::VeryClose)
        } else if meters <= CLOSE_METERS {
            Some(Self::Close)
        } else if meters <= APPROACHING_METERS {
            Some(Self::Approaching)
        } else {
            None
        }
    }

    /// Text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::VeryClose => "🚨 Emergency vehicle passing!",
            Self::Close => "🚨 Vehicle very close!",
            Self::Approaching => "Emergency vehicle approaching fast!",
        }
    }
}

/// The result of observing one distance sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproachUpdate {
    /// Distance rounded to whole meters.
    pub distance_m: u64,
    pub direction: Direction,
    /// Whether the alert banner is showing.
    pub alert_visible: bool,
    /// A new notification to show, if this sample produced one.
    pub notification: Option<ProximityTier>,
}

/// Tracks banner visibility and suppresses repeated notifications.
///
/// A tier is only announced when it differs from the last announced tier.
/// Dismissing the banner or muting sound stops further notifications.
#[derive(Debug, Clone)]
pub struct ApproachTracker {
    last_tier: Option<ProximityTier>,
    alert_visible: bool,
    dismissed: bool,
    sound_enabled: bool,
}

impl Default for ApproachTracker {
    fn default() -> Self {
        Self {
            last_tier: None,
            alert_visible: false,
            dismissed: false,
            sound_enabled: true,
        }
    }
}

impl ApproachTracker {
    /// A fresh tracker with sound on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one distance sample.
    pub fn observe(&mut self, meters: f64) -> ApproachUpdate {
        if !self.dismissed && meters <= ALERT_VISIBLE_METERS {
            self.alert_visible = true;
        }

        let direction = if meters < PASSING_METERS {
            Direction::Passing
        } else {
            Direction::Behind
        };

        let mut notification = None;
        if self.sound_enabled && !self.dismissed {
            if let Some(tier) = ProximityTier::for_distance(meters) {
                if self.last_tier != Some(tier) {
                    self.last_tier = Some(tier);
                    notification = Some(tier);
                }
            }
        }

        ApproachUpdate {
            distance_m: meters.round() as u64,
            direction,
            alert_visible: self.alert_visible,
            notification,
        }
    }

    /// Hide the banner and stop notifications.
    pub fn dismiss(&mut self) {
        self.alert_visible = false;
        self.dismissed = true;
    }

    /// Turn notification sound on or off.
    pub fn set_sound(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    /// The most recently announced tier.
    pub fn last_tier(&self) -> Option<ProximityTier> {
        self.last_tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ProximityTier::for_distance(49.9), Some(ProximityTier::VeryClose));
        assert_eq!(ProximityTier::for_distance(50.0), Some(ProximityTier::Close));
        assert_eq!(ProximityTier::for_distance(200.0), Some(ProximityTier::Close));
        assert_eq!(ProximityTier::for_distance(500.0), Some(ProximityTier::Approaching));
        assert_eq!(ProximityTier::for_distance(500.1), None);
    }

    #[test]
    fn test_repeat_tier_suppressed() {
        let mut tracker = ApproachTracker::new();
        assert_eq!(tracker.observe(450.0).notification, Some(ProximityTier::Approaching));
        assert_eq!(tracker.observe(420.0).notification, None);
        assert_eq!(tracker.observe(150.0).notification, Some(ProximityTier::Close));
        assert_eq!(tracker.observe(30.0).notification, Some(ProximityTier::VeryClose));
        assert_eq!(tracker.observe(20.0).notification, None);
    }

    #[test]
    fn test_visibility_and_direction() {
        let mut tracker = ApproachTracker::new();
        let far = tracker.observe(1200.0);
        assert!(!far.alert_visible);
        assert_eq!(far.direction, Direction::Behind);
        assert_eq!(far.notification, None);

        let near = tracker.observe(790.0);
        assert!(near.alert_visible);

        let passing = tracker.observe(69.4);
        assert_eq!(passing.direction, Direction::Passing);
        assert_eq!(passing.distance_m, 69);
    }

    #[test]
    fn test_dismiss_stops_notifications() {
        let mut tracker = ApproachTracker::new();
        tracker.observe(700.0);
        tracker.dismiss();
        let update = tracker.observe(100.0);
        assert!(!update.alert_visible);
        assert_eq!(update.notification, None);
    }

    #[test]
    fn test_muted_sound() {
        let mut tracker = ApproachTracker::new();
        tracker.set_sound(false);
        assert_eq!(tracker.observe(100.0).notification, None);
        tracker.set_sound(true);
        assert_eq!(tracker.observe(100.0).notification, Some(ProximityTier::Close));
    }
}
