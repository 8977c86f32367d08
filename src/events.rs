//! Named events fired by the door controller.
//!
//! Events are fire-and-forget notifications for the hub. They never change
//! the door state on their own.

use heapless::String as HString;

/// Maximum length of a qualified event name.
pub const MAX_EVENT_NAME: usize = 96;

/// Event fired to the hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DoorEvent {
    /// The closed sensor fired while the door was opening.
    OpenFailed,
    /// The open sensor fired while the door was closing.
    CloseFailed,
    /// The local button ladder reads near zero (wiring fault).
    ButtonDisconnected,
    /// The local light button was pressed.
    LocalLightButton,
    /// The remote light button was pressed.
    RemoteLightButton,
}

impl DoorEvent {
    /// Returns the event name as sent to the hub.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DoorEvent::OpenFailed => "open_failed",
            DoorEvent::CloseFailed => "close_failed",
            DoorEvent::ButtonDisconnected => "button_disconnected",
            DoorEvent::LocalLightButton => "local_light_button",
            DoorEvent::RemoteLightButton => "remote_light_button",
        }
    }

    /// Builds the hub event name `esphome.<object_id>.<event>`.
    ///
    /// Names longer than [`MAX_EVENT_NAME`] are truncated.
    ///
    /// ```rust
    /// use rs_garage::DoorEvent;
    ///
    /// let name = DoorEvent::OpenFailed.qualified_name("garage_door");
    /// assert_eq!(name.as_str(), "esphome.garage_door.open_failed");
    /// ```
    pub fn qualified_name(&self, object_id: &str) -> HString<MAX_EVENT_NAME> {
        let mut name = HString::new();
        for part in ["esphome.", object_id, ".", self.as_str()] {
            for c in part.chars() {
                if name.push(c).is_err() {
                    return name;
                }
            }
        }
        name
    }

    /// True for events that report a door failure.
    pub const fn is_failure(&self) -> bool {
        matches!(self, DoorEvent::OpenFailed | DoorEvent::CloseFailed)
    }
}

/// Direction of a measured full travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Travel {
    /// Closed to open.
    Open,
    /// Open to closed.
    Close,
}

impl Travel {
    /// Sensor name used by hosts that publish travel times.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Travel::Open => "last_open_time",
            Travel::Close => "last_close_time",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names() {
        assert_eq!(DoorEvent::OpenFailed.as_str(), "open_failed");
        assert_eq!(DoorEvent::CloseFailed.as_str(), "close_failed");
        assert_eq!(DoorEvent::ButtonDisconnected.as_str(), "button_disconnected");
        assert_eq!(DoorEvent::LocalLightButton.as_str(), "local_light_button");
        assert_eq!(DoorEvent::RemoteLightButton.as_str(), "remote_light_button");
    }

    #[test]
    fn qualified_name_includes_object_id() {
        let name = DoorEvent::RemoteLightButton.qualified_name("shop");
        assert_eq!(name.as_str(), "esphome.shop.remote_light_button");
    }

    #[test]
    fn qualified_name_truncates_long_ids() {
        let long_id = "x".repeat(200);
        let name = DoorEvent::CloseFailed.qualified_name(&long_id);
        assert_eq!(name.len(), MAX_EVENT_NAME);
        assert!(name.starts_with("esphome.xxx"));
    }

    #[test]
    fn failure_events() {
        assert!(DoorEvent::OpenFailed.is_failure());
        assert!(DoorEvent::CloseFailed.is_failure());
        assert!(!DoorEvent::LocalLightButton.is_failure());
    }
}
