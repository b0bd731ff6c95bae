//! Geographic hierarchy levels
//!
//! The four positions of the address hierarchy, ordered from the root
//! (country) down to the leaf (neighborhood).

use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

/// One position in the country → state → municipality → neighborhood chain.
///
/// The numeric representation matches the reset levels used by the page:
/// 0 resets everything, 1 resets from the state down, 2 from the
/// municipality down and 3 only the neighborhood.
#[derive(Serialize_repr, Deserialize_repr, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum GeoLevel {
    Country = 0,
    State = 1,
    Municipality = 2,
    Neighborhood = 3,
}

impl GeoLevel {
    /// All levels, root first
    pub const ALL: [GeoLevel; 4] = [
        GeoLevel::Country,
        GeoLevel::State,
        GeoLevel::Municipality,
        GeoLevel::Neighborhood,
    ];

    /// The level whose selection keys this level's lookup
    pub fn parent(self) -> Option<GeoLevel> {
        match self {
            GeoLevel::Country => None,
            GeoLevel::State => Some(GeoLevel::Country),
            GeoLevel::Municipality => Some(GeoLevel::State),
            GeoLevel::Neighborhood => Some(GeoLevel::Municipality),
        }
    }

    /// The level that is reloaded when this level changes
    pub fn child(self) -> Option<GeoLevel> {
        match self {
            GeoLevel::Country => Some(GeoLevel::State),
            GeoLevel::State => Some(GeoLevel::Municipality),
            GeoLevel::Municipality => Some(GeoLevel::Neighborhood),
            GeoLevel::Neighborhood => None,
        }
    }

    /// This level and every level below it
    pub fn and_below(self) -> impl Iterator<Item = GeoLevel> {
        GeoLevel::ALL.into_iter().filter(move |level| *level >= self)
    }

    /// Convert a numeric reset level (0-3)
    pub fn from_index(index: u8) -> Option<GeoLevel> {
        match index {
            0 => Some(GeoLevel::Country),
            1 => Some(GeoLevel::State),
            2 => Some(GeoLevel::Municipality),
            3 => Some(GeoLevel::Neighborhood),
            _ => None,
        }
    }

    /// Role name of the select bound to this level inside a form
    pub fn role(self) -> &'static str {
        match self {
            GeoLevel::Country => "country",
            GeoLevel::State => "state",
            GeoLevel::Municipality => "municipality",
            GeoLevel::Neighborhood => "neighborhood",
        }
    }
}

impl fmt::Display for GeoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered_root_first() {
        assert!(GeoLevel::Country < GeoLevel::State);
        assert!(GeoLevel::State < GeoLevel::Municipality);
        assert!(GeoLevel::Municipality < GeoLevel::Neighborhood);
    }

    #[test]
    fn test_and_below() {
        let levels: Vec<_> = GeoLevel::Municipality.and_below().collect();
        assert_eq!(levels, vec![GeoLevel::Municipality, GeoLevel::Neighborhood]);
        assert_eq!(GeoLevel::Country.and_below().count(), 4);
    }

    #[test]
    fn test_parent_child_chain() {
        assert_eq!(GeoLevel::Country.parent(), None);
        assert_eq!(GeoLevel::Neighborhood.child(), None);
        for level in GeoLevel::ALL {
            if let Some(child) = level.child() {
                assert_eq!(child.parent(), Some(level));
            }
        }
    }

    #[test]
    fn test_numeric_reset_levels() {
        assert_eq!(GeoLevel::from_index(0), Some(GeoLevel::Country));
        assert_eq!(GeoLevel::from_index(3), Some(GeoLevel::Neighborhood));
        assert_eq!(GeoLevel::from_index(4), None);
        assert_eq!(serde_json::to_string(&GeoLevel::Municipality).unwrap(), "2");
    }

    #[test]
    fn test_role_names() {
        assert_eq!(GeoLevel::State.role(), "state");
        assert_eq!(GeoLevel::Neighborhood.to_string(), "neighborhood");
    }
}
