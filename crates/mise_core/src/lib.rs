//! Mise core types and rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Staff role. Role names travel as plain strings in the API,
/// this type is the single place they are parsed and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Staff => "STAFF",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "MANAGER" => Ok(Role::Manager),
            "STAFF" => Ok(Role::Staff),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

/// Checks that a store location is a real point on the map.
pub fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// A half-open scheduling window, `[starts_at, ends_at)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl ShiftWindow {
    /// A window is usable when it ends strictly after it starts.
    pub fn is_valid(&self) -> bool {
        self.ends_at > self.starts_at
    }

    /// Two half-open windows overlap when each starts before the other ends.
    /// Back-to-back shifts (one ending exactly when the next starts) do not
    /// count as overlapping.
    pub fn overlaps(&self, other: &ShiftWindow) -> bool {
        self.starts_at < other.ends_at && other.starts_at < self.ends_at
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 9, hour, 0, 0).unwrap()
    }

    fn window(start: u32, end: u32) -> ShiftWindow {
        ShiftWindow {
            starts_at: at(start),
            ends_at: at(end),
        }
    }

    #[test]
    fn parses_roles_case_insensitively() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("MANAGER".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("Staff".parse::<Role>().unwrap(), Role::Staff);
    }

    #[test]
    fn rejects_unknown_role() {
        let err = "OWNER".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("OWNER".to_string()));
    }

    #[test]
    fn role_round_trips_through_its_name() {
        for role in [Role::Admin, Role::Manager, Role::Staff] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn accepts_coordinates_within_bounds() {
        assert!(valid_coordinates(60.1699, 24.9384));
        assert!(valid_coordinates(-90.0, 180.0));
        assert!(valid_coordinates(0.0, 0.0));
    }

    #[test]
    fn rejects_coordinates_out_of_bounds() {
        assert!(!valid_coordinates(90.5, 0.0));
        assert!(!valid_coordinates(0.0, -180.5));
        assert!(!valid_coordinates(f64::NAN, 0.0));
    }

    #[test]
    fn rejects_backwards_window() {
        assert!(!window(17, 9).is_valid());
        assert!(!window(9, 9).is_valid());
        assert!(window(9, 17).is_valid());
    }

    #[test]
    fn detects_overlapping_windows() {
        assert!(window(9, 17).overlaps(&window(16, 23)));
        assert!(window(16, 23).overlaps(&window(9, 17)));
        assert!(window(9, 17).overlaps(&window(10, 12)));
    }

    #[test]
    fn back_to_back_windows_do_not_overlap() {
        assert!(!window(9, 17).overlaps(&window(17, 23)));
        assert!(!window(17, 23).overlaps(&window(9, 17)));
    }
}
