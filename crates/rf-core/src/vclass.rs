//! SUMO abstract vehicle classes and per-lane access permissions.
//!
//! A lane's permissions come from its `allow` / `disallow` attributes, each a
//! space-separated list of class tokens:
//!
//! | `allow`  | `disallow` | Result                                    |
//! |----------|------------|-------------------------------------------|
//! | absent   | absent     | every class                               |
//! | present  | absent     | only the listed classes (`all` = every)   |
//! | *any*    | present    | every class except the listed ones        |

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::str::FromStr;

/// A SUMO vehicle class (`vClass`).
///
/// Unknown tokens are kept verbatim in [`VehicleClass::Other`] so that newer
/// network files still load.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum VehicleClass {
    Private,
    Emergency,
    Authority,
    Army,
    Vip,
    Pedestrian,
    Passenger,
    Hov,
    Taxi,
    Bus,
    Coach,
    Delivery,
    Truck,
    Trailer,
    Motorcycle,
    Moped,
    Bicycle,
    Evehicle,
    Tram,
    RailUrban,
    Rail,
    RailElectric,
    RailFast,
    Ship,
    Custom1,
    Custom2,
    Other(String),
}

impl VehicleClass {
    /// The SUMO token for this class, e.g. `"passenger"`.
    pub fn as_str(&self) -> &str {
        match self {
            VehicleClass::Private      => "private",
            VehicleClass::Emergency    => "emergency",
            VehicleClass::Authority    => "authority",
            VehicleClass::Army         => "army",
            VehicleClass::Vip          => "vip",
            VehicleClass::Pedestrian   => "pedestrian",
            VehicleClass::Passenger    => "passenger",
            VehicleClass::Hov          => "hov",
            VehicleClass::Taxi         => "taxi",
            VehicleClass::Bus          => "bus",
            VehicleClass::Coach        => "coach",
            VehicleClass::Delivery     => "delivery",
            VehicleClass::Truck        => "truck",
            VehicleClass::Trailer      => "trailer",
            VehicleClass::Motorcycle   => "motorcycle",
            VehicleClass::Moped        => "moped",
            VehicleClass::Bicycle      => "bicycle",
            VehicleClass::Evehicle     => "evehicle",
            VehicleClass::Tram         => "tram",
            VehicleClass::RailUrban    => "rail_urban",
            VehicleClass::Rail         => "rail",
            VehicleClass::RailElectric => "rail_electric",
            VehicleClass::RailFast     => "rail_fast",
            VehicleClass::Ship         => "ship",
            VehicleClass::Custom1      => "custom1",
            VehicleClass::Custom2      => "custom2",
            VehicleClass::Other(s)     => s,
        }
    }
}

impl FromStr for VehicleClass {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "private"       => VehicleClass::Private,
            "emergency"     => VehicleClass::Emergency,
            "authority"     => VehicleClass::Authority,
            "army"          => VehicleClass::Army,
            "vip"           => VehicleClass::Vip,
            "pedestrian"    => VehicleClass::Pedestrian,
            "passenger"     => VehicleClass::Passenger,
            "hov"           => VehicleClass::Hov,
            "taxi"          => VehicleClass::Taxi,
            "bus"           => VehicleClass::Bus,
            "coach"         => VehicleClass::Coach,
            "delivery"      => VehicleClass::Delivery,
            "truck"         => VehicleClass::Truck,
            "trailer"       => VehicleClass::Trailer,
            "motorcycle"    => VehicleClass::Motorcycle,
            "moped"         => VehicleClass::Moped,
            "bicycle"       => VehicleClass::Bicycle,
            "evehicle"      => VehicleClass::Evehicle,
            "tram"          => VehicleClass::Tram,
            "rail_urban"    => VehicleClass::RailUrban,
            "rail"          => VehicleClass::Rail,
            "rail_electric" => VehicleClass::RailElectric,
            "rail_fast"     => VehicleClass::RailFast,
            "ship"          => VehicleClass::Ship,
            "custom1"       => VehicleClass::Custom1,
            "custom2"       => VehicleClass::Custom2,
            other           => VehicleClass::Other(other.to_owned()),
        })
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Permissions ───────────────────────────────────────────────────────────────

/// Which vehicle classes may use a lane.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum Permissions {
    /// No restriction.
    #[default]
    All,
    /// Only the listed classes.
    Only(BTreeSet<VehicleClass>),
    /// Every class except the listed ones.
    AllExcept(BTreeSet<VehicleClass>),
}

impl Permissions {
    /// Build from raw `allow` / `disallow` attribute values.
    pub fn from_attrs(allow: Option<&str>, disallow: Option<&str>) -> Self {
        match (allow, disallow) {
            (_, Some(disallow)) => {
                if has_all_token(disallow) {
                    Permissions::Only(BTreeSet::new())
                } else {
                    Permissions::AllExcept(parse_classes(disallow))
                }
            }
            (Some(allow), None) => {
                if has_all_token(allow) {
                    Permissions::All
                } else {
                    Permissions::Only(parse_classes(allow))
                }
            }
            (None, None) => Permissions::All,
        }
    }

    pub fn allows(&self, class: &VehicleClass) -> bool {
        match self {
            Permissions::All => true,
            Permissions::Only(set) => set.contains(class),
            Permissions::AllExcept(set) => !set.contains(class),
        }
    }
}

fn has_all_token(list: &str) -> bool {
    list.split_whitespace().any(|t| t == "all")
}

fn parse_classes(list: &str) -> BTreeSet<VehicleClass> {
    list.split_whitespace()
        .map(|t| match t.parse::<VehicleClass>() {
            Ok(c) => c,
            Err(never) => match never {},
        })
        .collect()
}
