//! Vehicle type profiles written to the route file.

/// A `<vType>` definition.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleType {
    pub id:        &'static str,
    pub accel:     f64,
    pub decel:     f64,
    /// Driver imperfection (Krauss model), 0..=1.
    pub sigma:     f64,
    pub length:    f64,
    pub max_speed: f64,
    /// RGB in 0..=1, as SUMO's `color` attribute.
    pub color:     [u8; 3],
}

impl VehicleType {
    /// Background traffic, drawn blue.
    pub const CAR: VehicleType = VehicleType::passenger("car", [0, 0, 1]);

    /// The requested route's vehicle, drawn red.
    pub const HIGHLIGHTED_CAR: VehicleType = VehicleType::passenger("highlighted_car", [1, 0, 0]);

    const fn passenger(id: &'static str, color: [u8; 3]) -> Self {
        VehicleType {
            id,
            accel: 2.6,
            decel: 4.5,
            sigma: 0.5,
            length: 5.0,
            max_speed: 70.0,
            color,
        }
    }

    /// Both profiles, in the order they are written.
    pub fn all() -> [VehicleType; 2] {
        [Self::CAR, Self::HIGHLIGHTED_CAR]
    }

    /// `(name, value)` attribute pairs for the `<vType>` element.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let [r, g, b] = self.color;
        vec![
            ("id", self.id.to_owned()),
            ("accel", self.accel.to_string()),
            ("decel", self.decel.to_string()),
            ("sigma", self.sigma.to_string()),
            ("length", self.length.to_string()),
            ("maxSpeed", self.max_speed.to_string()),
            ("color", format!("{r},{g},{b}")),
        ]
    }
}
