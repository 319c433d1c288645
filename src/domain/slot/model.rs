//! Slot domain entity

/// Charging speed class with its reference price per kWh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargingType {
    Normal,
    Fast,
    UltraFast,
}

impl ChargingType {
    /// Reference rate in currency units per kWh. A request-supplied rate
    /// takes precedence over this default.
    pub fn price_per_kwh(&self) -> f64 {
        match self {
            Self::Normal => 0.15,
            Self::Fast => 0.30,
            Self::UltraFast => 0.45,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Fast => "FAST",
            Self::UltraFast => "ULTRA_FAST",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "FAST" => Self::Fast,
            "ULTRA_FAST" => Self::UltraFast,
            _ => Self::Normal,
        }
    }
}

impl Default for ChargingType {
    fn default() -> Self {
        Self::Normal
    }
}

impl std::fmt::Display for ChargingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single chargeable point at a station.
///
/// `reserved == true` iff an ACTIVE reservation is currently bound to this
/// slot (single-active-reservation design). The flag is only mutated
/// through the claim/release operations on the repository.
#[derive(Debug, Clone)]
pub struct Slot {
    pub id: i64,
    pub station_id: i64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub charging_type: ChargingType,
    /// Power rating label, e.g. "22kW"
    pub power: Option<String>,
    pub reserved: bool,
}

impl Slot {
    pub fn new(
        id: i64,
        station_id: i64,
        name: impl Into<String>,
        charging_type: ChargingType,
    ) -> Self {
        Self {
            id,
            station_id,
            name: name.into(),
            latitude: None,
            longitude: None,
            charging_type,
            power: None,
            reserved: false,
        }
    }

    /// Human-readable coordinates, or "Unknown" when not set.
    pub fn location(&self) -> String {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => format!("{}, {}", lat, lon),
            _ => "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_rates() {
        assert_eq!(ChargingType::Normal.price_per_kwh(), 0.15);
        assert_eq!(ChargingType::Fast.price_per_kwh(), 0.30);
        assert_eq!(ChargingType::UltraFast.price_per_kwh(), 0.45);
    }

    #[test]
    fn charging_type_roundtrip() {
        for ct in &[
            ChargingType::Normal,
            ChargingType::Fast,
            ChargingType::UltraFast,
        ] {
            assert_eq!(&ChargingType::from_str(ct.as_str()), ct);
        }
    }

    #[test]
    fn unknown_charging_type_defaults_to_normal() {
        assert_eq!(ChargingType::from_str("TURBO"), ChargingType::Normal);
    }

    #[test]
    fn new_slot_is_unreserved() {
        let s = Slot::new(1, 10, "A-01", ChargingType::Fast);
        assert!(!s.reserved);
        assert_eq!(s.station_id, 10);
    }

    #[test]
    fn location_formats_coordinates() {
        let mut s = Slot::new(1, 10, "A-01", ChargingType::Normal);
        assert_eq!(s.location(), "Unknown");
        s.latitude = Some(40.64);
        s.longitude = Some(-8.65);
        assert_eq!(s.location(), "40.64, -8.65");
    }
}
