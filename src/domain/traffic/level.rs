/// Level assumed when a segment carries no `traffic_level` property
pub const DEFAULT_TRAFFIC_LEVEL: f64 = 0.5;

/// Congestion band derived from a relative traffic level
/// (0.0 = blocked, 1.0 = free flow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficBand {
    Heavy,
    Moderate,
    Light,
    FreeFlow,
}

impl TrafficBand {
    pub const ALL: [TrafficBand; 4] = [Self::Heavy, Self::Moderate, Self::Light, Self::FreeFlow];

    pub fn from_level(level: f64) -> Self {
        let level = if level.is_nan() {
            DEFAULT_TRAFFIC_LEVEL
        } else {
            level.clamp(0.0, 1.0)
        };

        if level >= 0.7 {
            Self::FreeFlow
        } else if level >= 0.5 {
            Self::Light
        } else if level >= 0.3 {
            Self::Moderate
        } else {
            Self::Heavy
        }
    }

    /// RGB colour used when rendering
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::Heavy => [255, 0, 0],
            Self::Moderate => [255, 165, 0],
            Self::Light => [255, 255, 0],
            Self::FreeFlow => [0, 255, 0],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Heavy => "RED: Heavy (0.0-0.3)",
            Self::Moderate => "ORANGE: Moderate (0.3-0.5)",
            Self::Light => "YELLOW: Light (0.5-0.7)",
            Self::FreeFlow => "GREEN: Free flow (0.7-1.0)",
        }
    }
}
