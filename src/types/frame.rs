//! Frame envelope for terminal and wire output

use colored::Colorize;
use serde::Serialize;

use crate::types::{
    candle_offset, needle_angle, EmfFrame, InstrumentKind, MagnetometerFrame, RadarFrame,
};

/// Any instrument's published frame
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "instrument", rename_all = "lowercase")]
pub enum Frame {
    Emf(EmfFrame),
    Radar(RadarFrame),
    Magnetometer(MagnetometerFrame),
}

impl Frame {
    pub fn kind(&self) -> InstrumentKind {
        match self {
            Frame::Emf(_) => InstrumentKind::Emf,
            Frame::Radar(_) => InstrumentKind::Radar,
            Frame::Magnetometer(_) => InstrumentKind::Magnetometer,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let kind = self.kind();
        let head = format!("{} {}", kind.emoji(), kind);
        match self {
            Frame::Emf(f) => format!(
                "{} {} | band={} | needle={:+.0}° | {} t={:.2}s",
                head.bold(),
                format!("{:>5.1} mG", f.value).color(f.band.color()).bold(),
                f.band.to_string().color(f.band.color()),
                needle_angle(f.value),
                f.pattern_name.dimmed(),
                f.elapsed,
            ),
            Frame::Radar(f) => {
                let status = if !f.active {
                    "idle".dimmed().to_string()
                } else if f.scanning {
                    "scanning...".yellow().to_string()
                } else {
                    format!("{} contact(s)", f.dots.len()).green().bold().to_string()
                };
                format!(
                    "{} {} | {} t={:.1}s",
                    head.bold(),
                    status,
                    f.pattern_name.unwrap_or("-").dimmed(),
                    f.elapsed,
                )
            }
            Frame::Magnetometer(f) => format!(
                "{} {} | flame={:.2} (offset {:.1})",
                head.bold(),
                format!("{:>+7.1}", f.reading.value).magenta().bold(),
                f.reading.intensity,
                candle_offset(f.reading.intensity),
            ),
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        match self {
            Frame::Emf(f) => format!(
                "emf value={:.3} | band={} | pattern={} | t={:.2}",
                f.value, f.band, f.pattern, f.elapsed
            ),
            Frame::Radar(f) => {
                let dots: Vec<String> = f
                    .dots
                    .iter()
                    .map(|d| format!("({:.3},{:.3},{:.2})", d.position.x, d.position.y, d.intensity))
                    .collect();
                format!(
                    "radar dots={} | pattern={} | t={:.1} | {}",
                    f.dots.len(),
                    f.pattern.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
                    f.elapsed,
                    dots.join(" ")
                )
            }
            Frame::Magnetometer(f) => format!(
                "magnetometer value={:.3} | intensity={:.3}",
                f.reading.value, f.reading.intensity
            ),
        }
    }
}

impl From<EmfFrame> for Frame {
    fn from(f: EmfFrame) -> Self {
        Frame::Emf(f)
    }
}

impl From<RadarFrame> for Frame {
    fn from(f: RadarFrame) -> Self {
        Frame::Radar(f)
    }
}

impl From<MagnetometerFrame> for Frame {
    fn from(f: MagnetometerFrame) -> Self {
        Frame::Magnetometer(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MagnetometerReading;

    #[test]
    fn test_parseable_emf() {
        let frame = Frame::from(EmfFrame::new(42.0, 0, "Haunting", 1.5, true));
        let s = frame.to_parseable_string();
        assert!(s.starts_with("emf value=42.000"));
        assert!(s.contains("band=GREEN"));
    }

    #[test]
    fn test_json_tagged_by_instrument() {
        let frame = Frame::from(MagnetometerFrame::new(MagnetometerReading::from_value(-50.0), true));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["instrument"], "magnetometer");
        assert_eq!(json["intensity"], 0.5);
    }
}
