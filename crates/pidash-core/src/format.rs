//! Human-readable byte, duration, percentage and temperature formatting.

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with binary scaling: "0 B", "1.5 KB", "100.0 MB".
///
/// Picks the largest unit whose scaled value is at least 1, capped at GB.
/// Zero, negative and non-finite inputs render as "0 B".
pub fn format_byte_size(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".into();
    }

    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", BYTE_UNITS[unit])
}

/// Format seconds into a compact duration ("1d 1h", "1h 2m", "2m").
///
/// Components are floored; seconds are never shown. Missing, zero,
/// negative and non-finite inputs render as "--".
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn format_duration(seconds: Option<f64>) -> String {
    let secs = match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s.floor() as u64,
        _ => return "--".into(),
    };

    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Round to the nearest whole number for display.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn round_display(value: f64) -> i64 {
    value.round() as i64
}

/// "30%".
pub fn format_percent(percent: f64) -> String {
    format!("{}%", round_display(percent))
}

/// "52°C".
pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", round_display(celsius))
}

/// Load severity of a usage percentage, used to colour progress bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    #[default]
    Normal,
    Warning,
    Danger,
}

impl Severity {
    /// `Danger` above 80, `Warning` above 60, `Normal` otherwise.
    pub fn from_percent(percent: f64) -> Self {
        if percent > 80.0 {
            Self::Danger
        } else if percent > 60.0 {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_size_examples() {
        assert_eq!(format_byte_size(0.0), "0 B");
        assert_eq!(format_byte_size(512.0), "512.0 B");
        assert_eq!(format_byte_size(1536.0), "1.5 KB");
        assert_eq!(format_byte_size(1024.0 * 1024.0 * 2.5), "2.5 MB");
        assert_eq!(format_byte_size(100.0 * 1024.0 * 1024.0), "100.0 MB");
        assert_eq!(format_byte_size(1024.0 * 1024.0), "1.0 MB");
    }

    #[test]
    fn byte_size_caps_at_gigabytes() {
        assert_eq!(format_byte_size(4.0 * 1024.0_f64.powi(4)), "4096.0 GB");
    }

    #[test]
    fn byte_size_degenerate_inputs() {
        assert_eq!(format_byte_size(-5.0), "0 B");
        assert_eq!(format_byte_size(f64::NAN), "0 B");
    }

    #[test]
    fn duration_examples() {
        assert_eq!(format_duration(Some(0.0)), "--");
        assert_eq!(format_duration(None), "--");
        assert_eq!(format_duration(Some(125.0)), "2m");
        assert_eq!(format_duration(Some(3725.0)), "1h 2m");
        assert_eq!(format_duration(Some(90000.0)), "1d 1h");
    }

    #[test]
    fn duration_floors_components() {
        assert_eq!(format_duration(Some(59.0)), "0m");
        assert_eq!(format_duration(Some(3599.9)), "59m");
        assert_eq!(format_duration(Some(86399.0)), "23h 59m");
    }

    #[test]
    fn percent_and_temperature_round() {
        assert_eq!(format_percent(30.0), "30%");
        assert_eq!(format_percent(24.5), "25%");
        assert_eq!(format_temperature(51.6), "52°C");
    }

    #[test]
    fn severity_boundaries() {
        assert_eq!(Severity::from_percent(30.0), Severity::Normal);
        assert_eq!(Severity::from_percent(60.0), Severity::Normal);
        assert_eq!(Severity::from_percent(61.0), Severity::Warning);
        assert_eq!(Severity::from_percent(80.0), Severity::Warning);
        assert_eq!(Severity::from_percent(80.5), Severity::Danger);
    }
}
