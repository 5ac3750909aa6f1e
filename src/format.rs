use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Byte-scale unit used for display conversion only; stored values are
/// always raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    B,
    KB,
    MB,
    #[default]
    GB,
    TB,
}

impl Unit {
    pub const ALL: [Unit; 5] = [Unit::B, Unit::KB, Unit::MB, Unit::GB, Unit::TB];

    pub fn label(self) -> &'static str {
        match self {
            Unit::B => "B",
            Unit::KB => "KB",
            Unit::MB => "MB",
            Unit::GB => "GB",
            Unit::TB => "TB",
        }
    }

    /// Maps a unit string to a `Unit`, falling back to GB for anything
    /// unrecognized. Formatting never fails on bad input; the fallback
    /// symbol is what gets displayed.
    pub fn resolve(s: &str) -> Unit {
        match s {
            "B" => Unit::B,
            "KB" => Unit::KB,
            "MB" => Unit::MB,
            "GB" => Unit::GB,
            "TB" => Unit::TB,
            _ => Unit::GB,
        }
    }

    pub fn next(self) -> Unit {
        match self {
            Unit::B => Unit::KB,
            Unit::KB => Unit::MB,
            Unit::MB => Unit::GB,
            Unit::GB => Unit::TB,
            Unit::TB => Unit::B,
        }
    }

    fn index(self) -> u32 {
        match self {
            Unit::B => 0,
            Unit::KB => 1,
            Unit::MB => 2,
            Unit::GB => 3,
            Unit::TB => 4,
        }
    }
}

/// Converts a raw byte count for display in the given unit: one division
/// by 1024 per unit index, floored at 0.01 so the label never reads zero,
/// two decimals, then the unit symbol.
pub fn format_bytes(bytes: f64, unit: Unit) -> String {
    let mut value = bytes;
    for _ in 0..unit.index() {
        value /= 1024.0;
    }
    format!("{:.2} {}", value.max(0.01), unit.label())
}

/// Elapsed recording time as HH:MM:SS.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}
