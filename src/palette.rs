use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

static PALETTE: OnceLock<Palette> = OnceLock::new();

/// Get the active palette (loaded once on first call).
pub fn current() -> &'static Palette {
    PALETTE.get_or_init(|| Palette::load().unwrap_or_default())
}

/// The `{background, border, text}` triple attached to every rendered event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventColors {
    pub bg: String,
    pub border: String,
    pub text: String,
}

impl EventColors {
    fn new(bg: &str, border: &str, text: &str) -> Self {
        Self {
            bg: bg.to_string(),
            border: border.to_string(),
            text: text.to_string(),
        }
    }
}

/// Colors for events with an empty or absent modality.
fn default_colors() -> EventColors {
    EventColors::new("#f3f4f6", "#9ca3af", "#374151")
}

/// Fixed palette applied at render time to conflicted events.
fn conflict_colors() -> EventColors {
    EventColors::new("#fee2e2", "#ef4444", "#991b1b")
}

/// Derive the color triple for a modality string.
///
/// Non-empty input goes through a stable string hash, so the same modality
/// always yields the same colors across calls and across runs. Empty or
/// blank input yields the palette's default triple.
pub fn colors_for(kind: &str) -> EventColors {
    let normalized = kind.trim().to_lowercase();
    if normalized.is_empty() {
        return current().default.clone();
    }

    let hash = string_hash(&normalized);
    let hue = hash.unsigned_abs() % 360;
    let saturation = 45 + ((hash >> 8).unsigned_abs() % 35);

    EventColors {
        bg: format!("hsl({hue}, {saturation}%, 88%)"),
        border: format!("hsl({hue}, {saturation}%, 50%)"),
        text: format!("hsl({hue}, {saturation}%, 25%)"),
    }
}

/// 32-bit string hash over UTF-16 units (`h = h * 31 + unit`, wrapping).
fn string_hash(s: &str) -> i32 {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash
}

#[derive(Debug, Clone)]
pub struct Palette {
    pub default: EventColors,
    pub conflict: EventColors,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            default: default_colors(),
            conflict: conflict_colors(),
        }
    }
}

impl Palette {
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        let config: PaletteConfig = toml::from_str(&content).ok()?;
        Some(config.into_palette())
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pampatime").join("palette.toml"))
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
struct PaletteConfig {
    default_bg: Option<String>,
    default_border: Option<String>,
    default_text: Option<String>,
    conflict_bg: Option<String>,
    conflict_border: Option<String>,
    conflict_text: Option<String>,
}

impl PaletteConfig {
    fn into_palette(self) -> Palette {
        let mut palette = Palette::default();

        if let Some(c) = self.default_bg {
            palette.default.bg = c;
        }
        if let Some(c) = self.default_border {
            palette.default.border = c;
        }
        if let Some(c) = self.default_text {
            palette.default.text = c;
        }
        if let Some(c) = self.conflict_bg {
            palette.conflict.bg = c;
        }
        if let Some(c) = self.conflict_border {
            palette.conflict.border = c;
        }
        if let Some(c) = self.conflict_text {
            palette.conflict.text = c;
        }

        palette
    }
}
