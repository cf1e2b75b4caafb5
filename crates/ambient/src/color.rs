/// Linear `[r, g, b]` triple with channels in `[0, 1]`.
pub type Rgb = [f32; 3];

pub const WHITE: Rgb = [1.0, 1.0, 1.0];
pub const BLACK: Rgb = [0.0, 0.0, 0.0];

/// Maximum number of colors a WarpField blends.
pub const MAX_COLORS: usize = 8;

/// Parses `#rgb`, `rgb`, `#rrggbb` or `rrggbb` (surrounding whitespace
/// ignored) into normalized channels.
pub fn parse_hex(input: &str) -> Option<Rgb> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
    match digits.len() {
        3 => {
            let mut rgb = BLACK;
            for (slot, ch) in rgb.iter_mut().zip(digits.chars()) {
                let nibble = ch.to_digit(16)? as f32;
                *slot = nibble * 17.0 / 255.0;
            }
            Some(rgb)
        }
        6 => Some([
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ]),
        _ => None,
    }
}

/// Parses a color, logging and substituting `fallback` when malformed.
pub fn parse_hex_or(input: &str, fallback: Rgb) -> Rgb {
    parse_hex(input).unwrap_or_else(|| {
        tracing::warn!(color = input, ?fallback, "malformed hex color; using fallback");
        fallback
    })
}

/// Up to [`MAX_COLORS`] colors in fixed storage, with the active count kept
/// separately so shaders can loop over a static array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorList {
    slots: [Rgb; MAX_COLORS],
    count: usize,
}

impl ColorList {
    /// Builds the list from hex strings. Empty entries are skipped before the
    /// list is capped; malformed entries become black.
    pub fn from_hex<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        let mut supplied = 0usize;
        for color in colors {
            let color = color.as_ref();
            if color.is_empty() {
                continue;
            }
            supplied += 1;
            if list.count < MAX_COLORS {
                list.slots[list.count] = parse_hex_or(color, BLACK);
                list.count += 1;
            }
        }
        if supplied > MAX_COLORS {
            tracing::debug!(supplied, kept = MAX_COLORS, "dropping colors beyond the limit");
        }
        list
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// All slots; inactive ones are black.
    pub fn slots(&self) -> &[Rgb; MAX_COLORS] {
        &self.slots
    }

    pub fn active(&self) -> &[Rgb] {
        &self.slots[..self.count]
    }
}

impl Default for ColorList {
    fn default() -> Self {
        Self {
            slots: [BLACK; MAX_COLORS],
            count: 0,
        }
    }
}
