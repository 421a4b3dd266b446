//! Asset inputs, the logo cache, and label formatting.
//!
//! The logo cache is an explicitly owned object (the scene owns it, renderers
//! borrow it) rather than a module-level global: loads are idempotent, late
//! completions for a torn-down scene die with the cache, and tests can build
//! as many independent scenes as they like.

use std::sync::Arc;

use fnv::FnvHashMap;

/// One portfolio holding, as supplied by the surrounding application.
#[derive(Clone, Debug)]
pub struct AssetRecord {
    pub symbol: String,
    /// Monetary value; negative inputs are treated as zero at scene build.
    pub value: f64,
    pub color: Option<[f32; 3]>,
    pub image_url: Option<String>,
}

impl AssetRecord {
    pub fn new(symbol: impl Into<String>, value: f64) -> Self {
        Self {
            symbol: symbol.into(),
            value,
            color: None,
            image_url: None,
        }
    }
}

/// Fallback colors for assets that arrive without one, cycled by index.
pub const FALLBACK_PALETTE: [[f32; 3]; 8] = [
    [0.38, 0.65, 0.98],
    [0.95, 0.62, 0.25],
    [0.45, 0.85, 0.55],
    [0.88, 0.40, 0.55],
    [0.70, 0.52, 0.95],
    [0.30, 0.80, 0.85],
    [0.95, 0.85, 0.35],
    [0.60, 0.68, 0.75],
];

#[inline]
pub fn palette_color(index: usize) -> [f32; 3] {
    FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()]
}

#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("logo payload is {got} bytes, expected {expected} for {width}x{height} rgba")]
    Dimensions {
        width: u32,
        height: u32,
        expected: usize,
        got: usize,
    },
    #[error("logo decode failed: {0}")]
    Decode(String),
}

/// A decoded RGBA8 logo image.
#[derive(Clone, Debug)]
pub struct LogoImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl LogoImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, LogoError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(LogoError::Dimensions {
                width,
                height,
                expected,
                got: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }
}

#[derive(Clone, Debug)]
pub enum LogoState {
    /// A load is in flight; render the fallback circle meanwhile.
    Pending,
    Ready(Arc<LogoImage>),
    /// The resolution service returned nothing; fallback is permanent.
    Missing,
}

/// Symbol-keyed logo store shared read-mostly across all asset orbs.
#[derive(Default)]
pub struct LogoCache {
    entries: FnvHashMap<String, LogoState>,
}

impl LogoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a load has started. No-op if the symbol is already known,
    /// so concurrent load attempts converge on one entry.
    pub fn mark_pending(&mut self, symbol: &str) {
        self.entries
            .entry(symbol.to_string())
            .or_insert(LogoState::Pending);
    }

    /// Complete a load. Only a `Pending` (or unknown) entry transitions;
    /// a `Ready` or `Missing` entry is never overwritten, which makes
    /// duplicate completions idempotent.
    pub fn fulfill(&mut self, symbol: &str, result: Result<Option<LogoImage>, LogoError>) {
        let settled = matches!(
            self.entries.get(symbol),
            Some(LogoState::Ready(_) | LogoState::Missing)
        );
        if settled {
            log::debug!("[logo] {symbol}: duplicate completion ignored");
            return;
        }
        let next = match result {
            Ok(Some(image)) => {
                log::info!("[logo] {symbol}: loaded");
                LogoState::Ready(Arc::new(image))
            }
            Ok(None) => LogoState::Missing,
            Err(err) => {
                log::warn!("[logo] {symbol}: {err}");
                LogoState::Missing
            }
        };
        self.entries.insert(symbol.to_string(), next);
    }

    #[inline]
    pub fn get(&self, symbol: &str) -> Option<&LogoState> {
        self.entries.get(symbol)
    }

    #[inline]
    pub fn image(&self, symbol: &str) -> Option<Arc<LogoImage>> {
        match self.entries.get(symbol) {
            Some(LogoState::Ready(img)) => Some(Arc::clone(img)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Format a monetary value for display, with thousands separators.
///
/// When `hidden` is set the label is a masking glyph run; the numeric state
/// behind it is untouched (masking is strictly a formatting concern).
pub fn format_value(value: f64, hidden: bool) -> String {
    if hidden {
        return "••••••".to_string();
    }
    let cents = (value.max(0.0) * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}.{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_value_groups_thousands() {
        assert_eq!(format_value(0.0, false), "$0.00");
        assert_eq!(format_value(1234.5, false), "$1,234.50");
        assert_eq!(format_value(1_234_567.891, false), "$1,234,567.89");
        assert_eq!(format_value(-5.0, false), "$0.00");
    }

    #[test]
    fn format_value_masks_without_touching_input() {
        let v = 98765.43;
        assert_eq!(format_value(v, true), "••••••");
        assert_eq!(format_value(v, false), "$98,765.43");
    }

    #[test]
    fn cache_first_completion_wins() {
        let mut cache = LogoCache::new();
        cache.mark_pending("SOL");
        let img = LogoImage::new(2, 2, vec![0u8; 16]).unwrap();
        cache.fulfill("SOL", Ok(Some(img)));
        assert!(cache.image("SOL").is_some());

        // A late duplicate (e.g. a second in-flight load) must not clobber.
        cache.fulfill("SOL", Ok(None));
        assert!(cache.image("SOL").is_some());
    }

    #[test]
    fn cache_absorbs_decode_errors_as_missing() {
        let mut cache = LogoCache::new();
        cache.fulfill("ETH", Err(LogoError::Decode("bad png".into())));
        assert!(matches!(cache.get("ETH"), Some(LogoState::Missing)));
        assert!(cache.image("ETH").is_none());
    }

    #[test]
    fn logo_image_validates_payload_size() {
        assert!(LogoImage::new(4, 4, vec![0u8; 64]).is_ok());
        assert!(LogoImage::new(4, 4, vec![0u8; 63]).is_err());
    }
}
