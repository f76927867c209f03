//! Text measurement collaborator.

use std::cell::RefCell;
use std::fmt;

use crate::foundation::lru::LruCache;

/// Entries kept by [`TextWidthCache`].
pub const TEXT_WIDTH_CACHE_CAPACITY: usize = 500;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
}

/// Measures a single line of text in a CSS font.
pub trait TextMeasurer {
    fn measure_text(&self, text: &str, font: &str) -> TextMetrics;
}

/// Every character advances by a fixed fraction of the font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasurer {
    /// Advance per character, in em.
    pub advance_em: f64,
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self { advance_em: 0.6 }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure_text(&self, text: &str, font: &str) -> TextMetrics {
        let size = parse_font_size(font).unwrap_or(12.0);
        TextMetrics {
            width: text.chars().count() as f64 * size * self.advance_em,
        }
    }
}

/// Pixel size from a CSS font shorthand (`"bold 14px serif"` -> `14`).
pub fn parse_font_size(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|tok| tok.strip_suffix("px")?.parse::<f64>().ok())
}

/// Measurer wrapper memoizing widths per `(font, text)`.
pub struct TextWidthCache {
    measurer: Box<dyn TextMeasurer>,
    cache: RefCell<LruCache<(String, String), f64>>,
}

impl fmt::Debug for TextWidthCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextWidthCache")
            .field("entries", &self.cache.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Default for TextWidthCache {
    fn default() -> Self {
        Self::new(Box::new(FixedAdvanceMeasurer::default()))
    }
}

impl TextWidthCache {
    pub fn new(measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            measurer,
            cache: RefCell::new(LruCache::new(TEXT_WIDTH_CACHE_CAPACITY)),
        }
    }

    pub fn width(&self, text: &str, font: &str) -> f64 {
        let key = (font.to_owned(), text.to_owned());
        if let Some(w) = self.cache.borrow_mut().get(&key) {
            return *w;
        }
        let w = self.measurer.measure_text(text, font).width;
        self.cache.borrow_mut().put(key, w);
        w
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/text.rs"]
mod tests;
