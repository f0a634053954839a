//! Annotation options.

use crate::annotation::Annotation;
use std::fmt;

/// Computes the inline style of a segment from the annotations covering it.
pub type StyleFn = Box<dyn Fn(&[Annotation]) -> Option<String>>;

/// Options that control how annotations are rendered and read back.
pub struct AnnotationOptions {
    /// Style of each segment decoration.
    pub get_style: StyleFn,
    /// Text inserted between blocks when deriving an annotation's text.
    pub block_separator: String,
    /// Text substituted for atom nodes when deriving an annotation's text.
    pub leaf_text: String,
}

impl fmt::Debug for AnnotationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationOptions")
            .field("block_separator", &self.block_separator)
            .field("leaf_text", &self.leaf_text)
            .finish_non_exhaustive()
    }
}

impl Default for AnnotationOptions {
    fn default() -> Self {
        Self {
            get_style: Box::new(default_get_style),
            block_separator: "\n".to_string(),
            leaf_text: String::new(),
        }
    }
}

impl AnnotationOptions {
    /// Replace the style function.
    pub fn with_style<F>(mut self, get_style: F) -> Self
    where
        F: Fn(&[Annotation]) -> Option<String> + 'static,
    {
        self.get_style = Box::new(get_style);
        self
    }
}

/// Shade overlapping annotations in darker yellows (saturating at five levels).
pub fn default_get_style(annotations: &[Annotation]) -> Option<String> {
    let depth = annotations.len().min(5) as u32;
    let shade = 255u32.saturating_sub(40 * depth);
    Some(format!("background: rgb(255, 255, {shade});"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_darkens_with_overlap() {
        let one = vec![Annotation::new("a", 0, 1)];
        let many: Vec<_> = (0..8)
            .map(|i| Annotation::new(i.to_string(), 0, 1))
            .collect();
        assert_eq!(
            default_get_style(&one).as_deref(),
            Some("background: rgb(255, 255, 215);")
        );
        assert_eq!(
            default_get_style(&many).as_deref(),
            Some("background: rgb(255, 255, 55);")
        );
    }
}
