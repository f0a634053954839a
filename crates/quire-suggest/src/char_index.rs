/// Byte/char offset conversion for regex matches over block text.
#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) | Err(idx) => idx,
        }
    }

    /// `text[from..to]` in chars.
    pub(crate) fn slice<'t>(&self, text: &'t str, from: usize, to: usize) -> &'t str {
        let start = self.char_to_byte[from.min(self.char_count())];
        let end = self.char_to_byte[to.min(self.char_count())];
        text.get(start..end.max(start)).unwrap_or_default()
    }
}
