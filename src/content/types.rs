use crate::transport::TextFormat;

/// Whether formatted content is handled as markup or plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Plain,
    Markup,
}

impl ContentKind {
    pub fn text_format(self) -> TextFormat {
        match self {
            ContentKind::Plain => TextFormat::Plain,
            ContentKind::Markup => TextFormat::Html,
        }
    }
}

/// One delivery-ready slice of formatted content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position within the content unit.
    pub index: usize,
    pub text: String,
    pub kind: ContentKind,
}

impl Chunk {
    pub fn char_len(&self) -> usize {
        super::char_len(&self.text)
    }
}
