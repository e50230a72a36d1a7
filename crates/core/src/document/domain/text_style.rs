/// Font applied to a run of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font_name: String,
    pub size_pt: f32,
}

impl TextStyle {
    pub fn new(font_name: impl Into<String>, size_pt: f32) -> Self {
        Self {
            font_name: font_name.into(),
            size_pt,
        }
    }
}

/// A paragraph of text and the style it should be rendered with. `None`
/// leaves the document's default style in place.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub style: Option<TextStyle>,
}

impl TextBlock {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }
}

/// Returns `block` with `style` applied.
pub fn styled(block: TextBlock, style: &TextStyle) -> TextBlock {
    TextBlock {
        style: Some(style.clone()),
        ..block
    }
}
