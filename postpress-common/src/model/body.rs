#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Block {
    Text(TextBlock),
    /// A block type without a rendering rule. `text` is whatever plain text
    /// could be recovered from it.
    Unsupported { kind: String, text: Option<String> },
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct TextBlock {
    pub style: BlockStyle,
    pub list_item: Option<ListKind>,
    pub children: Vec<Inline>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub enum BlockStyle {
    H1,
    H2,
    #[default]
    Normal,
    Other(String),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum ListKind {
    Bullet,
    Number,
    Other(String),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Inline {
    Span(Span),
    Link { href: String, children: Vec<Span> },
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct Span {
    pub text: String,
    pub decorators: Vec<Decorator>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Decorator {
    Strong,
    Em,
    Code,
    Underline,
    StrikeThrough,
    Other(String),
}

impl BlockStyle {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "h1" => Self::H1,
            "h2" => Self::H2,
            "normal" | "" => Self::Normal,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl ListKind {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "bullet" => Self::Bullet,
            "number" => Self::Number,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl Decorator {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "strong" => Self::Strong,
            "em" => Self::Em,
            "code" => Self::Code,
            "underline" => Self::Underline,
            "strike-through" => Self::StrikeThrough,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl Span {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            decorators: Vec::new(),
        }
    }
}

impl TextBlock {
    #[must_use]
    pub fn new(style: BlockStyle, children: Vec<Inline>) -> Self {
        Self {
            style,
            list_item: None,
            children,
        }
    }

    #[must_use]
    pub fn list_item(kind: ListKind, children: Vec<Inline>) -> Self {
        Self {
            style: BlockStyle::Normal,
            list_item: Some(kind),
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::body::{BlockStyle, Decorator, ListKind};

    #[test]
    fn style_names() {
        assert_eq!(BlockStyle::from_name("h1"), BlockStyle::H1);
        assert_eq!(BlockStyle::from_name("h2"), BlockStyle::H2);
        assert_eq!(BlockStyle::from_name("normal"), BlockStyle::Normal);
        assert_eq!(
            BlockStyle::from_name("blockquote"),
            BlockStyle::Other("blockquote".to_owned())
        );
        assert_eq!(ListKind::from_name("bullet"), ListKind::Bullet);
        assert_eq!(Decorator::from_name("strike-through"), Decorator::StrikeThrough);
    }
}
