use maud::{Markup, html};
use postpress_common::model::body::{
    Block, BlockStyle, Decorator, Inline, ListKind, Span, TextBlock,
};

enum Segment<'a> {
    List {
        numbered: bool,
        items: Vec<&'a TextBlock>,
    },
    Single(&'a Block),
}

pub fn render_body(blocks: &[Block]) -> Markup {
    html! {
        @for segment in segments(blocks) {
            @match segment {
                Segment::List { numbered: true, items } => {
                    ol { @for item in items { li { (inlines(&item.children)) } } }
                }
                Segment::List { numbered: false, items } => {
                    ul { @for item in items { li { (inlines(&item.children)) } } }
                }
                Segment::Single(block) => (render_block(block)),
            }
        }
    }
}

fn segments(blocks: &[Block]) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();

    for block in blocks {
        let Block::Text(text @ TextBlock {
            list_item: Some(kind),
            ..
        }) = block
        else {
            segments.push(Segment::Single(block));
            continue;
        };

        let numbered = matches!(kind, ListKind::Number);
        if let Some(Segment::List {
            numbered: open,
            items,
        }) = segments.last_mut()
        {
            if *open == numbered {
                items.push(text);
                continue;
            }
        }

        segments.push(Segment::List {
            numbered,
            items: vec![text],
        });
    }

    segments
}

pub fn render_block(block: &Block) -> Markup {
    match block {
        Block::Text(text) => match &text.style {
            BlockStyle::H1 => html! { h1 { (inlines(&text.children)) } },
            BlockStyle::H2 => html! { h2 { (inlines(&text.children)) } },
            BlockStyle::Normal | BlockStyle::Other(_) => html! { p { (inlines(&text.children)) } },
        },
        Block::Unsupported { text, .. } => html! {
            @if let Some(text) = text {
                p { (text) }
            }
        },
    }
}

fn inlines(children: &[Inline]) -> Markup {
    html! {
        @for child in children {
            @match child {
                Inline::Span(span) => (render_span(span)),
                Inline::Link { href, children } if is_safe_href(href) => {
                    a href=(href) { @for span in children { (render_span(span)) } }
                }
                Inline::Link { children, .. } => {
                    @for span in children { (render_span(span)) }
                }
            }
        }
    }
}

fn render_span(span: &Span) -> Markup {
    let mut markup = html! { (span.text) };

    for decorator in &span.decorators {
        markup = match decorator {
            Decorator::Strong => html! { strong { (markup) } },
            Decorator::Em => html! { em { (markup) } },
            Decorator::Code => html! { code { (markup) } },
            Decorator::Underline => html! { u { (markup) } },
            Decorator::StrikeThrough => html! { s { (markup) } },
            Decorator::Other(_) => markup,
        };
    }

    markup
}

fn is_safe_href(href: &str) -> bool {
    if let Some(path) = href.strip_prefix('/') {
        return !path.starts_with(['/', '\\']);
    }
    if href.starts_with('#') {
        return true;
    }

    ["https://", "http://", "mailto:"].iter().any(|scheme| {
        href.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
