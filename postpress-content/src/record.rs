use postpress_common::model::{
    Id, ModelValidationError,
    author::Author,
    body::{Block, BlockStyle, Decorator, Inline, ListKind, Span, TextBlock},
    comment::Comment,
    image::ImageRef,
    post::{Post, PostContent, PostSummary},
    slug::Slug,
};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum RecordError {
    #[error("Document {id} is missing its {field}")]
    MissingField { id: String, field: &'static str },
    #[error(transparent)]
    Model(#[from] ModelValidationError),
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct ReferenceRecord {
    #[serde(rename = "_ref")]
    pub reference: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct SlugRecord {
    pub current: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct ImageRecord {
    pub asset: Option<ReferenceRecord>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct PostSlugRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: Option<SlugRecord>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct AuthorRecord {
    pub name: Option<String>,
    pub image: Option<ImageRecord>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct CommentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdAt", default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    pub post: Option<ReferenceRecord>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub approved: Option<bool>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub title: Option<String>,
    pub author: Option<AuthorRecord>,
    pub comments: Option<Vec<CommentRecord>>,
    pub description: Option<String>,
    #[serde(rename = "mainImage")]
    pub main_image: Option<ImageRecord>,
    pub slug: Option<SlugRecord>,
    pub body: Option<Vec<BlockRecord>>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct BlockRecord {
    #[serde(rename = "_type")]
    pub kind: String,
    pub style: Option<String>,
    #[serde(rename = "listItem")]
    pub list_item: Option<String>,
    pub children: Option<Vec<ChildRecord>>,
    #[serde(rename = "markDefs")]
    pub mark_defs: Option<Vec<MarkDefRecord>>,
    pub text: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct ChildRecord {
    #[serde(rename = "_type")]
    pub kind: Option<String>,
    pub text: Option<String>,
    pub marks: Option<Vec<String>>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct MarkDefRecord {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    pub href: Option<String>,
}

fn parse_slug(id: &str, slug: Option<SlugRecord>) -> Result<Slug, RecordError> {
    let current = slug
        .and_then(|slug| slug.current)
        .ok_or_else(|| RecordError::MissingField {
            id: id.to_owned(),
            field: "slug",
        })?;

    Slug::new(current).map_err(|err| RecordError::Model(err.into()))
}

fn parse_image(image: Option<ImageRecord>) -> Result<Option<ImageRef>, RecordError> {
    image
        .and_then(|image| image.asset)
        .map(|asset| ImageRef::parse(&asset.reference).map_err(ModelValidationError::from))
        .transpose()
        .map_err(RecordError::from)
}

impl TryFrom<PostSlugRecord> for PostSummary {
    type Error = RecordError;

    fn try_from(value: PostSlugRecord) -> Result<Self, Self::Error> {
        let slug = parse_slug(&value.id, value.slug)?;

        Ok(Self {
            id: value.id.into(),
            slug,
        })
    }
}

impl TryFrom<AuthorRecord> for Author {
    type Error = RecordError;

    fn try_from(value: AuthorRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.unwrap_or_default(),
            image: parse_image(value.image)?,
        })
    }
}

impl From<CommentRecord> for Comment {
    fn from(value: CommentRecord) -> Self {
        Self {
            id: value.id.into(),
            post: value
                .post
                .map(|post| Id::new(post.reference))
                .unwrap_or_default(),
            name: value.name.unwrap_or_default(),
            comment: value.comment.unwrap_or_default(),
            approved: value.approved.unwrap_or(false),
            created_at: value.created_at,
        }
    }
}

impl TryFrom<PostRecord> for Post {
    type Error = RecordError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        let slug = parse_slug(&value.id, value.slug)?;
        let author = value.author.map(Author::try_from).transpose()?;

        let content = PostContent {
            title: value.title.unwrap_or_default(),
            description: value.description,
            main_image: parse_image(value.main_image)?,
            body: value
                .body
                .unwrap_or_default()
                .into_iter()
                .map(Block::from)
                .collect(),
        };

        let comments = value
            .comments
            .unwrap_or_default()
            .into_iter()
            .map(Comment::from);

        let post = Post::new(value.id.into(), slug, value.created_at, author, content);
        Ok(post.with_comments(comments))
    }
}

impl From<BlockRecord> for Block {
    fn from(value: BlockRecord) -> Self {
        let children = value.children.unwrap_or_default();

        if value.kind != "block" {
            let text: String = children
                .iter()
                .filter_map(|child| child.text.as_deref())
                .collect();
            let text = Some(text)
                .filter(|text| !text.is_empty())
                .or(value.text);

            debug!(kind = %value.kind, "Keeping block without a rendering rule as plain text");
            return Block::Unsupported {
                kind: value.kind,
                text,
            };
        }

        let links: HashMap<String, String> = value
            .mark_defs
            .unwrap_or_default()
            .into_iter()
            .filter(|def| def.kind == "link")
            .filter_map(|def| Some((def.key, def.href?)))
            .collect();

        Block::Text(TextBlock {
            style: BlockStyle::from_name(value.style.as_deref().unwrap_or("normal")),
            list_item: value.list_item.as_deref().map(ListKind::from_name),
            children: group_links(children, &links),
        })
    }
}

fn group_links(children: Vec<ChildRecord>, links: &HashMap<String, String>) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut open_link: Option<String> = None;

    for child in children {
        let marks = child.marks.unwrap_or_default();
        let link_key = marks.iter().find(|mark| links.contains_key(*mark)).cloned();
        let span = Span {
            text: child.text.unwrap_or_default(),
            decorators: marks
                .iter()
                .filter(|mark| !links.contains_key(*mark))
                .map(|mark| Decorator::from_name(mark))
                .collect(),
        };

        if link_key.is_some() && link_key == open_link {
            if let Some(Inline::Link { children, .. }) = inlines.last_mut() {
                children.push(span);
                continue;
            }
        }

        match link_key {
            Some(key) => {
                inlines.push(Inline::Link {
                    href: links[&key].clone(),
                    children: vec![span],
                });
                open_link = Some(key);
            }
            None => {
                inlines.push(Inline::Span(span));
                open_link = None;
            }
        }
    }

    inlines
}
