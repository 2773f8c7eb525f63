use crate::model::{Id, author::Author, body::Block, comment::Comment, image::ImageRef, slug::Slug};
use std::collections::HashSet;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct PostSummary {
    pub id: Id<PostMarker>,
    pub slug: Slug,
}

/// Only holds approved comments of this post, each at most once.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub slug: Slug,
    pub created_at: OffsetDateTime,
    pub author: Option<Author>,
    pub content: PostContent,
    comments: Vec<Comment>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct PostContent {
    pub title: String,
    pub description: Option<String>,
    pub main_image: Option<ImageRef>,
    pub body: Vec<Block>,
}

impl Post {
    #[must_use]
    pub fn new(
        id: Id<PostMarker>,
        slug: Slug,
        created_at: OffsetDateTime,
        author: Option<Author>,
        content: PostContent,
    ) -> Self {
        Self {
            id,
            slug,
            created_at,
            author,
            content,
            comments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_comments(mut self, comments: impl IntoIterator<Item = Comment>) -> Self {
        let mut seen = HashSet::new();
        self.comments = comments
            .into_iter()
            .filter(|comment| comment.approved && comment.post == self.id)
            .filter(|comment| seen.insert(comment.id.clone()))
            .collect();
        self
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comment_entries(&self) -> impl Iterator<Item = (&str, &str)> + Clone + '_ {
        self.comments
            .iter()
            .map(|comment| (comment.name.as_str(), comment.comment.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        Id,
        comment::Comment,
        post::{Post, PostContent},
        slug::Slug,
    };
    use time::macros::datetime;

    fn comment(id: &str, post: &str, name: &str, approved: bool) -> Comment {
        Comment {
            id: id.into(),
            post: post.into(),
            name: name.to_owned(),
            comment: format!("{name} says hi"),
            approved,
            created_at: None,
        }
    }

    fn post() -> Post {
        Post::new(
            Id::new("post-1"),
            Slug::new("my-first-post".to_owned()).unwrap(),
            datetime!(2022-03-01 12:00 UTC),
            None,
            PostContent {
                title: "My first post".to_owned(),
                ..PostContent::default()
            },
        )
    }

    #[test]
    fn only_approved_comments_are_kept() {
        let post = post().with_comments([
            comment("c1", "post-1", "Ada", true),
            comment("c2", "post-1", "Bob", false),
            comment("c3", "post-1", "Cy", true),
        ]);

        let names: Vec<_> = post.comment_entries().map(|(name, _)| name).collect();
        assert_eq!(names, ["Ada", "Cy"]);
    }

    #[test]
    fn comments_of_other_posts_and_repeats_are_dropped() {
        let post = post().with_comments([
            comment("c1", "post-1", "Ada", true),
            comment("c2", "post-2", "Bob", true),
            comment("c1", "post-1", "Ada", true),
        ]);

        assert_eq!(post.comments().len(), 1);
        assert_eq!(post.comments()[0].id.get(), "c1");
    }

    #[test]
    fn comment_entries_keep_order_and_restart() {
        let post = post().with_comments([
            comment("c2", "post-1", "Zed", true),
            comment("c1", "post-1", "Amy", true),
        ]);

        let entries = post.comment_entries();
        let first: Vec<_> = entries.clone().collect();
        let second: Vec<_> = entries.collect();

        assert_eq!(first, [("Zed", "Zed says hi"), ("Amy", "Amy says hi")]);
        assert_eq!(first, second);
    }
}
