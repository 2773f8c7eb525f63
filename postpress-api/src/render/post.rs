use crate::render::{body::render_body, page_shell};
use maud::{Markup, html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use postpress_common::model::{comment::SubmissionState, post::Post, slug::Slug};
use postpress_content::image::ImageUrlBuilder;
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description,
};

const PUBLISHED_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

/// Everything but the unreserved characters of a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn post_path(slug: &Slug) -> String {
    format!("/post/{}", utf8_percent_encode(slug.get(), SEGMENT))
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct PostRenderer {
    site_name: String,
    images: ImageUrlBuilder,
}

impl PostRenderer {
    pub fn new(site_name: impl Into<String>, images: ImageUrlBuilder) -> Self {
        Self {
            site_name: site_name.into(),
            images,
        }
    }

    pub fn render(&self, post: &Post, state: &SubmissionState) -> Markup {
        let content = &post.content;

        let body = html! {
            @if let Some(image) = &content.main_image {
                img class="main-image" src=(self.images.url(image)) alt="";
            }

            article class="post" {
                h1 class="post-title" { (content.title) }
                @if let Some(description) = &content.description {
                    h2 class="post-description" { (description) }
                }
                (self.byline(post))
                div class="post-body" { (render_body(&content.body)) }
            }

            hr class="divider";

            @if state.shows_form() {
                (comment_form(post, state))
            } @else {
                (thank_you())
            }

            (comment_list(post))
        };

        page_shell(
            &self.site_name,
            &content.title,
            content.description.as_deref(),
            body,
        )
    }

    fn byline(&self, post: &Post) -> Markup {
        let portrait = post.author.as_ref().and_then(|author| author.image.as_ref());

        html! {
            div class="byline" {
                @if let Some(image) = portrait {
                    img src=(self.images.url(image)) alt="";
                }
                p {
                    @if let Some(author) = &post.author {
                        "Blog post by "
                        span class="author-name" { (author.name) }
                        " - "
                    }
                    "Published at "
                    time { (published_at(post.created_at)) }
                }
            }
        }
    }
}

fn published_at(created_at: OffsetDateTime) -> String {
    let created_at = created_at.to_offset(UtcOffset::UTC);
    created_at
        .format(PUBLISHED_FORMAT)
        .unwrap_or_else(|_| created_at.to_string())
}

fn comment_form(post: &Post, state: &SubmissionState) -> Markup {
    let (name, email, comment) = state.draft().map_or(("", "", ""), |draft| {
        (
            draft.name.as_str(),
            draft.email.as_str(),
            draft.comment.as_str(),
        )
    });

    let action = format!("{}/comment", post_path(&post.slug));

    html! {
        form class="comment-form" method="post" action=(action) {
            h3 { "Enjoyed this article?" }
            h4 { "Leave a comment below!" }
            hr;

            input type="hidden" name="_id" value=(post.id);

            label {
                span { "Name" }
                input type="text" name="name" placeholder="Name" value=(name);
            }
            label {
                span { "Email" }
                input type="text" name="email" placeholder="Email" value=(email);
            }
            label {
                span { "Comment" }
                textarea name="comment" placeholder="Comment" rows="8" { (comment) }

                @if let Some(errors) = state.errors() {
                    div class="field-errors" {
                        @for field in errors.fields() {
                            span class="field-error" { "-" (field.message()) }
                        }
                    }
                }
            }

            input type="submit" value="Submit";
        }
    }
}

fn thank_you() -> Markup {
    html! {
        div class="thanks" {
            h3 { "Thank you for submitting your comment." }
            p { "Once it has been approved, it will appear below!" }
        }
    }
}

fn comment_list(post: &Post) -> Markup {
    html! {
        div class="comments" {
            h3 { "Comments" }
            hr;
            @for (name, comment) in post.comment_entries() {
                div class="comment" {
                    p {
                        span class="comment-name" { (name) ": " }
                        (comment)
                    }
                }
            }
        }
    }
}
