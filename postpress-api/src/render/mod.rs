use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, PreEscaped, html};

pub mod body;
pub mod post;

pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--fg:#111;--fg2:#6b7280;--accent:#a21caf;--accent2:#c026d3;--warn:#c2410c}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:#fff}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img{max-width:100%}
.site-header{display:flex;justify-content:space-between;max-width:64rem;margin:0 auto;padding:1.25rem}
.site-name{font-weight:700;font-size:1.5rem;color:var(--fg)}
.main-image{width:100%;height:24rem;object-fit:cover}
.post{max-width:48rem;margin:0 auto;padding:1.25rem}
.post-title{margin:2.5rem 0 .75rem;font-size:1.875rem}
.post-description{font-size:1.25rem;font-weight:300;color:var(--fg2)}
.byline{display:flex;align-items:center;gap:.5rem;font-size:.875rem;font-weight:200}
.byline img{width:2.5rem;height:2.5rem;border-radius:50%;object-fit:cover}
.author-name{color:#16a34a}
.post-body{margin-top:2.5rem;text-align:justify}
.post-body h1{margin:1.25rem 0;font-size:1.5rem}
.post-body h2{margin:1.25rem 0;font-size:1.25rem}
.post-body p{padding:.5rem 0}
.post-body li{margin-left:1rem}
.divider{max-width:32rem;margin:1.25rem auto;border:1px solid var(--accent2)}
.comment-form{display:flex;flex-direction:column;max-width:42rem;margin:2.5rem auto;padding:1.25rem}
.comment-form h3{font-size:.875rem;color:var(--accent)}
.comment-form h4{font-size:1.875rem}
.comment-form label{display:block;margin-bottom:1.25rem}
.comment-form input[type=text],.comment-form textarea{display:block;width:100%;margin-top:.25rem;padding:.5rem .75rem;border:1px solid #d1d5db;border-radius:.25rem}
.comment-form input[type=submit]{cursor:pointer;padding:.5rem 1rem;border:none;border-radius:.25rem;color:#fff;background:var(--accent2)}
.field-errors{display:flex;flex-direction:column;padding:1.25rem}
.field-error{color:var(--warn)}
.thanks{display:flex;flex-direction:column;max-width:42rem;margin:2.5rem auto;padding:2.5rem;text-align:center;color:#fff;background:var(--accent2)}
.thanks h3{padding:.5rem 0;font-size:1.875rem}
.comments{display:flex;flex-direction:column;gap:.5rem;max-width:42rem;margin:2.5rem auto;padding:2.5rem;box-shadow:0 1px 3px var(--accent)}
.comments h3{font-size:2.25rem}
.comment-name{color:var(--accent2)}
.error-page{max-width:32rem;margin:4rem auto;padding:1.25rem;text-align:center}
.error-page h1{font-size:3rem}
"#;

pub fn page_shell(site_name: &str, title: &str, description: Option<&str>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | " (site_name) }
                @if let Some(description) = description {
                    meta name="description" content=(description);
                }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                (site_header(site_name))
                main { (body) }
            }
        }
    }
}

fn site_header(site_name: &str) -> Markup {
    html! {
        header class="site-header" {
            a class="site-name" href="/" { (site_name) }
        }
    }
}

pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let title = status.canonical_reason().unwrap_or("Error");

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="robots" content="noindex";
                title { (status.as_u16()) " " (title) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main class="error-page" {
                    h1 { (status.as_u16()) }
                    h2 { (title) }
                    p { (message) }
                }
            }
        }
    }
}
