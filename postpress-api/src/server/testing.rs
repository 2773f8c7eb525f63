use crate::render::post::PostRenderer;
use postpress_content::{
    client::{ContentClient, ContentConfig},
    query::{POST_BY_SLUG, POST_SLUGS},
};
use serde_json::{Value, json};
use std::sync::Arc;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

pub const QUERY_PATH: &str = "/v2021-10-21/data/query/production";

pub fn content_client(server: &MockServer) -> Arc<ContentClient> {
    let config = ContentConfig {
        api_host: Some(Url::parse(&server.uri()).unwrap()),
        token: Some("secret".to_owned()),
        ..ContentConfig::new("proj", "production")
    };
    Arc::new(ContentClient::new(&config).unwrap())
}

pub fn renderer() -> Arc<PostRenderer> {
    Arc::new(PostRenderer::new(
        "Postpress",
        ContentConfig::new("proj", "production").image_urls(),
    ))
}

pub fn post_document(id: &str, slug: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "_createdAt": "2022-03-01T12:00:00Z",
        "title": title,
        "author": { "name": "Grace", "image": null },
        "comments": [
            {
                "_id": "c1",
                "_createdAt": "2022-03-02T08:00:00Z",
                "post": { "_ref": id },
                "name": "Ada",
                "comment": "Approved words",
                "approved": true
            },
            {
                "_id": "c2",
                "_createdAt": "2022-03-02T09:00:00Z",
                "post": { "_ref": id },
                "name": "Mallory",
                "comment": "Unapproved words",
                "approved": false
            }
        ],
        "description": "About things",
        "mainImage": null,
        "slug": { "current": slug },
        "body": [{
            "_type": "block",
            "_key": "b1",
            "style": "h1",
            "markDefs": [],
            "children": [{ "_type": "span", "text": "Hello", "marks": [] }]
        }]
    })
}

pub fn post_mock(slug: &str, document: Value) -> Mock {
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("query", POST_BY_SLUG))
        .and(query_param("$slug", format!("\"{slug}\"")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": document })))
}

pub fn listing_mock(posts: &[(&str, &str)]) -> Mock {
    let result: Vec<_> = posts
        .iter()
        .map(|(id, slug)| json!({ "_id": id, "slug": { "current": slug } }))
        .collect();

    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("query", POST_SLUGS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": result })))
}
