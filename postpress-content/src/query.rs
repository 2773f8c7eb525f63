pub const POST_SLUGS: &str = r#"*[_type == "post"]{
  _id,
  slug {
    current
  }
}"#;

pub const POST_BY_SLUG: &str = r#"*[_type == "post" && slug.current == $slug][0]{
  _id,
  _createdAt,
  title,
  author -> {
    name,
    image
  },
  "comments": *[
    _type == "comment" &&
    post._ref == ^._id &&
    approved == true
  ]{
    _id,
    _createdAt,
    post,
    name,
    comment,
    approved
  },
  description,
  mainImage,
  slug,
  body
}"#;

pub const SLUG_PARAM: &str = "slug";
