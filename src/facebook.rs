use crate::client::RapidApiClient;
use crate::error::MetaScanError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub const PROFILE_HOST: &str = "facebook-pages-scraper3.p.rapidapi.com";
pub const PROFILE_PATH: &str = "/get-profile-home-page-details";

pub const PAGE_HOST: &str = "social-media-scrape.p.rapidapi.com";
pub const PAGE_DETAILS_PATH: &str = "/get_facebook_pages_details";
pub const POSTS_DETAILS_PATH: &str = "/get_facebook_posts_details";

pub fn facebook_url(username: &str) -> String {
    format!("https://www.facebook.com/{username}")
}

/// The top-level shape of a provider response.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonShape {
    Object(Map<String, Value>),
    List(Vec<Value>),
    Other(Value),
}

impl From<Value> for JsonShape {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => JsonShape::Object(map),
            Value::Array(list) => JsonShape::List(list),
            other => JsonShape::Other(other),
        }
    }
}

/// Profile home-page details, with any `data` wrapper already removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageInfo(Map<String, Value>);

/// Posts payload in the canonical `{"data": {"posts": [...]}}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostsFeed(Map<String, Value>);

fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

impl Profile {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        present(&self.0, key)
    }

    /// `type_name` when the provider sends it, `type` otherwise.
    pub fn kind(&self) -> Option<&Value> {
        self.field("type_name").or_else(|| self.field("type"))
    }

    pub fn intro_cards(&self) -> Option<&Map<String, Value>> {
        ["INTRO_CARDS", "intro_cards"]
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find(|v| !is_empty_value(v))
            .and_then(Value::as_object)
    }

    pub fn photos(&self) -> Vec<Photo<'_>> {
        ["PHOTOS", "photos"]
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find(|v| !is_empty_value(v))
            .and_then(Value::as_array)
            .map(|list| list.iter().map(|raw| Photo { raw }).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Photo<'a> {
    raw: &'a Value,
}

impl<'a> Photo<'a> {
    pub fn uri(&self) -> Option<&'a Value> {
        ["uri", "url"]
            .iter()
            .filter_map(|key| self.raw.get(*key))
            .find(|v| !is_empty_value(v))
    }

    pub fn id(&self) -> Option<&'a Value> {
        self.raw.get("id").filter(|v| !v.is_null())
    }
}

impl PageInfo {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        present(&self.0, key)
    }
}

impl PostsFeed {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Entries under `data.posts`; anything other than a list reads as empty.
    pub fn posts(&self) -> Vec<Post<'_>> {
        self.0
            .get("data")
            .and_then(|data| data.get("posts"))
            .and_then(Value::as_array)
            .map(|list| list.iter().map(|raw| Post { raw }).collect())
            .unwrap_or_default()
    }
}

/// Read-only view over one post entry.
#[derive(Debug, Clone, Copy)]
pub struct Post<'a> {
    raw: &'a Value,
}

impl<'a> Post<'a> {
    fn nested(&self, section: &str, key: &str) -> Option<&'a Value> {
        self.raw
            .get(section)
            .and_then(|s| s.get(key))
            .filter(|v| !v.is_null())
    }

    pub fn post_id(&self) -> Option<&'a Value> {
        self.nested("details", "post_id")
    }

    pub fn comments_count(&self) -> Option<&'a Value> {
        self.nested("details", "comments_count")
    }

    pub fn share_count(&self) -> Option<&'a Value> {
        self.nested("details", "share_count")
    }

    pub fn total_reactions(&self) -> Option<&'a Value> {
        self.nested("reactions", "total_reaction_count")
    }

    pub fn text(&self) -> Option<&'a Value> {
        self.nested("values", "text")
    }

    pub fn attachments(&self) -> Vec<Attachment<'a>> {
        self.raw
            .get("attachments")
            .and_then(Value::as_array)
            .map(|list| list.iter().map(|raw| Attachment { raw }).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Attachment<'a> {
    raw: &'a Value,
}

impl<'a> Attachment<'a> {
    pub fn typename(&self) -> Option<&'a str> {
        self.raw.get("__typename").and_then(Value::as_str)
    }

    pub fn is_photo(&self) -> bool {
        self.typename() == Some("Photo")
    }

    /// `photo_image.uri` for photo attachments, `None` for any other type.
    pub fn photo_uri(&self) -> Option<Option<&'a Value>> {
        if !self.is_photo() {
            return None;
        }
        Some(
            self.raw
                .get("photo_image")
                .and_then(|image| image.get("uri"))
                .filter(|v| !is_empty_value(v)),
        )
    }
}

/// An object with no fields carries no data.
fn non_empty(map: Map<String, Value>) -> Option<Map<String, Value>> {
    (!map.is_empty()).then_some(map)
}

pub fn parse_profile_response(data: Value) -> Option<Profile> {
    match JsonShape::from(data) {
        JsonShape::Object(mut map) => {
            if matches!(map.get("data"), Some(Value::Object(_))) {
                if let Some(Value::Object(inner)) = map.remove("data") {
                    return non_empty(inner).map(Profile);
                }
            }
            non_empty(map).map(Profile)
        }
        JsonShape::List(_) | JsonShape::Other(_) => None,
    }
}

pub fn parse_page_response(data: Value) -> Option<PageInfo> {
    match JsonShape::from(data) {
        JsonShape::Object(map) => non_empty(map).map(PageInfo),
        JsonShape::List(list) => match list.into_iter().next() {
            Some(Value::Object(first)) => non_empty(first).map(PageInfo),
            _ => None,
        },
        JsonShape::Other(_) => None,
    }
}

pub fn parse_posts_response(data: Value) -> Option<PostsFeed> {
    match JsonShape::from(data) {
        JsonShape::Object(map) if map.contains_key("data") => Some(PostsFeed(map)),
        JsonShape::Object(_) => None,
        JsonShape::List(list) => match json!({ "data": { "posts": list } }) {
            Value::Object(map) => Some(PostsFeed(map)),
            _ => None,
        },
        JsonShape::Other(_) => None,
    }
}

pub async fn get_profile_details(
    client: &RapidApiClient,
    username: &str,
    api_key: &str,
) -> Result<Option<Profile>, MetaScanError> {
    let fb_url = facebook_url(username);
    let params = [("urlSupplier", fb_url.as_str()), ("url", fb_url.as_str())];
    let data = client
        .get_json(PROFILE_HOST, PROFILE_PATH, &params, api_key)
        .await?;
    Ok(parse_profile_response(data))
}

pub async fn get_page_details(
    client: &RapidApiClient,
    username: &str,
    api_key: &str,
) -> Result<Option<PageInfo>, MetaScanError> {
    let fb_url = facebook_url(username);
    let params = [("link", fb_url.as_str())];
    let data = client
        .get_json(PAGE_HOST, PAGE_DETAILS_PATH, &params, api_key)
        .await?;
    Ok(parse_page_response(data))
}

pub async fn get_posts_details(
    client: &RapidApiClient,
    username: &str,
    api_key: &str,
) -> Result<Option<PostsFeed>, MetaScanError> {
    let fb_url = facebook_url(username);
    let params = [("link", fb_url.as_str())];
    let data = client
        .get_json(PAGE_HOST, POSTS_DETAILS_PATH, &params, api_key)
        .await?;
    Ok(parse_posts_response(data))
}
