use crate::SummaryError;
use serde::de::{value::MapAccessDeserializer, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::io::Read;
use std::marker::PhantomData;

/// Kind tag of a full post inside a listing.
pub const POST_KIND: &str = "t3";

#[derive(Debug, Clone, Default)]
pub struct RedditListing {
    pub kind: String,
    pub data: RedditListingData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditListingData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<RedditChild>,
}

#[derive(Debug, Clone, Default)]
pub struct RedditChild {
    pub kind: String,
    pub data: RedditPost,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditPost {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selftext: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subreddit_name_prefixed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_overridden_by_dest: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub over_18: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_hint: String,
    #[serde(default)]
    pub preview: Option<RedditPreview>,
    #[serde(default)]
    pub media: Option<RedditMedia>,
    #[serde(default)]
    pub secure_media: Option<RedditMedia>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditMedia {
    #[serde(default)]
    pub reddit_video: Option<RedditVideo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditVideo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fallback_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditPreview {
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<RedditImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: RedditImageSource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditImageSource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u32,
}

// `{kind, data}` envelope shared by listings and children.
#[derive(Deserialize)]
#[serde(bound = "T: Default + Deserialize<'de>")]
struct Thing<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    data: T,
}

// serde_json lets a derived struct decode from a positional array;
// envelopes must be objects.
struct ObjectVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for ObjectVisitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<T, A::Error> {
        T::deserialize(MapAccessDeserializer::new(map))
    }
}

fn deserialize_thing<'de, D, T>(deserializer: D) -> Result<Thing<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    deserializer.deserialize_map(ObjectVisitor(PhantomData))
}

impl<'de> Deserialize<'de> for RedditListing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Thing { kind, data } = deserialize_thing(deserializer)?;
        Ok(Self { kind, data })
    }
}

impl<'de> Deserialize<'de> for RedditChild {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Thing { kind, data } = deserialize_thing(deserializer)?;
        Ok(Self { kind, data })
    }
}

// Reddit sends `null` for fields it has no value for; treat that like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes the JSON array a `.json` comments endpoint returns.
pub fn decode_listings(body: &[u8]) -> Result<Vec<RedditListing>, SummaryError> {
    Ok(serde_json::from_slice(body)?)
}

pub fn decode_listings_from_reader<R: Read>(reader: R) -> Result<Vec<RedditListing>, SummaryError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Returns the first `t3` child, scanning listings in order and children in order.
pub fn find_post(listings: &[RedditListing]) -> Result<&RedditPost, SummaryError> {
    listings
        .iter()
        .flat_map(|listing| listing.data.children.iter())
        .find(|child| child.kind == POST_KIND)
        .map(|child| &child.data)
        .ok_or(SummaryError::PostNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(kind: &str, title: &str) -> serde_json::Value {
        serde_json::json!({ "kind": kind, "data": { "title": title } })
    }

    fn listings(children: Vec<Vec<serde_json::Value>>) -> Vec<u8> {
        let value: Vec<_> = children
            .into_iter()
            .map(|c| serde_json::json!({ "kind": "Listing", "data": { "children": c } }))
            .collect();
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_find_post_skips_other_kinds() {
        let body = listings(vec![vec![
            child("t1", "comment"),
            child("more", "more"),
            child("t3", "first post"),
            child("t3", "second post"),
        ]]);
        let decoded = decode_listings(&body).unwrap();
        assert_eq!(find_post(&decoded).unwrap().title, "first post");
    }

    #[test]
    fn test_find_post_scans_later_listings() {
        let body = listings(vec![
            vec![child("t1", "comment")],
            vec![],
            vec![child("t1", "reply"), child("t3", "late post")],
        ]);
        let decoded = decode_listings(&body).unwrap();
        assert_eq!(find_post(&decoded).unwrap().title, "late post");
    }

    #[test]
    fn test_no_post_is_not_found() {
        let body = listings(vec![vec![child("t1", "comment")]]);
        let decoded = decode_listings(&body).unwrap();
        assert!(matches!(find_post(&decoded), Err(SummaryError::PostNotFound)));

        let empty = decode_listings(b"[]").unwrap();
        assert!(matches!(find_post(&empty), Err(SummaryError::PostNotFound)));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        assert!(decode_listings(b"[{\"kind\":").unwrap_err().is_decode_error());
        assert!(decode_listings(b"not json").unwrap_err().is_decode_error());
    }

    #[test]
    fn test_wrong_shape_is_decode_error() {
        let err = decode_listings(br#"{"kind":"Listing","data":{"children":[]}}"#).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_array_envelopes_are_decode_errors() {
        let err = decode_listings(br#"[["Listing",{"children":[["t3",{"title":"x"}]]}]]"#)
            .unwrap_err();
        assert!(err.is_decode_error());

        let err = decode_listings(br#"[{"kind":"Listing","data":{"children":[["t3",{"title":"x"}]]}}]"#)
            .unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_null_fields_decode_to_defaults() {
        let body = br#"[{"kind":"Listing","data":{"children":[{"kind":"t3","data":{
            "title":null,"thumbnail":null,"over_18":null,"preview":null,
            "media":{"reddit_video":null},"secure_media":null}}]}}]"#;
        let decoded = decode_listings(body).unwrap();
        let post = find_post(&decoded).unwrap();
        assert_eq!(post.title, "");
        assert_eq!(post.thumbnail, "");
        assert!(!post.over_18);
        assert!(post.preview.is_none());
        assert!(post.media.as_ref().unwrap().reddit_video.is_none());
    }

    #[test]
    fn test_reader_variant_matches_slice() {
        let body = listings(vec![vec![child("t3", "from reader")]]);
        let decoded = decode_listings_from_reader(body.as_slice()).unwrap();
        assert_eq!(find_post(&decoded).unwrap().title, "from reader");
    }
}
