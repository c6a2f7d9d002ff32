//! Validated update records
//!
//! A source reply is untrusted input. Everything in it passes through
//! [`parse_reply`] before the rest of the pipeline sees it: the top-level
//! schema check, the metadata allow-list, and the identity fields a source
//! is not allowed to pick for itself.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::config::{REPLY_KEY_LIMIT, UPDATE_ID_OFFSET};
use crate::source::error::InvalidReply;

/// Metadata keys a source may supply in `info`; everything else is dropped
const INFO_ALLOW_LIST: &[&str] = &[
    "name",
    "slug",
    "version",
    "author",
    "author_profile",
    "contributors",
    "requires",
    "tested",
    "compatibility",
    "rating",
    "num_ratings",
    "downloaded",
    "last_updated",
    "added",
    "homepage",
    "sections",
    "download_link",
    "tags",
];

/// Fully validated result of one source fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRecord {
    /// Derived pseudo id in the reserved band
    pub id: u64,
    pub slug: String,
    pub new_version: String,
    /// Changelog / info link
    pub url: String,
    /// Download URL consumed by the host installer
    pub package: String,
    /// Sanitized metadata served on component-info queries
    pub info: Map<String, Value>,
}

/// Parses and validates one source reply for `slug`.
///
/// A reply must be a JSON object with at most [`REPLY_KEY_LIMIT`] top-level
/// keys, all of `new_version`, `url` and `package` present as strings, and
/// `info` present. With exactly the required keys present the count limit
/// behaves as an exact key-set check; that strictness is intentional.
pub fn parse_reply(slug: &str, body: &[u8]) -> Result<UpdateRecord, InvalidReply> {
    let reply: Value = serde_json::from_slice(body)?;
    let Value::Object(fields) = reply else {
        return Err(InvalidReply::NotAnObject);
    };
    if fields.len() > REPLY_KEY_LIMIT {
        return Err(InvalidReply::TooManyKeys(fields.len()));
    }

    let new_version = require_string(&fields, "new_version")?;
    let url = require_string(&fields, "url")?;
    let package = require_string(&fields, "package")?;
    let info_raw = fields.get("info").ok_or(InvalidReply::MissingKey("info"))?;

    let info = sanitize_info(info_raw, slug, &new_version, &package);

    Ok(UpdateRecord {
        id: derive_update_id(slug),
        slug: slug.to_string(),
        new_version,
        url,
        package,
        info,
    })
}

fn require_string(fields: &Map<String, Value>, key: &'static str) -> Result<String, InvalidReply> {
    match fields.get(key) {
        None => Err(InvalidReply::MissingKey(key)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(InvalidReply::NotAString(key)),
    }
}

/// Keeps allow-listed metadata keys, then pins `slug`, `version` and
/// `download_link` to computed values so a source cannot describe itself
/// inconsistently with its own top-level fields.
fn sanitize_info(raw: &Value, slug: &str, new_version: &str, package: &str) -> Map<String, Value> {
    let mut info = Map::new();
    if let Value::Object(supplied) = raw {
        for (key, value) in supplied {
            if INFO_ALLOW_LIST.contains(&key.as_str()) {
                info.insert(key.clone(), value.clone());
            }
        }
    }
    info.insert("slug".to_string(), Value::String(slug.to_string()));
    info.insert(
        "version".to_string(),
        Value::String(new_version.to_string()),
    );
    info.insert(
        "download_link".to_string(),
        Value::String(package.to_string()),
    );
    info
}

/// Derives the stable pseudo id for a slug.
///
/// Six hex digits of the slug's SHA-256 digest, skipping the leading
/// digit, offset into `50_000_000..=66_777_215`. The band stays below
/// `i32::MAX` and clear of ids the registry issues. Same slug, same id,
/// on every run.
pub fn derive_update_id(slug: &str) -> u64 {
    let digest = Sha256::digest(slug.as_bytes());
    let window = u64::from(digest[0] & 0x0f) << 20
        | u64::from(digest[1]) << 12
        | u64::from(digest[2]) << 4
        | u64::from(digest[3]) >> 4;
    UPDATE_ID_OFFSET + window
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn valid_reply() -> Vec<u8> {
        json!({
            "new_version": "1.1",
            "url": "http://x/info",
            "package": "http://x/pkg.zip",
            "info": {"name": "Foo"}
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn valid_reply_produces_record_with_derived_fields() {
        let record = parse_reply("foo", &valid_reply()).unwrap();

        assert_eq!(record.slug, "foo");
        assert_eq!(record.new_version, "1.1");
        assert_eq!(record.url, "http://x/info");
        assert_eq!(record.package, "http://x/pkg.zip");
        assert_eq!(record.id, derive_update_id("foo"));
        assert_eq!(record.info["name"], json!("Foo"));
    }

    #[test]
    fn reply_with_five_keys_is_rejected() {
        let body = json!({
            "new_version": "1.1",
            "url": "http://x/info",
            "package": "http://x/pkg.zip",
            "info": {},
            "extra": true
        })
        .to_string();

        let result = parse_reply("foo", body.as_bytes());

        assert!(matches!(result, Err(InvalidReply::TooManyKeys(5))));
    }

    #[rstest]
    #[case::no_new_version(json!({"url": "u", "package": "p", "info": {}}))]
    #[case::no_url(json!({"new_version": "1.1", "package": "p", "info": {}}))]
    #[case::no_package(json!({"new_version": "1.1", "url": "u", "info": {}}))]
    #[case::no_info(json!({"new_version": "1.1", "url": "u", "package": "p"}))]
    fn reply_missing_required_key_is_rejected(#[case] reply: Value) {
        let result = parse_reply("foo", reply.to_string().as_bytes());

        assert!(matches!(result, Err(InvalidReply::MissingKey(_))));
    }

    #[rstest]
    #[case::array(json!(["1.1"]))]
    #[case::string(json!("1.1"))]
    #[case::number(json!(42))]
    fn non_object_reply_is_rejected(#[case] reply: Value) {
        let result = parse_reply("foo", reply.to_string().as_bytes());

        assert!(matches!(result, Err(InvalidReply::NotAnObject)));
    }

    #[test]
    fn non_string_version_is_rejected() {
        let body = json!({
            "new_version": 1.1,
            "url": "http://x/info",
            "package": "http://x/pkg.zip",
            "info": {}
        })
        .to_string();

        let result = parse_reply("foo", body.as_bytes());

        assert!(matches!(result, Err(InvalidReply::NotAString("new_version"))));
    }

    #[test]
    fn garbage_body_is_rejected() {
        assert!(matches!(
            parse_reply("foo", b"not json"),
            Err(InvalidReply::Json(_))
        ));
    }

    #[test]
    fn sanitize_drops_unknown_keys_and_pins_identity_fields() {
        let body = json!({
            "new_version": "1.1",
            "url": "http://x/info",
            "package": "http://x/pkg.zip",
            "info": {
                "name": "Foo",
                "version": "0.9",
                "download_link": "http://evil/other.zip",
                "slug": "not-foo",
                "unknown_key": "drop me"
            }
        })
        .to_string();

        let record = parse_reply("foo", body.as_bytes()).unwrap();

        assert_eq!(record.info["name"], json!("Foo"));
        assert_eq!(record.info["slug"], json!("foo"));
        assert_eq!(record.info["version"], json!("1.1"));
        assert_eq!(record.info["download_link"], json!("http://x/pkg.zip"));
        assert!(!record.info.contains_key("unknown_key"));
    }

    #[test]
    fn sanitized_keys_stay_within_allow_list() {
        let body = json!({
            "new_version": "1.1",
            "url": "http://x/info",
            "package": "http://x/pkg.zip",
            "info": {
                "name": "Foo",
                "homepage": "http://x",
                "rating": 95,
                "whatever": 1,
                "sections": {"changelog": "..."}
            }
        })
        .to_string();

        let record = parse_reply("foo", body.as_bytes()).unwrap();

        for key in record.info.keys() {
            assert!(
                INFO_ALLOW_LIST.contains(&key.as_str()),
                "unexpected key {key}"
            );
        }
    }

    #[test]
    fn non_object_info_becomes_pinned_fields_only() {
        let body = json!({
            "new_version": "1.1",
            "url": "http://x/info",
            "package": "http://x/pkg.zip",
            "info": "not a map"
        })
        .to_string();

        let record = parse_reply("foo", body.as_bytes()).unwrap();

        let keys: Vec<_> = record.info.keys().cloned().collect();
        assert_eq!(keys, vec!["download_link", "slug", "version"]);
    }

    #[test]
    fn derived_id_is_deterministic_and_in_band() {
        let first = derive_update_id("foo");
        let second = derive_update_id("foo");

        assert_eq!(first, second);
        assert!((50_000_000..=66_777_215).contains(&first));
    }

    #[test]
    fn derived_ids_differ_between_slugs() {
        assert_ne!(derive_update_id("foo"), derive_update_id("bar"));
    }
}
