/// Display icon references
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Prefix the platform uses for references to media it hosts
pub const MEDIA_REF_PREFIX: &str = "yoto:#";

/// Reference to a 16x16 display icon.
///
/// Never empty: an empty or missing value is represented as `None`
/// wherever an icon is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconRef {
    /// Absolute http(s) URL of a public icon
    Url(String),
    /// Platform-hosted media id (serialized with the `yoto:#` prefix)
    Media(String),
}

impl IconRef {
    /// Normalize an untrusted icon string.
    ///
    /// URLs are kept, prefixed references are unwrapped, and any other
    /// non-empty value is treated as a bare media id.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        if value.starts_with("http://") || value.starts_with("https://") {
            return Some(Self::Url(value.to_string()));
        }

        match value.strip_prefix(MEDIA_REF_PREFIX) {
            Some("") => None,
            Some(id) => Some(Self::Media(id.to_string())),
            None => Some(Self::Media(value.to_string())),
        }
    }

    /// Reference to a platform-hosted media id
    pub fn media(id: impl Into<String>) -> Self {
        Self::Media(id.into())
    }

    /// The string stored in `display.icon16x16`
    pub fn to_wire(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Media(id) => format!("{MEDIA_REF_PREFIX}{id}"),
        }
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl Serialize for IconRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for IconRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("empty icon reference"))
    }
}

/// The `display` object attached to chapters and tracks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    #[serde(rename = "icon16x16", default, deserialize_with = "optional_icon")]
    pub icon: Option<IconRef>,
}

/// Empty or blank icon strings read as no icon
fn optional_icon<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<IconRef>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(IconRef::parse))
}

impl Display {
    pub fn new(icon: Option<IconRef>) -> Self {
        Self { icon }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert_eq!(
            IconRef::parse(" https://cdn.example.com/icon.png "),
            Some(IconRef::Url("https://cdn.example.com/icon.png".into()))
        );
        assert_eq!(
            IconRef::parse("http://x/y"),
            Some(IconRef::Url("http://x/y".into()))
        );
    }

    #[test]
    fn test_parse_prefixed_and_bare() {
        assert_eq!(IconRef::parse("yoto:#abc"), Some(IconRef::media("abc")));
        assert_eq!(IconRef::parse("abc"), Some(IconRef::media("abc")));
        assert_eq!(IconRef::media("abc").to_wire(), "yoto:#abc");
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(IconRef::parse(""), None);
        assert_eq!(IconRef::parse("   "), None);
        assert_eq!(IconRef::parse("yoto:#"), None);
    }

    #[test]
    fn test_display_serializes_null_icon() {
        let json = serde_json::to_value(Display::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "icon16x16": null }));

        let json = serde_json::to_value(Display::new(IconRef::parse("m1"))).unwrap();
        assert_eq!(json, serde_json::json!({ "icon16x16": "yoto:#m1" }));
    }

    #[test]
    fn test_display_reads_empty_icon_as_none() {
        for raw in [serde_json::json!(""), serde_json::json!("yoto:#"), serde_json::json!(null)] {
            let display: Display =
                serde_json::from_value(serde_json::json!({ "icon16x16": raw })).unwrap();
            assert_eq!(display.icon, None);
        }

        let display: Display = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(display.icon, None);

        let display: Display =
            serde_json::from_value(serde_json::json!({ "icon16x16": "yoto:#m1" })).unwrap();
        assert_eq!(display.icon, Some(IconRef::media("m1")));
    }
}
