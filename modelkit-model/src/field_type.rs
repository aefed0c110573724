use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The kind of a field, which fixes the shape of the values it holds.
///
/// Serialized as the bare snake_case tag (`"rich_text"`, `"multiselect"`).
/// A tag this build does not know deserializes into [`FieldType::Unknown`]
/// with the original tag preserved, so a schema saved by a newer build
/// survives a load/save cycle unchanged and is treated as `text` everywhere
/// else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Number,
    Email,
    Url,
    Date,
    Datetime,
    Time,
    Boolean,
    Select,
    Multiselect,
    Radio,
    Checkbox,
    File,
    Image,
    Gallery,
    Color,
    Rating,
    Json,
    RichText,
    Unknown(String),
}

impl FieldType {
    /// Every field type this build understands, in catalog order.
    #[must_use]
    pub fn known() -> [FieldType; 20] {
        [
            Self::Text,
            Self::Textarea,
            Self::Number,
            Self::Email,
            Self::Url,
            Self::Date,
            Self::Datetime,
            Self::Time,
            Self::Boolean,
            Self::Select,
            Self::Multiselect,
            Self::Radio,
            Self::Checkbox,
            Self::File,
            Self::Image,
            Self::Gallery,
            Self::Color,
            Self::Rating,
            Self::Json,
            Self::RichText,
        ]
    }

    /// Maps a wire tag to a field type. Never fails.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "textarea" => Self::Textarea,
            "number" => Self::Number,
            "email" => Self::Email,
            "url" => Self::Url,
            "date" => Self::Date,
            "datetime" => Self::Datetime,
            "time" => Self::Time,
            "boolean" => Self::Boolean,
            "select" => Self::Select,
            "multiselect" => Self::Multiselect,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "file" => Self::File,
            "image" => Self::Image,
            "gallery" => Self::Gallery,
            "color" => Self::Color,
            "rating" => Self::Rating,
            "json" => Self::Json,
            "rich_text" => Self::RichText,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The wire tag of this field type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Email => "email",
            Self::Url => "url",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Time => "time",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::File => "file",
            Self::Image => "image",
            Self::Gallery => "gallery",
            Self::Color => "color",
            Self::Rating => "rating",
            Self::Json => "json",
            Self::RichText => "rich_text",
            Self::Unknown(tag) => tag,
        }
    }

    /// Whether this build recognizes the tag.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Whether fields of this type carry a list of [`FieldOption`](crate::FieldOption)s.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        self.capabilities().supports_options
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}
