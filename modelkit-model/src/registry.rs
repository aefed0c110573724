//! Field type registry.
//!
//! One exhaustive table maps every [`FieldType`] to its capability
//! descriptor. The validator reads the value shape and format from it, the
//! render dispatcher reads the input control and column format from it, so
//! the two can only disagree if this table is wrong.

use crate::FieldType;
use serde::Serialize;

/// Lowest accepted rating.
pub const RATING_MIN: f64 = 0.0;
/// Highest accepted rating.
pub const RATING_MAX: f64 = 5.0;

/// The JSON shape a field's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// A JSON string.
    Text,
    /// A JSON number, or a string that parses as one.
    Number,
    /// A JSON boolean.
    Boolean,
    /// A JSON array of strings.
    StringList,
    /// A reference handed out by the storage collaborator: a URL string or an opaque object.
    Reference,
    /// One reference or an array of references.
    ReferenceList,
}

/// Extra structural check applied to values of the right shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    Plain,
    Email,
    Url,
    HexColor,
    Json,
    Rating,
}

/// Which [`FieldValidation`](crate::FieldValidation) bounds apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeConstraint {
    /// `min_value` / `max_value`.
    Numeric,
    /// `min_length` / `max_length` (characters for text, items for lists).
    Length,
    None,
}

/// The form control used to edit a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputControl {
    TextInput,
    TextArea,
    NumberInput,
    EmailInput,
    UrlInput,
    DatePicker,
    DateTimePicker,
    TimePicker,
    Switch,
    Select,
    MultiSelect,
    RadioGroup,
    CheckboxGroup,
    FileUpload,
    ImageUpload,
    GalleryUpload,
    ColorPicker,
    RatingStars,
    JsonEditor,
    RichTextEditor,
}

/// How a value is shown in a list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFormat {
    /// String coercion; objects become a placeholder label.
    Plain,
    /// "Yes"/"No" badge.
    YesNoBadge,
    Date,
    DateTime,
}

/// Everything the rest of the engine needs to know about a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldCapabilities {
    pub value_shape: ValueShape,
    pub format: ValueFormat,
    pub supports_options: bool,
    pub supports_file_like: bool,
    pub range_constrained: RangeConstraint,
    pub control: InputControl,
    pub column: ColumnFormat,
    /// Whether a value of this type can stand in as an entry's display value.
    pub textual: bool,
}

impl FieldCapabilities {
    const fn new(value_shape: ValueShape, control: InputControl) -> Self {
        Self {
            value_shape,
            format: ValueFormat::Plain,
            supports_options: false,
            supports_file_like: false,
            range_constrained: RangeConstraint::None,
            control,
            column: ColumnFormat::Plain,
            textual: false,
        }
    }

    const fn format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    const fn options(mut self) -> Self {
        self.supports_options = true;
        self
    }

    const fn file_like(mut self) -> Self {
        self.supports_file_like = true;
        self
    }

    const fn range(mut self, range: RangeConstraint) -> Self {
        self.range_constrained = range;
        self
    }

    const fn column(mut self, column: ColumnFormat) -> Self {
        self.column = column;
        self
    }

    const fn textual(mut self) -> Self {
        self.textual = true;
        self
    }
}

const TEXT: FieldCapabilities = FieldCapabilities::new(ValueShape::Text, InputControl::TextInput)
    .range(RangeConstraint::Length)
    .textual();

/// Returns the capability descriptor for a field type.
///
/// Total: unknown tags get the `text` descriptor.
#[must_use]
pub fn capabilities(field_type: &FieldType) -> FieldCapabilities {
    use InputControl as C;
    use RangeConstraint as R;
    use ValueShape as S;

    match field_type {
        FieldType::Text | FieldType::Unknown(_) => TEXT,
        FieldType::Textarea => FieldCapabilities::new(S::Text, C::TextArea)
            .range(R::Length)
            .textual(),
        FieldType::RichText => FieldCapabilities::new(S::Text, C::RichTextEditor)
            .range(R::Length)
            .textual(),
        FieldType::Email => FieldCapabilities::new(S::Text, C::EmailInput)
            .format(ValueFormat::Email)
            .range(R::Length)
            .textual(),
        FieldType::Url => FieldCapabilities::new(S::Text, C::UrlInput)
            .format(ValueFormat::Url)
            .range(R::Length)
            .textual(),
        FieldType::Number => FieldCapabilities::new(S::Number, C::NumberInput).range(R::Numeric),
        FieldType::Rating => FieldCapabilities::new(S::Number, C::RatingStars)
            .format(ValueFormat::Rating)
            .range(R::Numeric),
        FieldType::Boolean => {
            FieldCapabilities::new(S::Boolean, C::Switch).column(ColumnFormat::YesNoBadge)
        }
        FieldType::Date => FieldCapabilities::new(S::Text, C::DatePicker).column(ColumnFormat::Date),
        FieldType::Datetime => {
            FieldCapabilities::new(S::Text, C::DateTimePicker).column(ColumnFormat::DateTime)
        }
        FieldType::Time => FieldCapabilities::new(S::Text, C::TimePicker),
        FieldType::Select => FieldCapabilities::new(S::Text, C::Select)
            .options()
            .range(R::Length),
        FieldType::Radio => FieldCapabilities::new(S::Text, C::RadioGroup)
            .options()
            .range(R::Length),
        FieldType::Multiselect => FieldCapabilities::new(S::StringList, C::MultiSelect)
            .options()
            .range(R::Length),
        FieldType::Checkbox => FieldCapabilities::new(S::StringList, C::CheckboxGroup)
            .options()
            .range(R::Length),
        FieldType::File => FieldCapabilities::new(S::Reference, C::FileUpload).file_like(),
        FieldType::Image => FieldCapabilities::new(S::Reference, C::ImageUpload).file_like(),
        FieldType::Gallery => {
            FieldCapabilities::new(S::ReferenceList, C::GalleryUpload).file_like()
        }
        FieldType::Color => FieldCapabilities::new(S::Text, C::ColorPicker)
            .format(ValueFormat::HexColor),
        FieldType::Json => FieldCapabilities::new(S::Text, C::JsonEditor)
            .format(ValueFormat::Json)
            .range(R::Length),
    }
}

impl FieldType {
    /// Shorthand for [`capabilities`].
    #[must_use]
    pub fn capabilities(&self) -> FieldCapabilities {
        capabilities(self)
    }
}
