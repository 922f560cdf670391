use serde::{Deserialize, Serialize};

/// How values are rendered when read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueRenderOption {
    /// Computed and formatted, as shown in the UI.
    #[default]
    FormattedValue,
    /// Computed but not formatted.
    UnformattedValue,
    /// Raw formula text.
    Formula,
}

impl ValueRenderOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FormattedValue => "FORMATTED_VALUE",
            Self::UnformattedValue => "UNFORMATTED_VALUE",
            Self::Formula => "FORMULA",
        }
    }
}

/// How written input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    /// Stored literally.
    Raw,
    /// Parsed as if typed into the UI, so `=SUM(A1:A3)` becomes a formula.
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::UserEntered => "USER_ENTERED",
        }
    }
}

/// Orientation of a value matrix on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MajorDimension {
    #[default]
    Rows,
    Columns,
}

impl MajorDimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Columns => "COLUMNS",
        }
    }
}

/// What a copy-paste carries over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PasteType {
    /// Values, formulas, formats and merges.
    #[serde(rename = "PASTE_NORMAL")]
    Normal,
    /// Formulas only.
    #[serde(rename = "PASTE_FORMULA")]
    Formula,
    /// Values only.
    #[serde(rename = "PASTE_VALUES")]
    Values,
    /// Formatting only.
    #[serde(rename = "PASTE_FORMAT")]
    Format,
}

impl PasteType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "PASTE_NORMAL",
            Self::Formula => "PASTE_FORMULA",
            Self::Values => "PASTE_VALUES",
            Self::Format => "PASTE_FORMAT",
        }
    }

    /// Full copy when `with_format`, otherwise formulas only.
    pub fn from_format_flag(with_format: bool) -> Self {
        if with_format {
            Self::Normal
        } else {
            Self::Formula
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_option_wire_names() {
        assert_eq!(ValueRenderOption::default().as_str(), "FORMATTED_VALUE");
        assert_eq!(ValueRenderOption::Formula.as_str(), "FORMULA");
        assert_eq!(
            serde_json::to_value(ValueRenderOption::UnformattedValue).unwrap(),
            "UNFORMATTED_VALUE"
        );
    }

    #[test]
    fn test_input_option_wire_names() {
        assert_eq!(ValueInputOption::Raw.as_str(), "RAW");
        assert_eq!(
            serde_json::to_value(ValueInputOption::UserEntered).unwrap(),
            "USER_ENTERED"
        );
    }

    #[test]
    fn test_paste_type_from_flag() {
        assert_eq!(PasteType::from_format_flag(true), PasteType::Normal);
        assert_eq!(PasteType::from_format_flag(false), PasteType::Formula);
        assert_eq!(
            serde_json::to_value(PasteType::Formula).unwrap(),
            "PASTE_FORMULA"
        );
        assert_eq!(PasteType::Normal.as_str(), "PASTE_NORMAL");
    }

    #[test]
    fn test_major_dimension_default_is_rows() {
        assert_eq!(serde_json::to_value(MajorDimension::default()).unwrap(), "ROWS");
        assert_eq!(MajorDimension::Columns.as_str(), "COLUMNS");
    }
}
