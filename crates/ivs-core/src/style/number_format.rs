//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

/// Built-in format ids with a fixed format code
///
/// The remaining ids below 164 (currency, accounting and locale dates) are
/// resolved by the spreadsheet application from its locale.
const BUILTIN_FORMATS: &[(u32, &str)] = &[
    (0, "General"),
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (12, "# ?/?"),
    (13, "# ??/??"),
    (14, "mm-dd-yy"),
    (15, "d-mmm-yy"),
    (16, "d-mmm"),
    (17, "mmm-yy"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (22, "m/d/yy h:mm"),
    (37, "#,##0 ;(#,##0)"),
    (38, "#,##0 ;[Red](#,##0)"),
    (39, "#,##0.00;(#,##0.00)"),
    (40, "#,##0.00;[Red](#,##0.00)"),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mmss.0"),
    (48, "##0.0E+0"),
    (49, "@"),
];

impl NumberFormat {
    /// 2 - 0.00
    pub const ID_NUMBER_DEC2: u32 = 2;

    /// Create a number format from a format string
    ///
    /// Strings matching a built-in format resolve to that built-in id, so
    /// `"0.00"` and [`NumberFormat::decimal`] compare equal.
    pub fn from_string<S: Into<String>>(format: S) -> Self {
        let format = format.into();
        match BUILTIN_FORMATS.iter().find(|(_, code)| *code == format) {
            Some((0, _)) => NumberFormat::General,
            Some((id, _)) => NumberFormat::BuiltIn(*id),
            None => NumberFormat::Custom(format),
        }
    }

    /// Create a built-in format by ID
    pub fn from_id(id: u32) -> Self {
        if id == 0 {
            NumberFormat::General
        } else {
            NumberFormat::BuiltIn(id)
        }
    }

    /// Decimal format (0.00)
    pub fn decimal() -> Self {
        NumberFormat::BuiltIn(Self::ID_NUMBER_DEC2)
    }

    /// Built-in id of this format, `None` for custom formats
    pub fn builtin_id(&self) -> Option<u32> {
        match self {
            NumberFormat::General => Some(0),
            NumberFormat::BuiltIn(id) => Some(*id),
            NumberFormat::Custom(_) => None,
        }
    }

    /// Get the format string
    ///
    /// Built-in ids without a fixed code (such as 44) report `"General"`.
    pub fn format_string(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => builtin_code(*id).unwrap_or("General"),
            NumberFormat::Custom(s) => s,
        }
    }

    /// Check if this format displays as General
    pub fn is_general(&self) -> bool {
        match self {
            NumberFormat::General => true,
            NumberFormat::BuiltIn(id) => builtin_code(*id).is_none(),
            NumberFormat::Custom(_) => false,
        }
    }
}

fn builtin_code(id: u32) -> Option<&'static str> {
    BUILTIN_FORMATS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, code)| *code)
}
