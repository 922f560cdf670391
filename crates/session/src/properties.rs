use google_sheets4::api::SheetProperties;

/// Reads of [`SheetProperties`] that treat omitted fields as their zero value,
/// the way the service omits them.
pub trait SheetPropertiesExt {
    /// The sheet's GID.
    fn gid(&self) -> i32;
    /// 0-based position of the sheet.
    fn position(&self) -> i32;
    fn title_str(&self) -> &str;
    fn is_hidden(&self) -> bool;
}

impl SheetPropertiesExt for SheetProperties {
    fn gid(&self) -> i32 {
        self.sheet_id.unwrap_or(0)
    }

    fn position(&self) -> i32 {
        self.index.unwrap_or(0)
    }

    fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }
}
