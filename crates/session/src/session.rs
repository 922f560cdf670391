use crate::config::SessionConfig;
use crate::properties::SheetPropertiesExt;
use crate::service::SheetsService;
use google_sheets4::api::{
    AppendValuesResponse, BatchUpdateSpreadsheetRequest, BatchUpdateSpreadsheetResponse,
    ClearValuesRequest, ClearValuesResponse, CopyPasteRequest,
    CopySheetToAnotherSpreadsheetRequest, GridRange, Request, SheetProperties,
    UpdateSheetPropertiesRequest, UpdateValuesResponse, ValueRange,
};
use google_sheets4::FieldMask;
use gsheets_auth::{OAuthConfig, Token};
use gsheets_core::{
    to_grid_range, CallOptions, CellSpan, CellValue, CopyStep, GSheetError, MajorDimension,
    PasteType, Result, SheetKey, ValueInputOption, ValueMatrix, ValueRenderOption,
};
use std::fmt;
use std::sync::Arc;

/// An authenticated handle bound to one spreadsheet.
///
/// Cloning is cheap and shares the authenticated client. Switching to another
/// spreadsheet returns a new session ([`rebind`](Self::rebind)); a session
/// never changes the spreadsheet it is bound to.
///
/// Every operation is one remote round trip (or a short, non-atomic sequence)
/// and takes a [`CallOptions`] carrying its deadline and cancellation token.
#[derive(Clone)]
pub struct SheetSession {
    service: Arc<SheetsService>,
    spreadsheet_id: String,
    credentials: Arc<[u8]>,
    token: Arc<[u8]>,
    read_only: bool,
    config: SessionConfig,
}

impl fmt::Debug for SheetSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetSession")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

impl SheetSession {
    /// Build a session against the public Sheets API.
    ///
    /// No remote call is made: an expired token is only refreshed when the
    /// first operation needs it.
    ///
    /// # Errors
    ///
    /// - `GSheetError::ConfigParse` if `credentials` are malformed
    /// - `GSheetError::TokenParse` if `token` is malformed
    /// - `GSheetError::ServiceInit` if the client or authenticator cannot be built
    pub async fn new(
        credentials: &[u8],
        token: &[u8],
        spreadsheet_id: impl Into<String>,
        read_only: bool,
    ) -> Result<Self> {
        Self::with_config(
            credentials,
            token,
            spreadsheet_id,
            read_only,
            SessionConfig::default(),
        )
        .await
    }

    /// Build a session with explicit transport settings.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new); an unusable `config.api_base` is a
    /// `GSheetError::ServiceInit`.
    pub async fn with_config(
        credentials: &[u8],
        token: &[u8],
        spreadsheet_id: impl Into<String>,
        read_only: bool,
        config: SessionConfig,
    ) -> Result<Self> {
        let oauth = OAuthConfig::from_json(credentials, read_only)?;
        let parsed_token = Token::from_json(token)?;
        let service = SheetsService::new(&oauth, &parsed_token, &config).await?;
        let spreadsheet_id = spreadsheet_id.into();

        tracing::debug!(
            "Opened Sheets session for '{spreadsheet_id}' (read_only: {read_only})"
        );

        Ok(Self {
            service: Arc::new(service),
            spreadsheet_id,
            credentials: Arc::from(credentials),
            token: Arc::from(token),
            read_only,
            config,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Raw credential bytes the session was built from.
    pub fn credentials(&self) -> &[u8] {
        &self.credentials
    }

    /// Raw token bytes the session was built from.
    pub fn token(&self) -> &[u8] {
        &self.token
    }

    /// A session on the same authenticated client, bound to another spreadsheet.
    #[must_use]
    pub fn rebind(&self, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            ..self.clone()
        }
    }

    /// A session with a freshly built client, bound to `spreadsheet_id` and
    /// scoped by `read_only`.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub async fn reconnect(
        &self,
        spreadsheet_id: impl Into<String>,
        read_only: bool,
    ) -> Result<Self> {
        Self::with_config(
            &self.credentials,
            &self.token,
            spreadsheet_id,
            read_only,
            self.config.clone(),
        )
        .await
    }

    fn options(&self, opts: &CallOptions) -> CallOptions {
        opts.clone().or_deadline(self.service.default_deadline())
    }

    fn range_target(&self, range: &str) -> String {
        format!("spreadsheet '{}' range '{range}'", self.spreadsheet_id)
    }

    // ========================================================================
    // Sheet identity
    // ========================================================================

    /// Properties of every sheet, fetched live.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::SpreadsheetNotFound` if the metadata cannot be
    /// fetched (unknown id, no permission, or any other remote failure).
    pub async fn sheets(&self, opts: &CallOptions) -> Result<Vec<SheetProperties>> {
        let id = self.spreadsheet_id.as_str();
        self.options(opts)
            .run("spreadsheets.get", async {
                let call = self
                    .service
                    .hub()
                    .spreadsheets()
                    .get(id)
                    .param("fields", "spreadsheetId,sheets.properties")
                    .add_scope(self.service.scope())
                    .doit();
                let spreadsheet = self
                    .service
                    .execute("spreadsheets.get", &format!("spreadsheet '{id}'"), call)
                    .await
                    .map_err(|e| match e {
                        GSheetError::RemoteCall {
                            operation: "spreadsheets.get",
                            message,
                            ..
                        } => GSheetError::SpreadsheetNotFound {
                            spreadsheet_id: id.to_string(),
                            message,
                        },
                        other => other,
                    })?;
                Ok(spreadsheet
                    .sheets
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|sheet| sheet.properties)
                    .collect())
            })
            .await
    }

    async fn find_sheet<F>(
        &self,
        key: SheetKey,
        opts: &CallOptions,
        matches: F,
    ) -> Result<SheetProperties>
    where
        F: Fn(&SheetProperties) -> bool,
    {
        self.sheets(opts)
            .await?
            .into_iter()
            .find(|props| matches(props))
            .ok_or_else(|| GSheetError::SheetNotFound {
                spreadsheet_id: self.spreadsheet_id.clone(),
                key,
            })
    }

    /// GID of the sheet at 0-based position `index`.
    ///
    /// # Errors
    ///
    /// `GSheetError::SpreadsheetNotFound` if metadata cannot be fetched,
    /// `GSheetError::SheetNotFound` if no sheet has that index.
    pub async fn gid_by_index(&self, index: i32, opts: &CallOptions) -> Result<i32> {
        self.find_sheet(SheetKey::Index(index), opts, |p| p.position() == index)
            .await
            .map(|p| p.gid())
    }

    /// Title of the sheet at 0-based position `index`.
    ///
    /// # Errors
    ///
    /// As [`gid_by_index`](Self::gid_by_index).
    pub async fn name_by_index(&self, index: i32, opts: &CallOptions) -> Result<String> {
        self.find_sheet(SheetKey::Index(index), opts, |p| p.position() == index)
            .await
            .map(|p| p.title_str().to_string())
    }

    /// Title of the sheet with GID `gid`.
    ///
    /// # Errors
    ///
    /// As [`gid_by_index`](Self::gid_by_index).
    pub async fn name_by_gid(&self, gid: i32, opts: &CallOptions) -> Result<String> {
        self.find_sheet(SheetKey::Gid(gid), opts, |p| p.gid() == gid)
            .await
            .map(|p| p.title_str().to_string())
    }

    /// GID of the first sheet titled `name`.
    ///
    /// # Errors
    ///
    /// As [`gid_by_index`](Self::gid_by_index).
    pub async fn gid_by_name(&self, name: &str, opts: &CallOptions) -> Result<i32> {
        self.find_sheet(SheetKey::Name(name.to_string()), opts, |p| p.title_str() == name)
            .await
            .map(|p| p.gid())
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Read `range` with the given render option.
    ///
    /// The matrix is returned as the service sends it: trailing empty cells
    /// and rows are absent, and no values are coerced.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::RemoteCall` for any remote failure.
    pub async fn read(
        &self,
        range: &str,
        render: ValueRenderOption,
        opts: &CallOptions,
    ) -> Result<ValueMatrix> {
        let target = self.range_target(range);
        self.options(opts)
            .run("values.get", async {
                let call = self
                    .service
                    .hub()
                    .spreadsheets()
                    .values_get(&self.spreadsheet_id, range)
                    .value_render_option(render.as_str())
                    .add_scope(self.service.scope())
                    .doit();
                let values = self.service.execute("values.get", &target, call).await?;
                Ok(values.values.unwrap_or_default())
            })
            .await
    }

    /// Read computed values.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read).
    pub async fn read_values(&self, range: &str, opts: &CallOptions) -> Result<ValueMatrix> {
        self.read(range, ValueRenderOption::FormattedValue, opts).await
    }

    /// Read raw formula text.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read).
    pub async fn read_formulas(&self, range: &str, opts: &CallOptions) -> Result<ValueMatrix> {
        self.read(range, ValueRenderOption::Formula, opts).await
    }

    /// Append rows after the table found at `range`.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::RemoteCall` for any remote failure, including a
    /// matrix shape the service rejects.
    pub async fn append(
        &self,
        range: &str,
        values: &[Vec<CellValue>],
        input: ValueInputOption,
        opts: &CallOptions,
    ) -> Result<AppendValuesResponse> {
        let target = self.range_target(range);
        let body = row_major(values);
        self.options(opts)
            .run("values.append", async {
                let call = self
                    .service
                    .hub()
                    .spreadsheets()
                    .values_append(body, &self.spreadsheet_id, range)
                    .value_input_option(input.as_str())
                    .add_scope(self.service.scope())
                    .doit();
                self.service.execute("values.append", &target, call).await
            })
            .await
    }

    /// Overwrite `range` with `values`.
    ///
    /// # Errors
    ///
    /// As [`append`](Self::append).
    pub async fn update(
        &self,
        range: &str,
        values: &[Vec<CellValue>],
        input: ValueInputOption,
        opts: &CallOptions,
    ) -> Result<UpdateValuesResponse> {
        let target = self.range_target(range);
        let body = row_major(values);
        self.options(opts)
            .run("values.update", async {
                let call = self
                    .service
                    .hub()
                    .spreadsheets()
                    .values_update(body, &self.spreadsheet_id, range)
                    .value_input_option(input.as_str())
                    .add_scope(self.service.scope())
                    .doit();
                self.service.execute("values.update", &target, call).await
            })
            .await
    }

    /// Append literal values.
    ///
    /// # Errors
    ///
    /// As [`append`](Self::append).
    pub async fn append_values(
        &self,
        range: &str,
        values: &[Vec<CellValue>],
        opts: &CallOptions,
    ) -> Result<AppendValuesResponse> {
        self.append(range, values, ValueInputOption::Raw, opts).await
    }

    /// Append values parsed as user input, so formulas are evaluated.
    ///
    /// # Errors
    ///
    /// As [`append`](Self::append).
    pub async fn append_formulas(
        &self,
        range: &str,
        values: &[Vec<CellValue>],
        opts: &CallOptions,
    ) -> Result<AppendValuesResponse> {
        self.append(range, values, ValueInputOption::UserEntered, opts)
            .await
    }

    /// Overwrite with literal values.
    ///
    /// # Errors
    ///
    /// As [`append`](Self::append).
    pub async fn update_values(
        &self,
        range: &str,
        values: &[Vec<CellValue>],
        opts: &CallOptions,
    ) -> Result<UpdateValuesResponse> {
        self.update(range, values, ValueInputOption::Raw, opts).await
    }

    /// Overwrite with values parsed as user input.
    ///
    /// # Errors
    ///
    /// As [`append`](Self::append).
    pub async fn update_formulas(
        &self,
        range: &str,
        values: &[Vec<CellValue>],
        opts: &CallOptions,
    ) -> Result<UpdateValuesResponse> {
        self.update(range, values, ValueInputOption::UserEntered, opts)
            .await
    }

    /// Clear the values in `range`. Formatting is kept.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::RemoteCall` for any remote failure.
    pub async fn clear(&self, range: &str, opts: &CallOptions) -> Result<ClearValuesResponse> {
        let target = self.range_target(range);
        self.options(opts)
            .run("values.clear", async {
                let call = self
                    .service
                    .hub()
                    .spreadsheets()
                    .values_clear(ClearValuesRequest::default(), &self.spreadsheet_id, range)
                    .add_scope(self.service.scope())
                    .doit();
                self.service.execute("values.clear", &target, call).await
            })
            .await
    }

    // ========================================================================
    // Sheet structure
    // ========================================================================

    async fn batch_update(
        &self,
        target: String,
        requests: Vec<Request>,
        opts: &CallOptions,
    ) -> Result<BatchUpdateSpreadsheetResponse> {
        let body = BatchUpdateSpreadsheetRequest {
            requests: Some(requests),
            ..BatchUpdateSpreadsheetRequest::default()
        };
        self.options(opts)
            .run("batchUpdate", async {
                let call = self
                    .service
                    .hub()
                    .spreadsheets()
                    .batch_update(body, &self.spreadsheet_id)
                    .add_scope(self.service.scope())
                    .doit();
                self.service.execute("batchUpdate", &target, call).await
            })
            .await
    }

    /// Rename the sheet with GID `gid`. No other property is touched.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::RemoteCall` for any remote failure.
    pub async fn rename_sheet(
        &self,
        gid: i32,
        title: &str,
        opts: &CallOptions,
    ) -> Result<BatchUpdateSpreadsheetResponse> {
        let properties = SheetProperties {
            sheet_id: Some(gid),
            title: Some(title.to_string()),
            ..SheetProperties::default()
        };
        let target = format!("spreadsheet '{}' sheet {gid}", self.spreadsheet_id);
        self.batch_update(target, vec![update_properties(properties, "title")], opts)
            .await
    }

    /// Hide or show the sheet with GID `gid`. No other property is touched.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::RemoteCall` for any remote failure.
    pub async fn set_sheet_hidden(
        &self,
        gid: i32,
        hidden: bool,
        opts: &CallOptions,
    ) -> Result<BatchUpdateSpreadsheetResponse> {
        let properties = SheetProperties {
            sheet_id: Some(gid),
            hidden: Some(hidden),
            ..SheetProperties::default()
        };
        let target = format!("spreadsheet '{}' sheet {gid}", self.spreadsheet_id);
        self.batch_update(target, vec![update_properties(properties, "hidden")], opts)
            .await
    }

    /// Copy a block of cells between sheets of the bound spreadsheet.
    ///
    /// Spans are 1-based and inclusive. `with_format` pastes everything;
    /// otherwise only formulas are pasted.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::RemoteCall` for any remote failure.
    pub async fn copy_paste(
        &self,
        source_gid: i32,
        dest_gid: i32,
        source: CellSpan,
        dest: CellSpan,
        with_format: bool,
        opts: &CallOptions,
    ) -> Result<BatchUpdateSpreadsheetResponse> {
        let request = Request {
            copy_paste: Some(CopyPasteRequest {
                source: Some(grid_range(source_gid, source)),
                destination: Some(grid_range(dest_gid, dest)),
                paste_type: Some(PasteType::from_format_flag(with_format).as_str().to_string()),
                paste_orientation: Some("NORMAL".to_string()),
            }),
            ..Request::default()
        };
        let target = format!(
            "spreadsheet '{}' sheet {source_gid} -> sheet {dest_gid}",
            self.spreadsheet_id
        );
        self.batch_update(target, vec![request], opts).await
    }

    // ========================================================================
    // Cross-spreadsheet copy
    // ========================================================================

    /// Copy sheet `source_gid` of `source_id` into `dest_id`.
    ///
    /// Does not involve the bound spreadsheet. Returns the new sheet's
    /// properties.
    ///
    /// # Errors
    ///
    /// Returns `GSheetError::RemoteCall` for any remote failure.
    pub async fn copy_sheet_to(
        &self,
        source_id: &str,
        source_gid: i32,
        dest_id: &str,
        opts: &CallOptions,
    ) -> Result<SheetProperties> {
        let target = format!("spreadsheet '{source_id}' sheet {source_gid} -> '{dest_id}'");
        let body = CopySheetToAnotherSpreadsheetRequest {
            destination_spreadsheet_id: Some(dest_id.to_string()),
        };
        self.options(opts)
            .run("sheets.copyTo", async {
                let call = self
                    .service
                    .hub()
                    .spreadsheets()
                    .sheets_copy_to(body, source_id, source_gid)
                    .add_scope(self.service.scope())
                    .doit();
                self.service.execute("sheets.copyTo", &target, call).await
            })
            .await
    }

    /// Copy sheet `source_gid` of `source_id` into the bound spreadsheet.
    ///
    /// With `new_name`, the copy is then renamed and made visible, as two
    /// further calls. The steps are not atomic and nothing is undone on
    /// failure; the deadline in `opts` applies to each step separately.
    ///
    /// # Errors
    ///
    /// - the copy's own error if the copy fails (nothing was created)
    /// - `GSheetError::CopyIncomplete` with `step: CopyStep::Rename` if the
    ///   rename fails, or `step: CopyStep::Unhide` if the unhide fails; the
    ///   error carries the new sheet's GID so the step can be retried
    pub async fn copy_sheet_from(
        &self,
        source_id: &str,
        source_gid: i32,
        new_name: Option<&str>,
        opts: &CallOptions,
    ) -> Result<SheetProperties> {
        let mut copied = self
            .copy_sheet_to(source_id, source_gid, &self.spreadsheet_id, opts)
            .await?;

        let Some(name) = new_name.filter(|name| !name.is_empty()) else {
            return Ok(copied);
        };

        let gid = copied.gid();
        let incomplete = |step: CopyStep, source: GSheetError| {
            tracing::warn!(
                "Copied sheet {gid} into '{}' but {step} failed: {source}",
                self.spreadsheet_id
            );
            GSheetError::CopyIncomplete {
                step,
                spreadsheet_id: self.spreadsheet_id.clone(),
                sheet_id: gid,
                source: Box::new(source),
            }
        };

        self.rename_sheet(gid, name, opts)
            .await
            .map_err(|e| incomplete(CopyStep::Rename, e))?;
        self.set_sheet_hidden(gid, false, opts)
            .await
            .map_err(|e| incomplete(CopyStep::Unhide, e))?;

        copied.title = Some(name.to_string());
        copied.hidden = Some(false);
        Ok(copied)
    }
}

/// Request body for a row-major write.
///
/// The client strips JSON nulls from request bodies, which would shift later
/// cells of a row left, so a null cell is sent as an empty string.
fn row_major(values: &[Vec<CellValue>]) -> ValueRange {
    let rows = values
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    if cell.is_null() {
                        CellValue::String(String::new())
                    } else {
                        cell.clone()
                    }
                })
                .collect()
        })
        .collect();

    ValueRange {
        major_dimension: Some(MajorDimension::Rows.as_str().to_string()),
        values: Some(rows),
        ..ValueRange::default()
    }
}

fn update_properties(properties: SheetProperties, field: &str) -> Request {
    Request {
        update_sheet_properties: Some(UpdateSheetPropertiesRequest {
            properties: Some(properties),
            fields: Some(FieldMask::new(&[field])),
        }),
        ..Request::default()
    }
}

fn grid_range(sheet_id: i32, span: CellSpan) -> GridRange {
    let range = to_grid_range(sheet_id, span);
    GridRange {
        sheet_id: Some(range.sheet_id),
        start_row_index: Some(range.start_row_index),
        end_row_index: Some(range.end_row_index),
        start_column_index: Some(range.start_column_index),
        end_column_index: Some(range.end_column_index),
    }
}
