//! Inbound table-view requests.
//!
//! The widget sends the same request either as a JSON body or as a form / query
//! string using bracketed keys (`columns[0][search][value]=...`). Both decode into
//! [`Request`].

use crate::error::{DtError, DtResult};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// A paging / search / sort request from the widget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Request {
    /// Echoed back so the caller can discard stale responses.
    pub draw: i64,
    pub columns: Vec<RequestColumn>,
    /// First row offset; `-1` means unpaged.
    pub start: i64,
    /// Page size; `-1` means unpaged.
    pub length: i64,
    pub order: Vec<OrderSpec>,
    /// Global search term, applied to every searchable column.
    pub search: Search,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            draw: 0,
            columns: Vec::new(),
            start: 0,
            length: -1,
            order: Vec::new(),
            search: Search::default(),
        }
    }
}

/// One column as the widget describes it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RequestColumn {
    /// The UI field this column displays.
    #[serde(rename = "data", deserialize_with = "de_field_name")]
    pub ui_field: String,
    pub name: String,
    #[serde(deserialize_with = "de_flag")]
    pub searchable: bool,
    #[serde(deserialize_with = "de_flag")]
    pub orderable: bool,
    pub search: Search,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Search {
    pub value: String,
}

/// A sort key: an index into [`Request::columns`] and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OrderSpec {
    pub column: usize,
    #[serde(default)]
    pub dir: Direction,
}

/// Sort direction. The token `"asc"` is ascending; anything else is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl From<&str> for Direction {
    fn from(token: &str) -> Self {
        if token == "asc" {
            Direction::Asc
        } else {
            Direction::Desc
        }
    }
}

impl From<String> for Direction {
    fn from(token: String) -> Self {
        Direction::from(token.as_str())
    }
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl RequestColumn {
    /// A column for `ui_field`; searchable and orderable by default.
    pub fn new(ui_field: impl Into<String>) -> Self {
        Self {
            ui_field: ui_field.into(),
            name: String::new(),
            searchable: true,
            orderable: true,
            search: Search::default(),
        }
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn orderable(mut self, orderable: bool) -> Self {
        self.orderable = orderable;
        self
    }

    /// Set this column's own search term.
    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search.value = value.into();
        self
    }
}

impl Request {
    /// An unpaged request with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(mut self, draw: i64) -> Self {
        self.draw = draw;
        self
    }

    pub fn column(mut self, column: RequestColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set the page window.
    pub fn page(mut self, start: i64, length: i64) -> Self {
        self.start = start;
        self.length = length;
        self
    }

    /// Append a sort key.
    pub fn order_by(mut self, column: usize, dir: Direction) -> Self {
        self.order.push(OrderSpec { column, dir });
        self
    }

    /// Set the global search term.
    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search.value = value.into();
        self
    }

    /// Whether a LIMIT applies.
    pub fn is_paged(&self) -> bool {
        self.start != -1 && self.length != -1
    }

    /// Decode a JSON request body.
    pub fn from_json(body: &str) -> DtResult<Self> {
        serde_json::from_str(body).map_err(|e| DtError::malformed(e.to_string()))
    }

    /// Decode a form-encoded / query-string request.
    ///
    /// A leading `?` is ignored, as are keys the widget sends that the compiler has no use
    /// for (`_`, `search[regex]`, ...). Column indexes must be contiguous from 0.
    pub fn from_query(query: &str) -> DtResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut request = Request::default();
        let mut columns: BTreeMap<usize, RequestColumn> = BTreeMap::new();
        let mut orders: BTreeMap<usize, (Option<usize>, Option<Direction>)> = BTreeMap::new();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let Some((base, segments)) = split_key(&key) else {
                continue;
            };
            match (base, segments.as_slice()) {
                ("draw", []) => request.draw = parse_int(&key, &value)?,
                ("start", []) => request.start = parse_int(&key, &value)?,
                ("length", []) => request.length = parse_int(&key, &value)?,
                ("search", ["value"]) => request.search.value = value.into_owned(),
                ("columns", [idx, field @ ..]) => {
                    let column = columns.entry(parse_index(&key, idx)?).or_default();
                    match field {
                        ["data"] => column.ui_field = value.into_owned(),
                        ["name"] => column.name = value.into_owned(),
                        ["searchable"] => column.searchable = parse_bool(&key, &value)?,
                        ["orderable"] => column.orderable = parse_bool(&key, &value)?,
                        ["search", "value"] => column.search.value = value.into_owned(),
                        _ => {}
                    }
                }
                ("order", [idx, field]) => {
                    let order = orders.entry(parse_index(&key, idx)?).or_default();
                    match *field {
                        "column" => order.0 = Some(parse_index(&key, &value)?),
                        "dir" => order.1 = Some(Direction::from(&*value)),
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        for (expected, &idx) in columns.keys().enumerate() {
            if idx != expected {
                return Err(DtError::malformed(format!(
                    "columns[{expected}] is missing (found columns[{idx}])"
                )));
            }
        }
        request.columns = columns.into_values().collect();

        request.order = orders
            .into_iter()
            .map(|(i, (column, dir))| -> DtResult<OrderSpec> {
                let column = column
                    .ok_or_else(|| DtError::malformed(format!("order[{i}][column] is missing")))?;
                Ok(OrderSpec {
                    column,
                    dir: dir.unwrap_or_default(),
                })
            })
            .collect::<DtResult<Vec<_>>>()?;

        Ok(request)
    }
}

/// Split `columns[0][search][value]` into `("columns", ["0", "search", "value"])`.
fn split_key(key: &str) -> Option<(&str, Vec<&str>)> {
    let (base, mut rest) = match key.find('[') {
        Some(pos) => (&key[..pos], &key[pos..]),
        None => return Some((key, Vec::new())),
    };
    let mut segments = Vec::new();
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let end = inner.find(']')?;
        segments.push(&inner[..end]);
        rest = &inner[end + 1..];
    }
    Some((base, segments))
}

fn parse_int(key: &str, value: &str) -> DtResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| DtError::malformed(format!("{key}: expected an integer, got '{value}'")))
}

fn parse_index(key: &str, value: &str) -> DtResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| DtError::malformed(format!("{key}: expected an index, got '{value}'")))
}

fn parse_bool(key: &str, value: &str) -> DtResult<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(DtError::malformed(format!(
            "{key}: expected true or false, got '{value}'"
        ))),
    }
}

/// Accept `true`/`false` as JSON booleans or as strings (jQuery serializes both ways).
fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => parse_bool("flag", &s).map_err(serde::de::Error::custom),
    }
}

/// `data` may be a property name, an array index, or null for action columns.
fn de_field_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FieldName {
        Name(String),
        Index(u64),
    }

    Ok(match Option::<FieldName>::deserialize(deserializer)? {
        Some(FieldName::Name(s)) => s,
        Some(FieldName::Index(i)) => i.to_string(),
        None => String::new(),
    })
}
