//! Corp-code listing decoding
//!
//! The listing is a root element wrapping one `<list>` element per
//! corporation:
//!
//! ```text
//! <result>
//!   <list>
//!     <corp_code>00126380</corp_code>
//!     <corp_name>삼성전자</corp_name>
//!     <corp_eng_name>SAMSUNG ELECTRONICS CO,.LTD</corp_eng_name>
//!     <stock_code>005930</stock_code>
//!     <modify_date>20230110</modify_date>
//!   </list>
//! </result>
//! ```
//!
//! Each field may appear any number of times (including zero); decoding
//! keeps every value and [`RawCorporation::normalize`] picks the first.

use quick_xml::events::Event;
use quick_xml::name::LocalName;
use quick_xml::Reader;

use crate::error::LoadError;
use crate::models::Corporation;

const RECORD_TAG: &str = "list";

/// Known child elements of a `<list>` record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    CorpCode,
    CorpName,
    CorpEngName,
    StockCode,
    ModifyDate,
}

impl Field {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "corp_code" => Some(Field::CorpCode),
            "corp_name" => Some(Field::CorpName),
            "corp_eng_name" => Some(Field::CorpEngName),
            "stock_code" => Some(Field::StockCode),
            "modify_date" => Some(Field::ModifyDate),
            _ => None,
        }
    }
}

/// A record as it appears in the document, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCorporation {
    pub corp_code: Vec<String>,
    pub corp_name: Vec<String>,
    pub corp_eng_name: Vec<String>,
    pub stock_code: Vec<String>,
    pub modify_date: Vec<String>,
}

impl RawCorporation {
    fn push(&mut self, field: Field, value: String) {
        let values = match field {
            Field::CorpCode => &mut self.corp_code,
            Field::CorpName => &mut self.corp_name,
            Field::CorpEngName => &mut self.corp_eng_name,
            Field::StockCode => &mut self.stock_code,
            Field::ModifyDate => &mut self.modify_date,
        };
        values.push(value);
    }

    /// Turn the raw record into a storable row.
    ///
    /// Returns `None` when `corp_code` or `corp_name` is absent or blank.
    /// `corp_code` and `corp_name` are stored trimmed. Blank English names
    /// and stock codes become `None`; `modify_date` is kept as written.
    pub fn normalize(&self) -> Option<Corporation> {
        Some(Corporation {
            corp_code: non_blank(&self.corp_code)?,
            corp_name: non_blank(&self.corp_name)?,
            corp_eng_name: non_blank(&self.corp_eng_name),
            stock_code: non_blank(&self.stock_code),
            modify_date: self.modify_date.first().cloned(),
        })
    }
}

fn non_blank(values: &[String]) -> Option<String> {
    values
        .first()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn malformed(message: impl Into<String>) -> LoadError {
    LoadError::Malformed(message.into())
}

fn tag_name(name: LocalName<'_>) -> Result<String, LoadError> {
    std::str::from_utf8(name.as_ref())
        .map(str::to_owned)
        .map_err(|e| malformed(format!("element name is not UTF-8: {e}")))
}

/// Whitespace (or a byte-order mark) between top-level nodes
fn is_blank(bytes: &[u8]) -> bool {
    String::from_utf8_lossy(bytes)
        .chars()
        .all(|c| c.is_whitespace() || c == '\u{feff}')
}

/// Decode a corp-code listing into raw records, in document order.
///
/// Fails on anything that is not a single well-formed element tree.
pub fn parse_document(xml: &str) -> Result<Vec<RawCorporation>, LoadError> {
    let mut reader = Reader::from_str(xml);

    let mut open: Vec<String> = Vec::new();
    let mut records = Vec::new();
    let mut current: Option<RawCorporation> = None;
    let mut field: Option<(Field, String)> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = tag_name(e.local_name())?;
                match open.len() {
                    0 if saw_root => return Err(malformed("more than one root element")),
                    0 => saw_root = true,
                    1 if name == RECORD_TAG => current = Some(RawCorporation::default()),
                    2 if current.is_some() => {
                        field = Field::from_tag(&name).map(|f| (f, String::new()));
                    }
                    _ => {}
                }
                open.push(name);
            }
            Event::Empty(e) => {
                let name = tag_name(e.local_name())?;
                match open.len() {
                    0 if saw_root => return Err(malformed("more than one root element")),
                    0 => saw_root = true,
                    1 if name == RECORD_TAG => records.push(RawCorporation::default()),
                    2 => {
                        if let (Some(record), Some(f)) = (current.as_mut(), Field::from_tag(&name)) {
                            record.push(f, String::new());
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(text) => {
                if open.is_empty() {
                    if is_blank(&text) {
                        continue;
                    }
                    return Err(malformed("text outside the root element"));
                }
                if let Some((_, buf)) = field.as_mut() {
                    let unescaped = text
                        .unescape()
                        .map_err(|e| malformed(format!("bad character reference: {e}")))?;
                    buf.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some((_, buf)) = field.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(e) => {
                let name = tag_name(e.local_name())?;
                let expected = open
                    .pop()
                    .ok_or_else(|| malformed(format!("unexpected closing tag </{name}>")))?;
                if expected != name {
                    return Err(malformed(format!(
                        "expected </{expected}>, found </{name}>"
                    )));
                }
                match open.len() {
                    2 => {
                        if let (Some(record), Some((f, value))) = (current.as_mut(), field.take()) {
                            record.push(f, value);
                        }
                    }
                    1 if name == RECORD_TAG => {
                        if let Some(record) = current.take() {
                            records.push(record);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => {
                if let Some(unclosed) = open.last() {
                    return Err(malformed(format!(
                        "document ended inside <{unclosed}>"
                    )));
                }
                if !saw_root {
                    return Err(malformed("no root element"));
                }
                break;
            }
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    Ok(records)
}
