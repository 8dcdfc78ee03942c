//! Minimal XML-RPC codec for talking to supervisord
//!
//! Encodes `methodCall` documents and decodes `methodResponse` documents,
//! including `<fault>` responses, into a small [`Value`] tree.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesText, Event};

use crate::error::{CheckError, CheckResult};

/// XML-RPC value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    DateTime(String),
    Base64(String),
    Struct(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Nil,
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

/// Render a `methodCall` document
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut body = String::from("<?xml version=\"1.0\"?>\n<methodCall>\n");
    let _ = writeln!(body, "<methodName>{}</methodName>", escape(method));
    body.push_str("<params>\n");
    for param in params {
        body.push_str("<param>");
        encode_value(&mut body, param);
        body.push_str("</param>\n");
    }
    body.push_str("</params>\n</methodCall>\n");
    body
}

fn encode_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(n) => {
            let _ = write!(out, "<int>{n}</int>");
        }
        Value::Bool(b) => {
            let _ = write!(out, "<boolean>{}</boolean>", u8::from(*b));
        }
        Value::String(s) => {
            let _ = write!(out, "<string>{}</string>", escape(s.as_str()));
        }
        Value::Double(d) => {
            let _ = write!(out, "<double>{d}</double>");
        }
        Value::DateTime(s) => {
            let _ = write!(out, "<dateTime.iso8601>{}</dateTime.iso8601>", escape(s.as_str()));
        }
        Value::Base64(s) => {
            let _ = write!(out, "<base64>{}</base64>", escape(s.as_str()));
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                let _ = write!(out, "<member><name>{}</name>", escape(name.as_str()));
                encode_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

/// Decode a `methodResponse`; a `<fault>` becomes [`CheckError::RemoteFault`]
pub fn decode_response(body: &str) -> CheckResult<Value> {
    Parser::new(body).parse_response()
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(body: &'a str) -> Self {
        Self {
            reader: Reader::from_str(body),
        }
    }

    fn parse_response(&mut self) -> CheckResult<Value> {
        self.expect_start(b"methodResponse")?;
        let outcome = match self.next()? {
            Event::Start(e) if e.name().as_ref() == b"params" => {
                self.expect_start(b"param")?;
                let value = self.parse_value_element()?;
                self.expect_end(b"param")?;
                self.expect_end(b"params")?;
                Ok(value)
            }
            Event::Start(e) if e.name().as_ref() == b"fault" => {
                let value = self.parse_value_element()?;
                self.expect_end(b"fault")?;
                Err(fault_from_value(&value)?)
            }
            other => return Err(unexpected("params", &other)),
        };
        self.expect_end(b"methodResponse")?;
        outcome
    }

    fn read_raw(&mut self) -> CheckResult<Event<'a>> {
        self.reader
            .read_event()
            .map_err(|e| CheckError::protocol(format!("invalid XML: {e}")))
    }

    /// Next structural event, skipping prolog, comments and whitespace between elements
    fn next(&mut self) -> CheckResult<Event<'a>> {
        loop {
            match self.read_raw()? {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => {}
                other => return Ok(other),
            }
        }
    }

    fn expect_start(&mut self, tag: &[u8]) -> CheckResult<()> {
        match self.next()? {
            Event::Start(e) if e.name().as_ref() == tag => Ok(()),
            other => Err(unexpected(&String::from_utf8_lossy(tag), &other)),
        }
    }

    fn expect_end(&mut self, tag: &[u8]) -> CheckResult<()> {
        match self.next()? {
            Event::End(e) if e.name().as_ref() == tag => Ok(()),
            other => Err(unexpected(&format!("/{}", String::from_utf8_lossy(tag)), &other)),
        }
    }

    fn parse_value_element(&mut self) -> CheckResult<Value> {
        match self.next()? {
            Event::Start(e) if e.name().as_ref() == b"value" => self.parse_value_body(),
            Event::Empty(e) if e.name().as_ref() == b"value" => Ok(Value::String(String::new())),
            other => Err(unexpected("value", &other)),
        }
    }

    /// Contents of a `<value>` up to and including `</value>`; bare text is a string
    fn parse_value_body(&mut self) -> CheckResult<Value> {
        let mut text = String::new();
        loop {
            match self.read_raw()? {
                Event::End(e) if e.name().as_ref() == b"value" => return Ok(Value::String(text)),
                Event::Text(t) => text.push_str(&unescape_text(&t)?),
                Event::CData(c) => text.push_str(&utf8(c.into_inner())?),
                Event::Comment(_) => {}
                Event::Start(e) => {
                    ensure_blank(&text)?;
                    let tag = e.name().as_ref().to_vec();
                    let value = self.parse_typed(&tag)?;
                    self.expect_end(b"value")?;
                    return Ok(value);
                }
                Event::Empty(e) => {
                    ensure_blank(&text)?;
                    let value = empty_typed(e.name().as_ref())?;
                    self.expect_end(b"value")?;
                    return Ok(value);
                }
                other => return Err(unexpected("/value", &other)),
            }
        }
    }

    fn parse_typed(&mut self, tag: &[u8]) -> CheckResult<Value> {
        match tag {
            b"struct" => self.parse_struct(),
            b"array" => self.parse_array(),
            b"nil" => {
                self.expect_end(b"nil")?;
                Ok(Value::Nil)
            }
            _ => {
                let text = self.read_text(tag)?;
                scalar(tag, text)
            }
        }
    }

    /// Text content up to the closing tag
    fn read_text(&mut self, tag: &[u8]) -> CheckResult<String> {
        let mut text = String::new();
        loop {
            match self.read_raw()? {
                Event::End(e) if e.name().as_ref() == tag => return Ok(text),
                Event::Text(t) => text.push_str(&unescape_text(&t)?),
                Event::CData(c) => text.push_str(&utf8(c.into_inner())?),
                Event::Comment(_) => {}
                other => {
                    return Err(unexpected(
                        &format!("/{}", String::from_utf8_lossy(tag)),
                        &other,
                    ));
                }
            }
        }
    }

    fn parse_struct(&mut self) -> CheckResult<Value> {
        let mut members = BTreeMap::new();
        loop {
            match self.next()? {
                Event::End(e) if e.name().as_ref() == b"struct" => {
                    return Ok(Value::Struct(members));
                }
                Event::Start(e) if e.name().as_ref() == b"member" => {
                    let name = match self.next()? {
                        Event::Start(n) if n.name().as_ref() == b"name" => self.read_text(b"name")?,
                        Event::Empty(n) if n.name().as_ref() == b"name" => String::new(),
                        other => return Err(unexpected("name", &other)),
                    };
                    let value = self.parse_value_element()?;
                    self.expect_end(b"member")?;
                    members.insert(name, value);
                }
                other => return Err(unexpected("member", &other)),
            }
        }
    }

    fn parse_array(&mut self) -> CheckResult<Value> {
        let mut items = Vec::new();
        match self.next()? {
            Event::Start(e) if e.name().as_ref() == b"data" => loop {
                match self.next()? {
                    Event::End(e) if e.name().as_ref() == b"data" => break,
                    Event::Start(e) if e.name().as_ref() == b"value" => {
                        items.push(self.parse_value_body()?);
                    }
                    Event::Empty(e) if e.name().as_ref() == b"value" => {
                        items.push(Value::String(String::new()));
                    }
                    other => return Err(unexpected("value", &other)),
                }
            },
            Event::Empty(e) if e.name().as_ref() == b"data" => {}
            other => return Err(unexpected("data", &other)),
        }
        self.expect_end(b"array")?;
        Ok(Value::Array(items))
    }
}

fn scalar(tag: &[u8], text: String) -> CheckResult<Value> {
    let trimmed = text.trim();
    match tag {
        b"int" | b"i4" | b"i8" => trimmed
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| CheckError::protocol(format!("invalid integer '{trimmed}'"))),
        b"boolean" => match trimmed {
            "1" => Ok(Value::Bool(true)),
            "0" => Ok(Value::Bool(false)),
            _ => Err(CheckError::protocol(format!("invalid boolean '{trimmed}'"))),
        },
        b"double" => trimmed
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| CheckError::protocol(format!("invalid double '{trimmed}'"))),
        b"dateTime.iso8601" => Ok(Value::DateTime(trimmed.to_string())),
        b"base64" => Ok(Value::Base64(trimmed.to_string())),
        b"string" => Ok(Value::String(text)),
        other => Err(CheckError::protocol(format!(
            "unsupported value type <{}>",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn empty_typed(tag: &[u8]) -> CheckResult<Value> {
    match tag {
        b"nil" => Ok(Value::Nil),
        b"string" => Ok(Value::String(String::new())),
        b"base64" => Ok(Value::Base64(String::new())),
        b"struct" => Ok(Value::Struct(BTreeMap::new())),
        other => Err(CheckError::protocol(format!(
            "empty <{}/> is not a valid value",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn fault_from_value(value: &Value) -> CheckResult<CheckError> {
    let members = value
        .as_struct()
        .ok_or_else(|| CheckError::protocol("fault value is not a struct"))?;
    let code = members
        .get("faultCode")
        .and_then(Value::as_i64)
        .ok_or_else(|| CheckError::protocol("fault is missing faultCode"))?;
    let message = members
        .get("faultString")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(CheckError::RemoteFault { code, message })
}

fn unescape_text(text: &BytesText<'_>) -> CheckResult<String> {
    text.unescape()
        .map(Cow::into_owned)
        .map_err(|e| CheckError::protocol(format!("invalid text: {e}")))
}

fn utf8(bytes: Cow<'_, [u8]>) -> CheckResult<String> {
    String::from_utf8(bytes.into_owned())
        .map_err(|e| CheckError::protocol(format!("invalid UTF-8: {e}")))
}

fn ensure_blank(text: &str) -> CheckResult<()> {
    if text.trim().is_empty() {
        Ok(())
    } else {
        Err(CheckError::protocol("mixed text and markup inside <value>"))
    }
}

fn unexpected(expected: &str, found: &Event<'_>) -> CheckError {
    let found = match found {
        Event::Start(e) => format!("<{}>", String::from_utf8_lossy(e.name().as_ref())),
        Event::End(e) => format!("</{}>", String::from_utf8_lossy(e.name().as_ref())),
        Event::Empty(e) => format!("<{}/>", String::from_utf8_lossy(e.name().as_ref())),
        Event::Text(_) | Event::CData(_) => "text".to_string(),
        Event::Eof => "end of document".to_string(),
        _ => "markup".to_string(),
    };
    CheckError::protocol(format!("expected <{expected}>, found {found}"))
}
