//! Newline-delimited JSON encoder

use crate::core::attr::{Attr, AttrValue, LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};
use crate::core::{HandlerError, Record, Result, RewriteChain};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Writes each record as a single-line JSON object (JSONL format).
///
/// Fields are written in this order: `time`, `level`, `source` (when
/// enabled), `msg`, the handler's base attributes, then the record's
/// attributes. Every attribute, groups included, passes through the rewrite
/// chain first; a rewrite returning an empty key drops the field. Group
/// members are rewritten with the group path. Groups become nested objects,
/// groups with an empty key are inlined and empty groups are omitted. Keys are written as they come, duplicates included.
///
/// The line is built in a private buffer and written with one `write_all`
/// under the sink lock, so concurrent callers never interleave.
pub struct JsonEncoder<W> {
    writer: Arc<Mutex<W>>,
    add_source: bool,
}

impl<W> Clone for JsonEncoder<W> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
            add_source: self.add_source,
        }
    }
}

impl<W: Write + Send> JsonEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            add_source: false,
        }
    }

    /// Write the call site of records that carry one.
    #[must_use]
    pub fn with_add_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    /// Serialize `record` into a JSON line, without writing it.
    pub fn encode_to_vec(
        &self,
        record: &Record,
        base: &[Attr],
        chain: &RewriteChain,
    ) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(256);
        buf.push(b'{');
        let mut line = ObjectWriter::new(&mut buf, chain);

        if let Some(time) = record.time {
            line.write_attr(&[], Attr::new(TIME_KEY, time))?;
        }
        line.write_attr(&[], Attr::new(LEVEL_KEY, record.level))?;
        if self.add_source {
            if let Some(source) = record.source {
                line.write_attr(&[], source.to_attr(SOURCE_KEY))?;
            }
        }
        line.write_attr(&[], Attr::new(MESSAGE_KEY, record.message.as_str()))?;

        for attr in base.iter().chain(record.attrs()) {
            line.write_attr(&[], attr.clone())?;
        }

        buf.extend_from_slice(b"}\n");
        Ok(buf)
    }

    /// Serialize `record` and write it to the sink as one line.
    pub fn encode(&self, record: &Record, base: &[Attr], chain: &RewriteChain) -> Result<()> {
        let buf = self.encode_to_vec(record, base, chain)?;
        self.writer.lock().write_all(&buf)?;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| HandlerError::io_operation("flushing", "sink flush failed", e))
    }

    /// Run `f` with the sink locked
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.writer.lock())
    }
}

/// Writes the members of one JSON object, tracking the separators.
struct ObjectWriter<'a> {
    buf: &'a mut Vec<u8>,
    chain: &'a RewriteChain,
    empty: bool,
}

impl<'a> ObjectWriter<'a> {
    fn new(buf: &'a mut Vec<u8>, chain: &'a RewriteChain) -> Self {
        Self {
            buf,
            chain,
            empty: true,
        }
    }

    fn write_key(&mut self, key: &str) -> Result<()> {
        if !self.empty {
            self.buf.push(b',');
        }
        self.empty = false;
        serde_json::to_writer(&mut *self.buf, key)?;
        self.buf.push(b':');
        Ok(())
    }

    fn write_attr(&mut self, groups: &[&str], attr: Attr) -> Result<()> {
        // Inline groups have no key of their own to rewrite.
        if attr.key.is_empty() {
            if let AttrValue::Group(attrs) = attr.value {
                return self.write_group(groups, "", attrs);
            }
        }

        let attr = self.chain.rewrite(groups, attr);
        if attr.is_empty() {
            return Ok(());
        }
        match attr.value {
            AttrValue::Group(attrs) => self.write_group(groups, &attr.key, attrs),
            value => {
                self.write_key(&attr.key)?;
                serde_json::to_writer(&mut *self.buf, &value)?;
                Ok(())
            }
        }
    }

    fn write_group(&mut self, groups: &[&str], key: &str, attrs: Vec<Attr>) -> Result<()> {
        if attrs.is_empty() {
            return Ok(());
        }
        if key.is_empty() {
            for attr in attrs {
                self.write_attr(groups, attr)?;
            }
            return Ok(());
        }

        let mut path = groups.to_vec();
        path.push(key);

        let mut members = Vec::new();
        let mut inner = ObjectWriter::new(&mut members, self.chain);
        for attr in attrs {
            inner.write_attr(&path, attr)?;
        }
        if inner.empty {
            return Ok(());
        }

        self.write_key(key)?;
        self.buf.push(b'{');
        self.buf.extend_from_slice(&members);
        self.buf.push(b'}');
        Ok(())
    }
}
