//! Serializer facade and file persistence

use crate::builder::{build_object, Built};
use crate::error::*;
use crate::infer::InferenceOrder;
use crate::json_bridge::{pairs_from_json_str, to_json_string};
use crate::reflect::{AssignPolicy, Reflect};
use crate::types::*;
use crate::wire::{assemble_record, parse_pairs_with, write_record, WireGrammar};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// File name used by [`Serializer::persist_default`]
pub const DEFAULT_OUTPUT_FILE: &str = "serialized_data.json";

/// Options for serializing and rebuilding records
#[derive(Debug, Clone, Default)]
pub struct SerializerOpts {
    /// Value character class on the read side
    pub grammar: WireGrammar,
    /// Scalar inference precedence
    pub inference: InferenceOrder,
    /// Fallback-path assignment strictness
    pub assign: AssignPolicy,
    /// Sort record keys by name instead of member order
    pub sort_keys: bool,
}

impl SerializerOpts {
    /// Word-only read grammar, matching older writers byte for byte
    pub fn compat() -> Self {
        Self {
            grammar: WireGrammar::Word,
            ..Self::default()
        }
    }

    /// Decimals infer as double before float
    pub fn precise() -> Self {
        Self {
            inference: InferenceOrder::precise(),
            ..Self::default()
        }
    }

    /// Re-parse mismatched values as the member's declared type
    pub fn lenient() -> Self {
        Self {
            assign: AssignPolicy::Reinfer,
            ..Self::default()
        }
    }

    /// Keys sorted by name
    pub fn sorted() -> Self {
        Self {
            sort_keys: true,
            ..Self::default()
        }
    }
}

/// Serialize `value` into a fresh record
pub fn serialize<T: Reflect>(value: &T, opts: &SerializerOpts) -> Result<Record> {
    assemble_record(value, opts.sort_keys)
}

/// Parse wire text and rebuild a `T`
pub fn deserialize<T: Reflect>(text: &str, opts: &SerializerOpts) -> Result<Built<T>> {
    let pairs = parse_pairs_with(text, opts.grammar);
    if pairs.is_empty() {
        debug!("wire text yielded no pairs");
    }
    rebuild(&pairs, opts)
}

fn rebuild<T: Reflect>(pairs: &[RawPair], opts: &SerializerOpts) -> Result<Built<T>> {
    let plan = ConstructionPlan::from_pairs(pairs, &opts.inference);
    build_object(&plan, opts.assign)
}

/// Serializer bound to one target instance, holding the last record it
/// produced. Not meant for concurrent use of one instance.
#[derive(Debug)]
pub struct Serializer<T: Reflect> {
    target: T,
    opts: SerializerOpts,
    record: Option<Record>,
}

impl<T: Reflect> Serializer<T> {
    pub fn new(target: T) -> Self {
        Self::with_opts(target, SerializerOpts::default())
    }

    pub fn with_opts(target: T, opts: SerializerOpts) -> Self {
        Self {
            target,
            opts,
            record: None,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    pub fn opts(&self) -> &SerializerOpts {
        &self.opts
    }

    /// Serialize the target, replacing the held record
    pub fn serialize(&mut self) -> Result<&Record> {
        let record = serialize(&self.target, &self.opts)?;
        Ok(self.record.insert(record))
    }

    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    /// Wire text of the held record, `{}` before the first serialize
    pub fn text(&self) -> String {
        match &self.record {
            Some(record) => write_record(record),
            None => write_record(&Record::new()),
        }
    }

    /// Strict JSON rendering of the held record
    pub fn text_json(&self) -> Result<String> {
        match &self.record {
            Some(record) => to_json_string(record),
            None => to_json_string(&Record::new()),
        }
    }

    pub fn deserialize(&self, text: &str) -> Result<T> {
        self.deserialize_with_report(text).map(|built| built.value)
    }

    pub fn deserialize_with_report(&self, text: &str) -> Result<Built<T>> {
        deserialize(text, &self.opts)
    }

    /// Rebuild from strict JSON produced by [`Serializer::text_json`]
    pub fn deserialize_json(&self, text: &str) -> Result<Built<T>> {
        let pairs = pairs_from_json_str(text)?;
        rebuild(&pairs, &self.opts)
    }

    /// Write the wire text, newline-terminated, to `path`
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", self.text())?;
        writer.flush()?;
        debug!(path = %path.display(), "persisted record");
        Ok(())
    }

    /// Write to [`DEFAULT_OUTPUT_FILE`] in the working directory
    pub fn persist_default(&self) -> Result<()> {
        self.persist(DEFAULT_OUTPUT_FILE)
    }

    /// Read a whole file and rebuild a `T` from it
    pub fn load(&self, path: impl AsRef<Path>) -> Result<T> {
        let text = fs::read_to_string(path)?;
        self.deserialize(&text)
    }
}
