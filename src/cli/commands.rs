//! Command implementations for the Termsmith CLI.

use std::sync::Arc;
use std::time::Instant;

use ahash::AHashMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{info, warn};

use crate::analysis::analyzer::{PerFieldAnalyzer, analyzer_by_name};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::converter::config::ConverterConfig;
use crate::converter::converter::DocumentConverter;
use crate::converter::parallel::{IndexItem, convert_batch, convert_item};
use crate::document::document::Document;
use crate::document::json::JsonlDocuments;
use crate::document::value::Value;
use crate::error::{Result, TermsmithError};
use crate::index::memory::{IndexEntry, MemoryEntryBuilder};
use crate::schema::catalog::{FieldCatalog, ReservedField};
use crate::schema::field::{FieldId, IndexField};
use crate::term::encoder::TermEncoder;
use crate::term::scratch::ScratchBuffer;

/// Execute a CLI command.
pub fn execute_command(args: TermsmithArgs) -> Result<()> {
    match &args.command {
        Command::Convert(convert_args) => convert_documents(convert_args.clone(), &args),
        Command::Encode(encode_args) => encode_value(encode_args.clone(), &args),
    }
}

/// Convert a JSON Lines file.
fn convert_documents(args: ConvertArgs, cli_args: &TermsmithArgs) -> Result<()> {
    let start_time = Instant::now();

    let catalog = Arc::new(FieldCatalog::from_json_file(&args.fields)?);
    let config = match &args.config {
        Some(path) => ConverterConfig::from_json_file(path)?,
        None => ConverterConfig::default(),
    };
    let analyzer = PerFieldAnalyzer::from_catalog(&catalog, analyzer_by_name(&args.analyzer)?);
    let mut converter = DocumentConverter::new(Arc::clone(&catalog), Arc::new(analyzer), config)?;
    let field_names = field_names(&converter);

    info!("converting documents from {}", args.document_file.display());

    let mut report = ConversionReport::default();
    let mut items = Vec::new();
    let mut lines = Vec::new();

    for (index, document) in JsonlDocuments::open(&args.document_file)?.enumerate() {
        let line = index + 1;
        report.documents += 1;
        match document {
            Ok(document) => {
                items.push(index_item(document, &args));
                lines.push(line);
            }
            Err(e) => record_failure(&mut report, line, &e),
        }
    }

    let results = if args.parallel {
        convert_batch(&converter, &items, args.index_nulls)
    } else {
        let mut builder = MemoryEntryBuilder::with_index_nulls(args.index_nulls);
        items
            .iter()
            .map(|item| convert_item(&mut converter, &mut builder, item))
            .collect()
    };

    for (line, result) in lines.into_iter().zip(results) {
        match result {
            Ok(Some(entry)) => {
                report.committed += 1;
                report.entries.push(entry_output(line, entry, &field_names));
            }
            Ok(None) => report.skipped += 1,
            Err(e) => record_failure(&mut report, line, &e),
        }
    }

    report.duration_ms = start_time.elapsed().as_millis() as u64;

    output_result("Documents converted", &report, cli_args)
}

/// Encode a single value.
fn encode_value(args: EncodeArgs, cli_args: &TermsmithArgs) -> Result<()> {
    let value = parse_value(args.kind, &args.value)?;
    let analyzer = PerFieldAnalyzer::new(analyzer_by_name(&args.analyzer)?);
    let mut encoder = TermEncoder::new(Arc::new(analyzer));
    let mut buffer = ScratchBuffer::new();
    let field = IndexField::new(FieldId(1), "value");

    let encoded = encoder.encode(&field, &value, &mut buffer, 0)?;

    output_result(
        "Encoded term",
        &EncodeResult {
            kind: encoded.kind,
            length: encoded.len,
            term: to_hex(buffer.region(0, encoded.len)),
            value: encoded.value,
        },
        cli_args,
    )
}

/// Parse command line text into a value of the requested kind.
pub fn parse_value(kind: EncodeKind, text: &str) -> Result<Value> {
    let invalid = |e: &dyn std::fmt::Display| {
        TermsmithError::other(format!("invalid {kind:?} value '{text}': {e}"))
    };
    Ok(match kind {
        EncodeKind::Int => Value::I64(text.trim().parse().map_err(|e| invalid(&e))?),
        EncodeKind::Double => Value::F64(text.trim().parse().map_err(|e| invalid(&e))?),
        EncodeKind::Bool => Value::Boolean(text.trim().parse().map_err(|e| invalid(&e))?),
        EncodeKind::Text => Value::String(text.to_string()),
        EncodeKind::Datetime => {
            let text = text.trim();
            if let Ok(v) = DateTime::parse_from_rfc3339(text) {
                Value::DateTimeOffset(v)
            } else if let Ok(v) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
                Value::DateTime(v)
            } else {
                Value::Date(NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| invalid(&e))?)
            }
        }
    })
}

fn index_item(mut document: Document, args: &ConvertArgs) -> IndexItem {
    let id = document.remove_field(&args.id_key).and_then(id_text);
    let source_document_id = args
        .source_id_key
        .as_deref()
        .and_then(|key| document.remove_field(key))
        .and_then(id_text);
    IndexItem {
        id,
        source_document_id,
        output: document.into(),
    }
}

fn id_text(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::DynamicNull => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn record_failure(report: &mut ConversionReport, line: usize, error: &TermsmithError) {
    warn!("line {line}: {error}");
    report.failed += 1;
    report.failures.push(ConversionFailure {
        line,
        error: error.to_string(),
    });
}

fn field_names(converter: &DocumentConverter) -> AHashMap<FieldId, String> {
    let catalog = converter.catalog();
    let mut names: AHashMap<FieldId, String> = catalog
        .fields()
        .iter()
        .map(|field| (field.id, field.name.clone()))
        .collect();
    for reserved in [ReservedField::DocumentId, ReservedField::SourceDocumentId] {
        if let Some(field) = catalog.lookup_reserved(reserved) {
            names.insert(field.id, field.name.clone());
        }
    }
    for (spec, id) in converter.compound_fields() {
        names.insert(id, spec.to_string());
    }
    names
}

fn entry_output(line: usize, entry: IndexEntry, names: &AHashMap<FieldId, String>) -> EntryOutput {
    EntryOutput {
        line,
        boost: entry.boost,
        terms: entry
            .terms
            .into_iter()
            .map(|term| TermOutput {
                field_id: term.field.value(),
                field: names
                    .get(&term.field)
                    .cloned()
                    .unwrap_or_else(|| term.field.to_string()),
                term: to_hex(&term.term),
                value: term.value,
            })
            .collect(),
        stored: entry.stored,
    }
}
