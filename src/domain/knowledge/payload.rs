//! Typed payloads, one shape per entry type

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entry::EntryType;
use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptionPayload {
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub description: String,
    #[serde(default)]
    pub columns: Vec<ColumnDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswerPayload {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymPayload {
    pub term: String,
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessDocumentPayload {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChunkPayload {
    pub file_id: String,
    pub chunk_index: usize,
    pub text: String,
}

/// Payload of a knowledge entry, tagged by its type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum EntryPayload {
    SchemaDescription(SchemaDescriptionPayload),
    QuestionAnswer(QuestionAnswerPayload),
    Synonym(SynonymPayload),
    BusinessDocument(BusinessDocumentPayload),
    FileChunk(FileChunkPayload),
}

fn parse_shape<T: serde::de::DeserializeOwned>(
    entry_type: EntryType,
    value: serde_json::Value,
) -> Result<T, DomainError> {
    serde_json::from_value(value).map_err(|e| {
        DomainError::validation(format!("Invalid {} payload: {}", entry_type, e))
    })
}

fn require_non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

impl EntryPayload {
    /// Parse and validate a raw JSON payload for the given type
    pub fn parse(entry_type: EntryType, value: serde_json::Value) -> Result<Self, DomainError> {
        let payload = match entry_type {
            EntryType::SchemaDescription => Self::SchemaDescription(parse_shape(entry_type, value)?),
            EntryType::QuestionAnswer => Self::QuestionAnswer(parse_shape(entry_type, value)?),
            EntryType::Synonym => Self::Synonym(parse_shape(entry_type, value)?),
            EntryType::BusinessDocument => Self::BusinessDocument(parse_shape(entry_type, value)?),
            EntryType::FileChunk => Self::FileChunk(parse_shape(entry_type, value)?),
        };

        payload.validate()?;
        Ok(payload)
    }

    pub fn entry_type(&self) -> EntryType {
        match self {
            Self::SchemaDescription(_) => EntryType::SchemaDescription,
            Self::QuestionAnswer(_) => EntryType::QuestionAnswer,
            Self::Synonym(_) => EntryType::Synonym,
            Self::BusinessDocument(_) => EntryType::BusinessDocument,
            Self::FileChunk(_) => EntryType::FileChunk,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::SchemaDescription(p) => {
                require_non_empty("database", &p.database)?;
                require_non_empty("description", &p.description)?;
                if let Some(col) = p.columns.iter().find(|c| c.name.trim().is_empty()) {
                    return Err(DomainError::validation(format!(
                        "column name cannot be empty (type: {:?})",
                        col.data_type
                    )));
                }
                Ok(())
            }
            Self::QuestionAnswer(p) => {
                require_non_empty("question", &p.question)?;
                require_non_empty("answer", &p.answer)
            }
            Self::Synonym(p) => {
                require_non_empty("term", &p.term)?;
                if p.synonyms.iter().all(|s| s.trim().is_empty()) {
                    return Err(DomainError::validation("synonyms cannot be empty"));
                }
                Ok(())
            }
            Self::BusinessDocument(p) => {
                require_non_empty("title", &p.title)?;
                require_non_empty("body", &p.body)
            }
            Self::FileChunk(p) => {
                require_non_empty("file_id", &p.file_id)?;
                require_non_empty("text", &p.text)
            }
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::SchemaDescription(p) => match &p.table {
                Some(table) => format!("{}.{}", p.database, table),
                None => p.database.clone(),
            },
            Self::QuestionAnswer(p) => p.question.clone(),
            Self::Synonym(p) => p.term.clone(),
            Self::BusinessDocument(p) => p.title.clone(),
            Self::FileChunk(p) => format!("{}#{}", p.file_id, p.chunk_index),
        }
    }

    /// Text that gets embedded and stored as the entry content
    pub fn content(&self) -> String {
        match self {
            Self::SchemaDescription(p) => {
                let mut text = p.description.clone();
                for column in &p.columns {
                    text.push('\n');
                    text.push_str(&column.name);
                    if let Some(data_type) = &column.data_type {
                        text.push_str(&format!(" ({})", data_type));
                    }
                    if let Some(description) = &column.description {
                        text.push_str(": ");
                        text.push_str(description);
                    }
                }
                text
            }
            Self::QuestionAnswer(p) => format!("Q: {}\nA: {}", p.question, p.answer),
            Self::Synonym(p) => {
                let mut text = format!("{}: {}", p.term, p.synonyms.join(", "));
                if let Some(definition) = &p.definition {
                    text.push_str(&format!("\n{}", definition));
                }
                text
            }
            Self::BusinessDocument(p) => p.body.clone(),
            Self::FileChunk(p) => p.text.clone(),
        }
    }

    /// Type-specific metadata kept alongside the entry
    pub fn metadata(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::SchemaDescription(p) => {
                map.insert("database".to_string(), serde_json::json!(p.database));
                if let Some(table) = &p.table {
                    map.insert("table".to_string(), serde_json::json!(table));
                }
                map.insert("columns".to_string(), serde_json::json!(p.columns));
            }
            Self::QuestionAnswer(p) => {
                map.insert("question".to_string(), serde_json::json!(p.question));
            }
            Self::Synonym(p) => {
                map.insert("term".to_string(), serde_json::json!(p.term));
                map.insert("synonyms".to_string(), serde_json::json!(p.synonyms));
            }
            Self::BusinessDocument(p) => {
                if let Some(category) = &p.category {
                    map.insert("category".to_string(), serde_json::json!(category));
                }
                map.insert("tags".to_string(), serde_json::json!(p.tags));
            }
            Self::FileChunk(p) => {
                map.insert("file_id".to_string(), serde_json::json!(p.file_id));
                map.insert("chunk_index".to_string(), serde_json::json!(p.chunk_index));
            }
        }

        map
    }
}
