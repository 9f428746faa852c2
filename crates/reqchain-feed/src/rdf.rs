//! Extraction of requirement records from an OSLC RDF/XML document.
//!
//! This is deliberately not a general RDF parser. The feed documents are
//! machine-generated with one element per requirement and one element per
//! property literal, which is what the patterns below rely on. Namespace
//! prefixes are not resolved; properties are matched by local name.

use regex::Regex;
use reqchain_sync::IncomingRecord;
use tracing::warn;

use crate::error::FeedError;

const PREFIX: &str = r"[A-Za-z][A-Za-z0-9_.-]*";

/// Compiled patterns for one feed dialect pass.
pub struct RdfRequirementParser {
    description_block: Regex,
    requirement_type: Regex,
    requirement_block: Regex,
    identifier: Regex,
    title: Regex,
    created: Regex,
    modified: Regex,
    status: Regex,
}

fn literal_pattern(local_name: &str) -> Regex {
    // `<dcterms:identifier ...>value</dcterms:identifier>` with any prefix.
    let pattern =
        format!(r"(?s)<{PREFIX}:{local_name}\b[^>]*>(.*?)</{PREFIX}:{local_name}>");
    Regex::new(&pattern).expect("literal pattern is well formed")
}

impl RdfRequirementParser {
    pub fn new() -> Self {
        RdfRequirementParser {
            description_block: Regex::new(r"(?s)<rdf:Description\b[^>]*>.*?</rdf:Description>")
                .expect("description pattern is well formed"),
            requirement_type: Regex::new(r#"<rdf:type\b[^>]*rdf:resource="[^"]*[#/]Requirement""#)
                .expect("type pattern is well formed"),
            requirement_block: Regex::new(
                &format!(r"(?s)<{PREFIX}:Requirement\b[^>]*>.*?</{PREFIX}:Requirement>"),
            )
            .expect("requirement pattern is well formed"),
            identifier: literal_pattern("identifier"),
            title: literal_pattern("title"),
            created: literal_pattern("created"),
            modified: literal_pattern("modified"),
            status: literal_pattern("status"),
        }
    }

    /// Extract every requirement record from the document, in document
    /// order. Blocks without an identifier are skipped with a warning; a
    /// document that is not XML at all is malformed.
    pub fn parse(&self, body: &str) -> Result<Vec<IncomingRecord>, FeedError> {
        if !body.contains('<') {
            return Err(FeedError::Malformed {
                reason: "document contains no XML markup".to_string(),
            });
        }

        let mut records = Vec::new();
        for block in self.requirement_blocks(body) {
            let Some(identifier) = self.literal(&self.identifier, block) else {
                warn!("skipping requirement block without an identifier");
                continue;
            };
            records.push(IncomingRecord {
                identifier,
                title: self.literal(&self.title, block).unwrap_or_default(),
                created: self.literal(&self.created, block).unwrap_or_default(),
                modified: self.literal(&self.modified, block).unwrap_or_default(),
                status: self.literal(&self.status, block).unwrap_or_default(),
            });
        }
        Ok(records)
    }

    /// Both serializations seen in the wild: `rdf:Description` elements
    /// carrying an `rdf:type` of Requirement, and requirement-typed
    /// elements used directly.
    fn requirement_blocks<'a>(&self, body: &'a str) -> Vec<&'a str> {
        let mut blocks: Vec<(usize, &'a str)> = self
            .description_block
            .find_iter(body)
            .filter(|m| self.requirement_type.is_match(m.as_str()))
            .map(|m| (m.start(), m.as_str()))
            .collect();
        blocks.extend(
            self.requirement_block
                .find_iter(body)
                .map(|m| (m.start(), m.as_str())),
        );
        blocks.sort_by_key(|(start, _)| *start);
        blocks.into_iter().map(|(_, block)| block).collect()
    }

    fn literal(&self, pattern: &Regex, block: &str) -> Option<String> {
        let raw = pattern.captures(block)?.get(1)?.as_str();
        Some(html_escape::decode_html_entities(raw.trim()).into_owned())
    }
}

impl Default for RdfRequirementParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION_FEED: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dcterms="http://purl.org/dc/terms/"
         xmlns:rm="http://localhost:8080/cb/api/oslc/ns/rm#">
  <rdf:Description rdf:about="http://example.test/req/1">
    <rdf:type rdf:resource="http://open-services.net/ns/rm#Requirement"/>
    <dcterms:identifier>REQ-1</dcterms:identifier>
    <dcterms:title>Brakes &amp; Wheels</dcterms:title>
    <dcterms:created>2024-01-01</dcterms:created>
    <dcterms:modified>2024-02-01</dcterms:modified>
    <rm:status>New</rm:status>
  </rdf:Description>
  <rdf:Description rdf:about="http://example.test/person/9">
    <rdf:type rdf:resource="http://xmlns.com/foaf/0.1/Person"/>
    <dcterms:identifier>P-9</dcterms:identifier>
  </rdf:Description>
  <rdf:Description rdf:about="http://example.test/req/2">
    <rdf:type rdf:resource="http://open-services.net/ns/rm#Requirement"/>
    <dcterms:identifier>REQ-2</dcterms:identifier>
    <dcterms:title>Mirrors</dcterms:title>
    <dcterms:created>2024-01-05</dcterms:created>
    <dcterms:modified>2024-01-05</dcterms:modified>
    <rm:status>Active</rm:status>
  </rdf:Description>
</rdf:RDF>"#;

    #[test]
    fn extracts_requirements_and_ignores_other_resources() {
        let records = RdfRequirementParser::new()
            .parse(DESCRIPTION_FEED)
            .expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "REQ-1");
        assert_eq!(records[0].title, "Brakes & Wheels");
        assert_eq!(records[0].created, "2024-01-01");
        assert_eq!(records[0].modified, "2024-02-01");
        assert_eq!(records[0].status, "New");
        assert_eq!(records[1].identifier, "REQ-2");
        assert_eq!(records[1].status, "Active");
    }

    #[test]
    fn parses_requirement_typed_elements() {
        let body = r#"<rdf:RDF xmlns:oslc_rm="http://open-services.net/ns/rm#">
  <oslc_rm:Requirement rdf:about="http://example.test/req/3">
    <dcterms:identifier>REQ-3</dcterms:identifier>
    <dcterms:title> Spoilers </dcterms:title>
    <dcterms:created>2024-03-01</dcterms:created>
    <dcterms:modified>2024-03-02</dcterms:modified>
    <rm:status>New</rm:status>
  </oslc_rm:Requirement>
</rdf:RDF>"#;
        let records = RdfRequirementParser::new().parse(body).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "REQ-3");
        assert_eq!(records[0].title, "Spoilers");
    }

    #[test]
    fn block_without_identifier_is_skipped() {
        let body = r#"<rdf:RDF>
  <rdf:Description rdf:about="http://example.test/req/4">
    <rdf:type rdf:resource="http://open-services.net/ns/rm#Requirement"/>
    <dcterms:title>Nameless</dcterms:title>
  </rdf:Description>
</rdf:RDF>"#;
        let records = RdfRequirementParser::new().parse(body).expect("parse");
        assert!(records.is_empty());
    }

    #[test]
    fn empty_rdf_document_yields_no_records() {
        let records = RdfRequirementParser::new()
            .parse("<rdf:RDF></rdf:RDF>")
            .expect("parse");
        assert!(records.is_empty());
    }

    #[test]
    fn non_xml_body_is_malformed() {
        let result = RdfRequirementParser::new().parse("502 bad gateway");
        assert!(matches!(result, Err(FeedError::Malformed { .. })));
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let body = r#"<rdf:RDF>
  <rdf:Description>
    <rdf:type rdf:resource="http://open-services.net/ns/rm#Requirement"/>
    <dcterms:identifier>REQ-5</dcterms:identifier>
  </rdf:Description>
</rdf:RDF>"#;
        let records = RdfRequirementParser::new().parse(body).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "");
        assert_eq!(records[0].status, "");
    }
}
