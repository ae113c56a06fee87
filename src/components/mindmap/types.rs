use serde::{Deserialize, Serialize};

/// Optional download URLs attached to a work record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadLinks {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pdf: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub word: Option<String>,
}

/// One authored work item, as stored in the catalog document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkRecord {
	pub id: u64,
	pub title: String,
	#[serde(rename = "type")]
	pub work_type: String,
	pub category: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(rename = "downloadLinks", default, skip_serializing_if = "Option::is_none")]
	pub download_links: Option<DownloadLinks>,
}

/// Top-level shape of the catalog document: `{ "works": [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkCatalog {
	pub works: Vec<WorkRecord>,
}

impl WorkCatalog {
	/// Decode a catalog from its JSON document form.
	pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(input)
	}
}

/// Payload handed to the detail view when a work node is activated.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkDetails {
	pub title: String,
	pub work_type: String,
	pub description: Option<String>,
	pub pdf_url: Option<String>,
	pub word_url: Option<String>,
}

impl WorkDetails {
	pub fn from_record(record: &WorkRecord) -> Self {
		let links = record.download_links.clone().unwrap_or_default();
		Self {
			title: record.title.clone(),
			work_type: record.work_type.clone(),
			description: record.description.clone(),
			pdf_url: links.pdf,
			word_url: links.word,
		}
	}
}

/// Which ring of the layout a hovered node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TooltipKind {
	Center,
	Category,
	Work,
}

/// Payload handed to the tooltip view while a node is hovered.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipInfo {
	pub label: String,
	pub kind: TooltipKind,
	pub work_type: Option<String>,
	pub category: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"{
		"works": [
			{
				"id": 1,
				"title": "Morning in the Orchard",
				"type": "poem",
				"category": "Poetry",
				"description": "A short spring poem.",
				"downloadLinks": { "pdf": "works/orchard.pdf" }
			},
			{ "id": 2, "title": "On Rivers", "type": "essay", "category": "Essays" }
		]
	}"#;

	#[test]
	fn decodes_catalog_document() {
		let catalog = WorkCatalog::from_json(SAMPLE).unwrap();
		assert_eq!(catalog.works.len(), 2);

		let first = &catalog.works[0];
		assert_eq!(first.work_type, "poem");
		assert_eq!(
			first.download_links.as_ref().unwrap().pdf.as_deref(),
			Some("works/orchard.pdf")
		);
		assert_eq!(first.download_links.as_ref().unwrap().word, None);

		let second = &catalog.works[1];
		assert_eq!(second.description, None);
		assert_eq!(second.download_links, None);
	}

	#[test]
	fn rejects_malformed_document() {
		assert!(WorkCatalog::from_json("{ \"works\": 3 }").is_err());
	}

	#[test]
	fn serializes_with_document_field_names() {
		let catalog = WorkCatalog::from_json(SAMPLE).unwrap();
		let json = serde_json::to_string(&catalog).unwrap();
		assert!(json.contains("\"type\":\"poem\""));
		assert!(json.contains("\"downloadLinks\""));
		// Absent optionals stay out of the document.
		assert!(!json.contains("\"word\""));
	}

	#[test]
	fn details_flatten_download_links() {
		let catalog = WorkCatalog::from_json(SAMPLE).unwrap();
		let details = WorkDetails::from_record(&catalog.works[0]);
		assert_eq!(details.title, "Morning in the Orchard");
		assert_eq!(details.pdf_url.as_deref(), Some("works/orchard.pdf"));
		assert_eq!(details.word_url, None);

		let bare = WorkDetails::from_record(&catalog.works[1]);
		assert_eq!(bare.pdf_url, None);
	}
}
