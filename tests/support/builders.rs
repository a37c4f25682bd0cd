use serde_json::json;

/// Builds `.asmdef` JSON the way Unity writes it.
pub struct ManifestBuilder {
    name: String,
    references: Vec<String>,
}

impl ManifestBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            references: Vec::new(),
        }
    }

    pub fn with_references(mut self, refs: &[&str]) -> Self {
        self.references = refs.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn build(self) -> String {
        serde_json::to_string_pretty(&json!({
            "name": self.name,
            "rootNamespace": "",
            "references": self.references,
            "includePlatforms": [],
            "excludePlatforms": [],
            "allowUnsafeCode": false,
            "autoReferenced": true,
            "noEngineReferences": false
        }))
        .expect("Failed to serialize manifest")
    }
}
