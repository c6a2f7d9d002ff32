//! Folds resolved records into the registry's update-check body

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::host::components::InstalledComponent;
use crate::source::record::UpdateRecord;

/// One update-check body entry in the host's wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDescriptor {
    pub id: u64,
    pub slug: String,
    pub new_version: String,
    pub url: String,
    pub package: String,
}

impl From<&UpdateRecord> for UpdateDescriptor {
    fn from(record: &UpdateRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug.clone(),
            new_version: record.new_version.clone(),
            url: record.url.clone(),
            package: record.package.clone(),
        }
    }
}

/// Merges resolved records into the serialized registry body.
///
/// Registry entries always win. A record is dropped when its component's
/// installed version is unknown or already equals the record's
/// `new_version`. Entries keep their wire order, so everything the
/// registry sent round-trips untouched for the host's own reader.
pub fn merge_update_body(
    registry_body: &[u8],
    components: &[InstalledComponent],
    records: &IndexMap<String, Arc<UpdateRecord>>,
) -> Result<Vec<u8>, serde_json::Error> {
    let mut body: IndexMap<String, Value> = if registry_body.is_empty() {
        IndexMap::new()
    } else {
        serde_json::from_slice(registry_body).unwrap_or_default()
    };

    let installed: HashMap<&str, Option<&str>> = components
        .iter()
        .map(|c| (c.file.as_str(), c.version.as_deref()))
        .collect();

    for (file, record) in records {
        if body.contains_key(file) {
            debug!("registry already describes {}, keeping its entry", file);
            continue;
        }
        let Some(Some(version)) = installed.get(file.as_str()) else {
            continue;
        };
        if *version == record.new_version {
            debug!("{} already at {}, nothing to upgrade", file, version);
            continue;
        }
        body.insert(
            file.clone(),
            serde_json::to_value(UpdateDescriptor::from(record.as_ref()))?,
        );
    }

    serde_json::to_vec(&body)
}
