//! Reconciliation of stored addresses
//!
//! Fills the four selects (and the street/number inputs) from a stored
//! address record. Each level's lookup is keyed by the stored id of the level
//! above, so the steps run strictly in sequence. A stored neighborhood that its
//! municipality no longer lists is kept visible as a marked synthetic
//! option instead of being dropped.

use serde::{Deserialize, Serialize};

use crate::errors::SyncError;
use crate::models::{AddressRecord, FieldHandle, GeoLevel, OptionId, TextHandle};
use crate::provider::GeoProvider;

use super::loader::LoadOutcome;
use super::GeoSync;

/// Stable element ids of the fields to fill
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileTargets {
    pub country: String,
    pub state: String,
    pub municipality: String,
    pub neighborhood: String,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

/// Where a reconciliation stopped
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ReconcileStep {
    /// Resolving the target ids
    Targets,
    /// Fetching the stored record
    Record,
    /// Loading one level
    Level(GeoLevel),
}

/// How the stored neighborhood ended up in its select
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NeighborhoodResolution {
    /// Offered by its municipality and selected
    Matched,
    /// Not offered; a synthetic option was added and selected
    Orphan,
    /// Nothing selected (no stored id, or no label to show for it)
    Unset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Every step ran. `unlisted` names the upper levels whose stored id
    /// was missing or not offered; those selects show the placeholder while
    /// the levels below are still loaded from the stored ids.
    Complete {
        neighborhood: NeighborhoodResolution,
        unlisted: Vec<GeoLevel>,
    },
    /// A step failed; steps already done are kept, nothing after it runs
    Aborted { step: ReconcileStep, error: SyncError },
}

struct ResolvedTargets {
    selects: [FieldHandle; 4],
    street: Option<TextHandle>,
    number: Option<TextHandle>,
}

impl<P: GeoProvider> GeoSync<P> {
    /// Populate the target fields from the record stored under `key`
    pub async fn reconcile(&self, key: &str, targets: &ReconcileTargets) -> ReconcileOutcome {
        let resolved = match self.resolve_targets(targets) {
            Ok(resolved) => resolved,
            Err(error) => return aborted(ReconcileStep::Targets, error),
        };

        self.update(|page| {
            for handle in &resolved.selects {
                if let Some(field) = page.select_mut(handle) {
                    field.reset();
                }
            }
        });

        let record = match self.provider.fetch_record(key).await {
            Ok(record) => record,
            Err(error) => {
                log::error!("failed to load the stored address '{}': {}", key, error);
                return aborted(ReconcileStep::Record, error.into());
            }
        };

        let [country, state, municipality, neighborhood] = &resolved.selects;
        let chain = [
            (country, record.country_id.as_ref()),
            (state, record.state_id.as_ref()),
            (municipality, record.municipality_id.as_ref()),
        ];

        // each step is keyed by the stored id above it, offered or not; the
        // parent select is expected to keep showing what the previous step left
        let mut parent: Option<&OptionId> = None;
        let mut shown: Option<OptionId> = None;
        let mut unlisted = Vec::new();
        for (handle, stored) in chain {
            match self.load_level_expecting(handle, parent, shown.as_ref(), stored).await {
                LoadOutcome::Applied { selected: true } => {}
                LoadOutcome::Applied { selected: false } | LoadOutcome::Empty | LoadOutcome::Skipped => {
                    log::warn!(
                        "stored {} id {} is not offered, loading the levels below from the stored ids",
                        handle.level,
                        stored.map(OptionId::as_str).unwrap_or("(none)")
                    );
                    unlisted.push(handle.level);
                }
                other => return aborted(ReconcileStep::Level(handle.level), load_error(handle, other)),
            }
            shown = self.page().select(handle).and_then(|field| field.selected().cloned());
            parent = stored;
        }

        let outcome = self
            .load_level_expecting(neighborhood, parent, shown.as_ref(), record.neighborhood_id.as_ref())
            .await;
        let resolution = match outcome {
            LoadOutcome::Applied { selected: true } => NeighborhoodResolution::Matched,
            LoadOutcome::Applied { selected: false } | LoadOutcome::Empty | LoadOutcome::Skipped => {
                self.keep_orphan(neighborhood, &record)
            }
            other => return aborted(ReconcileStep::Level(GeoLevel::Neighborhood), load_error(neighborhood, other)),
        };

        self.fill_text(&resolved, &record);
        ReconcileOutcome::Complete {
            neighborhood: resolution,
            unlisted,
        }
    }

    fn resolve_targets(&self, targets: &ReconcileTargets) -> Result<ResolvedTargets, SyncError> {
        let page = self.page();
        let select = |id: &str| page.resolve_select(id).ok_or_else(|| SyncError::MissingField(id.to_string()));
        let text = |id: &Option<String>| -> Result<Option<TextHandle>, SyncError> {
            match id {
                Some(id) => page
                    .resolve_text(id)
                    .map(Some)
                    .ok_or_else(|| SyncError::MissingField(id.clone())),
                None => Ok(None),
            }
        };

        Ok(ResolvedTargets {
            selects: [
                select(&targets.country)?,
                select(&targets.state)?,
                select(&targets.municipality)?,
                select(&targets.neighborhood)?,
            ],
            street: text(&targets.street)?,
            number: text(&targets.number)?,
        })
    }

    /// Add the stored neighborhood as a synthetic option when its
    /// municipality no longer lists it
    fn keep_orphan(&self, handle: &FieldHandle, record: &AddressRecord) -> NeighborhoodResolution {
        let Some((id, label)) = record.orphan_neighborhood() else {
            if record.neighborhood_id.is_some() {
                log::warn!("stored neighborhood is not offered and has no label, leaving it unset");
            }
            return NeighborhoodResolution::Unset;
        };

        let marker = self.config.orphan_marker.clone();
        let kept = self.update(|page| match page.select_mut(handle) {
            Some(field) => {
                field.push_orphan(id.clone(), label, &marker);
                true
            }
            None => false,
        });
        if !kept {
            return NeighborhoodResolution::Unset;
        }

        log::warn!(
            "neighborhood {} ('{}') is not listed for municipality {}, kept as a synthetic option",
            id,
            label,
            record.municipality_id.as_ref().map(OptionId::as_str).unwrap_or("(none)")
        );
        NeighborhoodResolution::Orphan
    }

    fn fill_text(&self, resolved: &ResolvedTargets, record: &AddressRecord) {
        self.update(|page| {
            let values = [
                (&resolved.street, &record.street),
                (&resolved.number, &record.number),
            ];
            for (handle, value) in values {
                if let Some(field) = handle.as_ref().and_then(|handle| page.text_mut(handle)) {
                    field.value = value.clone().unwrap_or_default();
                }
            }
        });
    }
}

fn aborted(step: ReconcileStep, error: SyncError) -> ReconcileOutcome {
    log::error!("address reconciliation stopped at {:?}: {}", step, error);
    ReconcileOutcome::Aborted { step, error }
}

fn load_error(handle: &FieldHandle, outcome: LoadOutcome) -> SyncError {
    match outcome {
        LoadOutcome::Failed(error) => SyncError::Lookup(error),
        LoadOutcome::Superseded => SyncError::Superseded(handle.level),
        _ => SyncError::MissingSelect {
            scope: handle.scope.clone(),
            level: handle.level,
        },
    }
}
