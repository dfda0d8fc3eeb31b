use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::models::{
    InteractionAction, InteractionRecord, Movie, PreferenceProfile, ProfileStatistics,
    INTERACTION_LOG_CAPACITY,
};

pub mod storage;

pub use storage::{MemoryStorage, ProfileStorage, RedisStorage};

const PROFILE_KEY: &str = "prefs:profile";
const INTERACTIONS_KEY: &str = "prefs:interactions";

/// Where a loaded profile came from.
///
/// `Defaults` means nothing was persisted yet; `Recovered` means storage or
/// deserialization failed and the defaults were substituted. Callers and
/// tests can tell fallback apart from a fresh session without digging through
/// logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Stored,
    Defaults,
    Recovered,
}

/// A profile together with its provenance
#[derive(Debug, Clone, Serialize)]
pub struct LoadedProfile {
    pub profile: PreferenceProfile,
    pub source: ProfileSource,
}

/// Session-scoped home for the preference profile and the interaction log.
///
/// Persistence is best-effort: loads fall back to defaults and saves swallow
/// storage errors, so no preference operation ever surfaces a failure to the
/// caller. Mutations are serialized through an internal lock to keep the
/// single-writer model even under a concurrent HTTP server.
pub struct PreferenceStore {
    storage: Arc<dyn ProfileStorage>,
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the current profile, or defaults if none exists. Never fails.
    pub async fn load(&self) -> LoadedProfile {
        match self.storage.fetch(PROFILE_KEY).await {
            Ok(Some(json)) => match serde_json::from_str::<PreferenceProfile>(&json) {
                Ok(profile) => LoadedProfile {
                    profile,
                    source: ProfileSource::Stored,
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Stored profile is unreadable, using defaults");
                    LoadedProfile {
                        profile: PreferenceProfile::default(),
                        source: ProfileSource::Recovered,
                    }
                }
            },
            Ok(None) => LoadedProfile {
                profile: PreferenceProfile::default(),
                source: ProfileSource::Defaults,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Profile storage unavailable, using defaults");
                LoadedProfile {
                    profile: PreferenceProfile::default(),
                    source: ProfileSource::Recovered,
                }
            }
        }
    }

    /// Persists the profile, stamping `last_updated`.
    ///
    /// Storage failures are logged and swallowed; preference persistence is
    /// best-effort.
    pub async fn save(&self, profile: &mut PreferenceProfile) {
        profile.last_updated = Some(Utc::now());

        let json = match serde_json::to_string(profile) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Profile serialization failed");
                return;
            }
        };

        if let Err(e) = self.storage.store(PROFILE_KEY, json).await {
            tracing::warn!(error = %e, "Profile save failed");
        }
    }

    /// Records an interaction and applies the preference update rule.
    ///
    /// The record is appended newest-first and the log truncated to capacity
    /// before the rule runs, so a like counts itself toward the rating-floor
    /// history. Returns the updated profile.
    pub async fn record_interaction(
        &self,
        movie: &Movie,
        action: InteractionAction,
    ) -> PreferenceProfile {
        let _guard = self.write_lock.lock().await;

        let mut profile = self.load().await.profile;
        let mut log = self.load_interactions().await;

        let record = InteractionRecord::new(movie, action);
        log.insert(0, record.clone());
        log.truncate(INTERACTION_LOG_CAPACITY);

        match action {
            InteractionAction::Like => {
                profile.apply_like(&record.genres);
                let like_ratings: Vec<f64> = log
                    .iter()
                    .filter(|r| r.action == InteractionAction::Like)
                    .map(|r| r.rating)
                    .collect();
                profile.recalculate_minimum_rating(&like_ratings);
            }
            InteractionAction::Dislike => {
                profile.apply_dislike(&record.genres);
            }
            InteractionAction::Skip => {}
        }

        self.save_interactions(&log).await;
        self.save(&mut profile).await;

        tracing::debug!(
            movie_id = movie.id,
            action = ?action,
            log_len = log.len(),
            "Interaction recorded"
        );

        profile
    }

    /// Clears the stored profile and interaction log; the next `load()`
    /// returns defaults.
    pub async fn reset(&self) {
        let _guard = self.write_lock.lock().await;

        if let Err(e) = self.storage.remove(PROFILE_KEY).await {
            tracing::warn!(error = %e, "Profile reset failed");
        }
        if let Err(e) = self.storage.remove(INTERACTIONS_KEY).await {
            tracing::warn!(error = %e, "Interaction log reset failed");
        }

        tracing::info!("Preference profile reset");
    }

    /// Aggregate counts over the log and profile. Pure read.
    pub async fn statistics(&self) -> ProfileStatistics {
        let profile = self.load().await.profile;
        let log = self.load_interactions().await;

        let count = |action: InteractionAction| log.iter().filter(|r| r.action == action).count();

        ProfileStatistics {
            total: log.len(),
            likes: count(InteractionAction::Like),
            dislikes: count(InteractionAction::Dislike),
            skips: count(InteractionAction::Skip),
            favorite_genre_count: profile.favorite_genres.len(),
            disliked_genre_count: profile.disliked_genres.len(),
            last_updated: profile.last_updated,
        }
    }

    /// Returns the interaction log, newest first. Falls back to an empty log
    /// on any storage or deserialization failure.
    pub async fn interactions(&self) -> Vec<InteractionRecord> {
        self.load_interactions().await
    }

    async fn load_interactions(&self) -> Vec<InteractionRecord> {
        match self.storage.fetch(INTERACTIONS_KEY).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(log) => log,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored interaction log is unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Interaction log storage unavailable, starting empty");
                Vec::new()
            }
        }
    }

    async fn save_interactions(&self, log: &[InteractionRecord]) {
        let json = match serde_json::to_string(log) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Interaction log serialization failed");
                return;
            }
        };

        if let Err(e) = self.storage.store(INTERACTIONS_KEY, json).await {
            tracing::warn!(error = %e, "Interaction log save failed");
        }
    }
}
