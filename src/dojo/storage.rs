use std::path::{Path, PathBuf};

use sled::IVec;

use crate::dojo::catalog::canonical_quest_seed;
use crate::dojo::errors::DojoError;
use crate::dojo::types::{
    BadgeRecord, LedgerEntry, QuestDefinition, QuestRunState, BADGE_SCHEMA_VERSION,
    QUEST_SCHEMA_VERSION, RUN_SCHEMA_VERSION,
};

const TREE_CATALOG: &str = "dojo_catalog";
const TREE_RUNS: &str = "dojo_runs";
const TREE_LEDGER: &str = "dojo_ledger";

const AUTHORITY_KEY: &[u8] = b"authority";
const DEFAULT_AUTHORITY: &str = "sensei";

/// Helper builder so tests can easily create throwaway stores with custom
/// paths, authorities, or an empty catalog.
pub struct DojoStoreBuilder {
    path: PathBuf,
    authority: String,
    ensure_catalog_seed: bool,
}

impl DojoStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            authority: DEFAULT_AUTHORITY.to_string(),
            ensure_catalog_seed: true,
        }
    }

    /// Name of the dojo authority allowed to mint badges. Recorded on first
    /// open and immutable afterwards.
    pub fn with_authority(mut self, authority: &str) -> Self {
        self.authority = authority.to_string();
        self
    }

    /// Opt out of seeding the canonical quests during initialization
    /// (useful for targeted tests).
    pub fn without_catalog_seed(mut self) -> Self {
        self.ensure_catalog_seed = false;
        self
    }

    pub fn open(self) -> Result<DojoStore, DojoError> {
        DojoStore::open_with_options(self.path, &self.authority, self.ensure_catalog_seed)
    }
}

/// Sled-backed persistence for quest definitions, participant runs, and the
/// XP/badge ledger.
pub struct DojoStore {
    _db: sled::Db,
    catalog: sled::Tree,
    runs: sled::Tree,
    ledger: sled::Tree,
}

impl DojoStore {
    /// Open (or create) the dojo store rooted at `path`. The canonical
    /// quests are inserted if the catalog is empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DojoError> {
        Self::open_with_options(path, DEFAULT_AUTHORITY, true)
    }

    fn open_with_options<P: AsRef<Path>>(
        path: P,
        authority: &str,
        seed_catalog: bool,
    ) -> Result<Self, DojoError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let catalog = db.open_tree(TREE_CATALOG)?;
        let runs = db.open_tree(TREE_RUNS)?;
        let ledger = db.open_tree(TREE_LEDGER)?;
        let store = Self {
            _db: db,
            catalog,
            runs,
            ledger,
        };

        // Record the authority on first open only; an existing ledger keeps
        // its original owner, like a contract deployed once.
        if store.ledger.get(AUTHORITY_KEY)?.is_none() {
            store.ledger.insert(AUTHORITY_KEY, authority.as_bytes())?;
            store.ledger.flush()?;
        }

        if seed_catalog {
            store.seed_catalog_if_needed()?;
        }

        Ok(store)
    }

    fn quest_key(quest_id: &str) -> Vec<u8> {
        format!("quests:{}", quest_id).into_bytes()
    }

    fn run_key(participant: &str, quest_id: &str) -> Vec<u8> {
        format!("runs:{}:{}", participant.to_ascii_lowercase(), quest_id).into_bytes()
    }

    fn xp_key(participant: &str) -> Vec<u8> {
        format!("xp:{}", participant.to_ascii_lowercase()).into_bytes()
    }

    fn badge_key(participant: &str, badge_id: u32) -> Vec<u8> {
        format!("badges:{}:{:04}", participant.to_ascii_lowercase(), badge_id).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, DojoError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, DojoError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Name of the dojo authority recorded at first open.
    pub fn authority(&self) -> Result<String, DojoError> {
        let bytes = self
            .ledger
            .get(AUTHORITY_KEY)?
            .ok_or_else(|| DojoError::PermissionDenied("no authority recorded".to_string()))?;
        Ok(std::str::from_utf8(&bytes)
            .map_err(|_| DojoError::PermissionDenied("invalid authority record".to_string()))?
            .to_string())
    }

    /// Insert or update a quest definition. The definition is validated
    /// before anything is written.
    pub fn put_quest(&self, mut quest: QuestDefinition) -> Result<(), DojoError> {
        quest.validate()?;
        quest.schema_version = QUEST_SCHEMA_VERSION;
        let key = Self::quest_key(&quest.id);
        let bytes = Self::serialize(&quest)?;
        self.catalog.insert(key, bytes)?;
        self.catalog.flush()?;
        Ok(())
    }

    /// Fetch a quest definition by slug.
    pub fn get_quest(&self, quest_id: &str) -> Result<QuestDefinition, DojoError> {
        let key = Self::quest_key(quest_id);
        let Some(bytes) = self.catalog.get(&key)? else {
            return Err(DojoError::QuestNotFound(quest_id.to_string()));
        };
        let quest: QuestDefinition = Self::deserialize(bytes)?;
        if quest.schema_version != QUEST_SCHEMA_VERSION {
            return Err(DojoError::SchemaMismatch {
                entity: "quest",
                expected: QUEST_SCHEMA_VERSION,
                found: quest.schema_version,
            });
        }
        Ok(quest)
    }

    /// List all quest slugs currently in the catalog.
    pub fn list_quest_ids(&self) -> Result<Vec<String>, DojoError> {
        let mut ids = Vec::new();
        for entry in self.catalog.scan_prefix(b"quests:") {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(id) = text.strip_prefix("quests:") {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }

    /// Insert the canonical quests when the catalog is empty.
    pub fn seed_catalog_if_needed(&self) -> Result<usize, DojoError> {
        if self.catalog.scan_prefix(b"quests:").next().is_some() {
            return Ok(0);
        }
        let mut inserted = 0usize;
        for quest in canonical_quest_seed() {
            self.put_quest(quest)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Insert or update a participant's run for a quest.
    pub fn put_run(&self, run: &QuestRunState) -> Result<(), DojoError> {
        let mut record = run.clone();
        record.schema_version = RUN_SCHEMA_VERSION;
        let key = Self::run_key(&record.participant, &record.quest_id);
        let bytes = Self::serialize(&record)?;
        self.runs.insert(key, bytes)?;
        self.runs.flush()?;
        Ok(())
    }

    /// Fetch a run, erroring when none exists.
    pub fn get_run(&self, participant: &str, quest_id: &str) -> Result<QuestRunState, DojoError> {
        self.find_run(participant, quest_id)?
            .ok_or_else(|| DojoError::RunNotFound {
                participant: participant.to_string(),
                quest_id: quest_id.to_string(),
            })
    }

    /// Fetch a run if one exists.
    pub fn find_run(
        &self,
        participant: &str,
        quest_id: &str,
    ) -> Result<Option<QuestRunState>, DojoError> {
        let key = Self::run_key(participant, quest_id);
        let Some(bytes) = self.runs.get(&key)? else {
            return Ok(None);
        };
        let run: QuestRunState = Self::deserialize(bytes)?;
        if run.schema_version != RUN_SCHEMA_VERSION {
            return Err(DojoError::SchemaMismatch {
                entity: "run",
                expected: RUN_SCHEMA_VERSION,
                found: run.schema_version,
            });
        }
        Ok(Some(run))
    }

    /// Add XP to a participant's ledger tally. Returns the updated entry.
    pub fn record_xp(&self, participant: &str, xp: u32) -> Result<LedgerEntry, DojoError> {
        let key = Self::xp_key(participant);
        let mut entry = match self.ledger.get(&key)? {
            Some(bytes) => Self::deserialize::<LedgerEntry>(bytes)?,
            None => LedgerEntry::default(),
        };
        entry.xp += u64::from(xp);
        entry.quests_completed += 1;
        let bytes = Self::serialize(&entry)?;
        self.ledger.insert(key, bytes)?;
        self.ledger.flush()?;
        Ok(entry)
    }

    /// Total XP earned by a participant (0 when absent).
    pub fn total_xp(&self, participant: &str) -> Result<u64, DojoError> {
        let key = Self::xp_key(participant);
        match self.ledger.get(&key)? {
            Some(bytes) => Ok(Self::deserialize::<LedgerEntry>(bytes)?.xp),
            None => Ok(0),
        }
    }

    /// All ledger tallies, keyed by participant.
    pub fn list_ledger(&self) -> Result<Vec<(String, LedgerEntry)>, DojoError> {
        let mut entries = Vec::new();
        for item in self.ledger.scan_prefix(b"xp:") {
            let (key, value) = item?;
            let text = String::from_utf8_lossy(&key);
            if let Some(participant) = text.strip_prefix("xp:") {
                entries.push((participant.to_string(), Self::deserialize(value)?));
            }
        }
        Ok(entries)
    }

    /// Record a minted badge.
    pub fn put_badge(&self, badge: &BadgeRecord) -> Result<(), DojoError> {
        let mut record = badge.clone();
        record.schema_version = BADGE_SCHEMA_VERSION;
        let key = Self::badge_key(&record.participant, record.badge_id);
        let bytes = Self::serialize(&record)?;
        self.ledger.insert(key, bytes)?;
        self.ledger.flush()?;
        Ok(())
    }

    /// Fetch a minted badge if present.
    pub fn get_badge(
        &self,
        participant: &str,
        badge_id: u32,
    ) -> Result<Option<BadgeRecord>, DojoError> {
        let key = Self::badge_key(participant, badge_id);
        match self.ledger.get(&key)? {
            Some(bytes) => Ok(Some(Self::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    /// All badges minted for a participant, ordered by badge id.
    pub fn list_badges(&self, participant: &str) -> Result<Vec<BadgeRecord>, DojoError> {
        let prefix = format!("badges:{}:", participant.to_ascii_lowercase());
        let mut badges = Vec::new();
        for item in self.ledger.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            badges.push(Self::deserialize(value)?);
        }
        Ok(badges)
    }
}
