use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::blend::catalog::{CATALOG, CatalogEntry};
use crate::blend::validate::validate_program;
use crate::blend::{AlphaDescriptor, BlendKey};
use crate::foundation::error::{BlendError, BlendResult};
use crate::ucode::{Hash128, Rgb, encode_bytes, hash_bytes};

/// Knobs for [`BlendTable::build_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOpts {
    /// Run every generator twice and require byte-identical encodings.
    pub verify_determinism: bool,
    /// Check each program with [`validate_program`] before inserting it.
    pub validate_programs: bool,
}

impl Default for BuildOpts {
    fn default() -> Self {
        Self {
            verify_determinism: true,
            validate_programs: true,
        }
    }
}

/// Metadata stored for one distinct program hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub hash: Hash128,
    /// First catalog triple that produced this program.
    pub key: BlendKey,
    pub constants: Vec<Rgb>,
    pub alpha: AlphaDescriptor,
    /// Later triples that produced the identical program and metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<BlendKey>,
}

impl TableEntry {
    /// The retained triple followed by its aliases.
    pub fn keys(&self) -> impl Iterator<Item = BlendKey> + '_ {
        std::iter::once(self.key).chain(self.aliases.iter().copied())
    }
}

/// Hash-indexed table of every catalog program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlendTable {
    entries: BTreeMap<Hash128, TableEntry>,
    by_key: BTreeMap<BlendKey, Hash128>,
}

impl BlendTable {
    /// Build from the full catalog with default options.
    pub fn build() -> BlendResult<Self> {
        Self::build_with(&BuildOpts::default())
    }

    pub fn build_with(opts: &BuildOpts) -> BlendResult<Self> {
        Self::build_from(CATALOG, opts)
    }

    /// Build from an arbitrary list of catalog entries, in order.
    #[tracing::instrument(skip_all, fields(triples = catalog.len()))]
    pub fn build_from(catalog: &[CatalogEntry], opts: &BuildOpts) -> BlendResult<Self> {
        let mut table = Self::default();

        for entry in catalog {
            let generated = entry.run()?;
            let bytes = encode_bytes(&generated.program);

            if opts.verify_determinism {
                let again = entry.run()?;
                if encode_bytes(&again.program) != bytes || again.alpha != generated.alpha {
                    return Err(BlendError::invariant(format!(
                        "generator for {} is not deterministic",
                        entry.key
                    )));
                }
            }
            if opts.validate_programs {
                validate_program(&generated.program, &generated.alpha).map_err(|e| {
                    BlendError::invariant(format!("{}: {e}", entry.key))
                })?;
            }

            let hash = hash_bytes(&bytes);
            table.insert(
                entry.key,
                hash,
                generated.program.constants().to_vec(),
                generated.alpha,
            )?;
        }

        tracing::info!(
            triples = table.by_key.len(),
            distinct = table.entries.len(),
            "blend table built"
        );
        Ok(table)
    }

    /// Process-wide table, built on first use.
    pub fn global() -> BlendResult<&'static BlendTable> {
        static TABLE: OnceLock<BlendTable> = OnceLock::new();
        if let Some(table) = TABLE.get() {
            return Ok(table);
        }
        let built = Self::build()?;
        Ok(TABLE.get_or_init(|| built))
    }

    fn insert(
        &mut self,
        key: BlendKey,
        hash: Hash128,
        constants: Vec<Rgb>,
        alpha: AlphaDescriptor,
    ) -> BlendResult<()> {
        if self.by_key.contains_key(&key) {
            return Err(BlendError::invariant(format!("{key} appears twice in the catalog")));
        }

        match self.entries.entry(hash) {
            Entry::Vacant(v) => {
                v.insert(TableEntry {
                    hash,
                    key,
                    constants,
                    alpha,
                    aliases: Vec::new(),
                });
            }
            Entry::Occupied(mut o) => {
                let kept = o.get_mut();
                if kept.constants != constants || kept.alpha != alpha {
                    return Err(BlendError::table_conflict(format!(
                        "{key} and {} share program hash {hash} but differ in constants or alpha",
                        kept.key
                    )));
                }
                tracing::debug!(%hash, kept = %kept.key, merged = %key, "merged identical program");
                kept.aliases.push(key);
            }
        }

        self.by_key.insert(key, hash);
        Ok(())
    }

    /// Rebuild a table from stored entries, re-deriving the key index.
    pub fn from_entries(entries: impl IntoIterator<Item = TableEntry>) -> BlendResult<Self> {
        let mut table = Self::default();
        for entry in entries {
            for key in entry.keys() {
                if table.by_key.insert(key, entry.hash).is_some() {
                    return Err(BlendError::table_conflict(format!(
                        "{key} is listed under more than one hash"
                    )));
                }
            }
            let hash = entry.hash;
            if table.entries.insert(hash, entry).is_some() {
                return Err(BlendError::table_conflict(format!(
                    "hash {hash} is listed more than once"
                )));
            }
        }
        Ok(table)
    }

    /// Which triple (and aliases) a program hash stands for.
    pub fn lookup(&self, hash: Hash128) -> Option<&TableEntry> {
        self.entries.get(&hash)
    }

    pub fn hash_for(&self, key: BlendKey) -> Option<Hash128> {
        self.by_key.get(&key).copied()
    }

    pub fn entry_for(&self, key: BlendKey) -> Option<&TableEntry> {
        self.hash_for(key).and_then(|h| self.lookup(h))
    }

    /// Entries ordered by hash.
    pub fn entries(&self) -> impl Iterator<Item = &TableEntry> {
        self.entries.values()
    }

    /// Number of distinct programs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of triples covered, aliases included.
    pub fn triple_count(&self) -> usize {
        self.by_key.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/table/builder.rs"]
mod tests;
