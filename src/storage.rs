use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Valeur persistée : texte ou entier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Int(i64),
    Text(String),
}

/// Magasin clé/valeur durable. Un seul écrivain à la fois (`&mut self`).
pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn get_int(&self, key: &str) -> anyhow::Result<Option<i64>>;
    fn set_string(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn set_int(&mut self, key: &str, value: i64) -> anyhow::Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get_string(key)
    }
    fn get_int(&self, key: &str) -> anyhow::Result<Option<i64>> {
        (**self).get_int(key)
    }
    fn set_string(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set_string(key, value)
    }
    fn set_int(&mut self, key: &str, value: i64) -> anyhow::Result<()> {
        (**self).set_int(key, value)
    }
}

fn text(values: &BTreeMap<String, StoredValue>, key: &str) -> Option<String> {
    match values.get(key) {
        Some(StoredValue::Text(s)) => Some(s.clone()),
        _ => None,
    }
}

fn int(values: &BTreeMap<String, StoredValue>, key: &str) -> Option<i64> {
    match values.get(key) {
        Some(StoredValue::Int(v)) => Some(*v),
        _ => None,
    }
}

/// Magasin en mémoire (tests, hôtes sans persistance).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(text(&self.values, key))
    }
    fn get_int(&self, key: &str) -> anyhow::Result<Option<i64>> {
        Ok(int(&self.values, key))
    }
    fn set_string(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_owned(), StoredValue::Text(value.to_owned()));
        Ok(())
    }
    fn set_int(&mut self, key: &str, value: i64) -> anyhow::Result<()> {
        self.values.insert(key.to_owned(), StoredValue::Int(value));
        Ok(())
    }
}

/// Magasin fichier JSON, réécrit de manière atomique à chaque écriture.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, StoredValue>,
}

impl JsonFileStore {
    /// Ouvre le fichier ; absent, le magasin démarre vide.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice(&data)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(&self.values)?;
        write_atomic(&self.path, &json)
    }
}

/// Écrit via un fichier temporaire voisin puis renommage.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}

impl KeyValueStore for JsonFileStore {
    fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(text(&self.values, key))
    }
    fn get_int(&self, key: &str) -> anyhow::Result<Option<i64>> {
        Ok(int(&self.values, key))
    }
    fn set_string(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_owned(), StoredValue::Text(value.to_owned()));
        self.save()
    }
    fn set_int(&mut self, key: &str, value: i64) -> anyhow::Result<()> {
        self.values.insert(key.to_owned(), StoredValue::Int(value));
        self.save()
    }
}
