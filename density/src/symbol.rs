use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant::DataError;
use crate::utils::normalize_key;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WatchlistFile {
    List(Vec<Security>),
    Map(BTreeMap<String, String>),
}

/// Securities analysed together in a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    pub securities: Vec<Security>,
}

impl Watchlist {
    pub fn new(securities: Vec<Security>) -> Self {
        Self { securities }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        let parsed: WatchlistFile = match path.extension().and_then(|x| x.to_str()) {
            Some("json") => serde_json::from_str(&text)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            other => {
                return Err(DataError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ));
            }
        };

        let securities = match parsed {
            WatchlistFile::List(items) => items,
            WatchlistFile::Map(items) => items
                .into_iter()
                .map(|(code, name)| Security { code, name })
                .collect(),
        };
        Ok(Self { securities })
    }

    pub fn name_of(&self, code: &str) -> Option<&str> {
        let key = normalize_key(code);
        self.securities
            .iter()
            .find(|x| normalize_key(&x.code) == key)
            .map(|x| x.name.as_str())
            .filter(|x| !x.is_empty())
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }
}
