use bstream::{parse_schema, Endian, TypeTag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    data: RawConfig,
    schemas: BTreeMap<String, Vec<TypeTag>>,
}

impl CliConfig {
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit.or_else(default_config_path);
        let data = match path.as_ref() {
            Some(config_path) if config_path.exists() => read_file(config_path)?,
            _ => RawConfig::default(),
        };
        let schemas = parse_schemas(&data)?;
        if let Some(name) = data.default_schema.as_deref() {
            // left loadable so `schemas set` can repair it
            if !schemas.contains_key(name) {
                warn!(schema = name, "default schema is not defined; ignoring it");
            }
        }
        if let Some(raw) = data.endian.as_deref() {
            raw.parse::<Endian>()
                .map_err(|_| ConfigError::InvalidEndian {
                    value: raw.to_string(),
                })?;
        }
        Ok(Self {
            path,
            data,
            schemas,
        })
    }

    pub fn capacity(&self) -> Option<usize> {
        self.data.capacity
    }

    pub fn endian(&self) -> Option<Endian> {
        // validated in `load`
        self.data.endian.as_deref().and_then(|raw| raw.parse().ok())
    }

    pub fn schema(&self, name: &str) -> Result<&[TypeTag], ConfigError> {
        self.schemas
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::SchemaNotFound {
                name: name.to_string(),
            })
    }

    pub fn default_schema(&self) -> Option<&[TypeTag]> {
        self.data
            .default_schema
            .as_deref()
            .and_then(|name| self.schemas.get(name))
            .map(Vec::as_slice)
    }

    /// Name of the default schema, if it is actually defined.
    pub fn default_schema_name(&self) -> Option<&str> {
        self.data
            .default_schema
            .as_deref()
            .filter(|name| self.schemas.contains_key(*name))
    }

    pub fn schemas(&self) -> impl Iterator<Item = (&str, &[TypeTag])> {
        self.schemas
            .iter()
            .map(|(name, tags)| (name.as_str(), tags.as_slice()))
    }

    pub fn set_schema(
        &mut self,
        name: &str,
        spec: &str,
        make_default: bool,
    ) -> Result<(), ConfigError> {
        parse_schema(spec).map_err(|source| ConfigError::InvalidSchema {
            name: name.to_string(),
            source,
        })?;
        self.data.schemas.insert(name.to_string(), spec.to_string());
        if make_default {
            self.data.default_schema = Some(name.to_string());
        }
        self.schemas = parse_schemas(&self.data)?;
        Ok(())
    }

    pub fn delete_schema(&mut self, name: &str) -> Result<(), ConfigError> {
        if self.data.schemas.remove(name).is_none() {
            return Err(ConfigError::SchemaNotFound {
                name: name.to_string(),
            });
        }
        if self.data.default_schema.as_deref() == Some(name) {
            self.data.default_schema = None;
        }
        self.schemas = parse_schemas(&self.data)?;
        Ok(())
    }

    pub fn persist(&self) -> Result<PathBuf, ConfigError> {
        let target = if let Some(path) = &self.path {
            path.clone()
        } else if let Some(default) = default_config_path() {
            default
        } else {
            return Err(ConfigError::NoConfigPath);
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let serialized = toml::to_string_pretty(&self.data)
            .map_err(|source| ConfigError::Serialize { source })?;
        fs::write(&target, serialized).map_err(|source| ConfigError::Write {
            path: target.clone(),
            source,
        })?;
        Ok(target)
    }
}

fn read_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_schemas(data: &RawConfig) -> Result<BTreeMap<String, Vec<TypeTag>>, ConfigError> {
    let mut schemas = BTreeMap::new();
    for (name, spec) in &data.schemas {
        let tags = parse_schema(spec).map_err(|source| ConfigError::InvalidSchema {
            name: name.clone(),
            source,
        })?;
        schemas.insert(name.clone(), tags);
    }
    Ok(schemas)
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawConfig {
    #[serde(default)]
    capacity: Option<usize>,
    #[serde(default)]
    endian: Option<String>,
    #[serde(default)]
    default_schema: Option<String>,
    #[serde(default)]
    schemas: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read CLI config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse CLI config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize CLI config: {source}")]
    Serialize { source: toml::ser::Error },
    #[error("failed to write CLI config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("schema '{name}' not found")]
    SchemaNotFound { name: String },
    #[error("schema '{name}' is invalid: {source}")]
    InvalidSchema {
        name: String,
        source: bstream::StreamError,
    },
    #[error("endian value '{value}' is invalid")]
    InvalidEndian { value: String },
    #[error("no config directory found; pass --config or set BSTREAM_CONFIG")]
    NoConfigPath,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("bstream").join("cli.toml"))
}
