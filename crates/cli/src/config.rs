//! Profile and output resolution.
//!
//! Settings come from command-line flags, an optional `apigen.toml` and the
//! built-in `app` / `operation` profiles, in that order of precedence.

use std::fs;
use std::path::{Path, PathBuf};

use apigen_core::Profile;
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::cli::GenerateArgs;

pub const DEFAULT_CONFIG_FILE: &str = "apigen.toml";
pub const DEFAULT_INPUT: &str = "swagger.json";

const APP_TAGS: [&str; 9] = [
    "Auth",
    "Products",
    "Orders",
    "Chat",
    "Communities",
    "Users",
    "Share",
    "Onboarding",
    "Uploads",
];

const OPERATION_TAGS: [&str; 6] = [
    "Auth",
    "AdminUsers",
    "AdminProducts",
    "AdminOrders",
    "AdminDashboard",
    "Uploads",
];

/// Tag allow-list of a built-in profile.
pub fn builtin_tags(profile: &str) -> Option<Vec<String>> {
    let tags: &[&str] = match profile {
        "app" => &APP_TAGS,
        "operation" => &OPERATION_TAGS,
        _ => return None,
    };
    Some(tags.iter().map(ToString::to_string).collect())
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid --output-dirs entry '{entry}', expected key:path")]
    InvalidOutputDirs { entry: String },

    #[error("project type not specified, use --output-dirs key:path or --project <profile> (app, operation)")]
    MissingProfile,

    #[error("output directory not specified for profile '{profile}', use --output-dirs key:path or set output_dir in the config")]
    MissingOutputTarget { profile: String },
}

impl ConfigError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Read { .. } => 3,
            Self::Parse { .. }
            | Self::InvalidOutputDirs { .. }
            | Self::MissingProfile
            | Self::MissingOutputTarget { .. } => 1,
        }
    }
}

/// A `[profiles.<name>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    pub tags: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
}

/// Contents of `apigen.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub profiles: IndexMap<String, ProfileConfig>,
}

/// Everything one generation run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub input: PathBuf,
    pub profile: Profile,
    pub output_dir: PathBuf,
}

impl Config {
    /// Load `path`, or `apigen.toml` in the working directory when no path
    /// is given. A missing default file yields an empty config.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    debug!("no {DEFAULT_CONFIG_FILE} found, using built-in profiles");
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), profiles = config.profiles.len(), "loaded config");
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Tag allow-list for a profile: the config file's list, else the
    /// built-in one.
    pub fn profile_tags(&self, name: &str) -> Option<Vec<String>> {
        self.profiles
            .get(name)
            .and_then(|p| p.tags.clone())
            .or_else(|| builtin_tags(name))
    }

    /// Names of every known profile, built-ins first.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = ["app", "operation"].iter().map(ToString::to_string).collect();
        for name in self.profiles.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// Resolve flags against this config.
    ///
    /// The active profile is `--project`, else the last `--output-dirs` key.
    /// Tag filtering applies when `--project` or `--tags` is given.
    pub fn plan(&self, args: &GenerateArgs) -> Result<RunPlan, ConfigError> {
        let output_dirs = match &args.output_dirs {
            Some(spec) => parse_output_dirs(spec)?,
            None => IndexMap::new(),
        };

        let name = args
            .project
            .clone()
            .or_else(|| output_dirs.keys().last().cloned())
            .ok_or(ConfigError::MissingProfile)?;

        let allowed_tags = match (&args.tags, &args.project) {
            (Some(tags), _) => Some(tags.clone()),
            (None, Some(_)) => Some(self.profile_tags(&name).unwrap_or_default()),
            (None, None) => None,
        };

        let output_dir = output_dirs
            .get(&name)
            .or_else(|| {
                if output_dirs.len() == 1 {
                    output_dirs.values().next()
                } else {
                    None
                }
            })
            .cloned()
            .or_else(|| self.profiles.get(&name).and_then(|p| p.output_dir.clone()))
            .ok_or_else(|| ConfigError::MissingOutputTarget {
                profile: name.clone(),
            })?;

        let input = args
            .input
            .clone()
            .or_else(|| self.input.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

        Ok(RunPlan {
            input,
            profile: Profile { name, allowed_tags },
            output_dir,
        })
    }
}

/// Parse `key:path[,key:path...]`, keeping entry order.
pub fn parse_output_dirs(spec: &str) -> Result<IndexMap<String, PathBuf>, ConfigError> {
    let mut dirs = IndexMap::new();
    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((key, path)) = entry.split_once(':') else {
            return Err(ConfigError::InvalidOutputDirs {
                entry: entry.to_string(),
            });
        };
        if key.is_empty() || path.is_empty() {
            return Err(ConfigError::InvalidOutputDirs {
                entry: entry.to_string(),
            });
        }
        dirs.insert(key.to_string(), PathBuf::from(path));
    }
    Ok(dirs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args(project: Option<&str>, output_dirs: Option<&str>) -> GenerateArgs {
        GenerateArgs {
            project: project.map(ToString::to_string),
            output_dirs: output_dirs.map(ToString::to_string),
            ..GenerateArgs::default()
        }
    }

    #[test]
    fn test_parse_output_dirs() {
        let dirs = parse_output_dirs("app:src/api, operation:admin/src/api").unwrap();
        let keys: Vec<_> = dirs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["app", "operation"]);
        assert_eq!(dirs["operation"], PathBuf::from("admin/src/api"));

        assert!(matches!(
            parse_output_dirs("src/api"),
            Err(ConfigError::InvalidOutputDirs { entry }) if entry == "src/api"
        ));
        assert!(parse_output_dirs(":src").is_err());
    }

    #[test]
    fn test_profile_from_last_output_dir_key() {
        let plan = Config::default()
            .plan(&args(None, Some("operation:admin,app:web")))
            .unwrap();
        assert_eq!(plan.profile.name, "app");
        assert_eq!(plan.profile.allowed_tags, None, "no --project, no filtering");
        assert_eq!(plan.output_dir, PathBuf::from("web"));
        assert_eq!(plan.input, PathBuf::from("swagger.json"));
    }

    #[test]
    fn test_project_selects_builtin_tags() {
        let plan = Config::default()
            .plan(&args(Some("operation"), Some("app:web,operation:admin")))
            .unwrap();
        assert_eq!(plan.output_dir, PathBuf::from("admin"));
        let tags = plan.profile.allowed_tags.unwrap();
        assert!(tags.contains(&"AdminUsers".to_string()));
        assert!(!tags.contains(&"Products".to_string()));

        let unknown = Config::default()
            .plan(&args(Some("partner"), Some("out:generated")))
            .unwrap();
        assert_eq!(unknown.profile.allowed_tags, Some(vec![]));
        assert_eq!(unknown.output_dir, PathBuf::from("generated"), "single entry is used");
    }

    #[test]
    fn test_explicit_tags_override() {
        let mut a = args(None, Some("app:web"));
        a.tags = Some(vec!["Todos".into()]);
        let plan = Config::default().plan(&a).unwrap();
        assert_eq!(plan.profile.allowed_tags, Some(vec!["Todos".to_string()]));
    }

    #[test]
    fn test_missing_profile_and_output() {
        let err = Config::default().plan(&args(None, None)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingProfile));

        let err = Config::default()
            .plan(&args(Some("app"), Some("operation:admin,partner:out")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingOutputTarget { ref profile } if profile == "app"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_file_profiles() {
        let config = Config::parse(
            r#"
input = "api/swagger.json"

[profiles.app]
tags = ["Todos"]
output_dir = "web/src/api"

[profiles.partner]
output_dir = "partner/api"
"#,
        )
        .unwrap();

        let plan = config.plan(&args(Some("app"), None)).unwrap();
        assert_eq!(plan.input, PathBuf::from("api/swagger.json"));
        assert_eq!(plan.output_dir, PathBuf::from("web/src/api"));
        assert_eq!(plan.profile.allowed_tags, Some(vec!["Todos".to_string()]));

        assert_eq!(config.profile_tags("operation"), builtin_tags("operation"));
        assert_eq!(config.profile_names(), vec!["app", "operation", "partner"]);
    }

    #[test]
    fn test_unknown_config_keys_are_rejected() {
        assert!(Config::parse("output = \"x\"").is_err());
        assert!(Config::parse("[profiles.app]\ntag = []").is_err());
    }
}
