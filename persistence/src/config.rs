//! Layered application configuration.
//!
//! Values come from JSON settings files, in-memory pairs and environment
//! variables, flattened into `Section:Key` paths. Sources added later override
//! earlier ones and keys compare case-insensitively, so
//! `ConnectionStrings:PostgreSQL` and `connectionstrings:postgresql` name the
//! same value.
//!
//! ```no_run
//! use persistence::config::{ConfigurationBuilder, api_content_root};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let configuration = ConfigurationBuilder::new()
//!     .set_base_path(api_content_root()?)
//!     .add_json_file("appsettings.json")
//!     .build()?;
//!
//! let url = configuration.get_connection_string("PostgreSQL")?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Settings file read from the content root.
pub const APP_SETTINGS_FILE: &str = "appsettings.json";

/// Directory of the API host project, next to the working directory.
pub const API_PROJECT_DIR: &str = "ETicaretAPI.API";

/// Section holding named connection strings.
pub const CONNECTION_STRINGS_SECTION: &str = "ConnectionStrings";

const KEY_DELIMITER: &str = ":";
const ENV_KEY_DELIMITER: &str = "__";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file '{}' was not found", path.display())]
    FileNotFound { path: PathBuf },
    #[error("failed to read configuration file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("configuration file '{}' must contain a JSON object", path.display())]
    NotAnObject { path: PathBuf },
    #[error("connection string '{name}' is not configured")]
    MissingConnectionString { name: String },
}

/// Returns `<cwd>/../ETicaretAPI.API`, where the host keeps its settings.
pub fn api_content_root() -> io::Result<PathBuf> {
    Ok(std::env::current_dir()?.join("..").join(API_PROJECT_DIR))
}

#[derive(Debug)]
enum Source {
    JsonFile { path: PathBuf, optional: bool },
    Memory(Vec<(String, String)>),
    ProcessEnvironment,
    Environment(Vec<(String, String)>),
}

/// Collects configuration sources; [`build`](Self::build) reads them in order.
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    base_path: Option<PathBuf>,
    sources: Vec<Source>,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory that relative JSON file paths are resolved against.
    pub fn set_base_path<P>(mut self, base_path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.base_path = Some(base_path.into());
        self
    }

    /// Adds a JSON file that must exist when the configuration is built.
    pub fn add_json_file<P>(mut self, path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.sources.push(Source::JsonFile {
            path: path.into(),
            optional: false,
        });
        self
    }

    /// Adds a JSON file that is skipped when absent.
    pub fn add_optional_json_file<P>(mut self, path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.sources.push(Source::JsonFile {
            path: path.into(),
            optional: true,
        });
        self
    }

    /// Adds key/value pairs whose keys are already `:` separated paths.
    pub fn add_in_memory<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.sources.push(Source::Memory(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    /// Adds the variables of the running process, read at build time.
    ///
    /// A double underscore separates sections, so `ConnectionStrings__PostgreSQL`
    /// overrides `ConnectionStrings:PostgreSQL`.
    pub fn add_environment_variables(mut self) -> Self {
        self.sources.push(Source::ProcessEnvironment);
        self
    }

    /// Same as [`add_environment_variables`](Self::add_environment_variables)
    /// for an explicit set of variables.
    pub fn add_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.sources.push(Source::Environment(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    pub fn build(self) -> Result<Configuration, ConfigError> {
        let mut configuration = Configuration::default();

        for source in self.sources {
            match source {
                Source::JsonFile { path, optional } => {
                    let path = match &self.base_path {
                        Some(base) => base.join(path),
                        None => path,
                    };
                    match read_json_file(&path) {
                        Ok(pairs) => configuration.extend(pairs),
                        Err(ConfigError::FileNotFound { .. }) if optional => {
                            tracing::debug!("Skipping optional configuration file {}", path.display());
                        }
                        Err(e) => return Err(e),
                    }
                }
                Source::Memory(pairs) => configuration.extend(pairs),
                Source::ProcessEnvironment => {
                    configuration.extend(unicode_env_vars(std::env::vars_os()).map(env_pair));
                }
                Source::Environment(vars) => {
                    configuration.extend(vars.into_iter().map(env_pair));
                }
            }
        }

        Ok(configuration)
    }
}

/// Flattened configuration values.
#[derive(Clone, Default)]
pub struct Configuration {
    values: HashMap<String, String>,
}

impl Configuration {
    /// Builds the host configuration rooted at `content_root`.
    ///
    /// Reads `appsettings.json` (required), then `appsettings.<environment>.json`
    /// when an environment is given and the file exists, then the process
    /// environment.
    pub fn load(content_root: &Path, environment: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigurationBuilder::new()
            .set_base_path(content_root)
            .add_json_file(APP_SETTINGS_FILE);
        if let Some(environment) = environment {
            builder = builder.add_optional_json_file(format!("appsettings.{environment}.json"));
        }
        builder.add_environment_variables().build()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize(key)).map(String::as_str)
    }

    /// Looks up `ConnectionStrings:<name>`. An empty value counts as missing.
    pub fn get_connection_string(&self, name: &str) -> Result<&str, ConfigError> {
        self.get(&format!("{CONNECTION_STRINGS_SECTION}{KEY_DELIMITER}{name}"))
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingConnectionString {
                name: name.to_owned(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn extend<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in pairs {
            self.values.insert(normalize(&key), value);
        }
    }
}

// Values may hold credentials, only the keys are printed.
impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Configuration").field("keys", &keys).finish()
    }
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

/// Drops variables whose name or value is not valid unicode.
fn unicode_env_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter().filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
        (Ok(key), Ok(value)) => Some((key, value)),
        (key, _) => {
            let key = key.unwrap_or_else(|key| key.to_string_lossy().into_owned());
            tracing::debug!("Skipping non-unicode environment variable {key}");
            None
        }
    })
}

fn env_pair((key, value): (String, String)) -> (String, String) {
    (key.replace(ENV_KEY_DELIMITER, KEY_DELIMITER), value)
}

fn read_json_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::FileNotFound {
            path: path.to_owned(),
        },
        _ => ConfigError::Io {
            path: path.to_owned(),
            source,
        },
    })?;

    let value: Value = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })?;

    if !value.is_object() {
        return Err(ConfigError::NotAnObject {
            path: path.to_owned(),
        });
    }

    let mut pairs = Vec::new();
    flatten(None, &value, &mut pairs);
    Ok(pairs)
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut Vec<(String, String)>) {
    let join = |key: &str| match prefix {
        Some(prefix) => format!("{prefix}{KEY_DELIMITER}{key}"),
        None => key.to_owned(),
    };

    match value {
        Value::Object(map) => {
            for (key, value) in map {
                flatten(Some(&join(key)), value, out);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten(Some(&join(&index.to_string())), value, out);
            }
        }
        scalar => {
            if let Some(prefix) = prefix {
                let text = match scalar {
                    Value::Null => String::new(),
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                out.push((prefix.to_owned(), text));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    const SETTINGS: &str = r#"{
        "ConnectionStrings": {
            "PostgreSQL": "User ID=root;Password=myPassword;Host=localhost;Port=5432;Database=ETicaretAPIDb;"
        },
        "Logging": { "LogLevel": { "Default": "Information" } },
        "AllowedHosts": "*",
        "Features": [true, 3, null]
    }"#;

    fn content_root(settings: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(APP_SETTINGS_FILE), settings).unwrap();
        dir
    }

    #[test]
    fn reads_connection_string_from_json_file() {
        let dir = content_root(r#"{"ConnectionStrings":{"PostgreSQL":"X"}}"#);

        let configuration = ConfigurationBuilder::new()
            .set_base_path(dir.path())
            .add_json_file(APP_SETTINGS_FILE)
            .build()
            .unwrap();

        assert_eq!(configuration.get_connection_string("PostgreSQL").unwrap(), "X");
    }

    #[test]
    fn flattens_nested_sections_and_arrays() {
        let dir = content_root(SETTINGS);

        let configuration = ConfigurationBuilder::new()
            .set_base_path(dir.path())
            .add_json_file(APP_SETTINGS_FILE)
            .build()
            .unwrap();

        assert_eq!(configuration.get("Logging:LogLevel:Default"), Some("Information"));
        assert_eq!(configuration.get("AllowedHosts"), Some("*"));
        assert_eq!(configuration.get("Features:0"), Some("true"));
        assert_eq!(configuration.get("Features:1"), Some("3"));
        assert_eq!(configuration.get("Features:2"), Some(""));
        assert_eq!(configuration.get("Features"), None);
        assert_eq!(configuration.len(), 6);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let configuration = ConfigurationBuilder::new()
            .add_in_memory([("ConnectionStrings:PostgreSQL", "X")])
            .build()
            .unwrap();

        assert_eq!(configuration.get("connectionstrings:postgresql"), Some("X"));
        assert_eq!(configuration.get_connection_string("POSTGRESQL").unwrap(), "X");
    }

    #[test]
    fn missing_required_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = ConfigurationBuilder::new()
            .set_base_path(dir.path())
            .add_json_file(APP_SETTINGS_FILE)
            .build()
            .unwrap_err();

        match err {
            ConfigError::FileNotFound { path } => {
                assert_eq!(path, dir.path().join(APP_SETTINGS_FILE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_optional_file_is_skipped() {
        let dir = content_root(SETTINGS);

        let configuration = ConfigurationBuilder::new()
            .set_base_path(dir.path())
            .add_json_file(APP_SETTINGS_FILE)
            .add_optional_json_file("appsettings.Production.json")
            .build()
            .unwrap();

        assert_eq!(configuration.get("AllowedHosts"), Some("*"));
    }

    #[test]
    fn missing_and_empty_connection_strings() {
        let configuration = ConfigurationBuilder::new()
            .add_in_memory([("ConnectionStrings:Empty", "  ")])
            .build()
            .unwrap();

        assert!(matches!(
            configuration.get_connection_string("PostgreSQL"),
            Err(ConfigError::MissingConnectionString { name }) if name == "PostgreSQL"
        ));
        assert!(matches!(
            configuration.get_connection_string("Empty"),
            Err(ConfigError::MissingConnectionString { .. })
        ));
    }

    #[test]
    fn rejects_malformed_and_non_object_files() {
        let dir = content_root("{ not json");
        let err = ConfigurationBuilder::new()
            .set_base_path(dir.path())
            .add_json_file(APP_SETTINGS_FILE)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let dir = content_root("[1, 2]");
        let err = ConfigurationBuilder::new()
            .set_base_path(dir.path())
            .add_json_file(APP_SETTINGS_FILE)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { .. }));
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        let dir = content_root(SETTINGS);
        fs::write(
            dir.path().join("appsettings.Development.json"),
            r#"{"AllowedHosts": "localhost"}"#,
        )
        .unwrap();

        let configuration = ConfigurationBuilder::new()
            .set_base_path(dir.path())
            .add_json_file(APP_SETTINGS_FILE)
            .add_optional_json_file("appsettings.Development.json")
            .add_env_vars([("ConnectionStrings__PostgreSQL", "postgres://env@db/shop")])
            .build()
            .unwrap();

        assert_eq!(configuration.get("AllowedHosts"), Some("localhost"));
        assert_eq!(
            configuration.get_connection_string("PostgreSQL").unwrap(),
            "postgres://env@db/shop"
        );
    }

    #[test]
    fn load_uses_environment_overlay() {
        let dir = content_root(SETTINGS);
        fs::write(
            dir.path().join("appsettings.Staging.json"),
            r#"{"Logging": {"LogLevel": {"Default": "Debug"}}}"#,
        )
        .unwrap();

        let configuration = Configuration::load(dir.path(), Some("Staging")).unwrap();
        assert_eq!(configuration.get("Logging:LogLevel:Default"), Some("Debug"));

        let configuration = Configuration::load(dir.path(), None).unwrap();
        assert_eq!(configuration.get("Logging:LogLevel:Default"), Some("Information"));
    }

    #[test]
    fn load_reads_process_environment() {
        let dir = content_root(r#"{"ConnectionStrings": {"LoadReadsProcessEnvironment": "from-file"}}"#);
        // Unique to this test, no other test reads it.
        let key = "ConnectionStrings__LoadReadsProcessEnvironment";
        unsafe { std::env::set_var(key, "postgres://env@db/shop") };

        let configuration = Configuration::load(dir.path(), None);
        unsafe { std::env::remove_var(key) };

        assert_eq!(
            configuration
                .unwrap()
                .get_connection_string("LoadReadsProcessEnvironment")
                .unwrap(),
            "postgres://env@db/shop"
        );
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_unicode_environment_variables() {
        use std::os::unix::ffi::OsStringExt;

        let vars = vec![
            (OsString::from("Bad__Value"), OsString::from_vec(b"f\xffo".to_vec())),
            (OsString::from_vec(b"Bad\xffKey".to_vec()), OsString::from("x")),
            (OsString::from("ConnectionStrings__PostgreSQL"), OsString::from("X")),
        ];

        let pairs: Vec<_> = unicode_env_vars(vars).collect();
        assert_eq!(
            pairs,
            vec![("ConnectionStrings__PostgreSQL".to_owned(), "X".to_owned())]
        );
    }

    #[cfg(unix)]
    #[test]
    fn process_environment_with_non_unicode_value_still_builds() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let key = "ETICARET_NON_UNICODE_SETTING";
        unsafe { std::env::set_var(key, OsStr::from_bytes(b"f\xffo")) };

        let built = ConfigurationBuilder::new()
            .add_in_memory([("ConnectionStrings:PostgreSQL", "X")])
            .add_environment_variables()
            .build();
        unsafe { std::env::remove_var(key) };

        let configuration = built.unwrap();
        assert_eq!(configuration.get(key), None);
        assert_eq!(configuration.get_connection_string("PostgreSQL").unwrap(), "X");
    }

    #[test]
    fn debug_output_hides_values() {
        let configuration = ConfigurationBuilder::new()
            .add_in_memory([("ConnectionStrings:PostgreSQL", "Password=secret")])
            .build()
            .unwrap();

        let printed = format!("{configuration:?}");
        assert!(printed.contains("connectionstrings:postgresql"));
        assert!(!printed.contains("secret"));
    }
}
