use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Application configuration, persisted as YAML in the platform config dir.
///
/// The attendance thresholds live here and nowhere else: every call site that
/// needs late/overtime/attendance-percentage derivation goes through the
/// `WorkPolicy` built from this struct, so the business constants cannot
/// drift between code paths.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_user")]
    pub default_user: String,
    #[serde(default = "default_role")]
    pub default_role: String,
    /// Clock-ins at or after this local time are flagged late.
    #[serde(default = "default_late_after")]
    pub late_after: String,
    /// Net minutes of a standard working day (early-out and attendance-% base).
    #[serde(default = "default_standard_day")]
    pub standard_day_minutes: i64,
    /// Net minutes above which a day counts as overtime.
    #[serde(default = "default_overtime_after")]
    pub overtime_after_minutes: i64,
    /// Minutes debited per full leave day.
    #[serde(default = "default_full_day_leave")]
    pub full_day_leave_minutes: i64,
    /// Minutes debited per half leave day.
    #[serde(default = "default_half_day_leave")]
    pub half_day_leave_minutes: i64,
}

fn default_user() -> String {
    env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}
fn default_role() -> String {
    "employee".to_string()
}
fn default_late_after() -> String {
    "09:00".to_string()
}
fn default_standard_day() -> i64 {
    480
}
fn default_overtime_after() -> i64 {
    540
}
fn default_full_day_leave() -> i64 {
    480
}
fn default_half_day_leave() -> i64 {
    240
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            default_user: default_user(),
            default_role: default_role(),
            late_after: default_late_after(),
            standard_day_minutes: default_standard_day(),
            overtime_after_minutes: default_overtime_after(),
            full_day_leave_minutes: default_full_day_leave(),
            half_day_leave_minutes: default_half_day_leave(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("punchcard")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".punchcard")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("punchcard.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("punchcard.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
                Err(_) => Config::default(),
            }
        } else {
            Config::default()
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_db {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file (skipped in test mode so tests never touch $HOME)
        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(e.to_string()))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("Database:    {:?}", db_path);

        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
