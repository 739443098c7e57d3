use std::fs;
use std::str::FromStr;
use std::time::Duration;

use pokerbench_engine::player::DEFAULT_STARTING_STACK;
use pokerbench_engine::rules::Blinds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a TOML file with overrides.
pub const CONFIG_ENV: &str = "POKERBENCH_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimConfig {
    pub starting_chips: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Hands per session
    pub max_hands: u32,
    /// Wall-clock budget per session
    pub session_budget_secs: u64,
    /// Per-decision deadline handed to agents
    pub agent_deadline_secs: u64,
    pub sessions: u32,
    /// Base seed; session `n` plays with `seed + n`. Random when unset.
    pub seed: Option<u64>,
    /// Agent kinds seated by the `pokerbench` binary, in seat order
    pub agents: Vec<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_chips: DEFAULT_STARTING_STACK,
            small_blind: 5,
            big_blind: 10,
            max_hands: 100,
            session_budget_secs: 300,
            agent_deadline_secs: 30,
            sessions: 1,
            seed: None,
            agents: vec!["baseline".into(), "random".into(), "calling".into()],
        }
    }
}

impl SimConfig {
    pub fn blinds(&self) -> Blinds {
        Blinds::new(self.small_blind, self.big_blind)
    }

    pub fn session_budget(&self) -> Duration {
        Duration::from_secs(self.session_budget_secs)
    }

    pub fn agent_deadline(&self) -> Duration {
        Duration::from_secs(self.agent_deadline_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_chips == 0 {
            return Err(ConfigError::Invalid(
                "Invalid configuration: starting_chips must be >0".into(),
            ));
        }
        if self.big_blind == 0 {
            return Err(ConfigError::Invalid(
                "Invalid configuration: big_blind must be >0".into(),
            ));
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::Invalid(format!(
                "Invalid configuration: small_blind {} exceeds big_blind {}",
                self.small_blind, self.big_blind
            )));
        }
        if self.sessions == 0 {
            return Err(ConfigError::Invalid(
                "Invalid configuration: sessions must be >=1".into(),
            ));
        }
        if self.agent_deadline_secs == 0 {
            return Err(ConfigError::Invalid(
                "Invalid configuration: agent_deadline_secs must be >0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigSources {
    pub starting_chips: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub max_hands: ValueSource,
    pub session_budget_secs: ValueSource,
    pub agent_deadline_secs: ValueSource,
    pub sessions: ValueSource,
    pub seed: ValueSource,
    pub agents: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_chips: ValueSource::Default,
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            max_hands: ValueSource::Default,
            session_budget_secs: ValueSource::Default,
            agent_deadline_secs: ValueSource::Default,
            sessions: ValueSource::Default,
            seed: ValueSource::Default,
            agents: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: SimConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

pub fn load() -> Result<SimConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the file named by `POKERBENCH_CONFIG`, then `POKERBENCH_*`
/// variables. Empty variables are ignored.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = SimConfig::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        f.apply(&mut cfg, &mut sources);
    }

    env_override(
        "POKERBENCH_STARTING_CHIPS",
        &mut cfg.starting_chips,
        &mut sources.starting_chips,
    )?;
    env_override(
        "POKERBENCH_SMALL_BLIND",
        &mut cfg.small_blind,
        &mut sources.small_blind,
    )?;
    env_override(
        "POKERBENCH_BIG_BLIND",
        &mut cfg.big_blind,
        &mut sources.big_blind,
    )?;
    env_override(
        "POKERBENCH_MAX_HANDS",
        &mut cfg.max_hands,
        &mut sources.max_hands,
    )?;
    env_override(
        "POKERBENCH_SESSION_BUDGET_SECS",
        &mut cfg.session_budget_secs,
        &mut sources.session_budget_secs,
    )?;
    env_override(
        "POKERBENCH_AGENT_DEADLINE_SECS",
        &mut cfg.agent_deadline_secs,
        &mut sources.agent_deadline_secs,
    )?;
    env_override(
        "POKERBENCH_SESSIONS",
        &mut cfg.sessions,
        &mut sources.sessions,
    )?;
    if let Ok(seed) = std::env::var("POKERBENCH_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid POKERBENCH_SEED {seed:?}")))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(agents) = std::env::var("POKERBENCH_AGENTS")
        && !agents.is_empty()
    {
        cfg.agents = agents
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect();
        sources.agents = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_override<T: FromStr>(
    key: &str,
    slot: &mut T,
    source: &mut ValueSource,
) -> Result<(), ConfigError> {
    if let Ok(raw) = std::env::var(key)
        && !raw.is_empty()
    {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {key} {raw:?}")))?;
        *source = ValueSource::Env;
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    starting_chips: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    max_hands: Option<u32>,
    #[serde(default)]
    session_budget_secs: Option<u64>,
    #[serde(default)]
    agent_deadline_secs: Option<u64>,
    #[serde(default)]
    sessions: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    agents: Option<Vec<String>>,
}

impl FileConfig {
    fn apply(self, cfg: &mut SimConfig, sources: &mut ConfigSources) {
        fn take<T>(value: Option<T>, slot: &mut T, source: &mut ValueSource) {
            if let Some(v) = value {
                *slot = v;
                *source = ValueSource::File;
            }
        }
        take(self.starting_chips, &mut cfg.starting_chips, &mut sources.starting_chips);
        take(self.small_blind, &mut cfg.small_blind, &mut sources.small_blind);
        take(self.big_blind, &mut cfg.big_blind, &mut sources.big_blind);
        take(self.max_hands, &mut cfg.max_hands, &mut sources.max_hands);
        take(
            self.session_budget_secs,
            &mut cfg.session_budget_secs,
            &mut sources.session_budget_secs,
        );
        take(
            self.agent_deadline_secs,
            &mut cfg.agent_deadline_secs,
            &mut sources.agent_deadline_secs,
        );
        take(self.sessions, &mut cfg.sessions, &mut sources.sessions);
        take(self.agents, &mut cfg.agents, &mut sources.agents);
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
            sources.seed = ValueSource::File;
        }
    }
}
