use scopa_ai::AI_NAMES;
use scopa_engine::deck::NAPOLITANE;
use scopa_engine::game::RoundConfig;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub deck: String,
    pub ai: String,
    /// Match ends once a seat reaches this many points with a strict lead
    pub target_score: u32,
    pub hand_size: usize,
    pub initial_table_size: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub deck: ValueSource,
    pub ai: ValueSource,
    pub target_score: ValueSource,
    pub hand_size: ValueSource,
    pub initial_table_size: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            deck: ValueSource::Default,
            ai: ValueSource::Default,
            target_score: ValueSource::Default,
            hand_size: ValueSource::Default,
            initial_table_size: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        let round = RoundConfig::default();
        Self {
            seed: None,
            deck: NAPOLITANE.into(),
            ai: "greedy".into(),
            target_score: 11,
            hand_size: round.hand_size,
            initial_table_size: round.initial_table_size,
        }
    }
}

impl Config {
    /// Round settings derived from this configuration.
    pub fn round_config(&self) -> RoundConfig {
        RoundConfig {
            hand_size: self.hand_size,
            initial_table_size: self.initial_table_size,
            ..RoundConfig::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("SCOPA_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.deck {
            cfg.deck = v;
            sources.deck = ValueSource::File;
        }
        if let Some(v) = f.ai {
            cfg.ai = v;
            sources.ai = ValueSource::File;
        }
        if let Some(v) = f.target_score {
            cfg.target_score = v;
            sources.target_score = ValueSource::File;
        }
        if let Some(v) = f.hand_size {
            cfg.hand_size = v;
            sources.hand_size = ValueSource::File;
        }
        if let Some(v) = f.initial_table_size {
            cfg.initial_table_size = v;
            sources.initial_table_size = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("SCOPA_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {}", seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(deck) = std::env::var("SCOPA_DECK")
        && !deck.is_empty()
    {
        cfg.deck = deck;
        sources.deck = ValueSource::Env;
    }
    if let Ok(ai) = std::env::var("SCOPA_AI")
        && !ai.is_empty()
    {
        cfg.ai = ai;
        sources.ai = ValueSource::Env;
    }
    if let Ok(target) = std::env::var("SCOPA_TARGET")
        && !target.is_empty()
    {
        cfg.target_score = target
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid target score: {}", target)))?;
        sources.target_score = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    deck: Option<String>,
    #[serde(default)]
    ai: Option<String>,
    #[serde(default)]
    target_score: Option<u32>,
    #[serde(default)]
    hand_size: Option<usize>,
    #[serde(default)]
    initial_table_size: Option<usize>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.target_score == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: target_score must be >0".into(),
        ));
    }
    if !AI_NAMES.contains(&cfg.ai.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: unknown ai '{}' (expected one of: {})",
            cfg.ai,
            AI_NAMES.join(", ")
        )));
    }
    cfg.round_config()
        .validate()
        .map_err(|v| ConfigError::Invalid(format!("Invalid configuration: {}", v)))
}
