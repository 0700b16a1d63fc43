use std::str::FromStr;

use serde::Deserialize;
use tracing::metadata::Level;

#[derive(Deserialize)]
pub struct LoggerConfig {
    #[serde(default = "default_level", deserialize_with = "deserialize_level")]
    pub level: Level,
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;

    Level::from_str(&s).map_err(serde::de::Error::custom)
}

fn default_level() -> Level {
    Level::INFO
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        logger: LoggerConfig,
    }

    #[test]
    fn test_level_is_case_insensitive() {
        let wrapper: Wrapper = config::Config::builder()
            .add_source(config::File::from_str(
                "[logger]\nlevel = \"warn\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(wrapper.logger.level, Level::WARN);
    }
}
