use std::fs::File;
use std::path::Path;
use ron::de::{from_reader, from_str};
use ron::ser::{to_string_pretty, PrettyConfig};
use crate::core::haunt_config::HauntConfig;
use crate::core::haunt_error::HauntError;

pub fn load_config(path: impl AsRef<Path>) -> Result<HauntConfig, HauntError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| HauntError::ImportFailed(format!("cannot open {}: {}", path.display(), e)))?;
    let config: HauntConfig = from_reader(file)
        .map_err(|e| HauntError::ImportFailed(format!("cannot parse {}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<HauntConfig, HauntError> {
    let config: HauntConfig = from_str(text).map_err(|e| HauntError::ImportFailed(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

pub fn config_to_ron(config: &HauntConfig) -> Result<String, HauntError> {
    to_string_pretty(config, PrettyConfig::default()).map_err(|e| HauntError::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seeded_or_not::SeededOrNot;
    use crate::core::spawn_point::SpawnPointId;

    #[test]
    fn partial_file_fills_in_defaults() {
        let text = r#"(
            seed: Seeded(7),
            cadence: (min_wait: 1.0, max_wait: 2.0),
            spawn_points: [
                (id: Door, pose: Some((translation: (0.0, 0.0, -4.0), rotation: (0.0, 0.0, 0.0, 1.0)))),
                (id: UnderBed, enabled: false, pose: Some((translation: (0.0, 0.0, 1.0), rotation: (0.0, 0.0, 0.0, 1.0)))),
            ],
        )"#;

        let config = parse_config(text).unwrap();
        assert_eq!(config.seed, SeededOrNot::Seeded(7));
        assert_eq!(config.cadence.max_wait, 2.0);
        assert_eq!(config.cadence.fade_duration, 2.0);
        assert_eq!(config.agent.pursuit_speed, 3.0);
        assert_eq!(config.spawn_points.len(), 2);
        assert_eq!(config.spawn_points[0].id, SpawnPointId::Door);
        assert!(config.spawn_points[0].enabled);
        assert!(!config.spawn_points[1].enabled);
        assert_eq!(config.spawn_points[1].pose.map(|pose| pose.translation.z), Some(1.0));
    }

    #[test]
    fn invalid_tuning_is_rejected_after_parsing() {
        let text = "(cadence: (min_wait: 9.0, max_wait: 3.0))";
        assert!(matches!(parse_config(text), Err(HauntError::InvalidConfig(_))));
    }

    #[test]
    fn infinite_wait_is_rejected_before_any_draw() {
        let result = parse_config("(cadence: (min_wait: 5.0, max_wait: inf))");
        assert!(matches!(result, Err(HauntError::InvalidConfig(_))));
        assert!(matches!(parse_config("(cadence: (min_wait: NaN))"), Err(HauntError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_text_is_an_import_failure() {
        assert!(matches!(parse_config("(cadence: [)"), Err(HauntError::ImportFailed(_))));
    }

    #[test]
    fn defaults_survive_a_ron_round_trip() {
        let config = HauntConfig::default();
        let text = config_to_ron(&config).unwrap();
        assert_eq!(parse_config(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_is_reported() {
        let result = load_config("assets/definitely_not_here.ron");
        assert!(matches!(result, Err(HauntError::ImportFailed(_))));
    }
}
