#[cfg(test)]
mod tests {
    use crate::config::{ClassConfig, EvaluationConfig, MaterialConfig, MatchValue, OptionsConfig, TestIgnoreMode};
    use crate::error::GeometricsError;

    #[test]
    fn test_mismatched_match_sets_error() {
        let config = EvaluationConfig::new().with_classes(
            ClassConfig::new()
                .with_reference(vec![MatchValue::Single(6), MatchValue::Single(17)])
                .with_test(vec![MatchValue::Single(6)]),
        );

        match config.validate() {
            Err(GeometricsError::MismatchedMatchSets { reference, test }) => {
                assert_eq!(reference, 2);
                assert_eq!(test, 1);
            }
            _ => panic!("Expected MismatchedMatchSets error"),
        }
    }

    #[test]
    fn test_empty_reference_match_value() {
        let config = EvaluationConfig::new().with_classes(
            ClassConfig::new()
                .with_reference(vec![MatchValue::Group(vec![])])
                .with_test(vec![MatchValue::Single(6)]),
        );

        match config.validate() {
            Err(GeometricsError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("is empty"));
            }
            _ => panic!("Expected InvalidConfiguration error"),
        }
    }

    #[test]
    fn test_empty_test_match_value_is_allowed() {
        let config = EvaluationConfig::new().with_classes(
            ClassConfig::new()
                .with_reference(vec![MatchValue::Single(6)])
                .with_test(vec![MatchValue::Group(vec![])]),
        );

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ignored_material_out_of_range() {
        let config =
            EvaluationConfig::new().with_materials(MaterialConfig::new().with_ignore(vec![0, 14]));

        match config.validate() {
            Err(GeometricsError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("14"));
            }
            _ => panic!("Expected InvalidConfiguration error"),
        }
    }

    #[test]
    fn test_empty_material_names() {
        let config = EvaluationConfig::new()
            .with_materials(MaterialConfig::new().with_names(vec![]).with_ignore(vec![]));

        assert!(matches!(
            config.validate(),
            Err(GeometricsError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_invalid_terrain_threshold() {
        let config = EvaluationConfig::new()
            .with_options(OptionsConfig::new().with_terrain_z_error_threshold(0.0));

        match config.validate() {
            Err(GeometricsError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("threshold"));
            }
            _ => panic!("Expected InvalidConfiguration error"),
        }
    }

    #[test]
    fn test_valid_configuration() {
        let config = EvaluationConfig::new();

        assert!(config.validate().is_ok());
        assert_eq!(config.materials.ignored_names(), vec!["Unclassified", "Unscored", "Indeterminate"]);
        assert_eq!(config.options.test_ignore, TestIgnoreMode::Off);
    }

    #[test]
    fn test_configuration_from_json() {
        let json = r#"{
            "classes": {"reference": [6, [2, 17]], "test": [6, []]},
            "options": {"quantize_height": true}
        }"#;

        let config = EvaluationConfig::from_json(json).unwrap();

        assert_eq!(config.classes.reference[1], MatchValue::Group(vec![2, 17]));
        assert!(config.classes.test[1].is_empty());
        assert!(config.options.quantize_height);
        assert!((config.options.terrain_z_error_threshold - 1.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config =
            EvaluationConfig::from_json(r#"{"classes": {"reference": [6], "test": [6]}}"#).unwrap();

        assert_eq!(config.materials.ignore, vec![0, 12, 13]);
        assert_eq!(config.materials.names.len(), 14);
        assert!(!config.options.quantize_height);
        assert_eq!(
            config.options.terrain_cls_ignore_values,
            vec![MatchValue::Single(6), MatchValue::Single(17)]
        );

        let config = EvaluationConfig::from_json("{}").unwrap();
        assert_eq!(config.classes.reference, vec![MatchValue::Single(6)]);
    }

    #[test]
    fn test_malformed_configuration_json() {
        let result = EvaluationConfig::from_json(r#"{"options": {"quantize_height": "yes"}}"#);

        match result {
            Err(GeometricsError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("Malformed configuration"));
            }
            _ => panic!("Expected InvalidConfiguration error"),
        }
    }
}
