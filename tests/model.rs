//! Tests for the step model: labels, registry, edits and parser-document conversion.
mod common;
use common::*;
use webpipe_flow::model::edit::{
    collect_ids, delete_step, find_step, insert_into_branch, insert_step, update_code,
};
use webpipe_flow::model::{
    ConfigType, DocumentStep, default_code_for_type, format_branch_label, language_for_type,
    parse_branch_label, steps_to_document,
};
use webpipe_flow::prelude::*;

#[cfg(test)]
mod model_tests {
    use super::*;

    #[test]
    fn test_branch_label_parsing() {
        assert_eq!(parse_branch_label("ok(200)"), Ok((BranchCategory::Ok, 200)));
        assert_eq!(parse_branch_label("error(500)"), Ok((BranchCategory::Error, 500)));
        assert_eq!(
            parse_branch_label("notFound(404)"),
            Ok((BranchCategory::Custom("notFound".to_string()), 404))
        );

        for invalid in ["ok", "ok()", "(200)", "ok(2x0)", "ok(200", "ok(99999)", "ok(-1)"] {
            assert_eq!(
                parse_branch_label(invalid),
                Err(ModelError::InvalidBranchLabel(invalid.to_string())),
                "label {:?}",
                invalid
            );
        }
    }

    #[test]
    fn test_branch_label_formatting() {
        assert_eq!(format_branch_label(&BranchCategory::Ok, 200), "ok(200)");
        assert_eq!(
            format_branch_label(&BranchCategory::Custom("teapot".to_string()), 418),
            "teapot(418)"
        );

        let branch = Branch::new("b", BranchCategory::Custom("gone".to_string()), 410);
        assert_eq!(branch.branch_label, "gone(410)");
        assert_eq!(branch.category(), Ok(BranchCategory::Custom("gone".to_string())));
    }

    #[test]
    fn test_language_table() {
        assert_eq!(language_for_type("curl"), "shell");
        assert_eq!(language_for_type("jq"), "text");
        assert_eq!(language_for_type("pg"), "sql");
        assert_eq!(language_for_type("validate"), "json");
        assert_eq!(language_for_type("cache"), "yaml");
        assert_eq!(language_for_type("somethingElse"), "text");
        assert_eq!(default_code_for_type("somethingElse"), "");
    }

    #[test]
    fn test_registry_lookup_and_override() {
        let registry = OperationRegistry::new();
        assert_eq!(registry.operations().len(), 9);
        assert_eq!(registry.get("lua").unwrap().language, "lua");
        assert!(registry.get("result").is_none());
        assert_eq!(registry.language_of("unknown"), "text");

        let registry = registry
            .with_operation(Operation::new("jq", "jq", "."))
            .with_operation(Operation::new("graphql", "graphql", "query { ok }"));
        assert_eq!(registry.operations().len(), 10);
        assert_eq!(registry.language_of("jq"), "jq");

        let step = registry.create_step("graphql", "g1").unwrap();
        assert_eq!(step.source_code(), Some("query { ok }"));
    }

    #[test]
    fn test_edits_reach_nested_steps() {
        let mut steps = create_result_steps();

        assert_eq!(find_step(&steps, "e2").unwrap().operation_type(), "jq");
        assert!(find_step(&steps, "zzz").is_none());

        update_code(&mut steps, "a1", "{ changed: 1 }").unwrap();
        assert_eq!(find_step(&steps, "a1").unwrap().source_code(), Some("{ changed: 1 }"));
        assert_eq!(
            update_code(&mut steps, "zzz", "x"),
            Err(ModelError::StepNotFound("zzz".to_string()))
        );

        let removed = delete_step(&mut steps, "e1").unwrap();
        assert_eq!(removed.id, "e1");
        assert_eq!(ids(&steps[1].branches()[1].steps), vec!["e2"]);

        insert_step(&mut steps, Step::regular("tail", "log", "yaml", ""));
        let mut all = Vec::new();
        collect_ids(&steps, &mut all);
        assert_eq!(all, vec!["s1", "r", "a1", "a2", "e2", "tail"]);
    }

    #[test]
    fn test_insert_into_branch() {
        let mut steps = create_empty_branch_steps();

        insert_into_branch(&mut steps, "r", 0, Step::regular("o1", "jq", "text", ".")).unwrap();
        assert_eq!(ids(&steps[1].branches()[0].steps), vec!["o1"]);

        assert_eq!(
            insert_into_branch(&mut steps, "r", 2, Step::regular("x", "jq", "text", ".")),
            Err(ModelError::BranchIndexOutOfRange {
                step_id: "r".to_string(),
                index: 2
            })
        );
        // A regular step has no branches at all.
        assert!(matches!(
            insert_into_branch(&mut steps, "s1", 0, Step::regular("x", "jq", "text", ".")),
            Err(ModelError::BranchIndexOutOfRange { .. })
        ));
        assert_eq!(
            insert_into_branch(&mut steps, "nope", 0, Step::regular("x", "jq", "text", ".")),
            Err(ModelError::StepNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_step_json_shape() {
        let step = Step::regular("s1", "pg", "sql", "SELECT 1").with_output("[]");
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "s1",
                "kind": "Regular",
                "operationType": "pg",
                "language": "sql",
                "sourceCode": "SELECT 1",
                "lastOutput": "[]"
            })
        );

        let parsed: Step = serde_json::from_str(
            r#"{ "id": "r", "kind": "Result", "branches": [
                { "id": "r-branch-0", "branchLabel": "ok(200)", "statusCode": 200, "steps": [] }
            ] }"#,
        )
        .expect("Failed to parse result step");
        assert!(parsed.is_result());
        assert_eq!(parsed.branches()[0].status_code, 200);
    }

    const ROUTE_JSON: &str = r#"{
        "method": "GET",
        "path": "/users/:id",
        "pipeline": {
            "steps": [
                { "kind": "Regular", "name": "pg", "config": "SELECT * FROM users WHERE id = $1", "configType": "backtick" },
                { "kind": "Regular", "name": "pipeline", "config": "loadProfile", "configType": "identifier" },
                { "kind": "Result", "branches": [
                    { "branchType": { "kind": "Ok" }, "statusCode": 200, "pipeline": { "steps": [
                        { "kind": "Regular", "name": "handlebars", "config": "<p>{{name}}</p>" }
                    ] } },
                    { "branchType": { "kind": "Custom", "name": "notFound" }, "statusCode": 404, "pipeline": { "steps": [] } }
                ] }
            ]
        }
    }"#;

    #[test]
    fn test_route_document_conversion() {
        let pipeline = DocumentRoute::from_json(ROUTE_JSON)
            .and_then(IntoPipeline::into_pipeline)
            .expect("Failed to convert route");

        assert_eq!(pipeline.header, Some(ContextHeader::route("GET", "/users/:id")));
        assert_eq!(
            ids(&pipeline.steps),
            vec!["GET-/users/:id-0", "GET-/users/:id-1", "GET-/users/:id-2"]
        );
        assert_eq!(pipeline.steps[0].operation_type(), "pg");

        let branches = pipeline.steps[2].branches();
        assert_eq!(branches[0].id, "GET-/users/:id-2-branch-0");
        assert_eq!(branches[0].branch_label, "ok(200)");
        assert_eq!(ids(&branches[0].steps), vec!["GET-/users/:id-2-branch-0-0"]);
        assert_eq!(branches[1].branch_label, "notFound(404)");
        assert!(branches[1].steps.is_empty());

        // Converting twice yields the same ids, so reparses keep node identity.
        let again = DocumentRoute::from_json(ROUTE_JSON)
            .and_then(IntoPipeline::into_pipeline)
            .unwrap();
        assert_eq!(again, pipeline);
    }

    #[test]
    fn test_document_languages_follow_registry() {
        let registry = OperationRegistry::new().with_operation(Operation::new("handlebars", "html", ""));
        let pipeline = DocumentRoute::from_json(ROUTE_JSON)
            .and_then(|route| route.into_pipeline_with(&registry))
            .expect("Failed to convert route");

        let language = |step: &Step| match &step.kind {
            StepKind::Regular(regular) => regular.language.clone(),
            StepKind::Result(_) => panic!("Expected a regular step"),
        };
        assert_eq!(language(&pipeline.steps[0]), "sql");
        assert_eq!(language(&pipeline.steps[2].branches()[0].steps[0]), "html");
    }

    #[test]
    fn test_document_conversion_validates() {
        let missing_method = r#"{ "method": " ", "path": "/x", "pipeline": { "steps": [] } }"#;
        let err = DocumentRoute::from_json(missing_method)
            .and_then(IntoPipeline::into_pipeline)
            .unwrap_err();
        assert!(matches!(err, ConversionError::ValidationError(_)));

        let unnamed = r#"{ "name": "", "pipeline": { "steps": [] } }"#;
        assert!(DocumentPipeline::from_json(unnamed)
            .and_then(IntoPipeline::into_pipeline)
            .is_err());

        assert!(matches!(DocumentRoute::from_json("{"), Err(ConversionError::Json(_))));
    }

    #[test]
    fn test_named_pipeline_document_prefix() {
        let json = r#"{ "name": "loadProfile", "pipeline": { "steps": [
            { "kind": "Regular", "name": "cache", "config": "ttl: 60" }
        ] } }"#;
        let pipeline = DocumentPipeline::from_json(json)
            .and_then(IntoPipeline::into_pipeline)
            .unwrap();
        assert_eq!(pipeline.steps[0].id, "pipeline-loadProfile-0");
        match &pipeline.steps[0].kind {
            StepKind::Regular(regular) => assert_eq!(regular.language, "yaml"),
            StepKind::Result(_) => panic!("Expected a regular step"),
        }
    }

    #[test]
    fn test_steps_back_to_document() {
        let pipeline = DocumentRoute::from_json(ROUTE_JSON)
            .and_then(IntoPipeline::into_pipeline)
            .unwrap();
        let document = steps_to_document(&pipeline.steps);

        let config_types: Vec<ConfigType> = document
            .iter()
            .filter_map(|s| match s {
                DocumentStep::Regular { config_type, .. } => Some(*config_type),
                DocumentStep::Result { .. } => None,
            })
            .collect();
        assert_eq!(config_types, vec![ConfigType::Backtick, ConfigType::Identifier]);

        match &document[2] {
            DocumentStep::Result { branches } => {
                assert_eq!(branches[1].branch_type, BranchCategory::Custom("notFound".to_string()));
                assert_eq!(branches[1].status_code, 404);
                assert_eq!(branches[0].pipeline.steps.len(), 1);
            }
            other => panic!("Expected a result step, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_config_type_rule() {
        let steps = vec![
            Step::regular("a", "auth", "yaml", "  login  "),
            Step::regular("b", "auth", "yaml", "login user"),
            Step::regular("c", "jq", "text", "_private9"),
            Step::regular("d", "jq", "text", "9lives"),
        ];
        let types: Vec<ConfigType> = steps_to_document(&steps)
            .into_iter()
            .filter_map(|s| match s {
                DocumentStep::Regular { config_type, .. } => Some(config_type),
                DocumentStep::Result { .. } => None,
            })
            .collect();
        assert_eq!(
            types,
            vec![
                ConfigType::Identifier,
                ConfigType::Backtick,
                ConfigType::Identifier,
                ConfigType::Backtick
            ]
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ModelError::StepNotFound("s9".to_string()).to_string(),
            "Step 's9' was not found in the pipeline"
        );
        assert_eq!(
            ModelError::BranchIndexOutOfRange {
                step_id: "r".to_string(),
                index: 3
            }
            .to_string(),
            "Result step 'r' has no branch at index 3"
        );
        let err = LayoutConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
