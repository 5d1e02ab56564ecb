//! Tests for projecting step models into visual graphs.
mod common;
use common::*;
use webpipe_flow::graph::{BRANCH_HANDLE_PREFIX, INPUT_HANDLE, OUTPUT_HANDLE};
use webpipe_flow::prelude::*;

#[cfg(test)]
mod projector_tests {
    use super::*;

    fn edge_ids(graph: &FlowGraph) -> Vec<&str> {
        graph.edges.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_linear_pipeline_under_route_header() {
        let pipeline = Pipeline::route("GET", "/users", create_linear_steps());
        let graph = Projector::default().project_pipeline(&pipeline);

        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(edge_ids(&graph), vec!["route-node-s1", "s1-s2", "s2-s3"]);

        let context = graph.node("route-node").expect("context node missing");
        assert_eq!(context.kind, NodeKind::Context);
        assert_eq!(context.position, Position::new(0.0, 0.0));
        assert_eq!(context.size, Size::new(350.0, 60.0));

        // context 60 + gap 50, then each 150px step + gap 50
        assert_eq!(graph.node("s1").unwrap().position, Position::new(0.0, 110.0));
        assert_eq!(graph.node("s2").unwrap().position, Position::new(0.0, 310.0));
        assert_eq!(graph.node("s3").unwrap().position, Position::new(0.0, 510.0));
        assert!(graph.edges.iter().all(|e| e.source_handle.is_none()));
    }

    #[test]
    fn test_named_pipeline_uses_pipeline_context_node() {
        let pipeline = Pipeline::named("loadUser", create_linear_steps());
        let graph = Projector::default().project_pipeline(&pipeline);
        assert!(graph.node("pipeline-node").is_some());
        assert!(graph.node("route-node").is_none());
        assert_eq!(graph.edges[0].id, "pipeline-node-s1");
    }

    #[test]
    fn test_no_header_starts_at_first_step() {
        let graph = Projector::default().project(&create_linear_steps(), None);
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(edge_ids(&graph), vec!["s1-s2", "s2-s3"]);
        assert_eq!(graph.node("s1").unwrap().position.y, 0.0);
        assert!(graph.nodes.iter().all(|n| n.kind == NodeKind::RegularStep));
    }

    #[test]
    fn test_empty_pipeline_keeps_context_node() {
        let graph = Projector::default().project_pipeline(&Pipeline::route("POST", "/empty", vec![]));
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert_eq!(graph.nodes[0].id, "route-node");
    }

    #[test]
    fn test_result_block_fans_out_branches() {
        let graph = Projector::default().project(&create_result_steps(), None);

        assert_eq!(graph.nodes.len(), 6);
        assert_eq!(
            edge_ids(&graph),
            vec!["s1-r", "r-branch-0-a1", "a1-a2", "r-branch-1-e1", "e1-e2"]
        );

        let result = graph.node("r").unwrap();
        assert_eq!(result.kind, NodeKind::ResultStep);
        assert_eq!(result.position, Position::new(0.0, 200.0));
        assert_eq!(result.size.height, 164.0);

        // Branch rows sit right of the result, one 150px band plus 100px gap apart.
        assert_eq!(graph.node("a1").unwrap().position, Position::new(500.0, 250.0));
        assert_eq!(graph.node("a2").unwrap().position, Position::new(900.0, 250.0));
        assert_eq!(graph.node("e1").unwrap().position, Position::new(500.0, 500.0));
        assert_eq!(graph.node("e2").unwrap().position, Position::new(900.0, 500.0));

        let first = graph.edge("r-branch-0-a1").unwrap();
        assert_eq!(first.source_handle.as_deref(), Some("branch-0"));
        assert_eq!(first.target_handle.as_deref(), Some(INPUT_HANDLE));
        assert!(first.source_handle.as_deref().unwrap().starts_with(BRANCH_HANDLE_PREFIX));

        let chained = graph.edge("a1-a2").unwrap();
        assert_eq!(chained.source_handle.as_deref(), Some(OUTPUT_HANDLE));
        assert!(!chained.is_branch_edge());
    }

    #[test]
    fn test_branch_members_carry_branch_tags() {
        let graph = Projector::default().project(&create_result_steps(), None);

        let a2 = graph.node("a2").unwrap();
        assert_eq!(a2.kind, NodeKind::BranchStep);
        match &a2.data {
            NodePayload::BranchMember {
                step,
                branch_id,
                branch_type,
            } => {
                assert_eq!(step.id, "a2");
                assert_eq!(branch_id, "r-branch-0");
                assert_eq!(branch_type, "ok(200)");
            }
            other => panic!("Expected branch member payload, got {:?}", other),
        }
        assert_eq!(graph.node("e1").unwrap().branch_id(), Some("r-branch-1"));
    }

    #[test]
    fn test_step_after_result_clears_the_branch_fan_out() {
        let mut steps = create_result_steps();
        steps.push(Step::regular("s3", "log", "yaml", "level: info"));
        let graph = Projector::default().project(&steps, None);

        // 200 + result 164 + 2 * (150 + 100) + trailing 100
        assert_eq!(graph.node("s3").unwrap().position, Position::new(0.0, 964.0));
        let tail = graph.edge("r-s3").expect("result should connect to the next step");
        assert!(!tail.is_branch_edge());
    }

    #[test]
    fn test_empty_branch_still_reserves_its_row() {
        let graph = Projector::default().project(&create_empty_branch_steps(), None);

        assert_eq!(graph.nodes.len(), 3);
        assert!(graph.edges.iter().all(|e| e.branch_index() != Some(0)));
        // Row 0 is empty, the member of row 1 sits one band lower.
        assert_eq!(graph.node("n1").unwrap().position.y, 200.0 + 50.0 + 250.0);
        assert_eq!(graph.edge("r-branch-1-n1").unwrap().branch_index(), Some(1));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let projector = Projector::default();
        let pipeline = Pipeline::route("GET", "/users", create_result_steps());
        assert_eq!(projector.project_pipeline(&pipeline), projector.project_pipeline(&pipeline));
        assert_eq!(projector.project_laid_out(&pipeline), projector.project_laid_out(&pipeline));
    }

    #[test]
    fn test_node_sizes_follow_content() {
        let steps = vec![
            Step::regular("small", "jq", "text", "."),
            Step::regular("big", "lua", "lua", vec!["x"; 30].join("\n")).with_output("a\nb"),
        ];
        let graph = Projector::default().project(&steps, None);
        assert_eq!(graph.node("small").unwrap().size.height, 150.0);
        // code clamps at 300, output 2 lines is 56
        assert_eq!(graph.node("big").unwrap().size.height, 40.0 + 300.0 + 56.0 + 10.0);
    }

    #[test]
    fn test_custom_layout_config() {
        let config = LayoutConfig {
            node_width: 200.0,
            step_gap: 20.0,
            ..LayoutConfig::default()
        };
        let projector = Projector::builder().with_config(config).build();
        let graph = projector.project(&create_linear_steps(), None);
        assert_eq!(graph.node("s2").unwrap().position.y, 170.0);
        assert!(graph.nodes.iter().all(|n| n.size.width == 200.0));
    }

    struct StackedLayout;

    impl HierarchicalLayout for StackedLayout {
        fn layout(
            &self,
            nodes: &[webpipe_flow::layout::LayoutNode<'_>],
            _edges: &[(&str, &str)],
        ) -> ahash::AHashMap<String, Position> {
            nodes
                .iter()
                .enumerate()
                .map(|(i, n)| (n.id.to_string(), Position::new(1000.0, i as f64 * 1000.0)))
                .collect()
        }
    }

    #[test]
    fn test_pluggable_layout_engine() {
        let projector = Projector::builder()
            .with_layout_engine(Box::new(StackedLayout))
            .build();
        let graph = projector.project_laid_out(&Pipeline::new(create_linear_steps()));
        // Centres become top-left corners offset by half the node size.
        assert_eq!(graph.node("s1").unwrap().position, Position::new(825.0, -75.0));
        assert_eq!(graph.node("s2").unwrap().position, Position::new(825.0, 925.0));
    }
}
