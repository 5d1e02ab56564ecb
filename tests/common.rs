//! Common test utilities for building step models and graphs.
use webpipe_flow::prelude::*;

/// A plain three-step pipeline: `s1 -> s2 -> s3`.
#[allow(dead_code)]
pub fn create_linear_steps() -> Vec<Step> {
    vec![
        Step::regular("s1", "pg", "sql", "SELECT * FROM users"),
        Step::regular("s2", "jq", "text", "{ users: .data.rows }"),
        Step::regular("s3", "handlebars", "handlebars", "<ul>{{#each users}}<li>{{name}}</li>{{/each}}</ul>"),
    ]
}

/// `s1` followed by a result block with two branches of two steps each.
#[allow(dead_code)]
pub fn create_result_steps() -> Vec<Step> {
    vec![
        Step::regular("s1", "auth", "yaml", "login"),
        Step::result(
            "r",
            vec![
                Branch::new("r-branch-0", BranchCategory::Ok, 200).with_steps(vec![
                    Step::regular("a1", "jq", "text", "{ ok: true }"),
                    Step::regular("a2", "handlebars", "handlebars", "<p>{{ok}}</p>"),
                ]),
                Branch::new("r-branch-1", BranchCategory::Error, 500).with_steps(vec![
                    Step::regular("e1", "log", "yaml", "level: error"),
                    Step::regular("e2", "jq", "text", "{ error: .message }"),
                ]),
            ],
        ),
    ]
}

/// A result block whose first branch has no steps.
#[allow(dead_code)]
pub fn create_empty_branch_steps() -> Vec<Step> {
    vec![
        Step::regular("s1", "validate", "json", "{ \"name\": \"string\" }"),
        Step::result(
            "r",
            vec![
                Branch::new("r-branch-0", BranchCategory::Ok, 200),
                Branch::new("r-branch-1", BranchCategory::Custom("notFound".to_string()), 404)
                    .with_steps(vec![Step::regular("n1", "jq", "text", "{ missing: true }")]),
            ],
        ),
    ]
}

/// A pipeline ending in a result block with two empty branches, followed by a
/// plain step `p` that can be wired into a branch.
#[allow(dead_code)]
pub fn create_retag_steps() -> Vec<Step> {
    vec![
        Step::regular("s1", "pg", "sql", "SELECT 1"),
        Step::result(
            "r",
            vec![
                Branch::new("r-branch-0", BranchCategory::Ok, 200),
                Branch::new("r-branch-1", BranchCategory::Error, 500),
            ],
        ),
        Step::regular("p", "jq", "text", "{ moved: true }"),
    ]
}

/// A bare main-line node at the given position.
#[allow(dead_code)]
pub fn regular_node(id: &str, x: f64, y: f64) -> VisualNode {
    VisualNode::main_line(
        Step::regular(id, "jq", "text", "."),
        Position::new(x, y),
        Size::new(350.0, 150.0),
    )
}

/// Ids of a step list, in order.
#[allow(dead_code)]
pub fn ids(steps: &[Step]) -> Vec<&str> {
    steps.iter().map(|s| s.id.as_str()).collect()
}
