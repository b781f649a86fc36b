// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use js_adapters::RepoHostCall;
use js_core::{Event, JobId, JobOutput, JobRequest, JobStatus, Workspace};
use serde_json::json;

use crate::test_helpers::TestApp;

const REPO: &str = "https://github.com/opensafely/study";

const PROJECT: &str = r#"
version: "3.0"
actions:
  generate_cohort:
    run: cohortextractor:latest generate_cohort
  run_model:
    run: stata-mp:latest analysis/model.do
    needs: [generate_cohort]
"#;

fn setup() -> (TestApp, Workspace) {
    let app = TestApp::new();
    let alice = app.add_user("alice", false);
    app.add_user("admin", true);
    app.membership.add_member("alice");
    app.repo_host.add_repo("study", REPO, &["main", "develop"]);
    app.repo_host.set_pipeline(REPO, PROJECT);
    app.repo_host.set_sha(REPO, "main", "f00dcafe");
    let workspace = app.add_workspace("study", alice.id);
    (app, workspace)
}

fn set_outputs(app: &TestApp, job: JobId, names: &[&str]) {
    let outputs = names
        .iter()
        .map(|name| JobOutput {
            name: name.to_string(),
            location: format!("output/{name}"),
            privacy_level: "moderately_sensitive".to_string(),
        })
        .collect();
    app.emit(vec![Event::JobOutputsSet { id: job, outputs }]);
}

fn requests(app: &TestApp) -> Vec<JobRequest> {
    app.state.store.read(|s| s.job_requests.values().cloned().collect())
}

// ── Creation ──

#[tokio::test]
async fn creation_form_needs_run_permission() {
    let (app, _) = setup();

    let anonymous = app.get("/workspaces/", None).await;
    let member = app.get("/workspaces/", Some("alice")).await;

    assert_eq!(anonymous.status, StatusCode::FOUND);
    assert_eq!(anonymous.location(), Some("/login/?next=/workspaces/"));
    assert_eq!(member.status, StatusCode::OK);
    assert_eq!(member.body["repos_with_branches"][0]["url"], REPO);
    assert_eq!(member.body["repos_with_branches"][0]["branches"], json!(["main", "develop"]));
}

#[tokio::test]
async fn create_selects_the_new_workspace() {
    let (app, _) = setup();
    let form = json!({ "name": "Second", "repo": REPO, "branch": "DEVELOP", "db": "full" });

    let res = app.post("/workspaces/", Some("alice"), form).await;

    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), Some("/workspaces/second/"));
    let (workspace, alice) = app.state.store.read(|s| {
        (s.workspace_by_name("second").cloned().unwrap(), s.user_by_username("alice").cloned().unwrap())
    });
    assert_eq!(workspace.branch, "develop");
    assert_eq!(alice.selected_workspace, Some(workspace.id));
}

#[tokio::test]
async fn create_checks_repo_and_branch() {
    let (app, _) = setup();

    let bad_repo = json!({ "name": "x", "repo": "https://github.com/other/x", "branch": "main", "db": "full" });
    let bad_branch = json!({ "name": "x", "repo": REPO, "branch": "nope", "db": "full" });
    let repo = app.post("/workspaces/", Some("alice"), bad_repo).await;
    let branch = app.post("/workspaces/", Some("alice"), bad_branch).await;

    assert_eq!(repo.status, StatusCode::BAD_REQUEST);
    assert_eq!(repo.body["errors"]["repo"][0], "Unknown repo, please reload the page and try again");
    assert_eq!(branch.body["errors"]["branch"][0], "Unknown branch \"nope\"");
}

#[tokio::test]
async fn create_rejects_taken_name() {
    let (app, _) = setup();
    let form = json!({ "name": "STUDY", "repo": REPO, "branch": "main", "db": "full" });

    let res = app.post("/workspaces/", Some("alice"), form).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["errors"]["name"][0], "A workspace with this name already exists.");
}

// ── Detail ──

#[tokio::test]
async fn anonymous_detail_skips_the_repo_host() {
    let (app, _) = setup();

    let res = app.get("/workspaces/study/", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["actions"], json!([]));
    assert_eq!(res.body["can_run_jobs"], false);
    assert!(app.repo_host.calls().is_empty());
}

#[tokio::test]
async fn detail_lists_actions_with_latest_status() {
    let (app, workspace) = setup();
    let request = app.add_job_request(&workspace, "tpp", &["generate_cohort"], workspace.created_by);
    app.add_job(request.id, "generate_cohort", JobStatus::Succeeded);

    let res = app.get("/workspaces/study/", Some("alice")).await;

    let actions = res.body["actions"].as_array().unwrap();
    let summary: Vec<_> = actions.iter().map(|a| (a["name"].clone(), a["status"].clone())).collect();
    assert_eq!(
        summary,
        vec![
            (json!("generate_cohort"), json!("succeeded")),
            (json!("run_model"), json!("-")),
            (json!("run_all"), json!("-")),
        ]
    );
    assert_eq!(res.body["can_run_jobs"], true);
    assert_eq!(res.body["repo_name"], "study");
    assert_eq!(res.body["logs_url"], "/workspaces/study/logs/");
    assert!(res.body.get("backends").is_none());
    assert_eq!(
        app.repo_host.calls(),
        vec![RepoHostCall::PipelineDefinition { repo: REPO.to_string(), branch: "main".to_string() }]
    );
}

#[tokio::test]
async fn staff_may_choose_backends() {
    let (app, _) = setup();
    let res = app.get("/workspaces/study/", Some("admin")).await;
    assert_eq!(res.body["backends"], json!(["tpp", "emis", "expectations"]));
}

#[tokio::test]
async fn broken_pipeline_is_reported_on_the_page() {
    let (app, _) = setup();
    app.repo_host.set_pipeline(REPO, "actions: {}");

    let res = app.get("/workspaces/study/", Some("alice")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["actions"], json!([]));
    assert_eq!(res.body["actions_error"], "project.yaml defines no actions");
}

#[tokio::test]
async fn unknown_workspace_goes_home() {
    let (app, _) = setup();
    let res = app.get("/workspaces/nope/", Some("alice")).await;
    assert_eq!(res.location(), Some("/"));
}

#[tokio::test]
async fn project_workspaces_live_under_the_project() {
    let (app, workspace) = setup();
    let (org, project) = app.add_project("research", "covid", workspace.created_by);
    app.add_project_workspace("trial", project.id, workspace.created_by);

    let old = app.get("/workspaces/trial/", Some("alice")).await;
    let new = app.get(&format!("/orgs/{}/{}/trial/", org.slug, project.slug), Some("alice")).await;
    let stray = app.get(&format!("/orgs/{}/{}/study/", org.slug, project.slug), Some("alice")).await;
    let unknown_org = app.get("/orgs/nope/covid/trial/", Some("alice")).await;

    assert_eq!(old.location(), Some("/orgs/research/covid/trial/"));
    assert_eq!(new.status, StatusCode::OK);
    assert_eq!(new.body["workspace"]["name"], "trial");
    assert_eq!(stray.location(), Some("/workspaces/study/"));
    assert_eq!(unknown_org.status, StatusCode::NOT_FOUND);
}

// ── Running ──

#[tokio::test]
async fn run_creates_a_job_request() {
    let (app, workspace) = setup();
    let form = json!({ "requested_actions": ["run_model", "generate_cohort"], "force_run_dependencies": "on" });

    let res = app.post("/workspaces/study/", Some("alice"), form).await;

    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), Some("/workspaces/study/logs/"));
    let created = requests(&app);
    assert_eq!(created.len(), 1);
    let request = &created[0];
    assert_eq!(request.workspace, workspace.id);
    assert_eq!(request.backend, "tpp");
    assert_eq!(request.sha, "f00dcafe");
    assert_eq!(request.requested_actions, vec!["run_model", "generate_cohort"]);
    assert!(request.force_run_dependencies);
    assert!(!request.will_notify);
    assert_eq!(request.identifier.len(), 16);
}

#[tokio::test]
async fn run_validates_actions() {
    let (app, _) = setup();

    let unknown = app.post("/workspaces/study/", Some("alice"), json!({ "requested_actions": ["bogus"] })).await;
    let empty = app.post("/workspaces/study/", Some("alice"), json!({ "requested_actions": [] })).await;

    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        unknown.body["errors"]["requested_actions"][0],
        "Select a valid choice. bogus is not one of the available choices."
    );
    assert_eq!(
        empty.body["errors"]["requested_actions"][0],
        "Please select at least one of the Actions listed above."
    );
    assert!(requests(&app).is_empty());
}

#[tokio::test]
async fn only_staff_pick_the_backend() {
    let (app, _) = setup();
    let form = json!({ "requested_actions": ["run_all"], "backend": "emis" });

    app.post("/workspaces/study/", Some("alice"), form.clone()).await;
    app.post("/workspaces/study/", Some("admin"), form).await;

    let backends: Vec<_> = requests(&app).into_iter().map(|r| r.backend).collect();
    assert_eq!(backends, vec!["tpp", "emis"]);
}

#[tokio::test]
async fn archived_workspaces_refuse_new_jobs() {
    let (app, workspace) = setup();
    app.emit(vec![Event::WorkspaceArchiveSet { id: workspace.id, archived: true }]);

    let res = app
        .post("/workspaces/study/", Some("alice"), json!({ "requested_actions": ["run_all"] }))
        .await;

    assert_eq!(res.location(), Some("/workspaces/study/"));
    assert_eq!(res.body["message"], "You cannot create Jobs for an archived Workspace.");
    assert!(requests(&app).is_empty());
}

#[tokio::test]
async fn run_surfaces_repo_host_outage() {
    let (app, _) = setup();
    app.repo_host.fail_with("GitHub is down");

    let res = app
        .post("/workspaces/study/", Some("alice"), json!({ "requested_actions": ["run_all"] }))
        .await;

    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert_eq!(res.body["error"], "GitHub is down");
}

#[tokio::test]
async fn outsiders_cannot_run() {
    let (app, _) = setup();

    let res = app
        .post("/workspaces/study/", Some("mallory"), json!({ "requested_actions": ["run_all"] }))
        .await;

    assert!(res.location().unwrap().starts_with("/login/"));
    assert!(requests(&app).is_empty());
}

// ── Logs and toggles ──

#[tokio::test]
async fn logs_list_only_this_workspace() {
    let (app, workspace) = setup();
    let other = app.add_workspace("other", workspace.created_by);
    let mine = app.add_job_request(&workspace, "tpp", &["a"], workspace.created_by);
    app.add_job_request(&other, "tpp", &["a"], workspace.created_by);

    let res = app.get("/workspaces/study/logs/", None).await;

    let results = res.body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], mine.id.get());
    assert_eq!(res.body["workspace"]["name"], "study");
}

#[tokio::test]
async fn archive_toggle() {
    let (app, workspace) = setup();

    let res = app.post("/workspaces/study/archive-toggle/", Some("alice"), json!({ "is_archived": "True" })).await;

    assert_eq!(res.location(), Some("/"));
    assert!(app.state.store.read(|s| s.workspaces[&workspace.id].is_archived));
}

#[tokio::test]
async fn notifications_toggle() {
    let (app, workspace) = setup();

    let res = app
        .post("/workspaces/study/notifications-toggle/", Some("alice"), json!({ "should_notify": true }))
        .await;

    assert_eq!(res.location(), Some("/workspaces/study/"));
    assert!(app.state.store.read(|s| s.workspaces[&workspace.id].should_notify));
}

#[tokio::test]
async fn toggling_unknown_workspace_is_not_found() {
    let (app, _) = setup();

    let staff = app.post("/workspaces/nope/archive-toggle/", Some("admin"), json!({})).await;
    let anonymous = app.post("/workspaces/nope/archive-toggle/", None, json!({})).await;

    assert_eq!(staff.status, StatusCode::NOT_FOUND);
    assert_eq!(anonymous.status, StatusCode::FOUND);
}

// ── Release ──

#[tokio::test]
async fn release_lists_latest_outputs_per_action() {
    let (app, workspace) = setup();
    let other = app.add_workspace("other", workspace.created_by);
    let first = app.add_job_request(&workspace, "tpp", &["generate_cohort"], workspace.created_by);
    let second =
        app.add_job_request(&workspace, "tpp", &["generate_cohort", "run_model"], workspace.created_by);
    let elsewhere = app.add_job_request(&other, "tpp", &["generate_cohort"], workspace.created_by);

    let stale = app.add_job(first.id, "generate_cohort", JobStatus::Succeeded);
    let fresh = app.add_job(second.id, "generate_cohort", JobStatus::Succeeded);
    let failed = app.add_job(second.id, "run_model", JobStatus::Failed);
    let foreign = app.add_job(elsewhere.id, "generate_cohort", JobStatus::Succeeded);
    set_outputs(&app, stale.id, &["old.csv"]);
    set_outputs(&app, fresh.id, &["input.csv", "counts.csv"]);
    set_outputs(&app, failed.id, &["model.log"]);
    set_outputs(&app, foreign.id, &["theirs.csv"]);

    let res = app.get("/workspaces/study/release/", Some("alice")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["workspace"]["name"], "study");
    let outputs = res.body["outputs"].as_array().unwrap();
    let names: Vec<&str> = outputs.iter().filter_map(|o| o["name"].as_str()).collect();
    assert_eq!(names, vec!["input.csv", "counts.csv"]);
    assert_eq!(outputs[0]["action"], "generate_cohort");
    assert_eq!(outputs[0]["location"], "output/input.csv");
    assert_eq!(outputs[0]["job_url"], format!("/jobs/{}/", fresh.identifier));
}

#[tokio::test]
async fn release_needs_run_permission() {
    let (app, _) = setup();

    let anonymous = app.get("/workspaces/study/release/", None).await;
    let outsider = app.get("/workspaces/study/release/", Some("mallory")).await;

    assert_eq!(anonymous.location(), Some("/login/?next=/workspaces/study/release/"));
    assert_eq!(outsider.location(), Some("/login/?next=/workspaces/study/release/"));
}
