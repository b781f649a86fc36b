//! Project workspace specs
//!
//! Project roles grant run access without organisation membership.

use crate::prelude::*;
use js_core::ProjectRole;

const TRIAL_REPO: &str = "https://github.com/opensafely/trial";

fn project_server(role: ProjectRole) -> TestApp {
    let app = study_server();
    let admin = app.add_user("admin", true);
    let bob = app.add_user("bob", false);
    let (_, project) = app.add_project("oxford", "covid", admin.id);
    app.add_project_workspace("trial", project.id, admin.id);
    app.set_roles(project.id, bob.id, &[role]);
    app.repo_host.set_pipeline(TRIAL_REPO, PROJECT_YAML);
    app
}

#[tokio::test]
async fn developers_run_jobs_in_project_workspaces() {
    let app = project_server(ProjectRole::ProjectDeveloper);

    let page = app.get("/orgs/oxford/covid/trial/", Some("bob")).await;
    assert_eq!(page.body["can_run_jobs"], true);

    let run = app.post("/workspaces/trial/", Some("bob"), json!({ "requested_actions": ["run_all"] })).await;
    assert_eq!(run.location(), Some("/workspaces/trial/logs/"));
    assert!(app.membership.calls().is_empty());
}

#[tokio::test]
async fn developer_role_does_not_reach_other_workspaces() {
    let app = project_server(ProjectRole::ProjectDeveloper);
    let admin = app.state.store.read(|s| s.user_by_username("admin").map(|u| u.id)).unwrap();
    app.add_workspace("study", admin);

    let run = app.post("/workspaces/study/", Some("bob"), json!({ "requested_actions": ["run_all"] })).await;

    assert!(run.location().unwrap().starts_with("/login/"));
    assert_eq!(app.membership.calls(), vec!["bob".to_string()]);
}

#[tokio::test]
async fn coordinators_need_org_membership() {
    let app = project_server(ProjectRole::ProjectCoordinator);

    let page = app.get("/orgs/oxford/covid/trial/", Some("bob")).await;
    app.membership.add_member("bob");
    let member = app.get("/orgs/oxford/covid/trial/", Some("bob")).await;

    assert_eq!(page.body["can_run_jobs"], false);
    assert_eq!(member.body["can_run_jobs"], true);
}

#[tokio::test]
async fn old_workspace_urls_redirect_into_the_project() {
    let app = project_server(ProjectRole::ProjectDeveloper);

    let res = app.get("/workspaces/trial/", Some("bob")).await;

    assert_eq!(res.location(), Some("/orgs/oxford/covid/trial/"));
}
