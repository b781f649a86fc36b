//! Status dashboard specs
//!
//! The dashboard warns about backends that stopped polling while work is
//! waiting for them.

use std::time::Duration;

use crate::prelude::*;

fn tpp_status(page: &TestResponse) -> &Value {
    &page.body["backends"][0]
}

#[tokio::test]
async fn silent_backend_with_queued_work_is_flagged() {
    let app = study_server();
    let tpp = Backend::new(&app, "tpp");
    tpp.poll().await;
    request_actions(&app, &["generate_cohort"]).await;

    let fresh = app.get("/status/", None).await;
    assert_eq!(tpp_status(&fresh)["queue"]["unacked"], 1);
    assert_eq!(tpp_status(&fresh)["show_warning"], false);

    app.clock.advance(Duration::from_secs(30 * 60));
    let stale = app.get("/status/", None).await;
    assert_eq!(tpp_status(&stale)["show_warning"], true);

    // Polling again clears the warning.
    tpp.poll().await;
    let recovered = app.get("/status/", None).await;
    assert_eq!(tpp_status(&recovered)["show_warning"], false);
}

#[tokio::test]
async fn picked_up_work_counts_as_acknowledged() {
    let app = study_server();
    let tpp = Backend::new(&app, "tpp");
    let request = request_actions(&app, &["generate_cohort"]).await;
    tpp.create_job(request, "generate_cohort").await;
    app.clock.advance(Duration::from_secs(30 * 60));

    let page = app.get("/status/", None).await;

    assert_eq!(tpp_status(&page)["queue"], json!({ "acked": 1, "unacked": 0 }));
    assert_eq!(tpp_status(&page)["show_warning"], false);
}
