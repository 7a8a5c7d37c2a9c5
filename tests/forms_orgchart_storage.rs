mod common;

use common::{bearer_app, payloads, request, FORM_ID, SUBMISSION_ID, USER_ID};
use keephub::errors::NodeErrorKind;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_submission(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/formvalues/{}", SUBMISSION_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn submission_orgunits_report_failed_lookups_in_place() {
    let server = MockServer::start().await;

    mount_submission(
        &server,
        json!({"_id": SUBMISSION_ID, "createdBy": USER_ID, "contentRef": FORM_ID}),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(format!("/users/{}", USER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": USER_ID,
            "name": {"first": "Jane", "last": "Doe"},
            "orgunits": ["ou-store", "ou-broken", "ou-nameless"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgchart/ou-store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ou-store",
            "name": "Store 12",
            "namepath": "/Acme/North/Store 12"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgchart/ou-broken"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgchart/ou-nameless"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "ou-nameless"})))
        .mount(&server)
        .await;

    let app = bearer_app(&server);
    let items = app
        .run(&request(
            "formSubmission",
            "getSubmissionOrgunits",
            json!({"formSubmissionId": SUBMISSION_ID}),
        ))
        .await
        .expect("run");

    assert_eq!(
        payloads(&items),
        vec![json!({
            "_id": USER_ID,
            "name": {"first": "Jane", "last": "Doe"},
            "orgunits": [
                {"id": "ou-store", "name": "Store 12", "path": "Acme/North/Store 12"},
                {"id": "ou-broken", "name": "Error fetching", "path": ""},
                {"id": "ou-nameless", "name": "Unknown", "path": ""}
            ]
        })]
    );
}

#[tokio::test]
async fn submitter_details_require_a_submitter() {
    let server = MockServer::start().await;

    mount_submission(&server, json!({"_id": SUBMISSION_ID})).await;

    let app = bearer_app(&server);
    let err = app
        .run(&request(
            "formSubmission",
            "getSubmitterDetails",
            json!({"formSubmissionId": SUBMISSION_ID}),
        ))
        .await
        .expect_err("no submitter");
    assert_eq!(err.message, "Form submission or submitter not found");
}

#[tokio::test]
async fn submission_id_must_be_an_object_id() {
    let server = MockServer::start().await;
    let app = bearer_app(&server);
    let err = app
        .run(&request(
            "formSubmission",
            "getFormSubmission",
            json!({"formSubmissionId": "abc"}),
        ))
        .await
        .expect_err("invalid id");
    assert_eq!(err.kind, NodeErrorKind::InvalidInput);
    assert_eq!(
        err.message,
        "Invalid Form Submission ID. Expected 24 hexadecimal characters (MongoDB ObjectID format)"
    );
}

#[tokio::test]
async fn response_duration_is_measured_from_form_creation() {
    let server = MockServer::start().await;

    mount_submission(
        &server,
        json!({
            "_id": SUBMISSION_ID,
            "contentRef": {"_id": FORM_ID},
            "createdAt": "2024-03-04T13:05:09.000Z"
        }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(format!("/contents/{}", FORM_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": FORM_ID,
            "createdAt": "2024-03-01T10:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = bearer_app(&server);
    let items = app
        .run(&request(
            "formSubmission",
            "calculateResponseDuration",
            json!({"formSubmissionId": SUBMISSION_ID}),
        ))
        .await
        .expect("run");

    assert_eq!(
        payloads(&items),
        vec![json!({
            "formId": FORM_ID,
            "formCreatedAt": "2024-03-01T10:00:00.000Z",
            "submittedAt": "2024-03-04T13:05:09.000Z",
            "duration": {"timeSinceFormCreated": "3d 3h 5m 9s"}
        })]
    );
}

#[tokio::test]
async fn update_submission_orgunits_patches_set_operator() {
    let server = MockServer::start().await;

    mount_submission(
        &server,
        json!({
            "_id": SUBMISSION_ID,
            "contentRef": FORM_ID,
            "values": [{"ffId": "f1", "value": "yes"}]
        }),
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path(format!("/formvalues/{}", SUBMISSION_ID)))
        .and(body_json(json!({
            "contentRef": FORM_ID,
            "values": [{"ffId": "f1", "value": "yes"}],
            "$set": {"orgunitsOfCreator": ["ou-1", "ou-2"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": SUBMISSION_ID})))
        .expect(1)
        .mount(&server)
        .await;

    let app = bearer_app(&server);
    let items = app
        .run(&request(
            "formSubmission",
            "updateSubmissionOrgunits",
            json!({"formSubmissionId": SUBMISSION_ID, "newOrgunitId": " ou-1, ,ou-2 "}),
        ))
        .await
        .expect("run");
    assert_eq!(
        payloads(&items),
        vec![json!({
            "success": true,
            "message": "Updated orgunitsOfCreator",
            "orgunitsOfCreator": ["ou-1", "ou-2"]
        })]
    );

    let err = app
        .run(&request(
            "formSubmission",
            "updateSubmissionOrgunits",
            json!({"formSubmissionId": SUBMISSION_ID, "newOrgunitId": " , "}),
        ))
        .await
        .expect_err("no ids");
    assert_eq!(err.message, "At least one Orgunit ID must be provided");
}

#[tokio::test]
async fn submissions_by_form_default_to_latest_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/formvalues"))
        .and(query_param("$limit", "50"))
        .and(query_param("$skip", "0"))
        .and(query_param("$sort[updatedAt]", "-1"))
        .and(query_param("$sort[_id]", "1"))
        .and(query_param("contentType", "form"))
        .and(query_param("widgetId", "formValues"))
        .and(query_param("contentRef", FORM_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "data": [{"_id": SUBMISSION_ID}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = bearer_app(&server);
    let items = app
        .run(&request("formSubmission", "getByForm", json!({"contentRef": FORM_ID})))
        .await
        .expect("run");
    assert_eq!(payloads(&items), vec![json!({"_id": SUBMISSION_ID})]);
}

#[tokio::test]
async fn ancestors_walk_parent_links_over_http() {
    let server = MockServer::start().await;

    for (id, name, parent) in [
        ("leaf", "Store 12", Some("mid")),
        ("mid", "North", Some("root")),
        ("root", "Acme", None),
    ] {
        let mut body = json!({"id": id, "name": name});
        if let Some(parent) = parent {
            body["parent"] = json!(parent);
        }
        Mock::given(method("GET"))
            .and(path(format!("/orgchart/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }

    let app = bearer_app(&server);
    let items = app
        .run(&request("orgchart", "getAncestors", json!({"nodeId": "leaf"})))
        .await
        .expect("run");
    assert_eq!(
        payloads(&items),
        vec![json!({
            "nodeId": "leaf",
            "ancestorsCount": 2,
            "ancestors": [
                {"ancestorId": "mid", "ancestorName": "North"},
                {"ancestorId": "root", "ancestorName": "Acme"}
            ]
        })]
    );

    let err = app
        .run(&request("orgchart", "getParent", json!({"nodeId": "root"})))
        .await
        .expect_err("root");
    assert_eq!(err.message, "Root node detected. Root nodes have no ancestors.");

    let items = app
        .run(&request("orgchart", "getParent", json!({"nodeId": "leaf"})))
        .await
        .expect("parent");
    assert_eq!(items[0].json["parentId"], "mid");
    assert_eq!(items[0].json["parentName"], "North");
}

#[tokio::test]
async fn children_are_listed_depth_first_within_limits() {
    let server = MockServer::start().await;

    let listings = [
        ("root", json!([{"id": "a", "name": "A", "parent": "root"}, {"id": "b", "name": "B", "parent": "root"}])),
        ("a", json!({"total": 1, "data": [{"id": "a1", "name": "A1", "parent": "a"}]})),
        ("a1", json!([])),
        ("b", json!([])),
    ];
    for (parent, body) in listings {
        Mock::given(method("GET"))
            .and(path("/orgchart"))
            .and(query_param("parent", parent))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }

    let app = bearer_app(&server);
    let items = app
        .run(&request("orgchart", "getChildren", json!({"nodeId": "root"})))
        .await
        .expect("run");
    assert_eq!(
        payloads(&items),
        vec![json!({
            "nodeId": "root",
            "childrenCount": 3,
            "children": [
                {"childId": "a", "childName": "A"},
                {"childId": "a1", "childName": "A1"},
                {"childId": "b", "childName": "B"}
            ]
        })]
    );

    let items = app
        .run(&request("orgchart", "getChildren", json!({"nodeId": "root", "depthLimit": 1})))
        .await
        .expect("shallow");
    assert_eq!(items[0].json["childrenCount"], 2);

    let items = app
        .run(&request("orgchart", "getChildren", json!({"nodeId": "b"})))
        .await
        .expect("leaf");
    assert_eq!(
        payloads(&items),
        vec![json!({
            "nodeId": "b",
            "childrenCount": 0,
            "children": [],
            "message": "No children found for this node"
        })]
    );
}

#[tokio::test]
async fn external_ref_lookup_uses_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgchart"))
        .and(query_param("externalRef", "STORE-12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "ou-store"}])))
        .expect(1)
        .mount(&server)
        .await;

    let app = bearer_app(&server);
    let items = app
        .run(&request("orgchart", "getByExternalRef", json!({"externalRef": "STORE-12"})))
        .await
        .expect("run");
    assert_eq!(payloads(&items), vec![json!([{"id": "ou-store"}])]);
}

#[tokio::test]
async fn signed_url_posts_storage_reference() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/signurl"))
        .and(body_json(json!({
            "signType": "getObject",
            "origin": "taskAttachment",
            "originId": "t1",
            "storageId": "file-9",
            "attachment": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"url": "https://files.example/abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = bearer_app(&server);
    let items = app
        .run(&request(
            "storage",
            "getSignedUrl",
            json!({"origin": "taskAttachment", "originId": "t1", "storageId": "file-9", "attachment": true}),
        ))
        .await
        .expect("run");
    assert_eq!(payloads(&items), vec![json!({"url": "https://files.example/abc"})]);

    let err = app
        .run(&request(
            "storage",
            "getSignedUrl",
            json!({"origin": "taskAttachmnt", "originId": "t1", "storageId": "file-9"}),
        ))
        .await
        .expect_err("bad origin");
    assert_eq!(err.message, "Invalid origin: taskAttachmnt");
    assert_eq!(err.description.as_deref(), Some("Did you mean: taskAttachment?"));
}

#[tokio::test]
async fn ancestors_tolerate_untyped_node_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgchart/leaf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "leaf",
            "parent": "root",
            "externalRef": 4711,
            "namepath": null
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgchart/root"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "root",
            "name": {"en": "Head office", "nl": "Hoofdkantoor"},
            "externalRef": {"system": "erp", "code": 1}
        })))
        .mount(&server)
        .await;

    let app = bearer_app(&server);
    let items = app
        .run(&request("orgchart", "getAncestors", json!({"nodeId": "leaf"})))
        .await
        .expect("run");
    assert_eq!(
        payloads(&items),
        vec![json!({
            "nodeId": "leaf",
            "ancestorsCount": 1,
            "ancestors": [
                {"ancestorId": "root", "ancestorName": {"en": "Head office", "nl": "Hoofdkantoor"}}
            ]
        })]
    );
}

#[tokio::test]
async fn submission_orgunits_pass_names_through() {
    let server = MockServer::start().await;

    mount_submission(&server, json!({"_id": SUBMISSION_ID, "createdBy": USER_ID})).await;

    Mock::given(method("GET"))
        .and(path(format!("/users/{}", USER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": USER_ID,
            "name": "Jane Doe",
            "orgunits": ["ou-store"]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgchart/ou-store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ou-store",
            "name": {"en": "Store 12"},
            "externalRef": 12,
            "namepath": "/Acme/Store 12"
        })))
        .mount(&server)
        .await;

    let app = bearer_app(&server);
    let items = app
        .run(&request(
            "formSubmission",
            "getSubmissionOrgunits",
            json!({"formSubmissionId": SUBMISSION_ID}),
        ))
        .await
        .expect("run");
    assert_eq!(
        items[0].json["orgunits"],
        json!([{"id": "ou-store", "name": {"en": "Store 12"}, "path": "Acme/Store 12"}])
    );
}
